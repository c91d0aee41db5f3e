use crate::cell_grid::{moore_neighbours, Cell, CellGrid, N_NEIGHBOURS};
use crate::heuristic::Heuristic;
use grid_util::grid::{Grid, SimpleGrid};
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};

/// Visitation state of a node. Nodes only ever move forward through
/// `Unvisited -> Open -> Closed`; blocked cells are parked in [NodeState::Blocked] for the
/// whole run and are never discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeState {
    Unvisited,
    Open,
    Closed,
    Blocked,
}

impl NodeState {
    /// Position in the forward-only lifecycle, used to check that states never regress.
    pub fn rank(self) -> u8 {
        match self {
            NodeState::Unvisited => 0,
            NodeState::Open => 1,
            NodeState::Closed => 2,
            NodeState::Blocked => 3,
        }
    }
}

/// Search bookkeeping for one grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub index: usize,
    /// Uniform move cost charged when a neighbour relaxes into this node.
    pub edge_weight: f32,
    pub g: f32,
    pub h: f32,
    pub f: f32,
    pub state: NodeState,
    /// Index of the node the best known path arrived from.
    pub parent: Option<usize>,
}

impl Node {
    pub fn is_expandable(&self) -> bool {
        matches!(self.state, NodeState::Unvisited | NodeState::Open)
    }
}

/// Arena of [Node]s for a single run, one per cell laid out like the [CellGrid] it was built
/// from. Parent links are plain indices into the same table.
#[derive(Clone, Debug)]
pub struct NodeTable {
    nodes: SimpleGrid<Node>,
}

impl NodeTable {
    /// Builds a fresh table for a search towards `sink`. Every cost starts at infinity and
    /// `h` is baked in as `heuristic(cell, sink) * scale`.
    pub fn new(
        grid: &CellGrid,
        sink: usize,
        heuristic: Heuristic,
        edge_weight: f32,
        scale: f32,
    ) -> NodeTable {
        let target = grid.point_of(sink);
        let values = grid
            .cells()
            .iter()
            .enumerate()
            .map(|(index, &cell)| Node {
                index,
                edge_weight,
                g: f32::INFINITY,
                h: heuristic.estimate(grid.point_of(index), target) * scale,
                f: f32::INFINITY,
                state: match cell {
                    Cell::Blocked => NodeState::Blocked,
                    _ => NodeState::Unvisited,
                },
                parent: None,
            })
            .collect();
        NodeTable {
            nodes: SimpleGrid {
                width: grid.width(),
                height: grid.height(),
                values,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.values.is_empty()
    }
    pub fn width(&self) -> usize {
        self.nodes.width()
    }
    pub fn height(&self) -> usize {
        self.nodes.height()
    }
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.values.get(index)
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.values.get_mut(index)
    }
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values.iter()
    }
    pub fn states(&self) -> impl Iterator<Item = NodeState> + '_ {
        self.nodes.values.iter().map(|n| n.state)
    }
    pub fn neighbours(&self, index: usize) -> SmallVec<[usize; N_NEIGHBOURS]> {
        moore_neighbours(&self.nodes, index)
    }
}

impl Index<usize> for NodeTable {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes.values[index]
    }
}

impl IndexMut<usize> for NodeTable {
    fn index_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes.values[index]
    }
}
