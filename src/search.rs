use crate::cell_grid::{Cell, CellGrid};
use crate::error::{ConfigError, Result};
use crate::frontier::{Frontier, FrontierKind};
use crate::heuristic::Heuristic;
use crate::node::{NodeState, NodeTable};
use grid_util::point::Point;
use itertools::Either;
use log::{debug, info, warn};

pub const DEFAULT_EDGE_WEIGHT: f32 = 1.0;

/// Parameters fixed for the duration of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchConfig {
    pub heuristic: Heuristic,
    /// Multiplies every heuristic value. Values above 1 trade optimality for fewer
    /// expansions.
    pub heuristic_factor: f32,
    pub edge_weight: f32,
    pub frontier: FrontierKind,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            heuristic: Heuristic::Chebyshev,
            heuristic_factor: 1.0,
            edge_weight: DEFAULT_EDGE_WEIGHT,
            frontier: FrontierKind::Heap,
        }
    }
}

impl SearchConfig {
    pub fn new() -> SearchConfig {
        SearchConfig::default()
    }
    pub fn with_heuristic(mut self, heuristic: Heuristic) -> SearchConfig {
        self.heuristic = heuristic;
        self
    }
    pub fn with_heuristic_factor(mut self, heuristic_factor: f32) -> SearchConfig {
        self.heuristic_factor = heuristic_factor;
        self
    }
    pub fn with_edge_weight(mut self, edge_weight: f32) -> SearchConfig {
        self.edge_weight = edge_weight;
        self
    }
    pub fn with_frontier(mut self, frontier: FrontierKind) -> SearchConfig {
        self.frontier = frontier;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.edge_weight.is_finite() || self.edge_weight <= 0.0 {
            return Err(ConfigError::InvalidEdgeWeight(self.edge_weight));
        }
        if !self.heuristic_factor.is_finite() || self.heuristic_factor < 0.0 {
            return Err(ConfigError::InvalidHeuristicFactor(self.heuristic_factor));
        }
        Ok(())
    }

    /// Whether the first path found is guaranteed to be a cheapest one.
    pub fn optimal(&self) -> bool {
        self.heuristic.admissible_for_uniform_moves() && self.heuristic_factor <= 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunStatus {
    NotStarted,
    Running,
    PathFound,
    /// The frontier ran dry before the sink was reached: no path exists.
    Exhausted,
}

impl RunStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, RunStatus::PathFound | RunStatus::Exhausted)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes closed and relaxed. The sink is closed without being expanded.
    pub expansions: usize,
    /// Nodes queued on first discovery.
    pub discovered: usize,
    /// Queued nodes whose cost went down.
    pub reprioritized: usize,
    pub stale_skips: usize,
    /// Largest number of distinct nodes waiting in the frontier at once.
    pub peak_frontier: usize,
}

impl SearchStats {
    /// Every call into the frontier that queued or requeued a node.
    pub fn frontier_pushes(&self) -> usize {
        self.discovered + self.reprioritized
    }
}

/// State of one search from source to sink. It is built from a frozen [CellGrid] and keeps
/// no reference to it, so the grid is free to change once the run is dropped.
#[derive(Debug)]
pub struct SearchRun {
    nodes: NodeTable,
    frontier: Box<dyn Frontier>,
    source: usize,
    sink: usize,
    status: RunStatus,
    path: Vec<usize>,
    stats: SearchStats,
}

impl SearchRun {
    /// Builds the node table and expands the source, which seeds the frontier with its
    /// neighbours. Refuses grids without exactly one source and one sink.
    pub fn new(grid: &CellGrid, config: &SearchConfig) -> Result<SearchRun> {
        config.validate()?;
        let (source, sink) = grid.endpoints()?;
        if !config.heuristic.admissible_for_uniform_moves() {
            warn!(
                "{:?} overestimates on an 8-connected grid, paths may not be shortest",
                config.heuristic
            );
        }
        if config.heuristic_factor > 1.0 {
            warn!(
                "Heuristic factor {} > 1, paths may not be shortest",
                config.heuristic_factor
            );
        }
        info!(
            "Starting search from {:?} to {:?} on a {}x{} grid",
            grid.point_of(source),
            grid.point_of(sink),
            grid.width(),
            grid.height()
        );
        let nodes = NodeTable::new(
            grid,
            sink,
            config.heuristic,
            config.edge_weight,
            config.edge_weight * config.heuristic_factor,
        );
        let mut run = SearchRun {
            nodes,
            frontier: config.frontier.build(),
            source,
            sink,
            status: RunStatus::Running,
            path: Vec::new(),
            stats: SearchStats::default(),
        };
        let start = &mut run.nodes[source];
        start.g = 0.0;
        start.f = start.h;
        run.expand(source);
        Ok(run)
    }

    /// Closes `current` and relaxes its neighbours. A neighbour is queued on first
    /// discovery; later improvements only update its cost and parent.
    fn expand(&mut self, current: usize) {
        self.nodes[current].state = NodeState::Closed;
        self.stats.expansions += 1;
        let g = self.nodes[current].g;
        for n in self.nodes.neighbours(current) {
            let neighbour = &mut self.nodes[n];
            if matches!(neighbour.state, NodeState::Blocked | NodeState::Closed) {
                continue;
            }
            let candidate = g + neighbour.edge_weight;
            let improved = candidate < neighbour.g;
            if improved {
                neighbour.g = candidate;
                neighbour.f = candidate + neighbour.h;
                neighbour.parent = Some(current);
            }
            if neighbour.state != NodeState::Open {
                neighbour.state = NodeState::Open;
                self.frontier.insert(n, &self.nodes);
                self.stats.discovered += 1;
            } else if improved {
                self.frontier.reprioritize(n, &self.nodes);
                self.stats.reprioritized += 1;
            }
        }
        self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier.len());
        debug!(
            "Expanded {} with g = {}, frontier holds {}",
            current,
            g,
            self.frontier.len()
        );
    }

    /// Performs at most one extract and expand cycle. Once the run is finished this is a
    /// no-op returning the final status.
    pub fn step(&mut self) -> RunStatus {
        if self.status != RunStatus::Running {
            return self.status;
        }
        let best = self.frontier.extract_best(&self.nodes);
        self.stats.stale_skips = self.frontier.stale_skips();
        match best {
            None => {
                self.status = RunStatus::Exhausted;
                info!(
                    "Frontier exhausted after {} expansions, sink {} is unreachable",
                    self.stats.expansions, self.sink
                );
            }
            Some(current) if current == self.sink => {
                self.nodes[current].state = NodeState::Closed;
                self.path = build_path(&self.nodes, current);
                self.status = RunStatus::PathFound;
                info!(
                    "Found path of {} steps with cost {} after {} expansions",
                    self.path.len().saturating_sub(1),
                    self.nodes[current].g,
                    self.stats.expansions
                );
            }
            Some(current) => self.expand(current),
        }
        self.status
    }

    /// Steps until the run is finished.
    pub fn run_to_end(&mut self) -> RunStatus {
        while !self.step().is_finished() {}
        self.status
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }
    pub fn source(&self) -> usize {
        self.source
    }
    pub fn sink(&self) -> usize {
        self.sink
    }
    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }
    pub fn frontier(&self) -> &dyn Frontier {
        self.frontier.as_ref()
    }
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
    pub fn node_state(&self, index: usize) -> Option<NodeState> {
        self.nodes.get(index).map(|n| n.state)
    }
    pub fn states(&self) -> impl Iterator<Item = NodeState> + '_ {
        self.nodes.states()
    }

    /// Cell indices from source to sink, available once the run reached
    /// [RunStatus::PathFound].
    pub fn path(&self) -> Option<&[usize]> {
        (self.status == RunStatus::PathFound).then_some(self.path.as_slice())
    }

    pub fn path_cost(&self) -> Option<f32> {
        (self.status == RunStatus::PathFound).then(|| self.nodes[self.sink].g)
    }
}

/// Follows parent links back from `sink` and returns the indices in source to sink order.
pub fn build_path(nodes: &NodeTable, sink: usize) -> Vec<usize> {
    let mut path = std::iter::successors(Some(sink), |&ix| nodes[ix].parent)
        .take(nodes.len())
        .collect::<Vec<_>>();
    path.reverse();
    path
}

/// Runs a search on `grid` to completion. Returns `Ok(None)` if no path exists.
pub fn find_path(grid: &CellGrid, config: &SearchConfig) -> Result<Option<Vec<usize>>> {
    let mut run = SearchRun::new(grid, config)?;
    run.run_to_end();
    Ok(run.path().map(<[usize]>::to_vec))
}

/// The explicit run context shared with whatever drives the search: it owns the grid, the
/// configuration and the current run. Editing the grid or changing the configuration
/// discards the run, so a run never observes a grid that changed underneath it.
#[derive(Debug)]
pub struct SearchContext {
    grid: CellGrid,
    config: SearchConfig,
    run: Option<SearchRun>,
}

impl SearchContext {
    pub fn new(grid: CellGrid, config: SearchConfig) -> SearchContext {
        SearchContext {
            grid,
            config,
            run: None,
        }
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Enters edit mode, discarding any run in progress.
    pub fn edit(&mut self) -> &mut CellGrid {
        self.reset();
        &mut self.grid
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) {
        self.reset();
        self.config = config;
    }

    /// Starts a fresh run, replacing any previous one. On error the context is left
    /// without a run.
    pub fn start(&mut self) -> Result<RunStatus> {
        self.run = None;
        self.grid.update();
        let run = SearchRun::new(&self.grid, &self.config)?;
        let status = run.status();
        self.run = Some(run);
        Ok(status)
    }

    /// Advances the current run by one tick.
    pub fn step(&mut self) -> RunStatus {
        match self.run.as_mut() {
            Some(run) => run.step(),
            None => RunStatus::NotStarted,
        }
    }

    pub fn run_to_end(&mut self) -> RunStatus {
        match self.run.as_mut() {
            Some(run) => run.run_to_end(),
            None => RunStatus::NotStarted,
        }
    }

    /// Drops the current run and its path. Safe to call in any state.
    pub fn reset(&mut self) {
        if let Some(run) = self.run.take() {
            info!("Discarding search in state {:?}", run.status());
        }
    }

    /// Resets the search and removes every obstacle.
    pub fn clear_all(&mut self) {
        self.reset();
        self.grid.clear_obstacles();
    }

    pub fn run(&self) -> Option<&SearchRun> {
        self.run.as_ref()
    }

    pub fn status(&self) -> RunStatus {
        self.run.as_ref().map_or(RunStatus::NotStarted, SearchRun::status)
    }

    /// Visitation state per cell. Without a run every passable cell reads as
    /// [NodeState::Unvisited].
    pub fn states(&self) -> impl Iterator<Item = NodeState> + '_ {
        match &self.run {
            Some(run) => Either::Left(run.states()),
            None => Either::Right(self.grid.cells().iter().map(|&c| match c {
                Cell::Blocked => NodeState::Blocked,
                _ => NodeState::Unvisited,
            })),
        }
    }

    pub fn path(&self) -> Option<&[usize]> {
        self.run.as_ref().and_then(SearchRun::path)
    }

    pub fn path_points(&self) -> Option<Vec<Point>> {
        self.path()
            .map(|path| path.iter().map(|&ix| self.grid.point_of(ix)).collect())
    }

    pub fn path_cost(&self) -> Option<f32> {
        self.run.as_ref().and_then(SearchRun::path_cost)
    }
}
