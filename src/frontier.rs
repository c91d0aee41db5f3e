//! The open set of a search. Entries are plain indices into the [NodeTable]; the table is
//! handed in whenever priorities are needed so the frontier never owns node data.
use crate::node::{NodeState, NodeTable};
use core::fmt;
use fxhash::{FxBuildHasher, FxHashMap};
use indexmap::IndexSet;
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

pub trait Frontier: fmt::Debug {
    /// Adds a newly discovered node.
    fn insert(&mut self, index: usize, nodes: &NodeTable);

    /// Called after the `f` of a node that is already queued went down.
    fn reprioritize(&mut self, index: usize, nodes: &NodeTable);

    /// Removes and returns the queued node with the lowest `f`, or [None] once the frontier
    /// is exhausted.
    fn extract_best(&mut self, nodes: &NodeTable) -> Option<usize>;

    /// Whether `index` is currently waiting to be expanded.
    fn contains(&self, index: usize) -> bool;

    /// Number of distinct nodes waiting to be expanded.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    /// Number of superseded entries dropped during extraction so far.
    fn stale_skips(&self) -> usize {
        0
    }
}

/// Selects the [Frontier] implementation a run uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FrontierKind {
    /// [LinearFrontier]: O(n) extraction, ties go to the earliest inserted node.
    Linear,
    /// [HeapFrontier]: O(log n) extraction with lazy deletion.
    #[default]
    Heap,
}

impl FrontierKind {
    pub fn build(self) -> Box<dyn Frontier> {
        match self {
            FrontierKind::Linear => Box::new(LinearFrontier::default()),
            FrontierKind::Heap => Box::new(HeapFrontier::default()),
        }
    }
}

/// Insertion-ordered open set scanned in full on every extraction. The node with the lowest
/// current `f` wins and ties go to whichever was inserted first.
#[derive(Clone, Debug, Default)]
pub struct LinearFrontier {
    open: FxIndexSet<usize>,
}

impl Frontier for LinearFrontier {
    fn insert(&mut self, index: usize, _nodes: &NodeTable) {
        self.open.insert(index);
    }

    // The scan always reads the live `f`, so there is nothing to update.
    fn reprioritize(&mut self, _index: usize, _nodes: &NodeTable) {}

    fn extract_best(&mut self, nodes: &NodeTable) -> Option<usize> {
        let pos = self
            .open
            .iter()
            .position_min_by(|&&a, &&b| nodes[a].f.total_cmp(&nodes[b].f))?;
        self.open.shift_remove_index(pos)
    }

    fn contains(&self, index: usize) -> bool {
        self.open.contains(&index)
    }

    fn len(&self) -> usize {
        self.open.len()
    }

    fn clear(&mut self) {
        self.open.clear();
    }
}

#[derive(Clone, Copy, Debug)]
struct SmallestCostHolder {
    estimated_cost: f32,
    cost: f32,
    seq: u64,
    index: usize,
}

impl Eq for SmallestCostHolder {}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the smallest estimate, then the oldest entry.
        other
            .estimated_cost
            .total_cmp(&self.estimated_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Binary heap keyed by `f`. A node whose cost improves while queued is pushed again and
/// the outdated entry is discarded when it surfaces, as is any entry for a closed node.
#[derive(Clone, Debug, Default)]
pub struct HeapFrontier {
    heap: BinaryHeap<SmallestCostHolder>,
    // Live entry count per queued node.
    queued: FxHashMap<usize, usize>,
    next_seq: u64,
    stale: usize,
}

impl HeapFrontier {
    fn push(&mut self, index: usize, nodes: &NodeTable) {
        let node = &nodes[index];
        self.heap.push(SmallestCostHolder {
            estimated_cost: node.f,
            cost: node.g,
            seq: self.next_seq,
            index,
        });
        self.next_seq += 1;
        *self.queued.entry(index).or_insert(0) += 1;
    }

    /// Entries held by the heap, superseded ones included.
    pub fn stored_entries(&self) -> usize {
        self.heap.len()
    }
}

impl Frontier for HeapFrontier {
    fn insert(&mut self, index: usize, nodes: &NodeTable) {
        self.push(index, nodes);
    }

    fn reprioritize(&mut self, index: usize, nodes: &NodeTable) {
        self.push(index, nodes);
    }

    fn extract_best(&mut self, nodes: &NodeTable) -> Option<usize> {
        while let Some(SmallestCostHolder { cost, index, .. }) = self.heap.pop() {
            let node = &nodes[index];
            // We may have inserted a node several times if a better way to reach it was
            // found. Only the entry carrying the current cost is acted upon.
            if node.state == NodeState::Closed || cost > node.g {
                self.stale += 1;
                if let Some(count) = self.queued.get_mut(&index) {
                    *count -= 1;
                    if *count == 0 {
                        self.queued.remove(&index);
                    }
                }
                continue;
            }
            self.queued.remove(&index);
            return Some(index);
        }
        None
    }

    fn contains(&self, index: usize) -> bool {
        self.queued.contains_key(&index)
    }

    fn len(&self) -> usize {
        self.queued.len()
    }

    fn clear(&mut self) {
        self.heap.clear();
        self.queued.clear();
        self.next_seq = 0;
        self.stale = 0;
    }

    fn stale_skips(&self) -> usize {
        self.stale
    }
}
