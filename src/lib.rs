//! # grid_astar
//!
//! A step-driven [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search over an
//! editable grid of free and blocked cells with a single source and sink. Movement is
//! 8-directional with a uniform edge weight. Instead of running to completion a search
//! advances one extract-and-expand cycle per [SearchContext::step], so a caller can draw the
//! frontier as it grows and the recovered path once the sink is reached.
//!
//! The grid is described by a [CellGrid]; each run builds a fresh [NodeTable] (an arena
//! whose parent links are plain indices) and a [Frontier] that is either the
//! [LinearFrontier] (full scan per extraction) or the [HeapFrontier] (binary heap with lazy
//! deletion). With the default [Heuristic::Chebyshev] the first path found is a cheapest
//! one.
//!
//! ```
//! use grid_astar::{CellGrid, RunStatus, SearchConfig, SearchContext};
//!
//! let grid: CellGrid = "S.#.\n..#.\n...G".parse().unwrap();
//! let mut context = SearchContext::new(grid, SearchConfig::default());
//! context.start().unwrap();
//! while !context.step().is_finished() {
//!     // Draw `context.states()` here.
//! }
//! assert_eq!(context.status(), RunStatus::PathFound);
//! assert_eq!(context.path(), Some(&[0, 5, 10, 11][..]));
//! assert_eq!(context.path_cost(), Some(3.0));
//! ```
pub mod cell_grid;
pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod node;
pub mod search;

pub use cell_grid::{Cell, CellGrid};
pub use error::{ConfigError, Result};
pub use frontier::{Frontier, FrontierKind, HeapFrontier, LinearFrontier};
pub use grid_util::point::Point;
pub use heuristic::Heuristic;
pub use node::{Node, NodeState, NodeTable};
pub use search::{
    build_path, find_path, RunStatus, SearchConfig, SearchContext, SearchRun, SearchStats,
    DEFAULT_EDGE_WEIGHT,
};
