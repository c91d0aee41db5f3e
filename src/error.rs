use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reasons a grid or search configuration is refused before a run starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Grid has no source cell")]
    MissingSource,
    #[error("Grid has no sink cell")]
    MissingSink,
    #[error("Grid has {count} source cells, expected exactly one")]
    MultipleSources { count: usize },
    #[error("Grid has {count} sink cells, expected exactly one")]
    MultipleSinks { count: usize },
    #[error("Expected {expected} cells but got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Grid must have a non-zero width and height")]
    EmptyGrid,
    #[error("Point ({x}, {y}) lies outside the grid")]
    OutOfBounds { x: i32, y: i32 },
    #[error("Source and sink cannot share a cell")]
    OverlappingEndpoints,
    #[error("Unknown cell character {0:?}")]
    UnknownCell(char),
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Edge weight must be finite and positive, got {0}")]
    InvalidEdgeWeight(f32),
    #[error("Heuristic factor must be finite and non-negative, got {0}")]
    InvalidHeuristicFactor(f32),
    #[error("A {width}x{height} grid is too small to place centered endpoints")]
    TooNarrow { width: usize, height: usize },
}
