use grid_util::point::Point;

/// Distance estimate from a cell to the sink. Only one is active per run because the
/// value is baked into every node when the node table is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Heuristic {
    /// `|dx| + |dy|`, exact on a 4-grid but an overestimate once diagonals are allowed.
    Manhattan,
    /// `sqrt(dx² + dy²)`.
    Euclidean,
    /// `max(|dx|, |dy|)`, exact on an obstacle-free 8-grid with uniform move cost.
    #[default]
    Chebyshev,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Manhattan,
        Heuristic::Euclidean,
        Heuristic::Chebyshev,
    ];

    pub fn estimate(self, from: Point, to: Point) -> f32 {
        match self {
            Heuristic::Manhattan => from.manhattan_distance(&to) as f32,
            Heuristic::Euclidean => from.euclidean_distance(&to),
            Heuristic::Chebyshev => from.move_distance(&to) as f32,
        }
    }

    /// Whether the estimate never exceeds the true remaining cost when straight and diagonal
    /// moves cost the same, which is the movement model of the search.
    pub fn admissible_for_uniform_moves(self) -> bool {
        matches!(self, Heuristic::Chebyshev)
    }
}
