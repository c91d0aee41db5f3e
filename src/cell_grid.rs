use crate::error::{ConfigError, Result};
use core::fmt;
use grid_util::grid::{Grid, SimpleGrid};
use grid_util::point::Point;
use itertools::iproduct;
use log::info;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use std::str::FromStr;

/// Number of cells in a Moore neighbourhood.
pub const N_NEIGHBOURS: usize = 8;

/// Terrain classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Free,
    Blocked,
    Source,
    Sink,
}

impl Cell {
    pub fn is_passable(self) -> bool {
        self != Cell::Blocked
    }
    pub fn is_endpoint(self) -> bool {
        matches!(self, Cell::Source | Cell::Sink)
    }
    pub fn symbol(self) -> char {
        match self {
            Cell::Free => '.',
            Cell::Blocked => '#',
            Cell::Source => 'S',
            Cell::Sink => 'G',
        }
    }
    pub fn from_symbol(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Free),
            '#' => Some(Cell::Blocked),
            'S' => Some(Cell::Source),
            'G' => Some(Cell::Sink),
            _ => None,
        }
    }
}

/// [CellGrid] is the editable model a search runs over: a [SimpleGrid] of [Cell]s addressed
/// row-major as `y * width + x`. Like a pathing grid it also tracks connected components of
/// passable cells in a [UnionFind] so reachability can be queried without searching.
/// Editing primitives keep exactly one [Cell::Source] and one [Cell::Sink] on grids built
/// through [CellGrid::new] or [CellGrid::centered].
#[derive(Clone, Debug)]
pub struct CellGrid {
    cells: SimpleGrid<Cell>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl CellGrid {
    /// Creates an obstacle-free grid with the given endpoints.
    pub fn new(width: usize, height: usize, source: Point, sink: Point) -> Result<CellGrid> {
        let mut grid = CellGrid::from_cells(width, height, vec![Cell::Free; width * height])?;
        let source_ix = grid.checked_index(source)?;
        let sink_ix = grid.checked_index(sink)?;
        if source_ix == sink_ix {
            return Err(ConfigError::OverlappingEndpoints);
        }
        grid.cells.set_point(source, Cell::Source);
        grid.cells.set_point(sink, Cell::Sink);
        Ok(grid)
    }

    /// Places the source four cells left and the sink four cells right of the centre.
    pub fn centered(width: usize, height: usize) -> Result<CellGrid> {
        if width < 9 || height == 0 {
            return Err(ConfigError::TooNarrow { width, height });
        }
        let x = (width / 2) as i32;
        let y = (height / 2) as i32;
        CellGrid::new(width, height, Point::new(x - 4, y), Point::new(x + 4, y))
    }

    /// Wraps an existing classification array. Endpoints are not validated here; a search
    /// refuses to start on a grid without exactly one source and one sink.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<CellGrid> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if cells.len() != width * height {
            return Err(ConfigError::DimensionMismatch {
                expected: width * height,
                found: cells.len(),
            });
        }
        let mut grid = CellGrid {
            cells: SimpleGrid {
                width,
                height,
                values: cells,
            },
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.cells.width()
    }
    pub fn height(&self) -> usize {
        self.cells.height()
    }
    pub fn len(&self) -> usize {
        self.cells.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cells.values.is_empty()
    }
    pub fn cells(&self) -> &[Cell] {
        &self.cells.values
    }
    pub fn get(&self, index: usize) -> Cell {
        self.cells.values[index]
    }
    pub fn get_point(&self, point: Point) -> Option<Cell> {
        self.point_in_bounds(point).then(|| self.cells.get_point(point))
    }

    pub fn point_in_bounds(&self, point: Point) -> bool {
        self.cells.point_in_bounds(point)
    }
    pub fn index_of(&self, point: Point) -> Option<usize> {
        self.point_in_bounds(point).then(|| self.cells.get_ix_point(&point))
    }
    pub fn point_of(&self, index: usize) -> Point {
        ix_to_point(&self.cells, index)
    }
    fn checked_index(&self, point: Point) -> Result<usize> {
        self.index_of(point).ok_or(ConfigError::OutOfBounds {
            x: point.x,
            y: point.y,
        })
    }

    /// The in-bounds part of the Moore neighbourhood of `index`.
    pub fn neighbours(&self, index: usize) -> SmallVec<[usize; N_NEIGHBOURS]> {
        moore_neighbours(&self.cells, index)
    }

    pub fn source(&self) -> Option<usize> {
        self.cells.values.iter().position(|&c| c == Cell::Source)
    }
    pub fn sink(&self) -> Option<usize> {
        self.cells.values.iter().position(|&c| c == Cell::Sink)
    }

    /// Returns `(source, sink)` if the grid holds exactly one of each.
    pub fn endpoints(&self) -> Result<(usize, usize)> {
        let count = |kind: Cell| self.cells.values.iter().filter(|&&c| c == kind).count();
        match count(Cell::Source) {
            0 => return Err(ConfigError::MissingSource),
            1 => {}
            count => return Err(ConfigError::MultipleSources { count }),
        }
        match count(Cell::Sink) {
            0 => return Err(ConfigError::MissingSink),
            1 => {}
            count => return Err(ConfigError::MultipleSinks { count }),
        }
        match (self.source(), self.sink()) {
            (Some(source), Some(sink)) => Ok((source, sink)),
            (None, _) => Err(ConfigError::MissingSource),
            (_, None) => Err(ConfigError::MissingSink),
        }
    }

    /// Places or removes an obstacle. Endpoints and out of bounds points are left untouched,
    /// in which case `false` is returned. Joins newly connected components and flags the
    /// components as dirty if components are (potentially) broken apart into multiple.
    pub fn set_blocked(&mut self, point: Point, blocked: bool) -> bool {
        let Some(ix) = self.index_of(point) else {
            return false;
        };
        let current = self.cells.get_point(point);
        if current.is_endpoint() {
            return false;
        }
        if blocked {
            if current != Cell::Blocked {
                self.components_dirty = true;
            }
            self.cells.set_point(point, Cell::Blocked);
        } else {
            self.cells.set_point(point, Cell::Free);
            for n in self.neighbours(ix) {
                if self.cells.values[n].is_passable() {
                    self.components.union(ix, n);
                }
            }
        }
        true
    }

    pub fn move_source(&mut self, point: Point) -> bool {
        self.move_endpoint(Cell::Source, point)
    }
    pub fn move_sink(&mut self, point: Point) -> bool {
        self.move_endpoint(Cell::Sink, point)
    }

    /// Endpoints only move onto free cells, which keeps them unique and leaves the
    /// passable set (and thus the components) unchanged.
    fn move_endpoint(&mut self, kind: Cell, point: Point) -> bool {
        if self.get_point(point) != Some(Cell::Free) {
            return false;
        }
        match self.cells.values.iter().position(|&c| c == kind) {
            Some(current) => {
                self.cells.values[current] = Cell::Free;
                self.cells.set_point(point, kind);
                true
            }
            None => false,
        }
    }

    /// Turns every obstacle back into a free cell; endpoints stay where they are.
    pub fn clear_obstacles(&mut self) {
        for cell in self.cells.values.iter_mut().filter(|c| **c == Cell::Blocked) {
            *cell = Cell::Free;
        }
        self.components_dirty = true;
        self.update();
    }

    /// Checks if start and goal are on the same connected component.
    pub fn reachable(&self, start: usize, goal: usize) -> bool {
        start < self.len()
            && goal < self.len()
            && self.get(start).is_passable()
            && self.get(goal).is_passable()
            && self.components.equiv(start, goal)
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable neighbours, diagonals
    /// included, to the same components.
    pub fn generate_components(&mut self) {
        info!(
            "Generating connected components for a {}x{} grid",
            self.width(),
            self.height()
        );
        self.components = UnionFind::new(self.len());
        self.components_dirty = false;
        let (w, h) = (self.width() as i32, self.height() as i32);
        for (y, x) in iproduct!(0..h, 0..w) {
            let p = Point::new(x, y);
            if !self.cells.get_point(p).is_passable() {
                continue;
            }
            let ix = self.cells.get_ix_point(&p);
            // Only forward neighbours; the backward ones link up when visited themselves.
            for delta in [(1, 0), (-1, 1), (0, 1), (1, 1)].map(|(dx, dy)| Point::new(dx, dy)) {
                let n = p + delta;
                if self.point_in_bounds(n) && self.cells.get_point(n).is_passable() {
                    self.components.union(ix, self.cells.get_ix_point(&n));
                }
            }
        }
    }
}

/// Inverse of [Grid::get_ix_point].
pub(crate) fn ix_to_point<T: Copy>(grid: &SimpleGrid<T>, index: usize) -> Point {
    Point::new((index % grid.width) as i32, (index / grid.width) as i32)
}

/// Indices of the Moore neighbourhood of `index`, clipped at the grid border. Ordered as
/// [Point::moore_neighborhood], clockwise starting from `y + 1`.
pub(crate) fn moore_neighbours<T: Copy>(
    grid: &SimpleGrid<T>,
    index: usize,
) -> SmallVec<[usize; N_NEIGHBOURS]> {
    ix_to_point(grid, index)
        .moore_neighborhood()
        .into_iter()
        .filter(|&p| grid.point_in_bounds(p))
        .map(|p| grid.get_ix_point(&p))
        .collect()
}

impl fmt::Display for CellGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.values.chunks(self.width()) {
            let line = row.iter().map(|c| c.symbol()).collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Parses rows of `.`, `#`, `S` and `G`. Blank lines and surrounding whitespace are ignored.
impl FromStr for CellGrid {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<CellGrid> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ConfigError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for c in line.chars() {
                cells.push(Cell::from_symbol(c).ok_or(ConfigError::UnknownCell(c))?);
            }
        }
        CellGrid::from_cells(width, rows.len(), cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> CellGrid {
        s.parse().unwrap()
    }

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // |.#.|
        // |.#.|
        let grid = parse(
            "S#G
             .#.",
        );
        assert!(!grid.reachable(0, 1));
        assert!(grid.reachable(0, 3));
        assert!(!grid.reachable(0, 2));
        assert!(grid.reachable(2, 5));
    }

    #[test]
    fn reachable_through_diagonal_gap() {
        //  ___
        // |S#|
        // |#G|
        //  ___
        let grid = parse(
            "S#
             #G",
        );
        assert!(grid.reachable(0, 3));
    }

    #[test]
    fn components_follow_edits() {
        let mut grid = CellGrid::new(3, 3, Point::new(0, 0), Point::new(2, 2)).unwrap();
        for y in 0..3 {
            grid.set_blocked(Point::new(1, y), true);
        }
        assert!(grid.components_dirty);
        grid.update();
        assert!(!grid.reachable(0, 8));
        grid.set_blocked(Point::new(1, 1), false);
        assert!(grid.reachable(0, 8));
    }

    #[test]
    fn neighbours_are_clipped() {
        let grid = CellGrid::new(4, 3, Point::new(0, 0), Point::new(3, 2)).unwrap();
        assert_eq!(grid.neighbours(0).as_slice(), &[4, 5, 1]);
        assert_eq!(grid.neighbours(5).as_slice(), &[9, 10, 6, 2, 1, 0, 4, 8]);
        assert_eq!(grid.neighbours(11).as_slice(), &[7, 6, 10]);
    }

    /// Every in-bounds cell sees exactly the cells at Chebyshev distance 1, and points just
    /// outside the border have no index.
    #[test]
    fn neighbourhoods_cover_the_whole_grid() {
        let grid = CellGrid::new(7, 5, Point::new(0, 0), Point::new(6, 4)).unwrap();
        for (x, y) in iproduct!(-1..8, -1..6) {
            let p = Point::new(x, y);
            let in_bounds = (0..7).contains(&x) && (0..5).contains(&y);
            assert_eq!(grid.point_in_bounds(p), in_bounds);
            let Some(ix) = grid.index_of(p) else {
                assert!(!in_bounds);
                assert_eq!(grid.get_point(p), None);
                continue;
            };
            assert_eq!(ix, (y * 7 + x) as usize);
            assert_eq!(grid.point_of(ix), p);
            assert_eq!(grid.get_point(p), Some(grid.get(ix)));
            let mut found = grid.neighbours(ix).to_vec();
            found.sort_unstable();
            let expected = (0..grid.len())
                .filter(|&n| grid.point_of(n).move_distance(&p) == 1)
                .collect::<Vec<_>>();
            assert_eq!(found, expected);
        }
    }

    #[test]
    fn row_major_addressing() {
        let grid = CellGrid::new(5, 4, Point::new(0, 0), Point::new(4, 3)).unwrap();
        assert_eq!(grid.index_of(Point::new(3, 2)), Some(13));
        assert_eq!(grid.point_of(13), Point::new(3, 2));
        assert_eq!(grid.index_of(Point::new(5, 0)), None);
        assert_eq!(grid.index_of(Point::new(-1, 0)), None);
    }

    #[test]
    fn display_round_trips_ascii() {
        let text = "S..#\n.##.\n...G\n";
        assert_eq!(parse(text).to_string(), text);
    }

    #[test]
    fn endpoint_validation() {
        assert_eq!(parse("..G").endpoints(), Err(ConfigError::MissingSource));
        assert_eq!(parse("S..").endpoints(), Err(ConfigError::MissingSink));
        assert_eq!(
            parse("S.S\n..G").endpoints(),
            Err(ConfigError::MultipleSources { count: 2 })
        );
        assert_eq!(
            parse("SGG").endpoints(),
            Err(ConfigError::MultipleSinks { count: 2 })
        );
        assert_eq!(parse(".S\nG.").endpoints(), Ok((1, 2)));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("S.\n.x".parse::<CellGrid>().err(), Some(ConfigError::UnknownCell('x')));
        assert_eq!(
            "S..\n.G".parse::<CellGrid>().err(),
            Some(ConfigError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!("\n".parse::<CellGrid>().err(), Some(ConfigError::EmptyGrid));
    }

    #[test]
    fn constructor_errors() {
        let origin = Point::new(0, 0);
        assert_eq!(
            CellGrid::new(2, 2, origin, origin).err(),
            Some(ConfigError::OverlappingEndpoints)
        );
        assert_eq!(
            CellGrid::new(2, 2, origin, Point::new(2, 0)).err(),
            Some(ConfigError::OutOfBounds { x: 2, y: 0 })
        );
        assert_eq!(
            CellGrid::from_cells(2, 2, vec![Cell::Free; 3]).err(),
            Some(ConfigError::DimensionMismatch {
                expected: 4,
                found: 3
            })
        );
        assert_eq!(
            CellGrid::centered(8, 5).err(),
            Some(ConfigError::TooNarrow {
                width: 8,
                height: 5
            })
        );
    }

    #[test]
    fn centered_endpoints() {
        let grid = CellGrid::centered(75, 50).unwrap();
        assert_eq!(grid.get_point(Point::new(33, 25)), Some(Cell::Source));
        assert_eq!(grid.get_point(Point::new(41, 25)), Some(Cell::Sink));
    }

    #[test]
    fn endpoints_are_protected_from_edits() {
        let mut grid = parse("S.#\n..G");
        assert!(!grid.set_blocked(Point::new(0, 0), true));
        assert!(!grid.move_source(Point::new(2, 0)));
        assert!(!grid.move_source(Point::new(2, 1)));
        assert!(grid.move_source(Point::new(1, 1)));
        assert!(grid.move_sink(Point::new(0, 0)));
        assert_eq!(grid.to_string(), "G.#\n.S.\n");
        assert!(grid.endpoints().is_ok());
    }

    #[test]
    fn clear_obstacles_keeps_endpoints() {
        let mut grid = parse("S#\n#G");
        grid.clear_obstacles();
        assert_eq!(grid.to_string(), "S.\n.G\n");
        assert!(!grid.components_dirty);
    }
}
