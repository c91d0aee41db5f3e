use grid_astar::{CellGrid, Heuristic, Point, SearchConfig, SearchRun};

// Runs the same search with every heuristic and with a weighted Chebyshev heuristic.
// Only Chebyshev with a factor of at most 1 is guaranteed to find a cheapest path when
// diagonal moves cost the same as straight ones; the others usually expand fewer nodes.

fn main() {
    const N: i32 = 30;
    let (source, sink) = (Point::new(1, 1), Point::new(N - 3, N - 3));
    let mut grid = CellGrid::new(N as usize, N as usize, source, sink).unwrap();
    for (x0, y0, w, h) in [(8, 8, 8, 8), (0, 3, 6, 6), (10, 0, 6, 6), (20, 18, 2, 12)] {
        for x in x0..x0 + w {
            for y in y0..y0 + h {
                grid.set_blocked(Point::new(x, y), true);
            }
        }
    }
    grid.update();
    println!("{}", grid);

    let mut configs = Heuristic::ALL
        .into_iter()
        .map(|h| SearchConfig::new().with_heuristic(h))
        .collect::<Vec<_>>();
    configs.push(SearchConfig::new().with_heuristic_factor(1.3));

    for config in configs {
        let mut run = SearchRun::new(&grid, &config).unwrap();
        run.run_to_end();
        let stats = run.stats();
        println!(
            "{:?} x{}: cost {:?}, {} expansions, peak frontier {}",
            config.heuristic,
            config.heuristic_factor,
            run.path_cost(),
            stats.expansions,
            stats.peak_frontier
        );
    }
}
