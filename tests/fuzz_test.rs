/// Fuzzes the search by checking for many random grids that a path is found exactly when the
/// sink is on the same connected component as the source, and that both frontier kinds agree
/// on the cost of the path.
use grid_astar::*;
use rand::prelude::*;

fn random_grid(w: usize, h: usize, rng: &mut StdRng, density: f64) -> CellGrid {
    let source = Point::new(0, 0);
    let sink = Point::new(w as i32 - 1, h as i32 - 1);
    let mut grid = CellGrid::new(w, h, source, sink).unwrap();
    for x in 0..w as i32 {
        for y in 0..h as i32 {
            grid.set_blocked(Point::new(x, y), rng.gen_bool(density));
        }
    }
    grid.update();
    grid
}

fn visualize_grid(grid: &CellGrid, path: Option<&[usize]>) {
    for (ix, cell) in grid.cells().iter().enumerate() {
        let on_path = path.map_or(false, |p| p.contains(&ix));
        if on_path && !cell.is_endpoint() {
            print!("*");
        } else {
            print!("{}", cell.symbol());
        }
        if (ix + 1) % grid.width() == 0 {
            println!();
        }
    }
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for kind in [FrontierKind::Linear, FrontierKind::Heap] {
        let config = SearchConfig::new().with_frontier(kind);
        for _ in 0..N_GRIDS {
            let grid = random_grid(N, N, &mut rng, 0.4);
            let (source, sink) = grid.endpoints().unwrap();
            let reachable = grid.reachable(source, sink);
            let mut run = SearchRun::new(&grid, &config).unwrap();
            let status = run.run_to_end();
            // Show the grid if the outcome disagrees with the components
            if (status == RunStatus::PathFound) != reachable {
                visualize_grid(&grid, run.path());
            }
            assert_eq!(status == RunStatus::PathFound, reachable);
            // No node is expanded twice: every expansion closes a distinct node, and the
            // sink is closed without being expanded.
            let closed = run.states().filter(|&s| s == NodeState::Closed).count();
            let sink_closed = usize::from(status == RunStatus::PathFound);
            assert_eq!(run.stats().expansions + sink_closed, closed);
            assert!(run.stats().peak_frontier <= run.stats().discovered);
            if let Some(path) = run.path() {
                assert!(path.len() <= grid.len());
                for pair in path.windows(2) {
                    assert!(grid.neighbours(pair[0]).contains(&pair[1]));
                    assert!(grid.get(pair[1]).is_passable());
                }
            } else {
                assert!(run.frontier().is_empty());
            }
        }
    }
}

#[test]
fn fuzz_frontiers_agree() {
    const N: usize = 12;
    const N_GRIDS: usize = 1000;
    let mut rng = StdRng::seed_from_u64(1);
    let linear = SearchConfig::new().with_frontier(FrontierKind::Linear);
    let heap = SearchConfig::new().with_frontier(FrontierKind::Heap);
    for _ in 0..N_GRIDS {
        let grid = random_grid(N, N, &mut rng, 0.3);
        let mut linear_run = SearchRun::new(&grid, &linear).unwrap();
        let mut heap_run = SearchRun::new(&grid, &heap).unwrap();
        assert_eq!(linear_run.run_to_end(), heap_run.run_to_end());
        if linear_run.path_cost() != heap_run.path_cost() {
            println!(
                "Linear path: {:?}\nHeap path: {:?}",
                linear_run.path(),
                heap_run.path()
            );
            visualize_grid(&grid, linear_run.path());
        }
        assert_eq!(linear_run.path_cost(), heap_run.path_cost());
    }
}

/// On an empty grid the cheapest path takes exactly the Chebyshev distance in steps.
#[test]
fn fuzz_open_grid_distance() {
    const N_GRIDS: usize = 500;
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..N_GRIDS {
        let w: usize = rng.gen_range(2..20);
        let h: usize = rng.gen_range(2..20);
        let source = Point::new(rng.gen_range(0..w as i32), rng.gen_range(0..h as i32));
        let sink = Point::new(rng.gen_range(0..w as i32), rng.gen_range(0..h as i32));
        if source == sink {
            continue;
        }
        let grid = CellGrid::new(w, h, source, sink).unwrap();
        let expected = Heuristic::Chebyshev.estimate(source, sink);
        for kind in [FrontierKind::Linear, FrontierKind::Heap] {
            let path = find_path(&grid, &SearchConfig::new().with_frontier(kind))
                .unwrap()
                .unwrap();
            assert_eq!((path.len() - 1) as f32, expected);
        }
    }
}

/// A run repeated on the same grid must produce the same path.
#[test]
fn fuzz_rerun_is_deterministic() {
    const N: usize = 10;
    const N_GRIDS: usize = 300;
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..N_GRIDS {
        let grid = random_grid(N, N, &mut rng, 0.35);
        for heuristic in Heuristic::ALL {
            let config = SearchConfig::new().with_heuristic(heuristic);
            let mut context = SearchContext::new(grid.clone(), config);
            context.start().unwrap();
            context.run_to_end();
            let first = context.path().map(<[usize]>::to_vec);
            context.reset();
            assert_eq!(context.path(), None);
            context.start().unwrap();
            context.run_to_end();
            assert_eq!(context.path().map(<[usize]>::to_vec), first);
        }
    }
}
