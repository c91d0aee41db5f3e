use grid_astar::{CellGrid, NodeState, Point, RunStatus, SearchConfig, SearchContext};

// Drives a search the way an interactive front end would: one step per tick, sampling every
// cell state in between. Open nodes are drawn as `o`, closed nodes as `x` and the final path
// as `*`.

const TICKS_PER_FRAME: usize = 6;

fn render(context: &SearchContext) -> String {
    let grid = context.grid();
    let path = context.path().unwrap_or(&[]);
    let mut out = String::new();
    for (ix, (cell, state)) in grid.cells().iter().zip(context.states()).enumerate() {
        let c = if cell.is_endpoint() {
            cell.symbol()
        } else if path.contains(&ix) {
            '*'
        } else {
            match state {
                NodeState::Open => 'o',
                NodeState::Closed => 'x',
                NodeState::Blocked => '#',
                NodeState::Unvisited => '.',
            }
        };
        out.push(c);
        if (ix + 1) % grid.width() == 0 {
            out.push('\n');
        }
    }
    out
}

fn main() {
    let grid = CellGrid::centered(24, 11).unwrap();
    let mut context = SearchContext::new(grid, SearchConfig::default());

    // Edit mode: a wall between source and sink with a gap at the bottom.
    let grid = context.edit();
    for y in 0..10 {
        grid.set_blocked(Point::new(12, y), true);
    }
    grid.update();

    context.start().unwrap();
    let mut tick = 0;
    loop {
        let status = context.step();
        tick += 1;
        if tick % TICKS_PER_FRAME == 0 || status.is_finished() {
            println!("tick {tick}, {status:?}\n{}", render(&context));
        }
        if status.is_finished() {
            break;
        }
    }
    match context.status() {
        RunStatus::PathFound => println!("Path cost: {:?}", context.path_cost()),
        _ => println!("No path"),
    }
    if let Some(run) = context.run() {
        println!("{:?}", run.stats());
    }

    // Back to edit mode: the run and its path are discarded.
    context.reset();
    println!("{}", render(&context));
}
