use grid_astar::{find_path, CellGrid, SearchConfig};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  G|
//  ___
// where
// - # marks an obstacle
// - S marks the source
// - G marks the sink
//
// Nodes have an 8-neighborhood, so the path goes around the obstacle in 3 steps.

fn main() {
    let grid: CellGrid = "S..\n.#.\n..G".parse().unwrap();
    println!("{}", grid);
    if let Some(path) = find_path(&grid, &SearchConfig::default()).unwrap() {
        println!("Path:");
        for ix in path {
            println!("{:?}", grid.point_of(ix));
        }
    }
}
