use delivery_pathfinding::algorithms::path_cost;
use delivery_pathfinding::obstacles::MovingObstacle;
use delivery_pathfinding::{
    search, Algorithm, Environment, Grid, Position, SearchError, SearchOptions,
};
use pathfinding::prelude::dijkstra;
use proptest::prelude::*;
use proptest::sample::Index;

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

fn seeded(seed: u64) -> SearchOptions {
    SearchOptions {
        seed: Some(seed),
        ..SearchOptions::default()
    }
}

const GRAPH_SEARCHES: [Algorithm; 3] = [
    Algorithm::BreadthFirst,
    Algorithm::UniformCost,
    Algorithm::BestFirst,
];

/// Checks every move of `path` against the environment at the tick it is made.
fn assert_valid_moves<E: Environment>(env: &E, path: &[Position], time_step: u64) {
    for (i, pair) in path.windows(2).enumerate() {
        let arrival = time_step + i as u64 + 1;
        assert!(
            env.neighbors(pair[0], arrival).iter().any(|(n, _)| *n == pair[1]),
            "move {} -> {} is not passable at t={}",
            pair[0],
            pair[1],
            arrival
        );
    }
}

#[test]
fn open_grid_corner_to_corner() {
    let grid = Grid::new(5, 5);
    for algorithm in GRAPH_SEARCHES {
        let result = search(&grid, algorithm, p(0, 0), p(4, 4), 0, &seeded(0)).unwrap();
        assert!(result.success, "{algorithm}");
        assert_eq!(result.cost, Some(8), "{algorithm}");
        assert_eq!(result.path.len(), 9, "{algorithm}");
        assert_valid_moves(&grid, &result.path, 0);
    }
}

#[test]
fn obstacle_and_rough_cell_share_optimal_cost() {
    let mut grid = Grid::new(5, 5);
    grid.add_wall(p(2, 2));
    grid.set_terrain_cost(p(1, 1), 3);

    let ucs = search(&grid, Algorithm::UniformCost, p(0, 0), p(4, 4), 0, &seeded(0)).unwrap();
    let a_star = search(&grid, Algorithm::BestFirst, p(0, 0), p(4, 4), 0, &seeded(0)).unwrap();

    assert_eq!(ucs.cost, a_star.cost);
    assert_eq!(ucs.cost, Some(8));
    for result in [&ucs, &a_star] {
        assert!(!result.path.contains(&p(1, 1)));
        assert!(!result.path.contains(&p(2, 2)));
    }
}

#[test]
fn start_equal_goal_is_trivial() {
    let grid = Grid::new(5, 5);
    for algorithm in Algorithm::ALL {
        let result = search(&grid, algorithm, p(3, 1), p(3, 1), 0, &seeded(0)).unwrap();
        assert_eq!(result.path, vec![p(3, 1)]);
        assert_eq!(result.cost, Some(0));
        assert_eq!(result.nodes_expanded, 0);
        assert!(result.success);
    }
}

#[test]
fn goal_enclosed_at_every_tick_is_unreachable() {
    let mut grid = Grid::new(5, 5);
    grid.add_wall(p(3, 4));
    // The other approach is held by an obstacle that never leaves.
    grid.add_moving_obstacle(MovingObstacle::new(vec![p(4, 3)], 1, 0));

    for algorithm in GRAPH_SEARCHES {
        let result = search(&grid, algorithm, p(0, 0), p(4, 4), 0, &seeded(0)).unwrap();
        assert!(!result.success, "{algorithm}");
        assert_eq!(result.cost, None, "{algorithm}");
        assert!(result.path.is_empty(), "{algorithm}");
        assert!(result.nodes_expanded >= 1, "{algorithm}");
    }
}

#[test]
fn out_of_bounds_endpoints_are_rejected() {
    let grid = Grid::new(5, 5);
    for algorithm in Algorithm::ALL {
        let err = search(&grid, algorithm, p(0, 0), p(5, 0), 0, &seeded(0)).unwrap_err();
        assert_eq!(
            err,
            SearchError::OutOfBounds {
                position: p(5, 0),
                rows: 5,
                cols: 5
            }
        );
        assert!(search(&grid, algorithm, p(0, 7), p(4, 4), 0, &seeded(0)).is_err());
    }
}

#[test]
fn crossing_a_moving_obstacle() {
    let mut grid = Grid::new(3, 5);
    grid.start = p(1, 0);
    grid.goal = p(1, 4);
    // Sweeps up and down the middle column.
    grid.add_moving_obstacle(MovingObstacle::new(vec![p(0, 2), p(1, 2), p(2, 2), p(1, 2)], 1, 0));

    for algorithm in GRAPH_SEARCHES {
        let result = search(&grid, algorithm, grid.start, grid.goal, 0, &seeded(0)).unwrap();
        assert!(result.success, "{algorithm}");
        assert_valid_moves(&grid, &result.path, 0);
    }
}

#[test]
fn seeded_local_search_is_idempotent() {
    let mut grid = Grid::new(7, 7);
    grid.add_wall(p(3, 2));
    grid.add_wall(p(3, 3));
    grid.add_wall(p(3, 4));
    grid.set_terrain_cost(p(5, 5), 4);

    let first = search(&grid, Algorithm::LocalSearch, p(0, 3), p(6, 3), 0, &seeded(17)).unwrap();
    let second = search(&grid, Algorithm::LocalSearch, p(0, 3), p(6, 3), 0, &seeded(17)).unwrap();
    assert_eq!(first, second);
}

/// Grid of up to 7x7 with random terrain, about one wall in six, and two
/// in-bounds endpoints.
fn arb_world() -> impl Strategy<Value = (Grid, Position, Position)> {
    (2usize..8, 2usize..8)
        .prop_flat_map(|(rows, cols)| {
            (
                Just(rows),
                Just(cols),
                prop::collection::vec(0u32..6, rows * cols),
                any::<Index>(),
                any::<Index>(),
            )
        })
        .prop_map(|(rows, cols, cells, start, goal)| {
            let mut grid = Grid::new(rows, cols);
            for (i, value) in cells.into_iter().enumerate() {
                let pos = p(i / cols, i % cols);
                if value == 0 {
                    grid.add_wall(pos);
                } else {
                    grid.set_terrain_cost(pos, value);
                }
            }
            let start = start.index(rows * cols);
            let goal = goal.index(rows * cols);
            (grid, p(start / cols, start % cols), p(goal / cols, goal % cols))
        })
}

/// Adds obstacles that block random cells at random ticks.
fn arb_dynamic_world() -> impl Strategy<Value = (Grid, Position, Position)> {
    (arb_world(), prop::collection::vec((any::<Index>(), 0u64..12), 0..10)).prop_map(
        |((mut grid, start, goal), blocks)| {
            for (cell, time) in blocks {
                let i = cell.index(grid.rows * grid.cols);
                grid.add_dynamic_obstacle(p(i / grid.cols, i % grid.cols), &[time]);
            }
            (grid, start, goal)
        },
    )
}

fn oracle_cost(grid: &Grid, start: Position, goal: Position) -> Option<u64> {
    dijkstra(
        &start,
        |&pos| {
            grid.neighbors(pos, 0)
                .into_iter()
                .map(|(n, c)| (n, u64::from(c)))
        },
        |&pos| pos == goal,
    )
    .map(|(_, cost)| cost)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cost_optimal_searches_agree_with_oracle((grid, start, goal) in arb_world()) {
        let ucs = search(&grid, Algorithm::UniformCost, start, goal, 0, &seeded(0)).unwrap();
        let a_star = search(&grid, Algorithm::BestFirst, start, goal, 0, &seeded(0)).unwrap();
        let expected = oracle_cost(&grid, start, goal);

        prop_assert_eq!(ucs.cost, expected);
        prop_assert_eq!(a_star.cost, expected);
        prop_assert_eq!(ucs.success, expected.is_some());
    }

    #[test]
    fn breadth_first_uses_fewest_moves((grid, start, goal) in arb_world(), seed in any::<u64>()) {
        let bfs = search(&grid, Algorithm::BreadthFirst, start, goal, 0, &seeded(seed)).unwrap();
        for algorithm in [Algorithm::UniformCost, Algorithm::BestFirst, Algorithm::LocalSearch] {
            let other = search(&grid, algorithm, start, goal, 0, &seeded(seed)).unwrap();
            if other.success {
                prop_assert!(bfs.success);
                prop_assert!(bfs.moves() <= other.moves());
            }
        }
    }

    #[test]
    fn results_are_consistent_and_moves_valid(
        (grid, start, goal) in arb_dynamic_world(),
        time_step in 0u64..4,
        seed in any::<u64>(),
    ) {
        for algorithm in Algorithm::ALL {
            let result = search(&grid, algorithm, start, goal, time_step, &seeded(seed)).unwrap();

            prop_assert_eq!(result.success, result.cost.is_some());
            prop_assert_eq!(result.success, result.path.last() == Some(&goal));
            if start == goal {
                prop_assert_eq!(result.nodes_expanded, 0);
            } else {
                prop_assert!(result.nodes_expanded >= 1);
            }
            if result.success {
                prop_assert_eq!(result.path[0], start);
                prop_assert_eq!(result.cost, Some(path_cost(&grid, &result.path).unwrap()));
                assert_valid_moves(&grid, &result.path, time_step);
            }
        }
    }

    #[test]
    fn repeated_searches_are_identical(
        (grid, start, goal) in arb_dynamic_world(),
        seed in any::<u64>(),
    ) {
        for algorithm in Algorithm::ALL {
            let first = search(&grid, algorithm, start, goal, 0, &seeded(seed)).unwrap();
            let second = search(&grid, algorithm, start, goal, 0, &seeded(seed)).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
