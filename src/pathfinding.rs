// Shortest-path solver
//
// Multi-source BFS from every cell of a goal edge. Each cell gets its exact
// distance to the edge and the first step of a shortest path. When two
// shortest paths reach a cell, the step pointing in the goal direction wins,
// otherwise the first one discovered is kept.

use log::trace;
use std::collections::VecDeque;
use std::fmt::Write;

use crate::collision::CollisionMap;
use crate::grid::Grid;
use crate::profile;
use crate::types::{Coord, Direction};

/// Distance and preferred first step for one cell.
/// `None` distance means the goal edge cannot be reached; `None` direction marks goal cells too.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathCell {
    pub distance: Option<u32>,
    pub direction: Option<Direction>,
}

/// One move along a shortest path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub from: Coord,
    pub direction: Direction,
}

/// Solver output for one goal edge, covering the whole board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatrix {
    grid: Grid,
    goal: Direction,
    cells: Vec<PathCell>,
}

impl PathMatrix {
    pub fn goal(&self) -> Direction {
        self.goal
    }

    pub fn get(&self, coord: &Coord) -> &PathCell {
        &self.cells[self.grid.index(coord)]
    }

    pub fn distance(&self, coord: &Coord) -> Option<u32> {
        self.get(coord).distance
    }

    pub fn direction(&self, coord: &Coord) -> Option<Direction> {
        self.get(coord).direction
    }

    /// Follows the direction field from `start` to the goal edge.
    /// Empty when `start` is on the goal edge or cannot reach it.
    pub fn path_from(&self, start: &Coord) -> Vec<Step> {
        let mut steps = Vec::new();
        let mut current = *start;

        while let Some(direction) = self.direction(&current) {
            steps.push(Step { from: current, direction });
            current = self.grid.neighbor(&current, direction);
            if steps.len() > self.cells.len() {
                // Direction fields from `solve` strictly decrease distance, so this cannot loop
                break;
            }
        }

        steps
    }

    /// Human-readable table of distances and directions, one row per line
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "   |");
        for x in 0..self.grid.width {
            let _ = write!(out, " {:>3}  |", x);
        }
        out.push('\n');

        for y in 0..self.grid.height {
            let _ = write!(out, "{:>2} |", y);
            for x in 0..self.grid.width {
                let cell = self.get(&Coord::new(x, y));
                let distance = cell.distance.map_or("inf".to_string(), |d| d.to_string());
                let direction = cell.direction.map_or('.', |d| d.as_str().chars().next().unwrap_or('.'));
                let _ = write!(out, " {:>3} {}|", distance, direction);
            }
            out.push('\n');
        }

        out
    }
}

/// Computes distance-to-goal and preferred direction for every cell.
///
/// The tie-break direction is the goal direction itself: on equal distance a step
/// that moves toward the goal edge replaces whatever was recorded first.
pub fn solve(map: &CollisionMap, goal: Direction) -> PathMatrix {
    profile!("solve", {
        let grid = map.grid();
        let mut cells = vec![PathCell::default(); grid.cell_count()];
        let mut queue = VecDeque::with_capacity(grid.cell_count());

        for seed in grid.goal_cells(goal) {
            cells[grid.index(&seed)].distance = Some(0);
            queue.push_back(seed);
        }

        while let Some(current) = queue.pop_front() {
            let Some(current_distance) = cells[grid.index(&current)].distance else {
                continue;
            };
            let candidate = current_distance + 1;

            for dir in Direction::all() {
                if map.is_blocked(&current, dir) {
                    continue;
                }

                let neighbor = grid.neighbor(&current, dir);
                // A player on `neighbor` reaches `current` by stepping back the other way
                let step = dir.opposite();
                let cell = &mut cells[grid.index(&neighbor)];

                match cell.distance {
                    Some(existing) if existing < candidate => {}
                    Some(existing) if existing == candidate => {
                        if step == goal {
                            cell.direction = Some(step);
                        }
                    }
                    _ => {
                        cell.distance = Some(candidate);
                        cell.direction = Some(step);
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        let matrix = PathMatrix { grid, goal, cells };
        trace!("Path matrix toward {:?}:\n{}", matrix.goal(), matrix.dump());
        matrix
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Wall;

    fn manhattan_to_edge(grid: &Grid, coord: &Coord, goal: Direction) -> u32 {
        (match goal {
            Direction::Right => grid.width - 1 - coord.x,
            Direction::Left => coord.x,
            Direction::Down => grid.height - 1 - coord.y,
            Direction::Up => coord.y,
        }) as u32
    }

    #[test]
    fn test_open_board_distance_is_manhattan() {
        let grid = Grid::new(9, 7);
        let map = CollisionMap::new(grid);
        for goal in Direction::all() {
            let matrix = solve(&map, goal);
            for coord in grid.cells() {
                assert_eq!(
                    matrix.distance(&coord),
                    Some(manhattan_to_edge(&grid, &coord, goal)),
                    "wrong distance at {:?} toward {:?}",
                    coord,
                    goal
                );
            }
        }
    }

    #[test]
    fn test_open_board_prefers_goal_direction() {
        let grid = Grid::new(9, 9);
        let matrix = solve(&CollisionMap::new(grid), Direction::Right);
        for coord in grid.cells() {
            if coord.x == 8 {
                assert_eq!(matrix.direction(&coord), None);
            } else {
                assert_eq!(matrix.direction(&coord), Some(Direction::Right));
            }
        }
    }

    #[test]
    fn test_wall_forces_detour() {
        let grid = Grid::new(9, 9);
        // Blocks (3,4)->(4,4) and (3,5)->(4,5)
        let map = CollisionMap::from_walls(grid, &[Wall::vertical(4, 4)]);
        let matrix = solve(&map, Direction::Right);
        assert_eq!(matrix.distance(&Coord::new(3, 4)), Some(6));
        assert_eq!(matrix.direction(&Coord::new(3, 4)), Some(Direction::Up));
        assert_eq!(matrix.distance(&Coord::new(3, 5)), Some(6));
        assert_eq!(matrix.direction(&Coord::new(3, 5)), Some(Direction::Down));
        assert_eq!(matrix.distance(&Coord::new(3, 3)), Some(5));
    }

    #[test]
    fn test_enclosed_cell_is_unreachable() {
        let grid = Grid::new(4, 4);
        // Seal the top-left 2x2 block
        let map = CollisionMap::from_walls(grid, &[Wall::vertical(2, 0), Wall::horizontal(0, 2)]);
        let matrix = solve(&map, Direction::Right);
        for coord in [Coord::new(0, 0), Coord::new(1, 0), Coord::new(0, 1), Coord::new(1, 1)] {
            assert_eq!(matrix.get(&coord), &PathCell { distance: None, direction: None });
        }
        assert!(matrix.path_from(&Coord::new(0, 0)).is_empty());
        assert_eq!(matrix.distance(&Coord::new(0, 2)), Some(3));
    }

    #[test]
    fn test_path_length_matches_distance() {
        let grid = Grid::new(9, 9);
        let walls = [Wall::vertical(4, 3), Wall::horizontal(4, 5), Wall::vertical(6, 0)];
        let map = CollisionMap::from_walls(grid, &walls);
        let matrix = solve(&map, Direction::Left);
        let start = Coord::new(8, 4);
        let path = matrix.path_from(&start);
        assert_eq!(path.len() as u32, matrix.distance(&start).unwrap());
        for step in &path {
            assert!(!map.is_blocked(&step.from, step.direction));
        }
    }

    #[test]
    fn test_solve_is_idempotent() {
        let grid = Grid::new(9, 9);
        let walls = [Wall::horizontal(2, 3), Wall::vertical(5, 5), Wall::horizontal(6, 7)];
        let map = CollisionMap::from_walls(grid, &walls);
        for goal in [Direction::Right, Direction::Left, Direction::Down] {
            assert_eq!(solve(&map, goal), solve(&map, goal));
        }
    }

    #[test]
    fn test_walls_never_shorten_distances() {
        let grid = Grid::new(9, 9);
        let open = solve(&CollisionMap::new(grid), Direction::Down);
        let walled = solve(
            &CollisionMap::from_walls(grid, &[Wall::horizontal(3, 4), Wall::vertical(2, 6)]),
            Direction::Down,
        );
        for coord in grid.cells() {
            let before = open.distance(&coord).unwrap();
            if let Some(after) = walled.distance(&coord) {
                assert!(after >= before, "distance shrank at {:?}", coord);
            }
        }
    }

    #[test]
    fn test_dump_has_header_and_rows() {
        let grid = Grid::new(3, 2);
        let matrix = solve(&CollisionMap::new(grid), Direction::Left);
        assert_eq!(matrix.goal(), Direction::Left);
        let dump = matrix.dump();
        assert_eq!(dump.lines().count(), 3);
        assert!(dump.lines().nth(1).unwrap().contains("0 ."));
    }
}
