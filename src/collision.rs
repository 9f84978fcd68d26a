// Collision map: which sides of each cell are closed
//
// The outer border is closed from construction so movement queries stay total.
// Applying and retracting walls keeps the two faces of every interior edge in sync.

use crate::grid::{wall_segments, Grid};
use crate::types::{Coord, Direction, Wall};

/// Blocked flags for the four sides of one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellEdges {
    pub right: bool,
    pub left: bool,
    pub down: bool,
    pub up: bool,
}

impl CellEdges {
    pub fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::Right => self.right,
            Direction::Left => self.left,
            Direction::Down => self.down,
            Direction::Up => self.up,
        }
    }

    fn set(&mut self, dir: Direction, blocked: bool) {
        match dir {
            Direction::Right => self.right = blocked,
            Direction::Left => self.left = blocked,
            Direction::Down => self.down = blocked,
            Direction::Up => self.up = blocked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMap {
    grid: Grid,
    cells: Vec<CellEdges>,
}

impl CollisionMap {
    /// Open board with only the outer border closed
    pub fn new(grid: Grid) -> Self {
        let mut cells = vec![CellEdges::default(); grid.cell_count()];
        for coord in grid.cells() {
            let cell = &mut cells[grid.index(&coord)];
            for dir in Direction::all() {
                if grid.is_border(&coord, dir) {
                    cell.set(dir, true);
                }
            }
        }
        CollisionMap { grid, cells }
    }

    /// Builds the map from the walls currently on the board
    pub fn from_walls(grid: Grid, walls: &[Wall]) -> Self {
        let mut map = Self::new(grid);
        for wall in walls {
            map.apply(wall);
        }
        map
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn cell(&self, coord: &Coord) -> &CellEdges {
        &self.cells[self.grid.index(coord)]
    }

    pub fn is_blocked(&self, coord: &Coord, dir: Direction) -> bool {
        self.cell(coord).get(dir)
    }

    /// Closes the four sides the wall covers. The wall must be structurally in bounds.
    pub fn apply(&mut self, wall: &Wall) {
        self.set_wall(wall, true);
    }

    /// Reopens the four sides the wall covers
    pub fn retract(&mut self, wall: &Wall) {
        self.set_wall(wall, false);
    }

    /// Runs `f` with `wall` applied, then retracts it before returning
    pub fn with_wall<T>(&mut self, wall: &Wall, f: impl FnOnce(&CollisionMap) -> T) -> T {
        self.apply(wall);
        let result = f(self);
        self.retract(wall);
        result
    }

    fn set_wall(&mut self, wall: &Wall, blocked: bool) {
        for (coord, dir) in wall_segments(wall) {
            let index = self.grid.index(&coord);
            self.cells[index].set(dir, blocked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Orientation;

    fn assert_symmetric(map: &CollisionMap) {
        let grid = map.grid();
        for coord in grid.cells() {
            for dir in Direction::all() {
                if grid.is_border(&coord, dir) {
                    assert!(map.is_blocked(&coord, dir));
                    continue;
                }
                let other = grid.neighbor(&coord, dir);
                assert_eq!(
                    map.is_blocked(&coord, dir),
                    map.is_blocked(&other, dir.opposite()),
                    "asymmetric edge at {:?} {:?}",
                    coord,
                    dir
                );
            }
        }
    }

    #[test]
    fn test_border_is_closed() {
        let map = CollisionMap::new(Grid::new(9, 9));
        assert!(map.is_blocked(&Coord::new(0, 4), Direction::Left));
        assert!(map.is_blocked(&Coord::new(8, 4), Direction::Right));
        assert!(map.is_blocked(&Coord::new(4, 0), Direction::Up));
        assert!(map.is_blocked(&Coord::new(4, 8), Direction::Down));
        assert!(!map.is_blocked(&Coord::new(4, 4), Direction::Up));
        assert_symmetric(&map);
    }

    #[test]
    fn test_horizontal_wall_blocks_two_columns() {
        let mut map = CollisionMap::new(Grid::new(9, 9));
        map.apply(&Wall::horizontal(2, 3));
        assert!(map.is_blocked(&Coord::new(2, 2), Direction::Down));
        assert!(map.is_blocked(&Coord::new(2, 3), Direction::Up));
        assert!(map.is_blocked(&Coord::new(3, 2), Direction::Down));
        assert!(map.is_blocked(&Coord::new(3, 3), Direction::Up));
        assert!(!map.is_blocked(&Coord::new(4, 3), Direction::Up));
        assert!(!map.is_blocked(&Coord::new(1, 3), Direction::Up));
        assert_symmetric(&map);
    }

    #[test]
    fn test_vertical_wall_blocks_two_rows() {
        let mut map = CollisionMap::new(Grid::new(9, 9));
        map.apply(&Wall::vertical(5, 0));
        assert!(map.is_blocked(&Coord::new(4, 0), Direction::Right));
        assert!(map.is_blocked(&Coord::new(5, 0), Direction::Left));
        assert!(map.is_blocked(&Coord::new(4, 1), Direction::Right));
        assert!(map.is_blocked(&Coord::new(5, 1), Direction::Left));
        assert!(!map.is_blocked(&Coord::new(5, 2), Direction::Left));
        assert_symmetric(&map);
    }

    #[test]
    fn test_apply_then_retract_restores_every_interior_wall() {
        let grid = Grid::new(9, 9);
        let base = CollisionMap::from_walls(grid, &[Wall::horizontal(0, 8), Wall::vertical(8, 0)]);
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            for coord in grid.cells() {
                let wall = Wall { anchor: coord, orientation };
                if !crate::legality::is_in_bounds(&grid, &wall)
                    || crate::legality::conflicts_with_any(&wall, &[Wall::horizontal(0, 8), Wall::vertical(8, 0)])
                {
                    continue;
                }
                let mut map = base.clone();
                map.apply(&wall);
                assert_ne!(map, base);
                map.retract(&wall);
                assert_eq!(map, base, "retract did not restore {:?}", wall);
            }
        }
    }

    #[test]
    fn test_with_wall_leaves_map_untouched() {
        let mut map = CollisionMap::new(Grid::new(5, 5));
        let before = map.clone();
        let seen = map.with_wall(&Wall::vertical(2, 2), |m| m.is_blocked(&Coord::new(1, 3), Direction::Right));
        assert!(seen);
        assert_eq!(map, before);
    }
}
