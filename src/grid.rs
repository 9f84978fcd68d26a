// Grid geometry: pure coordinate arithmetic over the fixed-size board
//
// Nothing in here checks wall legality. Indexing a coordinate that is off the
// board is a programming error and panics instead of wrapping.

use crate::types::{Coord, Direction, Orientation, Wall};

/// Board dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

/// One side of one cell that a wall blocks
pub type Segment = (Coord, Direction);

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 1 && height > 1, "grid must be at least 2x2, got {}x{}", width, height);
        Grid { width, height }
    }

    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    pub fn contains(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Row-major index of an on-board coordinate
    pub fn index(&self, coord: &Coord) -> usize {
        assert!(
            self.contains(coord),
            "coordinate ({}, {}) outside {}x{} grid",
            coord.x,
            coord.y,
            self.width,
            self.height
        );
        (coord.y * self.width + coord.x) as usize
    }

    /// Neighbour of an on-board cell; panics if the step leaves the board
    pub fn neighbor(&self, coord: &Coord, dir: Direction) -> Coord {
        let next = dir.apply(coord);
        assert!(
            self.contains(&next),
            "step {:?} from ({}, {}) leaves the grid",
            dir,
            coord.x,
            coord.y
        );
        next
    }

    /// True when moving `dir` from `coord` would step off the board
    pub fn is_border(&self, coord: &Coord, dir: Direction) -> bool {
        !self.contains(&dir.apply(coord))
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Cells on the board edge reached by travelling in `goal`, in row-major order
    pub fn goal_cells(&self, goal: Direction) -> impl Iterator<Item = Coord> + '_ {
        self.cells().filter(move |c| self.is_goal(c, goal))
    }

    pub fn is_goal(&self, coord: &Coord, goal: Direction) -> bool {
        match goal {
            Direction::Right => coord.x == self.width - 1,
            Direction::Left => coord.x == 0,
            Direction::Down => coord.y == self.height - 1,
            Direction::Up => coord.y == 0,
        }
    }
}

/// The four (cell, side) pairs a wall blocks.
///
/// A horizontal wall at (x, y) closes the boundary between rows y-1 and y for columns
/// x and x+1; a vertical wall at (x, y) closes the boundary between columns x-1 and x
/// for rows y and y+1. Both sides of each crossing are listed.
pub fn wall_segments(wall: &Wall) -> [Segment; 4] {
    let a = wall.anchor;
    match wall.orientation {
        Orientation::Horizontal => [
            (a.offset(0, -1), Direction::Down),
            (a, Direction::Up),
            (a.offset(1, -1), Direction::Down),
            (a.offset(1, 0), Direction::Up),
        ],
        Orientation::Vertical => [
            (a.offset(-1, 0), Direction::Right),
            (a, Direction::Left),
            (a.offset(-1, 1), Direction::Right),
            (a.offset(0, 1), Direction::Left),
        ],
    }
}

/// The two wall anchors that would block stepping `dir` out of `from`.
/// Either may be structurally out of bounds.
pub fn walls_across(from: &Coord, dir: Direction) -> [Wall; 2] {
    let (x, y) = (from.x, from.y);
    match dir {
        Direction::Right => [Wall::vertical(x + 1, y), Wall::vertical(x + 1, y - 1)],
        Direction::Left => [Wall::vertical(x, y), Wall::vertical(x, y - 1)],
        Direction::Down => [Wall::horizontal(x, y + 1), Wall::horizontal(x - 1, y + 1)],
        Direction::Up => [Wall::horizontal(x, y), Wall::horizontal(x - 1, y)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_row_major() {
        let grid = Grid::new(9, 7);
        assert_eq!(grid.index(&Coord::new(0, 0)), 0);
        assert_eq!(grid.index(&Coord::new(8, 0)), 8);
        assert_eq!(grid.index(&Coord::new(0, 1)), 9);
        assert_eq!(grid.index(&Coord::new(8, 6)), 62);
        assert_eq!(grid.cells().count(), grid.cell_count());
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_index_off_board_panics() {
        let grid = Grid::new(9, 9);
        grid.index(&Coord::new(9, 0));
    }

    #[test]
    #[should_panic(expected = "leaves the grid")]
    fn test_neighbor_off_board_panics() {
        let grid = Grid::new(9, 9);
        grid.neighbor(&Coord::new(0, 3), Direction::Left);
    }

    #[test]
    fn test_goal_cells_cover_one_edge() {
        let grid = Grid::new(9, 9);
        let right: Vec<Coord> = grid.goal_cells(Direction::Right).collect();
        assert_eq!(right.len(), 9);
        assert!(right.iter().all(|c| c.x == 8));
        let down: Vec<Coord> = grid.goal_cells(Direction::Down).collect();
        assert_eq!(down.len(), 9);
        assert!(down.iter().all(|c| c.y == 8));
    }

    #[test]
    fn test_segments_come_in_facing_pairs() {
        for wall in [Wall::horizontal(3, 4), Wall::vertical(3, 4)] {
            let segs = wall_segments(&wall);
            for pair in segs.chunks(2) {
                let (cell, dir) = pair[0];
                assert_eq!(pair[1], (dir.apply(&cell), dir.opposite()));
            }
        }
    }

    #[test]
    fn test_walls_across_block_the_step() {
        let from = Coord::new(4, 4);
        for dir in Direction::all() {
            for wall in walls_across(&from, dir) {
                assert!(
                    wall_segments(&wall).contains(&(from, dir)),
                    "{:?} should block {:?} from {:?}",
                    wall,
                    dir,
                    from
                );
            }
        }
    }
}
