// Wall legality: structural bounds and overlap with walls already on the board
//
// Whether every player keeps a route to its goal is not checked here; the
// evaluator rejects candidates that strand a player.

use crate::grid::Grid;
use crate::types::{Orientation, Wall};

/// True when the wall's two segments both lie on interior boundaries.
///
/// Horizontal: 0 <= x < width-1 and 1 <= y < height.
/// Vertical:   1 <= x < width   and 0 <= y < height-1.
pub fn is_in_bounds(grid: &Grid, wall: &Wall) -> bool {
    let (x, y) = (wall.anchor.x, wall.anchor.y);
    match wall.orientation {
        Orientation::Horizontal => x >= 0 && x < grid.width - 1 && y >= 1 && y < grid.height,
        Orientation::Vertical => x >= 1 && x < grid.width && y >= 0 && y < grid.height - 1,
    }
}

/// True when `a` and `b` cannot both be on the board.
///
/// Same orientation: identical anchors, or collinear anchors one cell apart (they
/// would share a segment). Opposite orientation: the two walls cross at their
/// midpoints, which happens for H(x, y) and V(x+1, y-1).
pub fn conflicts(a: &Wall, b: &Wall) -> bool {
    let (pa, pb) = (a.anchor, b.anchor);
    match (a.orientation, b.orientation) {
        (Orientation::Horizontal, Orientation::Horizontal) => pa.y == pb.y && (pa.x - pb.x).abs() <= 1,
        (Orientation::Vertical, Orientation::Vertical) => pa.x == pb.x && (pa.y - pb.y).abs() <= 1,
        (Orientation::Horizontal, Orientation::Vertical) => pb == pa.offset(1, -1),
        (Orientation::Vertical, Orientation::Horizontal) => pa == pb.offset(1, -1),
    }
}

pub fn conflicts_with_any(wall: &Wall, existing: &[Wall]) -> bool {
    existing.iter().any(|placed| conflicts(wall, placed))
}

/// Both checks: in bounds and free of conflicts with `existing`
pub fn is_placeable(grid: &Grid, wall: &Wall, existing: &[Wall]) -> bool {
    is_in_bounds(grid, wall) && !conflicts_with_any(wall, existing)
}
