// Game types shared by the engine, the referee protocol and the debug log

use serde::{Deserialize, Serialize};
use std::fmt;

/// 2D coordinate on the board: x is the column, y is the row (y grows downward)
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Diagonal neighbour used for wall-corner arithmetic
    pub fn offset(&self, dx: i32, dy: i32) -> Coord {
        Coord { x: self.x + dx, y: self.y + dy }
    }
}

/// The four movement directions. Declaration order is the expansion order of the solver.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Right, Direction::Left, Direction::Down, Direction::Up]
    }

    /// Command token understood by the referee
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Right => "RIGHT",
            Direction::Left => "LEFT",
            Direction::Down => "DOWN",
            Direction::Up => "UP",
        }
    }

    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_uppercase().as_str() {
            "RIGHT" => Ok(Direction::Right),
            "LEFT" => Ok(Direction::Left),
            "DOWN" => Ok(Direction::Down),
            "UP" => Ok(Direction::Up),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
        }
    }

    /// Calculates the next coordinate when moving in this direction.
    /// Never clamps: the caller decides whether the result is on the board.
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Down => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Up => Coord { x: coord.x, y: coord.y - 1 },
        }
    }
}

/// Wall orientation, written 'H' or 'V' on the wire
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_char(&self) -> char {
        match self {
            Orientation::Horizontal => 'H',
            Orientation::Vertical => 'V',
        }
    }

    pub fn from_char(c: char) -> Result<Orientation, String> {
        match c {
            'H' | 'h' => Ok(Orientation::Horizontal),
            'V' | 'v' => Ok(Orientation::Vertical),
            _ => Err(format!("Invalid wall orientation: '{}'", c)),
        }
    }
}

/// A two-cell wall anchored at its upper-left corner cell.
///
/// Horizontal at (x, y) sits on the boundary between rows y-1 and y, spanning columns x and x+1.
/// Vertical at (x, y) sits on the boundary between columns x-1 and x, spanning rows y and y+1.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wall {
    pub anchor: Coord,
    pub orientation: Orientation,
}

impl Wall {
    pub const fn horizontal(x: i32, y: i32) -> Self {
        Wall { anchor: Coord::new(x, y), orientation: Orientation::Horizontal }
    }

    pub const fn vertical(x: i32, y: i32) -> Self {
        Wall { anchor: Coord::new(x, y), orientation: Orientation::Vertical }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.anchor.x, self.anchor.y, self.orientation.as_char())
    }
}

/// Goal edge per seat id: seat 0 runs right, seat 1 runs left, seat 2 runs down
pub const SEAT_GOALS: [Direction; 3] = [Direction::Right, Direction::Left, Direction::Down];

/// Looks up the goal direction for a seat; seats without a goal edge are rejected
pub fn goal_for_seat(id: usize) -> Option<Direction> {
    SEAT_GOALS.get(id).copied()
}

/// Player state as reported by the referee for the current turn
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: usize,
    pub coord: Coord,
    pub walls_left: u32,
    pub alive: bool,
    pub goal: Direction,
}

/// Fixed game parameters, read once at startup
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSetup {
    pub width: i32,
    pub height: i32,
    pub player_count: usize,
    pub my_id: usize,
}

/// Everything the referee sends for one turn
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TurnInput {
    pub players: Vec<Player>,
    pub walls: Vec<Wall>,
}

impl TurnInput {
    pub fn live_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive)
    }
}

/// The single action emitted each turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Move(Direction),
    PlaceWall(Wall),
}

impl Decision {
    /// Formats the decision as a referee command (without trailing message)
    pub fn to_command(&self) -> String {
        match self {
            Decision::Move(dir) => dir.as_str().to_string(),
            Decision::PlaceWall(wall) => wall.to_string(),
        }
    }

    /// Parses a command previously produced by `to_command`; a trailing message is ignored
    pub fn parse(command: &str) -> Result<Decision, String> {
        let tokens: Vec<&str> = command.split_whitespace().collect();
        match tokens.as_slice() {
            [] => Err("Empty command".to_string()),
            [x, y, o, ..] if x.parse::<i32>().is_ok() => {
                let x = x.parse::<i32>().map_err(|e| format!("Invalid wall x '{}': {}", x, e))?;
                let y = y.parse::<i32>().map_err(|e| format!("Invalid wall y '{}': {}", y, e))?;
                let mut chars = o.chars();
                let orientation = match (chars.next(), chars.next()) {
                    (Some(c), None) => Orientation::from_char(c)?,
                    _ => return Err(format!("Invalid wall orientation: '{}'", o)),
                };
                Ok(Decision::PlaceWall(Wall { anchor: Coord::new(x, y), orientation }))
            }
            [first, ..] => Direction::parse(first).map(Decision::Move),
        }
    }
}
