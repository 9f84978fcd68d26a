// Referee protocol bindings
//
// Thin wrapper between the line-based referee and the Bot:
// - parsing the setup line and each turn's player and wall lines
// - validating seats and coordinates before they reach the engine
// - formatting a Decision as a command line

use std::io::BufRead;

use crate::grid::Grid;
use crate::legality;
use crate::types::{goal_for_seat, Coord, Decision, GameSetup, Orientation, Player, TurnInput, Wall};

/// Reads the referee's input stream one line at a time
pub struct InputReader<R: BufRead> {
    reader: R,
    line_number: usize,
}

impl<R: BufRead> InputReader<R> {
    pub fn new(reader: R) -> Self {
        InputReader { reader, line_number: 0 }
    }

    /// Next line, or None at end of input
    fn next_line(&mut self) -> Result<Option<String>, String> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| format!("Failed to read line {}: {}", self.line_number + 1, e))?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        Ok(Some(line.trim().to_string()))
    }

    fn expect_line(&mut self, what: &str) -> Result<String, String> {
        self.next_line()?
            .ok_or_else(|| format!("Unexpected end of input while reading {}", what))
    }

    /// Parses `width height playerCount myId`
    pub fn read_setup(&mut self) -> Result<GameSetup, String> {
        let line = self.expect_line("game setup")?;
        let fields = parse_fields::<i64>(&line, 4, self.line_number)?;

        let setup = GameSetup {
            width: to_i32(fields[0], "width")?,
            height: to_i32(fields[1], "height")?,
            player_count: to_usize(fields[2], "player count")?,
            my_id: to_usize(fields[3], "player id")?,
        };

        validate_setup(&setup)?;
        Ok(setup)
    }

    /// Parses one turn. Returns Ok(None) when the input ends before the turn starts.
    pub fn read_turn(&mut self, setup: &GameSetup) -> Result<Option<TurnInput>, String> {
        let mut players = Vec::with_capacity(setup.player_count);

        for id in 0..setup.player_count {
            let line = if id == 0 {
                match self.next_line()? {
                    Some(line) => line,
                    None => return Ok(None),
                }
            } else {
                self.expect_line("player state")?
            };
            let fields = parse_fields::<i64>(&line, 3, self.line_number)?;
            players.push(parse_player(id, &fields)?);
        }

        let line = self.expect_line("wall count")?;
        let wall_count = parse_fields::<usize>(&line, 1, self.line_number)?[0];

        let mut walls = Vec::with_capacity(wall_count);
        for _ in 0..wall_count {
            let line = self.expect_line("wall")?;
            walls.push(parse_wall(&line, self.line_number)?);
        }

        let turn = TurnInput { players, walls };
        validate_turn(setup, &turn).map_err(|e| format!("Line {}: {}", self.line_number, e))?;
        Ok(Some(turn))
    }
}

/// Checks board size, player count and our seat
pub fn validate_setup(setup: &GameSetup) -> Result<(), String> {
    if setup.width < 2 || setup.height < 2 {
        return Err(format!("Board {}x{} is too small", setup.width, setup.height));
    }
    if !(2..=3).contains(&setup.player_count) {
        return Err(format!("Unsupported player count {}", setup.player_count));
    }
    if setup.my_id >= setup.player_count {
        return Err(format!(
            "Player id {} out of range for {} players",
            setup.my_id, setup.player_count
        ));
    }
    Ok(())
}

/// Checks that a turn fits the board before it reaches the engine:
/// one player per seat, live players on the board, walls structurally in bounds
pub fn validate_turn(setup: &GameSetup, turn: &TurnInput) -> Result<(), String> {
    validate_setup(setup)?;
    let grid = Grid::new(setup.width, setup.height);

    if turn.players.len() != setup.player_count {
        return Err(format!(
            "Expected {} players, found {}",
            setup.player_count,
            turn.players.len()
        ));
    }

    for (seat, player) in turn.players.iter().enumerate() {
        if player.id != seat {
            return Err(format!("Player {} listed in seat {}", player.id, seat));
        }
        if player.alive && !grid.contains(&player.coord) {
            return Err(format!(
                "Player {} at ({}, {}) is outside the {}x{} board",
                player.id, player.coord.x, player.coord.y, setup.width, setup.height
            ));
        }
    }

    if let Some(wall) = turn.walls.iter().find(|w| !legality::is_in_bounds(&grid, w)) {
        return Err(format!(
            "Wall {} does not fit the {}x{} board",
            wall, setup.width, setup.height
        ));
    }

    Ok(())
}

fn parse_fields<T>(line: &str, count: usize, line_number: usize) -> Result<Vec<T>, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let fields: Vec<T> = line
        .split_whitespace()
        .map(|token| {
            token
                .parse::<T>()
                .map_err(|e| format!("Line {}: invalid number '{}': {}", line_number, token, e))
        })
        .collect::<Result<_, _>>()?;

    if fields.len() != count {
        return Err(format!(
            "Line {}: expected {} fields, found {}",
            line_number,
            count,
            fields.len()
        ));
    }
    Ok(fields)
}

fn to_i32(value: i64, what: &str) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("{} {} out of range", what, value))
}

fn to_usize(value: i64, what: &str) -> Result<usize, String> {
    usize::try_from(value).map_err(|_| format!("{} {} out of range", what, value))
}

fn parse_player(id: usize, fields: &[i64]) -> Result<Player, String> {
    let goal = goal_for_seat(id).ok_or_else(|| format!("Seat {} has no goal edge", id))?;
    let walls_left = u32::try_from(fields[2]).map_err(|_| format!("Invalid wall count {}", fields[2]))?;

    // A negative coordinate pair marks an eliminated player
    if fields[0] < 0 || fields[1] < 0 {
        return Ok(Player {
            id,
            coord: Coord::new(-1, -1),
            walls_left,
            alive: false,
            goal,
        });
    }

    Ok(Player {
        id,
        coord: Coord::new(to_i32(fields[0], "x")?, to_i32(fields[1], "y")?),
        walls_left,
        alive: true,
        goal,
    })
}

fn parse_wall(line: &str, line_number: usize) -> Result<Wall, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [x, y, orientation] = tokens.as_slice() else {
        return Err(format!("Line {}: expected 'x y orientation', found '{}'", line_number, line));
    };

    let x = x
        .parse::<i32>()
        .map_err(|e| format!("Line {}: invalid wall x '{}': {}", line_number, x, e))?;
    let y = y
        .parse::<i32>()
        .map_err(|e| format!("Line {}: invalid wall y '{}': {}", line_number, y, e))?;
    let mut chars = orientation.chars();
    let orientation = match (chars.next(), chars.next()) {
        (Some(c), None) => Orientation::from_char(c),
        _ => Err(format!("Invalid wall orientation: '{}'", orientation)),
    }
    .map_err(|e| format!("Line {}: {}", line_number, e))?;

    Ok(Wall {
        anchor: Coord::new(x, y),
        orientation,
    })
}

/// Formats a decision as the command line sent to the referee
pub fn format_command(decision: &Decision, message: Option<&str>) -> String {
    match message {
        Some(message) if !message.is_empty() => format!("{} {}", decision.to_command(), message),
        _ => decision.to_command(),
    }
}
