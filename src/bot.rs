// Turn decision policy
//
// Each turn: solve every live player's path, rank the players, and when the
// acting player is behind, walk the leader's shortest path looking for the
// wall that costs the leader the most. Otherwise move along our own path.

use log::{debug, info};
use std::time::{Duration, Instant};

use crate::collision::CollisionMap;
use crate::config::Config;
use crate::evaluator::{BestWall, Contender, Evaluation, WallEvaluator};
use crate::grid::{walls_across, Grid};
use crate::handler::validate_setup;
use crate::legality;
use crate::pathfinding::{solve, PathMatrix};
use crate::simple_profiler;
use crate::types::{goal_for_seat, Decision, Direction, GameSetup, Player, TurnInput};

/// Budget for one decision. Checked between evaluator calls.
#[derive(Debug, Clone, Copy)]
pub struct TurnClock {
    start: Instant,
    budget: Option<Duration>,
    candidate_limit: Option<usize>,
}

impl TurnClock {
    pub fn start(budget_ms: u64) -> Self {
        TurnClock {
            start: Instant::now(),
            budget: Some(Duration::from_millis(budget_ms)),
            candidate_limit: None,
        }
    }

    /// A clock that never runs out, for tests and replays
    pub fn unlimited() -> Self {
        TurnClock {
            start: Instant::now(),
            budget: None,
            candidate_limit: None,
        }
    }

    /// A clock that runs out once `limit` candidates have been evaluated,
    /// independent of wall time
    pub fn after_candidates(limit: usize) -> Self {
        TurnClock {
            start: Instant::now(),
            budget: None,
            candidate_limit: Some(limit),
        }
    }

    /// True when no further candidate may be evaluated
    pub fn is_exhausted(&self, evaluated: usize) -> bool {
        self.candidate_limit.map_or(false, |limit| evaluated >= limit)
            || self
                .budget
                .map_or(false, |budget| self.start.elapsed() >= budget)
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }
}

/// State carried from one turn to the next within a game
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub turn: u32,
    /// Latched by the first wall we place; keeps walling enabled for the rest of the game
    pub stay_aggressive: bool,
}

/// A live player's place in the race this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub id: usize,
    pub distance: Option<u32>,
    /// Turns until this player moves, 0 for the acting player
    pub order: usize,
    pub rank: usize,
}

/// Why no wall was attempted this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSkip {
    NotPlaying,
    NoWallsLeft,
    AlreadyLeading,
    LeaderTooFar,
    RaceTooClose,
}

/// Everything decided during one turn, for logging and replay
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub turn: u32,
    pub decision: Decision,
    pub standings: Vec<Standing>,
    pub skipped: Option<WallSkip>,
    pub best: Option<Evaluation>,
    pub best_score: Option<i64>,
    pub candidates_evaluated: usize,
    pub timed_out: bool,
    pub elapsed_ms: u128,
}

/// Turn order of `id` relative to the acting player
pub fn turn_order(id: usize, acting_id: usize, player_count: usize) -> usize {
    (id + player_count - acting_id) % player_count
}

/// Sorts live players by distance, then by turn order. Unreachable players rank last.
pub fn rank_players(contenders: &[Contender], acting_id: usize, player_count: usize) -> Vec<Standing> {
    let mut standings: Vec<Standing> = contenders
        .iter()
        .map(|c| Standing {
            id: c.id,
            distance: c.distance,
            order: turn_order(c.id, acting_id, player_count),
            rank: 0,
        })
        .collect();

    standings.sort_by_key(|s| (s.distance.unwrap_or(u32::MAX), s.order));
    for (rank, standing) in standings.iter_mut().enumerate() {
        standing.rank = rank;
    }
    standings
}

struct WallSearch {
    best: Option<Evaluation>,
    best_score: Option<i64>,
    considered: usize,
    timed_out: bool,
}

pub struct Bot {
    config: Config,
    setup: GameSetup,
    grid: Grid,
    my_goal: Direction,
    session: Session,
}

impl Bot {
    /// Creates a bot for one game
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the game
    /// * `setup` - Board size, player count and our seat
    pub fn new(config: Config, setup: GameSetup) -> Result<Self, String> {
        validate_setup(&setup)?;
        let my_goal = goal_for_seat(setup.my_id)
            .ok_or_else(|| format!("Seat {} has no goal edge", setup.my_id))?;

        Ok(Bot {
            config,
            grid: Grid::new(setup.width, setup.height),
            setup,
            my_goal,
            session: Session::default(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Restores the latch, used when replaying a logged turn
    pub fn set_stay_aggressive(&mut self, value: bool) {
        self.session.stay_aggressive = value;
    }

    /// Decides the turn under the configured time budget
    pub fn get_move(&mut self, input: &TurnInput) -> TurnReport {
        let first_turn = self.session.turn == 0;
        let clock = TurnClock::start(self.config.timing.effective_budget_ms(first_turn));
        self.decide(input, &clock)
    }

    /// Decides the turn. Always returns exactly one decision.
    pub fn decide(&mut self, input: &TurnInput, clock: &TurnClock) -> TurnReport {
        self.session.turn += 1;
        let turn = self.session.turn;

        for p in &input.players {
            if p.alive {
                debug!(
                    "Turn {}: player {} at ({}, {}) walls left {}",
                    turn, p.id, p.coord.x, p.coord.y, p.walls_left
                );
            } else {
                debug!("Turn {}: player {} eliminated", turn, p.id);
            }
        }
        if !input.walls.is_empty() {
            let walls: Vec<String> = input.walls.iter().map(|w| w.to_string()).collect();
            debug!("Turn {}: {} walls [{}]", turn, walls.len(), walls.join(", "));
        }

        let map = CollisionMap::from_walls(self.grid, &input.walls);
        let (contenders, matrices): (Vec<Contender>, Vec<PathMatrix>) = input
            .live_players()
            .map(|p| {
                let matrix = solve(&map, p.goal);
                let contender = Contender {
                    id: p.id,
                    coord: p.coord,
                    goal: p.goal,
                    distance: matrix.distance(&p.coord),
                };
                (contender, matrix)
            })
            .unzip();

        let standings = rank_players(&contenders, self.setup.my_id, self.setup.player_count);
        for s in &standings {
            debug!(
                "Turn {}: rank {} player {} distance {:?} order {}",
                turn, s.rank, s.id, s.distance, s.order
            );
        }

        let acting = input
            .players
            .get(self.setup.my_id)
            .filter(|p| p.alive);

        let (skipped, search) = match self.wall_gate(acting, &standings) {
            Err(skip) => {
                debug!("Turn {}: no wall ({:?})", turn, skip);
                (Some(skip), None)
            }
            Ok(leader) => {
                let search = self.search_leader_path(input, &map, &contenders, &matrices, leader, clock);
                (None, Some(search))
            }
        };

        let decision = match search.as_ref().and_then(|s| s.best) {
            Some(best) => {
                self.session.stay_aggressive = true;
                Decision::PlaceWall(best.wall)
            }
            None => Decision::Move(self.own_move(acting, &map, &contenders, &matrices)),
        };

        let report = TurnReport {
            turn,
            decision,
            standings,
            skipped,
            best: search.as_ref().and_then(|s| s.best),
            best_score: search.as_ref().and_then(|s| s.best_score),
            candidates_evaluated: search.as_ref().map_or(0, |s| s.considered),
            timed_out: search.as_ref().map_or(false, |s| s.timed_out),
            elapsed_ms: clock.elapsed_ms(),
        };

        simple_profiler::merge_thread_local();

        info!(
            "Turn {}: {} (candidates: {}, score: {:?}, timed out: {}, time: {}ms)",
            turn,
            report.decision.to_command(),
            report.candidates_evaluated,
            report.best_score,
            report.timed_out,
            report.elapsed_ms
        );

        report
    }

    /// Decides whether a wall is worth looking for; returns the leader if so
    fn wall_gate(&self, acting: Option<&Player>, standings: &[Standing]) -> Result<Standing, WallSkip> {
        let acting = acting.ok_or(WallSkip::NotPlaying)?;
        if acting.walls_left == 0 {
            return Err(WallSkip::NoWallsLeft);
        }

        let (Some(leader), Some(trailing)) = (standings.first(), standings.last()) else {
            return Err(WallSkip::NotPlaying);
        };
        if leader.id == acting.id {
            return Err(WallSkip::AlreadyLeading);
        }

        let latched = self.session.stay_aggressive;
        let policy = &self.config.policy;
        let leader_distance = leader.distance.unwrap_or(u32::MAX);
        let trailing_distance = trailing.distance.unwrap_or(u32::MAX);

        if !latched && leader_distance >= policy.leader_distance_threshold {
            return Err(WallSkip::LeaderTooFar);
        }
        if !latched && trailing_distance <= policy.trailing_distance_threshold {
            return Err(WallSkip::RaceTooClose);
        }

        Ok(*leader)
    }

    /// Walks the leader's path from its position to its goal, scoring every wall
    /// that would block one of its steps
    fn search_leader_path(
        &self,
        input: &TurnInput,
        map: &CollisionMap,
        contenders: &[Contender],
        matrices: &[PathMatrix],
        leader: Standing,
        clock: &TurnClock,
    ) -> WallSearch {
        let mut tracker = BestWall::new();
        let mut timed_out = false;

        let leader_path = contenders
            .iter()
            .zip(matrices)
            .find(|(c, _)| c.id == leader.id)
            .map(|(c, matrix)| matrix.path_from(&c.coord))
            .unwrap_or_default();

        let mut evaluator = WallEvaluator::new(
            map.clone(),
            &input.walls,
            contenders,
            leader.id,
            self.setup.my_id,
        );

        'walk: for step in &leader_path {
            for wall in walls_across(&step.from, step.direction) {
                if !legality::is_in_bounds(&self.grid, &wall) {
                    continue;
                }
                if clock.is_exhausted(tracker.considered()) {
                    timed_out = true;
                    break 'walk;
                }
                let evaluation = evaluator.evaluate(wall);
                if tracker.consider(evaluation, &self.config.scoring) {
                    debug!(
                        "New best wall {} (leader +{}, self +{}, other +{})",
                        wall, evaluation.leader_impact, evaluation.self_impact, evaluation.other_impact
                    );
                }
            }
        }

        if timed_out {
            info!(
                "Time budget exhausted after {} candidates ({}ms)",
                tracker.considered(),
                clock.elapsed_ms()
            );
        }

        WallSearch {
            best: tracker.best().copied(),
            best_score: tracker.best_score(),
            considered: tracker.considered(),
            timed_out,
        }
    }

    /// Our own best step, or the first open direction if our path is gone
    fn own_move(
        &self,
        acting: Option<&Player>,
        map: &CollisionMap,
        contenders: &[Contender],
        matrices: &[PathMatrix],
    ) -> Direction {
        let Some(acting) = acting else {
            return self.my_goal;
        };

        let planned = contenders
            .iter()
            .zip(matrices)
            .find(|(c, _)| c.id == acting.id)
            .and_then(|(c, matrix)| matrix.direction(&c.coord));
        if let Some(direction) = planned {
            return direction;
        }

        std::iter::once(self.my_goal)
            .chain(Direction::all())
            .find(|dir| !map.is_blocked(&acting.coord, *dir))
            .unwrap_or(self.my_goal)
    }
}
