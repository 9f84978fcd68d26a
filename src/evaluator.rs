// Wall evaluator: what-if simulation of a single wall placement
//
// A candidate is applied to a working collision map, every live player's
// distance is recomputed, and the map is restored before returning.

use log::trace;

use crate::collision::CollisionMap;
use crate::config::ScoringConfig;
use crate::legality;
use crate::pathfinding::solve;
use crate::profile;
use crate::types::{Coord, Direction, Wall};

/// A live player as seen by the evaluator: where it is, where it goes, how far it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contender {
    pub id: usize,
    pub coord: Coord,
    pub goal: Direction,
    pub distance: Option<u32>,
}

/// Outcome of simulating one candidate wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub wall: Wall,
    /// False when the wall is illegal or would strand a live player
    pub valid: bool,
    pub leader_impact: i64,
    pub self_impact: i64,
    /// Delta of the live player that is neither leader nor acting; 0 when there is none
    pub other_impact: i64,
}

impl Evaluation {
    fn invalid(wall: Wall) -> Self {
        Evaluation {
            wall,
            valid: false,
            leader_impact: 0,
            self_impact: 0,
            other_impact: 0,
        }
    }

    pub fn score(&self, weights: &ScoringConfig) -> i64 {
        weights.leader_weight * self.leader_impact - weights.self_weight * self.self_impact
            + weights.other_weight * self.other_impact
    }
}

pub struct WallEvaluator<'a> {
    map: CollisionMap,
    walls: &'a [Wall],
    contenders: &'a [Contender],
    leader_id: usize,
    acting_id: usize,
}

impl<'a> WallEvaluator<'a> {
    /// # Arguments
    /// * `map` - Working copy of the current collision map, restored after every candidate
    /// * `walls` - Walls already on the board, for the legality check
    /// * `contenders` - Live players with their current distances
    pub fn new(
        map: CollisionMap,
        walls: &'a [Wall],
        contenders: &'a [Contender],
        leader_id: usize,
        acting_id: usize,
    ) -> Self {
        WallEvaluator {
            map,
            walls,
            contenders,
            leader_id,
            acting_id,
        }
    }

    pub fn map(&self) -> &CollisionMap {
        &self.map
    }

    /// Simulates `wall` and measures every live player's distance change
    pub fn evaluate(&mut self, wall: Wall) -> Evaluation {
        profile!("evaluate", {
            if !legality::is_placeable(&self.map.grid(), &wall, self.walls) {
                trace!("Wall {} rejected: not placeable", wall);
                return Evaluation::invalid(wall);
            }

            let contenders = self.contenders;
            let deltas: Option<Vec<(usize, i64)>> = self.map.with_wall(&wall, |map| {
                contenders
                    .iter()
                    .map(|c| {
                        let before = c.distance?;
                        let after = solve(map, c.goal).distance(&c.coord)?;
                        Some((c.id, i64::from(after) - i64::from(before)))
                    })
                    .collect()
            });

            let Some(deltas) = deltas else {
                trace!("Wall {} rejected: strands a player", wall);
                return Evaluation::invalid(wall);
            };

            let delta_of = |id: usize| {
                deltas
                    .iter()
                    .find(|(player, _)| *player == id)
                    .map_or(0, |(_, delta)| *delta)
            };
            let other_impact = deltas
                .iter()
                .filter(|(id, _)| *id != self.leader_id && *id != self.acting_id)
                .map(|(_, delta)| *delta)
                .sum();

            Evaluation {
                wall,
                valid: true,
                leader_impact: delta_of(self.leader_id),
                self_impact: delta_of(self.acting_id),
                other_impact,
            }
        })
    }
}

/// Keeps the best valid candidate that slows the leader.
/// Equal scores go to the later candidate.
#[derive(Debug, Default)]
pub struct BestWall {
    best: Option<(Evaluation, i64)>,
    considered: usize,
}

impl BestWall {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `evaluation` became the new best
    pub fn consider(&mut self, evaluation: Evaluation, weights: &ScoringConfig) -> bool {
        self.considered += 1;
        if !evaluation.valid || evaluation.leader_impact <= 0 {
            return false;
        }

        let score = evaluation.score(weights);
        match self.best {
            Some((_, best_score)) if score < best_score => false,
            _ => {
                self.best = Some((evaluation, score));
                true
            }
        }
    }

    pub fn best(&self) -> Option<&Evaluation> {
        self.best.as_ref().map(|(evaluation, _)| evaluation)
    }

    pub fn best_score(&self) -> Option<i64> {
        self.best.map(|(_, score)| score)
    }

    pub fn considered(&self) -> usize {
        self.considered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::grid::Grid;

    fn contenders(map: &CollisionMap, players: &[(usize, Coord, Direction)]) -> Vec<Contender> {
        players
            .iter()
            .map(|&(id, coord, goal)| Contender {
                id,
                coord,
                goal,
                distance: solve(map, goal).distance(&coord),
            })
            .collect()
    }

    fn eval(wall: Wall, leader: i64, own: i64, other: i64) -> Evaluation {
        Evaluation {
            wall,
            valid: true,
            leader_impact: leader,
            self_impact: own,
            other_impact: other,
        }
    }

    #[test]
    fn test_evaluation_measures_deltas() {
        let grid = Grid::new(9, 9);
        let map = CollisionMap::new(grid);
        let players = contenders(
            &map,
            &[(0, Coord::new(0, 4), Direction::Right), (1, Coord::new(2, 4), Direction::Left)],
        );
        let mut evaluator = WallEvaluator::new(map.clone(), &[], &players, 1, 0);

        let result = evaluator.evaluate(Wall::vertical(2, 4));
        assert!(result.valid);
        assert_eq!(result.leader_impact, 1);
        assert_eq!(result.self_impact, 1);
        assert_eq!(result.other_impact, 0);
        assert_eq!(evaluator.map(), &map);
    }

    #[test]
    fn test_illegal_candidate_is_invalid() {
        let grid = Grid::new(9, 9);
        let map = CollisionMap::from_walls(grid, &[Wall::vertical(2, 4)]);
        let walls = [Wall::vertical(2, 4)];
        let players = contenders(&map, &[(0, Coord::new(0, 4), Direction::Right)]);
        let mut evaluator = WallEvaluator::new(map, &walls, &players, 0, 0);

        assert!(!evaluator.evaluate(Wall::vertical(2, 3)).valid);
        assert!(!evaluator.evaluate(Wall::vertical(0, 3)).valid);
        assert!(!evaluator.evaluate(Wall::horizontal(1, 5)).valid);
    }

    #[test]
    fn test_stranding_candidate_is_invalid() {
        let grid = Grid::new(4, 4);
        // The top-left 2x2 block is closed below, so only its right side leads out
        let walls = [Wall::horizontal(0, 2)];
        let map = CollisionMap::from_walls(grid, &walls);
        let players = contenders(&map, &[(0, Coord::new(0, 0), Direction::Right)]);
        let mut evaluator = WallEvaluator::new(map.clone(), &walls, &players, 0, 0);

        let sealing = evaluator.evaluate(Wall::vertical(2, 0));
        assert!(!sealing.valid);
        assert_eq!(evaluator.map(), &map);

        let open = evaluator.evaluate(Wall::vertical(3, 2));
        assert!(open.valid);
    }

    #[test]
    fn test_third_player_counts_as_other() {
        let grid = Grid::new(9, 9);
        let map = CollisionMap::new(grid);
        let players = contenders(
            &map,
            &[
                (0, Coord::new(0, 0), Direction::Right),
                (1, Coord::new(1, 0), Direction::Left),
                (2, Coord::new(4, 7), Direction::Down),
            ],
        );
        let mut evaluator = WallEvaluator::new(map, &[], &players, 1, 0);

        let result = evaluator.evaluate(Wall::horizontal(4, 8));
        assert!(result.valid);
        assert_eq!(result.leader_impact, 0);
        assert_eq!(result.self_impact, 0);
        assert_eq!(result.other_impact, 1);
    }

    #[test]
    fn test_best_wall_scoring_and_ties() {
        let weights = Config::default_hardcoded().scoring;
        let mut best = BestWall::new();

        assert!(!best.consider(eval(Wall::vertical(1, 1), 0, -1, 3), &weights));
        assert!(best.best().is_none());

        assert!(best.consider(eval(Wall::vertical(2, 1), 2, 1, 0), &weights));
        assert_eq!(best.best_score(), Some(130));

        assert!(!best.consider(eval(Wall::vertical(3, 1), 1, 0, 0), &weights));

        // Equal score: the later candidate wins
        assert!(best.consider(eval(Wall::vertical(4, 1), 2, 1, 0), &weights));
        assert_eq!(best.best().unwrap().wall, Wall::vertical(4, 1));

        let mut invalid = eval(Wall::vertical(5, 1), 9, 0, 0);
        invalid.valid = false;
        assert!(!best.consider(invalid, &weights));
        assert_eq!(best.considered(), 5);
    }

    #[test]
    fn test_score_formula() {
        let weights = Config::default_hardcoded().scoring;
        assert_eq!(eval(Wall::vertical(1, 1), 3, 2, 1).score(&weights), 300 - 140 + 40);
    }
}
