#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for placing robots on start points.

use std::collections::BTreeSet;

use roborally_core::{Command, Coordinate, Direction, Event, PlayerId, RobotId};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    facing: Direction,
}

impl Config {
    /// Creates a configuration that spawns robots with the provided facing.
    #[must_use]
    pub const fn new(facing: Direction) -> Self {
        Self { facing }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Direction::East)
    }
}

/// Robot waiting for a start point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Identifier the robot will be spawned under.
    pub robot: RobotId,
    /// Player that will control the robot.
    pub owner: Option<PlayerId>,
}

impl Candidate {
    /// Creates a candidate for the provided robot and owner.
    #[must_use]
    pub const fn new(robot: RobotId, owner: Option<PlayerId>) -> Self {
        Self { robot, owner }
    }
}

/// Pure system that assigns unplaced robots to free start points.
///
/// The system observes `RobotSpawned` events to learn which robots and start
/// points are already taken, so repeated calls never place a robot twice.
#[derive(Debug)]
pub struct Spawning {
    facing: Direction,
    placed: BTreeSet<RobotId>,
    claimed: BTreeSet<Coordinate>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            facing: config.facing,
            placed: BTreeSet::new(),
            claimed: BTreeSet::new(),
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// Start points are used in the order given, which the board reports in
    /// reading order. Candidates beyond the number of free start points are
    /// left unplaced.
    pub fn handle(
        &mut self,
        events: &[Event],
        start_points: &[Coordinate],
        candidates: &[Candidate],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::RobotSpawned { robot, cell, .. } = event {
                let _ = self.placed.insert(*robot);
                let _ = self.claimed.insert(*cell);
            }
        }

        let mut free = start_points
            .iter()
            .copied()
            .filter(|cell| !self.claimed.contains(cell));

        for candidate in candidates {
            if self.placed.contains(&candidate.robot) {
                continue;
            }
            let Some(cell) = free.next() else {
                break;
            };
            out.push(Command::SpawnRobot {
                robot: candidate.robot,
                owner: candidate.owner,
                cell,
                facing: self.facing,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(ids: &[u32]) -> Vec<Candidate> {
        ids.iter()
            .map(|&id| Candidate::new(RobotId::new(id), Some(PlayerId::new(id))))
            .collect()
    }

    #[test]
    fn default_config_faces_east() {
        let mut spawning = Spawning::new(Config::default());
        let mut commands = Vec::new();
        spawning.handle(
            &[],
            &[Coordinate::new(0, 0)],
            &candidates(&[1]),
            &mut commands,
        );
        assert!(matches!(
            commands.as_slice(),
            [Command::SpawnRobot {
                facing: Direction::East,
                ..
            }]
        ));
    }

    #[test]
    fn no_start_points_places_nobody() {
        let mut spawning = Spawning::new(Config::default());
        let mut commands = Vec::new();
        spawning.handle(&[], &[], &candidates(&[1, 2]), &mut commands);
        assert!(commands.is_empty());
    }
}
