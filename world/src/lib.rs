#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Robo Rally rules engine.
//!
//! The world owns the assembled [`Board`], every [`Robot`] and every
//! [`Player`]. Adapters submit [`Command`] values through [`apply`], which
//! resolves each command to completion before returning and reports every
//! state transition as an [`Event`]. The [`query`] module exposes read-only
//! access for adapters and systems.

mod board;
pub mod construction;
pub mod damage;
pub mod movement;
mod robots;
mod tiles;

use log::debug;
use roborally_core::{Command, Event, MapDefinition, Pile, Rejection, RobotId};
use serde::Deserialize;

pub use board::{Board, RestartPoint};
pub use construction::ConfigError;
pub use robots::{Deck, Player, Robot};
pub use tiles::{Tile, TileKind, WallEdges};

const DEFAULT_VIRUS_RADIUS: f64 = 6.0;
const DEFAULT_TROJAN_SPAM_COUNT: usize = 2;

/// Tunable constants of the damage card rules.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Inclusive radius, in cells, a VIRUS card spreads across.
    pub virus_radius: f64,
    /// SPAM cards handed out by a TROJAN HORSE.
    pub trojan_spam_count: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            virus_radius: DEFAULT_VIRUS_RADIUS,
            trojan_spam_count: DEFAULT_TROJAN_SPAM_COUNT,
        }
    }
}

/// Represents the authoritative game state.
#[derive(Debug)]
pub struct World {
    board: Board,
    rules: RuleSet,
    robots: Vec<Robot>,
    players: Vec<Player>,
}

impl World {
    /// Creates a world around an assembled board with no robots or players.
    #[must_use]
    pub fn new(board: Board, rules: RuleSet) -> Self {
        Self {
            board,
            rules,
            robots: Vec::new(),
            players: Vec::new(),
        }
    }

    /// Assembles the board described by `map` and wraps it in a new world.
    pub fn from_map(map: &MapDefinition, rules: RuleSet) -> Result<Self, ConfigError> {
        Ok(Self::new(Board::assemble(map)?, rules))
    }

    /// Splits the borrow so a robot can be resolved against the board.
    fn board_and_robot(&mut self, robot: RobotId) -> Option<(&Board, &mut Robot)> {
        let board = &self.board;
        self.robots
            .iter_mut()
            .find(|candidate| candidate.id == robot)
            .map(|found| (board, found))
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AddPlayer { player } => {
            if world.players.iter().any(|existing| existing.id == player) {
                debug!("player {} already registered", player.get());
                return;
            }
            world.players.push(Player::new(player));
            out_events.push(Event::PlayerAdded { player });
        }
        Command::SpawnRobot {
            robot,
            owner,
            cell,
            facing,
        } => {
            if !world.board.is_in_bounds(cell) {
                reject(Rejection::OutOfBounds(cell), out_events);
                return;
            }
            if world.robots.iter().any(|existing| existing.id == robot) {
                reject(Rejection::DuplicateRobot(robot), out_events);
                return;
            }
            world.robots.push(Robot::new(robot, owner, cell, facing));
            out_events.push(Event::RobotSpawned {
                robot,
                cell,
                facing,
            });
        }
        Command::SetRegister { robot, register } => {
            let Some((_, target)) = world.board_and_robot(robot) else {
                reject(Rejection::UnknownRobot(robot), out_events);
                return;
            };
            target.set_register(register);
            out_events.push(Event::RegisterChanged { robot, register });
        }
        Command::MoveRobot { robot, steps } => {
            let Some((board, target)) = world.board_and_robot(robot) else {
                reject(Rejection::UnknownRobot(robot), out_events);
                return;
            };
            let outcome = movement::resolve_move(board, target, steps, out_events);
            out_events.push(Event::MoveResolved { robot, outcome });
        }
        Command::BackUp { robot } => {
            let Some((board, target)) = world.board_and_robot(robot) else {
                reject(Rejection::UnknownRobot(robot), out_events);
                return;
            };
            let outcome = movement::back_up(board, target, out_events);
            out_events.push(Event::MoveResolved { robot, outcome });
        }
        Command::TurnRobot { robot, turn } => {
            let Some((board, target)) = world.board_and_robot(robot) else {
                reject(Rejection::UnknownRobot(robot), out_events);
                return;
            };
            let outcome = movement::turn(board, target, turn, out_events);
            out_events.push(Event::MoveResolved { robot, outcome });
        }
        Command::ApplyDamageCard { robot, card } => {
            if let Err(reason) = damage::apply_card(world, robot, card, out_events) {
                reject(reason, out_events);
            }
        }
        Command::RebootRobot { robot } => {
            let Some((board, target)) = world.board_and_robot(robot) else {
                reject(Rejection::UnknownRobot(robot), out_events);
                return;
            };
            movement::reboot(board, target, out_events);
        }
        Command::DealToDrawPile { player, card } => {
            let Some(target) = world.players.iter_mut().find(|p| p.id == player) else {
                reject(Rejection::UnknownPlayer(player), out_events);
                return;
            };
            target.draw_pile.push(card);
            out_events.push(Event::DamageCardDealt {
                player,
                card,
                pile: Pile::Draw,
            });
        }
    }
}

fn reject(reason: Rejection, out_events: &mut Vec<Event>) {
    debug!("command rejected: {reason:?}");
    out_events.push(Event::CommandRejected { reason });
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use roborally_core::{Coordinate, PlayerId, RobotId, RobotSnapshot};

    use super::{Board, Player, RuleSet, Tile, World};

    /// Provides read-only access to the assembled board.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Tiles stacked at `cell`, empty when out of bounds.
    #[must_use]
    pub fn tiles_at(world: &World, cell: Coordinate) -> &[Tile] {
        world.board.tiles_at(cell)
    }

    /// Damage card rules in force.
    #[must_use]
    pub fn rules(world: &World) -> &RuleSet {
        &world.rules
    }

    /// Captures the state of a single robot.
    #[must_use]
    pub fn robot(world: &World, robot: RobotId) -> Option<RobotSnapshot> {
        world
            .robots
            .iter()
            .find(|candidate| candidate.id == robot)
            .map(|found| found.snapshot())
    }

    /// Captures every robot, ordered by identifier.
    #[must_use]
    pub fn robots(world: &World) -> Vec<RobotSnapshot> {
        let mut snapshots: Vec<RobotSnapshot> =
            world.robots.iter().map(|robot| robot.snapshot()).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Robots that are not currently destroyed, ordered by identifier.
    #[must_use]
    pub fn active_robots(world: &World) -> Vec<RobotSnapshot> {
        robots(world)
            .into_iter()
            .filter(|snapshot| !snapshot.destroyed)
            .collect()
    }

    /// Provides read-only access to a player and their piles.
    #[must_use]
    pub fn player(world: &World, player: PlayerId) -> Option<&Player> {
        world.players.iter().find(|candidate| candidate.id == player)
    }

    /// Every registered player in registration order.
    #[must_use]
    pub fn players(world: &World) -> &[Player] {
        &world.players
    }
}

#[cfg(test)]
mod tests {
    use roborally_core::{Coordinate, DamageCard, Direction, PlayerId, TileDefinition, Turn};

    use super::*;

    fn open_world() -> World {
        World::from_map(&MapDefinition::empty(4, 4), RuleSet::default()).expect("valid map")
    }

    fn spawn(world: &mut World, id: u32, x: i32, y: i32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnRobot {
                robot: RobotId::new(id),
                owner: None,
                cell: Coordinate::new(x, y),
                facing: Direction::East,
            },
            &mut events,
        );
        events
    }

    #[test]
    fn default_rules_match_card_text() {
        let rules = RuleSet::default();
        assert!((rules.virus_radius - 6.0).abs() < f64::EPSILON);
        assert_eq!(rules.trojan_spam_count, 2);
    }

    #[test]
    fn spawn_rejects_out_of_bounds_cell() {
        let mut world = open_world();
        let events = spawn(&mut world, 1, 4, 0);
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: Rejection::OutOfBounds(Coordinate::new(4, 0)),
            }]
        );
        assert!(query::robots(&world).is_empty());
    }

    #[test]
    fn spawn_rejects_duplicate_identifier() {
        let mut world = open_world();
        let _ = spawn(&mut world, 1, 0, 0);
        let events = spawn(&mut world, 1, 1, 1);
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: Rejection::DuplicateRobot(RobotId::new(1)),
            }]
        );
    }

    #[test]
    fn unknown_robot_commands_are_rejected() {
        let mut world = open_world();
        let mut events = Vec::new();
        for command in [
            Command::MoveRobot {
                robot: RobotId::new(7),
                steps: 1,
            },
            Command::BackUp {
                robot: RobotId::new(7),
            },
            Command::TurnRobot {
                robot: RobotId::new(7),
                turn: Turn::UTurn,
            },
            Command::RebootRobot {
                robot: RobotId::new(7),
            },
            Command::ApplyDamageCard {
                robot: RobotId::new(7),
                card: DamageCard::Worm,
            },
            Command::SetRegister {
                robot: RobotId::new(7),
                register: Some(1),
            },
        ] {
            apply(&mut world, command, &mut events);
        }
        assert_eq!(events.len(), 6);
        assert!(events.iter().all(|event| *event
            == Event::CommandRejected {
                reason: Rejection::UnknownRobot(RobotId::new(7)),
            }));
    }

    #[test]
    fn move_reports_outcome_after_steps() {
        let mut world = open_world();
        let _ = spawn(&mut world, 1, 0, 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MoveRobot {
                robot: RobotId::new(1),
                steps: 2,
            },
            &mut events,
        );
        assert_eq!(
            events.last(),
            Some(&Event::MoveResolved {
                robot: RobotId::new(1),
                outcome: roborally_core::MoveOutcome::Completed { steps: 2 },
            })
        );
        let snapshot = query::robot(&world, RobotId::new(1)).expect("spawned");
        assert_eq!(snapshot.position, Coordinate::new(2, 0));
    }

    #[test]
    fn back_up_keeps_facing() {
        let mut world = open_world();
        let _ = spawn(&mut world, 1, 2, 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BackUp {
                robot: RobotId::new(1),
            },
            &mut events,
        );
        let snapshot = query::robot(&world, RobotId::new(1)).expect("spawned");
        assert_eq!(snapshot.position, Coordinate::new(1, 0));
        assert_eq!(snapshot.facing, Direction::East);
    }

    #[test]
    fn players_register_once_and_receive_draw_cards() {
        let mut world = open_world();
        let mut events = Vec::new();
        let player = PlayerId::new(3);
        apply(&mut world, Command::AddPlayer { player }, &mut events);
        apply(&mut world, Command::AddPlayer { player }, &mut events);
        apply(
            &mut world,
            Command::DealToDrawPile {
                player,
                card: DamageCard::Worm,
            },
            &mut events,
        );
        assert_eq!(query::players(&world).len(), 1);
        let found = query::player(&world, player).expect("registered");
        assert_eq!(found.draw_pile().cards(), &[DamageCard::Worm]);
        assert!(found.discard_pile().is_empty());
    }

    #[test]
    fn dealing_to_unknown_player_is_rejected() {
        let mut world = open_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DealToDrawPile {
                player: PlayerId::new(8),
                card: DamageCard::Spam,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: Rejection::UnknownPlayer(PlayerId::new(8)),
            }]
        );
    }

    #[test]
    fn tiles_are_exposed_through_query() {
        let map = MapDefinition::empty(2, 2)
            .with_tile(1, 1, TileDefinition::of_kind("Pit"));
        let world = World::from_map(&map, RuleSet::default()).expect("valid map");
        assert_eq!(
            query::tiles_at(&world, Coordinate::new(1, 1))[0].kind(),
            &TileKind::Pit
        );
        assert!(query::tiles_at(&world, Coordinate::new(9, 9)).is_empty());
        assert_eq!(query::board(&world).width(), 2);
    }

    #[test]
    fn turn_reports_outcome_for_live_and_destroyed_robots() {
        let map = MapDefinition::empty(2, 1).with_tile(1, 0, TileDefinition::of_kind("Pit"));
        let mut world = World::from_map(&map, RuleSet::default()).expect("valid map");
        let _ = spawn(&mut world, 1, 0, 0);
        let turn = || Command::TurnRobot {
            robot: RobotId::new(1),
            turn: Turn::UTurn,
        };

        let mut events = Vec::new();
        apply(&mut world, turn(), &mut events);
        assert_eq!(
            events,
            vec![
                Event::RobotTurned {
                    robot: RobotId::new(1),
                    facing: Direction::West,
                },
                Event::MoveResolved {
                    robot: RobotId::new(1),
                    outcome: roborally_core::MoveOutcome::Completed { steps: 0 },
                },
            ]
        );

        apply(&mut world, turn(), &mut events);
        apply(
            &mut world,
            Command::MoveRobot {
                robot: RobotId::new(1),
                steps: 1,
            },
            &mut events,
        );
        assert!(query::robot(&world, RobotId::new(1)).expect("spawned").destroyed);

        events.clear();
        apply(&mut world, turn(), &mut events);
        assert_eq!(
            events,
            vec![Event::MoveResolved {
                robot: RobotId::new(1),
                outcome: roborally_core::MoveOutcome::Inactive,
            }]
        );
        assert_eq!(
            query::robot(&world, RobotId::new(1)).expect("spawned").facing,
            Direction::East
        );
    }
}
