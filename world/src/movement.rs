//! Movement resolution: stepping under wall and boundary constraints,
//! followed by a single pass of tile effects at the resting cell.
//!
//! Every entry point that changes where a robot stands or which way it faces
//! finishes with [`settle`]: a conveyor belt at the resting cell carries the
//! robot once, then every other tile at the cell it ends up on activates in
//! storage order. Belts are never re-chained within one call; a caller that
//! wants another belt pass issues another command.

use log::{debug, trace};
use roborally_core::{BlockReason, Coordinate, Direction, Event, MoveOutcome, Turn};

use crate::{
    board::Board,
    robots::Robot,
    tiles::{Tile, TileKind},
};

/// Advances `robot` up to `steps` cells along its facing.
///
/// Steps are taken one at a time. The first refused step forfeits all
/// remaining steps. Tile effects at the resting cell apply afterwards, whether
/// the move completed or not. Destroyed robots do not move and trigger no
/// effects.
pub fn resolve_move(
    board: &Board,
    robot: &mut Robot,
    steps: u32,
    out_events: &mut Vec<Event>,
) -> MoveOutcome {
    if robot.destroyed {
        debug!("robot {} is destroyed; move ignored", robot.id.get());
        return MoveOutcome::Inactive;
    }

    let heading = robot.facing;
    let outcome = advance(board, robot, heading, steps, out_events);
    settle(board, robot, out_events);
    outcome
}

/// Moves `robot` one cell opposite to its facing without turning.
pub fn back_up(board: &Board, robot: &mut Robot, out_events: &mut Vec<Event>) -> MoveOutcome {
    if robot.destroyed {
        debug!("robot {} is destroyed; back-up ignored", robot.id.get());
        return MoveOutcome::Inactive;
    }

    let heading = robot.facing.reverse();
    let outcome = advance(board, robot, heading, 1, out_events);
    settle(board, robot, out_events);
    outcome
}

/// Turns `robot` in place and applies tile effects at its cell.
///
/// A turn covers no distance, so a live robot always reports
/// `Completed { steps: 0 }`; destroyed robots report `Inactive`.
pub fn turn(
    board: &Board,
    robot: &mut Robot,
    turn: Turn,
    out_events: &mut Vec<Event>,
) -> MoveOutcome {
    if robot.destroyed {
        debug!("robot {} is destroyed; turn ignored", robot.id.get());
        return MoveOutcome::Inactive;
    }

    robot.facing = turn.apply(robot.facing);
    out_events.push(Event::RobotTurned {
        robot: robot.id,
        facing: robot.facing,
    });
    settle(board, robot, out_events);
    MoveOutcome::Completed { steps: 0 }
}

/// Applies the post-action tile effects at the robot's current cell.
///
/// A conveyor belt fires at most once. The remaining tiles of the cell the
/// robot then rests on activate in storage order until one of them moves or
/// destroys the robot.
pub fn settle(board: &Board, robot: &mut Robot, out_events: &mut Vec<Event>) {
    if robot.destroyed {
        return;
    }

    let belt = board
        .tiles_at(robot.position)
        .iter()
        .find_map(|tile| match tile.kind() {
            TileKind::ConveyorBelt { direction, speed } => Some((*direction, *speed)),
            _ => None,
        });
    if let Some((direction, speed)) = belt {
        carry(board, robot, direction, speed, out_events);
    }

    let cell = robot.position;
    for tile in board.tiles_at(cell) {
        activate(board, tile, robot, out_events);
        if robot.destroyed || robot.position != cell {
            break;
        }
    }
}

/// Returns a robot to the board at the first restart point.
///
/// Boards without restart points send the robot back to the cell and facing
/// it was spawned with.
pub fn reboot(board: &Board, robot: &mut Robot, out_events: &mut Vec<Event>) {
    let (cell, facing) = board
        .restart_points()
        .first()
        .map_or((robot.start, robot.start_facing), |point| {
            (point.cell(), point.facing())
        });

    robot.position = cell;
    robot.facing = facing;
    robot.destroyed = false;
    out_events.push(Event::RobotRebooted {
        robot: robot.id,
        cell,
        facing,
    });
}

/// Checks a single step from `from` toward `heading`.
///
/// The board edge is checked first, then a wall on the side being left,
/// then a wall on the side of the destination being entered.
pub fn check_step(
    board: &Board,
    from: Coordinate,
    heading: Direction,
) -> Result<Coordinate, BlockReason> {
    let next = from.offset(heading);
    if !board.is_in_bounds(next) {
        return Err(BlockReason::Boundary);
    }
    if board.blocks_exit(from, heading) {
        return Err(BlockReason::SourceWall);
    }
    if board.blocks_exit(next, heading.reverse()) {
        return Err(BlockReason::TargetWall);
    }
    Ok(next)
}

fn advance(
    board: &Board,
    robot: &mut Robot,
    heading: Direction,
    steps: u32,
    out_events: &mut Vec<Event>,
) -> MoveOutcome {
    let mut taken = 0;
    while taken < steps {
        match check_step(board, robot.position, heading) {
            Ok(next) => {
                trace!("robot {} steps {} -> {}", robot.id.get(), robot.position, next);
                out_events.push(Event::RobotMoved {
                    robot: robot.id,
                    from: robot.position,
                    to: next,
                });
                robot.position = next;
                taken += 1;
            }
            Err(reason) => {
                debug!(
                    "robot {} blocked at {} heading {:?}: {:?}",
                    robot.id.get(),
                    robot.position,
                    heading,
                    reason
                );
                out_events.push(Event::MovementBlocked {
                    robot: robot.id,
                    cell: robot.position,
                    reason,
                });
                return if taken == 0 {
                    MoveOutcome::Blocked { reason }
                } else {
                    MoveOutcome::Partial {
                        steps: taken,
                        reason,
                    }
                };
            }
        }
    }
    MoveOutcome::Completed { steps: taken }
}

fn carry(
    board: &Board,
    robot: &mut Robot,
    direction: Direction,
    speed: u32,
    out_events: &mut Vec<Event>,
) {
    let from = robot.position;
    for _ in 0..speed {
        match check_step(board, robot.position, direction) {
            Ok(next) => robot.position = next,
            Err(reason) => {
                debug!(
                    "belt stopped robot {} at {}: {:?}",
                    robot.id.get(),
                    robot.position,
                    reason
                );
                break;
            }
        }
    }

    if robot.position != from {
        out_events.push(Event::ConveyorCarried {
            robot: robot.id,
            from,
            to: robot.position,
        });
    }
}

fn activate(board: &Board, tile: &Tile, robot: &mut Robot, out_events: &mut Vec<Event>) {
    match tile.kind() {
        TileKind::Checkpoint { number } => {
            if *number != robot.checkpoint + 1 {
                return;
            }
            robot.checkpoint = *number;
            out_events.push(Event::CheckpointReached {
                robot: robot.id,
                checkpoint: *number,
            });
            if *number == board.checkpoint_count() {
                out_events.push(Event::AllCheckpointsReached { robot: robot.id });
            }
        }
        TileKind::Gear { rotation } => {
            robot.facing = rotation.apply(robot.facing);
            out_events.push(Event::RobotTurned {
                robot: robot.id,
                facing: robot.facing,
            });
        }
        TileKind::Pit => {
            robot.destroyed = true;
            out_events.push(Event::RobotDestroyed {
                robot: robot.id,
                cell: robot.position,
            });
        }
        TileKind::PushPanel {
            direction,
            registers,
        } => {
            let Some(register) = robot.register else {
                return;
            };
            if !registers.contains(&register) {
                return;
            }
            let from = robot.position;
            match check_step(board, from, *direction) {
                Ok(to) => {
                    robot.position = to;
                    out_events.push(Event::RobotPushed {
                        robot: robot.id,
                        from,
                        to,
                    });
                }
                Err(reason) => debug!("push panel at {from} blocked: {reason:?}"),
            }
        }
        TileKind::Energy { cubes } => {
            if *cubes == 0 {
                return;
            }
            robot.energy = robot.energy.saturating_add(*cubes);
            out_events.push(Event::EnergyCollected {
                robot: robot.id,
                amount: *cubes,
                total: robot.energy,
            });
        }
        TileKind::ConveyorBelt { .. }
        | TileKind::Wall
        | TileKind::Laser { .. }
        | TileKind::Antenna { .. }
        | TileKind::StartPoint
        | TileKind::RestartPoint { .. }
        | TileKind::Empty => {}
    }
}
