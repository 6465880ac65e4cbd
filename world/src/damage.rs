//! Effects of damage cards played for a robot.

use log::debug;
use roborally_core::{DamageCard, Event, Pile, PlayerId, Rejection, RobotId};

use crate::{movement, robots::Deck, World};

/// Resolves `card` for the robot identified by `source`.
///
/// Targets whose owning player cannot be found are skipped; the effect still
/// applies to every other target. Fails only when `source` names no robot.
pub fn apply_card(
    world: &mut World,
    source: RobotId,
    card: DamageCard,
    out_events: &mut Vec<Event>,
) -> Result<(), Rejection> {
    let Some(index) = world.robots.iter().position(|robot| robot.id == source) else {
        return Err(Rejection::UnknownRobot(source));
    };
    out_events.push(Event::DamageCardApplied {
        robot: source,
        card,
    });

    match card {
        DamageCard::Spam => {}
        DamageCard::TrojanHorse => {
            let owner = world.robots[index].owner;
            let count = world.rules.trojan_spam_count;
            deal_to_owner(world, source, owner, DamageCard::Spam, count, out_events);
        }
        DamageCard::Virus => {
            let origin = world.robots[index].position;
            let radius = world.rules.virus_radius;
            let infected: Vec<(RobotId, Option<PlayerId>)> = world
                .robots
                .iter()
                .filter(|robot| robot.id != source && origin.distance(robot.position) <= radius)
                .map(|robot| (robot.id, robot.owner))
                .collect();
            for (robot, owner) in infected {
                deal_to_owner(world, robot, owner, DamageCard::Virus, 1, out_events);
            }
        }
        DamageCard::Worm => {
            let robot = &mut world.robots[index];
            movement::reboot(&world.board, robot, out_events);
        }
    }

    Ok(())
}

fn deal_to_owner(
    world: &mut World,
    robot: RobotId,
    owner: Option<PlayerId>,
    card: DamageCard,
    count: usize,
    out_events: &mut Vec<Event>,
) {
    let player = owner.and_then(|id| world.players.iter_mut().find(|player| player.id == id));
    let Some(player) = player else {
        debug!("robot {} has no registered owner; {card} skipped", robot.get());
        return;
    };

    let id = player.id;
    for _ in 0..count {
        discard(&mut player.discard_pile, card);
        out_events.push(Event::DamageCardDealt {
            player: id,
            card,
            pile: Pile::Discard,
        });
    }
}

fn discard(pile: &mut Deck, card: DamageCard) {
    pile.push(card);
}
