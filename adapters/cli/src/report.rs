use anyhow::{Context, Result};
use roborally_core::{DamageCard, PlayerId, RobotSnapshot};
use roborally_world::{query, World};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Report {
    robots: Vec<RobotSnapshot>,
    players: Vec<PlayerReport>,
}

#[derive(Debug, Serialize)]
struct PlayerReport {
    player: PlayerId,
    draw_pile: Vec<DamageCard>,
    discard_pile: Vec<DamageCard>,
}

/// Renders robots and player piles as pretty-printed JSON.
pub(crate) fn render(world: &World) -> Result<String> {
    let report = Report {
        robots: query::robots(world),
        players: query::players(world)
            .iter()
            .map(|player| PlayerReport {
                player: player.id(),
                draw_pile: player.draw_pile().cards().to_vec(),
                discard_pile: player.discard_pile().cards().to_vec(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report).context("failed to encode final state")
}
