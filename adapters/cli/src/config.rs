use std::{fs, path::Path};

use anyhow::{Context, Result};
use roborally_core::{Command, MapDefinition, PlayerId, RobotId};
use roborally_world::RuleSet;
use serde::Deserialize;

/// Robot the script asks to be placed on a start point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub(crate) struct RobotEntry {
    /// Identifier the robot is spawned under.
    pub(crate) robot: RobotId,
    /// Player controlling the robot.
    #[serde(default)]
    pub(crate) owner: Option<PlayerId>,
}

/// Commands replayed against a freshly loaded board.
///
/// Players are registered first, listed robots are placed on start points,
/// then `commands` run in order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Script {
    pub(crate) players: Vec<PlayerId>,
    pub(crate) robots: Vec<RobotEntry>,
    pub(crate) commands: Vec<Command>,
}

/// Reads the JSON map at `path`.
pub(crate) fn load_map(path: &Path) -> Result<MapDefinition> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read map at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse map json at {}", path.display()))
}

/// Reads the JSON command script at `path`.
pub(crate) fn load_script(path: &Path) -> Result<Script> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read script at {}", path.display()))?;
    parse_script(&contents).with_context(|| format!("failed to parse script at {}", path.display()))
}

/// Reads the TOML rules at `path`, falling back to the default rules.
pub(crate) fn load_rules(path: Option<&Path>) -> Result<RuleSet> {
    let Some(path) = path else {
        return Ok(RuleSet::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules at {}", path.display()))?;
    parse_rules(&contents).with_context(|| format!("failed to parse rules at {}", path.display()))
}

/// A script is either a bare list of commands or a full [`Script`] object.
fn parse_script(contents: &str) -> Result<Script> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Commands(Vec<Command>),
        Full(Script),
    }

    let raw: Raw = serde_json::from_str(contents).context("failed to parse script json")?;
    Ok(match raw {
        Raw::Commands(commands) => Script {
            commands,
            ..Script::default()
        },
        Raw::Full(script) => script,
    })
}

fn parse_rules(contents: &str) -> Result<RuleSet> {
    toml::from_str(contents).context("failed to parse rules toml contents")
}
