//! Conversion of external tile definitions into board tiles.

use std::collections::BTreeSet;

use roborally_core::{Coordinate, Direction, Rotation, TileDefinition};
use thiserror::Error;

use crate::tiles::{Tile, TileKind, WallEdges};

/// Reasons a map or tile definition may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The type tag does not name a known tile.
    #[error("unknown tile type `{0}`")]
    UnknownTileType(String),
    /// An orientation string is not a compass name.
    #[error("`{kind}` tile has unrecognised orientation `{value}`")]
    UnknownDirection {
        /// Tile type tag.
        kind: String,
        /// Offending orientation string.
        value: String,
    },
    /// A rotation string is not a known rotation sense.
    #[error("`{kind}` tile has unrecognised rotation `{value}`")]
    UnknownRotation {
        /// Tile type tag.
        kind: String,
        /// Offending rotation string.
        value: String,
    },
    /// The orientation list has the wrong length for the tile type.
    #[error("`{kind}` tile expects {expected} orientation(s) but lists {found}")]
    OrientationCount {
        /// Tile type tag.
        kind: String,
        /// Accepted cardinality, for example `exactly 1`.
        expected: &'static str,
        /// Number of orientations supplied.
        found: usize,
    },
    /// A field required by the tile type is absent.
    #[error("`{kind}` tile is missing required field `{field}`")]
    MissingField {
        /// Tile type tag.
        kind: String,
        /// Name of the missing field.
        field: &'static str,
    },
    /// A numeric field lies outside its accepted range.
    #[error("`{kind}` tile has invalid `{field}` value {value}")]
    InvalidField {
        /// Tile type tag.
        kind: String,
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied.
        value: i32,
    },
    /// The grid lists a different number of rows than declared.
    #[error("map declares {expected} rows but lists {found}")]
    RowCountMismatch {
        /// Declared height.
        expected: u32,
        /// Rows supplied.
        found: usize,
    },
    /// A grid row lists a different number of cells than declared.
    #[error("map declares {expected} columns but row {row} lists {found}")]
    ColumnCountMismatch {
        /// Index of the offending row.
        row: usize,
        /// Declared width.
        expected: u32,
        /// Cells supplied in the row.
        found: usize,
    },
    /// A tile definition failed validation.
    #[error("tile at {cell}: {source}")]
    AtCell {
        /// Cell holding the definition.
        cell: Coordinate,
        /// Underlying validation failure.
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attaches the cell the failing definition belongs to.
    #[must_use]
    pub fn at(self, cell: Coordinate) -> Self {
        Self::AtCell {
            cell,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping cell annotations.
    #[must_use]
    pub fn root(&self) -> &ConfigError {
        match self {
            Self::AtCell { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Builds the tile described by `definition` at `cell`.
///
/// Validation is performed per type tag; the tile is returned to the caller,
/// which owns insertion into the board.
pub fn create_tile(definition: &TileDefinition, cell: Coordinate) -> Result<Tile, ConfigError> {
    let fields = Fields { definition };
    let mut walls = WallEdges::NONE;

    let kind = match definition.kind.as_str() {
        "Empty" => TileKind::Empty,
        "StartPoint" => TileKind::StartPoint,
        "Pit" => TileKind::Pit,
        "RestartPoint" => {
            let facing = match fields.orientations()?.as_slice() {
                [] => Direction::North,
                [facing] => *facing,
                more => return Err(fields.orientation_count("at most 1", more.len())),
            };
            TileKind::RestartPoint { facing }
        }
        "Wall" => {
            let sides = fields.orientations()?;
            if sides.is_empty() {
                return Err(fields.orientation_count("at least 1", 0));
            }
            walls = WallEdges::from_sides(sides);
            TileKind::Wall
        }
        "Checkpoint" => TileKind::Checkpoint {
            number: fields.positive("count", fields.required("count", definition.count)?)?,
        },
        "Gear" => {
            let name = definition
                .rotation
                .as_deref()
                .ok_or_else(|| fields.missing("rotation"))?;
            let rotation = name
                .parse::<Rotation>()
                .map_err(|_| ConfigError::UnknownRotation {
                    kind: definition.kind.clone(),
                    value: name.to_owned(),
                })?;
            TileKind::Gear { rotation }
        }
        "PushPanel" => {
            let direction = fields.single_orientation()?;
            let listed = definition
                .registers
                .as_deref()
                .ok_or_else(|| fields.missing("registers"))?;
            let registers = listed
                .iter()
                .map(|&register| {
                    u8::try_from(register).map_err(|_| fields.invalid("registers", register))
                })
                .collect::<Result<BTreeSet<u8>, _>>()?;
            TileKind::PushPanel {
                direction,
                registers,
            }
        }
        "ConveyorBelt" => {
            // Only the first orientation is the travel direction; the rest
            // describe inbound lanes and carry no movement semantics.
            let direction = fields
                .orientations()?
                .first()
                .copied()
                .ok_or_else(|| fields.orientation_count("at least 1", 0))?;
            let speed = fields.positive("speed", fields.required("speed", definition.speed)?)?;
            TileKind::ConveyorBelt { direction, speed }
        }
        "Energy" => TileKind::Energy {
            cubes: fields.non_negative("count", definition.count.unwrap_or(1))?,
        },
        "Laser" => TileKind::Laser {
            facing: fields.single_orientation()?,
            strength: fields.positive("count", definition.count.unwrap_or(1))?,
        },
        "Antenna" => TileKind::Antenna {
            facing: fields.single_orientation()?,
        },
        other => return Err(ConfigError::UnknownTileType(other.to_owned())),
    };

    Ok(Tile::new(cell, definition.is_on_board.clone(), walls, kind))
}

/// Field accessors that attach the tile type to validation errors.
struct Fields<'a> {
    definition: &'a TileDefinition,
}

impl Fields<'_> {
    fn kind(&self) -> String {
        self.definition.kind.clone()
    }

    fn orientations(&self) -> Result<Vec<Direction>, ConfigError> {
        self.definition
            .orientations
            .iter()
            .map(|value| {
                value
                    .parse::<Direction>()
                    .map_err(|_| ConfigError::UnknownDirection {
                        kind: self.kind(),
                        value: value.clone(),
                    })
            })
            .collect()
    }

    fn single_orientation(&self) -> Result<Direction, ConfigError> {
        match self.orientations()?.as_slice() {
            [direction] => Ok(*direction),
            other => Err(self.orientation_count("exactly 1", other.len())),
        }
    }

    fn required(&self, field: &'static str, value: Option<i32>) -> Result<i32, ConfigError> {
        value.ok_or_else(|| self.missing(field))
    }

    fn positive(&self, field: &'static str, value: i32) -> Result<u32, ConfigError> {
        match u32::try_from(value) {
            Ok(converted) if converted > 0 => Ok(converted),
            _ => Err(self.invalid(field, value)),
        }
    }

    fn non_negative(&self, field: &'static str, value: i32) -> Result<u32, ConfigError> {
        u32::try_from(value).map_err(|_| self.invalid(field, value))
    }

    fn missing(&self, field: &'static str) -> ConfigError {
        ConfigError::MissingField {
            kind: self.kind(),
            field,
        }
    }

    fn invalid(&self, field: &'static str, value: i32) -> ConfigError {
        ConfigError::InvalidField {
            kind: self.kind(),
            field,
            value,
        }
    }

    fn orientation_count(&self, expected: &'static str, found: usize) -> ConfigError {
        ConfigError::OrientationCount {
            kind: self.kind(),
            expected,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Coordinate {
        Coordinate::new(0, 0)
    }

    #[test]
    fn builds_conveyor_from_first_orientation() {
        let definition = TileDefinition::of_kind("ConveyorBelt")
            .with_orientations(["east", "north"])
            .with_speed(2);
        let tile = create_tile(&definition, origin()).expect("valid belt");
        assert_eq!(
            tile.kind(),
            &TileKind::ConveyorBelt {
                direction: Direction::East,
                speed: 2,
            }
        );
        assert!(tile.walls().is_open());
    }

    #[test]
    fn conveyor_without_speed_is_rejected() {
        let definition = TileDefinition::of_kind("ConveyorBelt").with_orientations(["east"]);
        assert_eq!(
            create_tile(&definition, origin()),
            Err(ConfigError::MissingField {
                kind: "ConveyorBelt".to_owned(),
                field: "speed",
            })
        );
    }

    #[test]
    fn conveyor_with_zero_speed_is_rejected() {
        let definition = TileDefinition::of_kind("ConveyorBelt")
            .with_orientations(["east"])
            .with_speed(0);
        assert!(matches!(
            create_tile(&definition, origin()),
            Err(ConfigError::InvalidField { field: "speed", .. })
        ));
    }

    #[test]
    fn push_panel_requires_exactly_one_orientation() {
        let definition = TileDefinition::of_kind("PushPanel")
            .with_orientations(["north", "south"])
            .with_registers([1, 3]);
        assert_eq!(
            create_tile(&definition, origin()),
            Err(ConfigError::OrientationCount {
                kind: "PushPanel".to_owned(),
                expected: "exactly 1",
                found: 2,
            })
        );
    }

    #[test]
    fn push_panel_collects_registers() {
        let definition = TileDefinition::of_kind("PushPanel")
            .with_orientations(["West"])
            .with_registers([2, 4, 2]);
        let tile = create_tile(&definition, origin()).expect("valid panel");
        let TileKind::PushPanel {
            direction,
            registers,
        } = tile.kind()
        else {
            panic!("expected push panel, found {:?}", tile.kind());
        };
        assert_eq!(*direction, Direction::West);
        assert_eq!(registers.iter().copied().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn push_panel_rejects_negative_register() {
        let definition = TileDefinition::of_kind("PushPanel")
            .with_orientations(["west"])
            .with_registers([-1]);
        assert!(matches!(
            create_tile(&definition, origin()),
            Err(ConfigError::InvalidField {
                field: "registers",
                value: -1,
                ..
            })
        ));
    }

    #[test]
    fn wall_sets_every_listed_edge() {
        let definition = TileDefinition::of_kind("Wall").with_orientations(["top", "RIGHT"]);
        let tile = create_tile(&definition, origin()).expect("valid wall");
        assert!(tile.walls().blocks(Direction::North));
        assert!(tile.walls().blocks(Direction::East));
        assert!(!tile.walls().blocks(Direction::South));
    }

    #[test]
    fn wall_without_edges_is_rejected() {
        let definition = TileDefinition::of_kind("Wall");
        assert!(matches!(
            create_tile(&definition, origin()),
            Err(ConfigError::OrientationCount { found: 0, .. })
        ));
    }

    #[test]
    fn gear_parses_rotation_sense() {
        let definition = TileDefinition::of_kind("Gear").with_rotation("counterClockwise");
        let tile = create_tile(&definition, origin()).expect("valid gear");
        assert_eq!(
            tile.kind(),
            &TileKind::Gear {
                rotation: Rotation::Counterclockwise,
            }
        );
    }

    #[test]
    fn gear_with_unknown_rotation_is_rejected() {
        let definition = TileDefinition::of_kind("Gear").with_rotation("wobble");
        assert!(matches!(
            create_tile(&definition, origin()),
            Err(ConfigError::UnknownRotation { .. })
        ));
    }

    #[test]
    fn checkpoint_requires_count() {
        let definition = TileDefinition::of_kind("Checkpoint");
        assert!(matches!(
            create_tile(&definition, origin()),
            Err(ConfigError::MissingField { field: "count", .. })
        ));
    }

    #[test]
    fn energy_defaults_to_a_single_cube() {
        let definition = TileDefinition::of_kind("Energy");
        let tile = create_tile(&definition, origin()).expect("valid energy space");
        assert_eq!(tile.kind(), &TileKind::Energy { cubes: 1 });
    }

    #[test]
    fn restart_point_defaults_to_north() {
        let tile =
            create_tile(&TileDefinition::of_kind("RestartPoint"), origin()).expect("valid restart");
        assert_eq!(
            tile.kind(),
            &TileKind::RestartPoint {
                facing: Direction::North,
            }
        );
    }

    #[test]
    fn unknown_orientation_is_rejected() {
        let definition = TileDefinition::of_kind("Laser").with_orientations(["up"]);
        assert_eq!(
            create_tile(&definition, origin()),
            Err(ConfigError::UnknownDirection {
                kind: "Laser".to_owned(),
                value: "up".to_owned(),
            })
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let definition = TileDefinition::of_kind("Teleporter");
        assert_eq!(
            create_tile(&definition, origin()),
            Err(ConfigError::UnknownTileType("Teleporter".to_owned()))
        );
    }

    #[test]
    fn tile_keeps_board_section_and_cell() {
        let mut definition = TileDefinition::of_kind("Pit");
        definition.is_on_board = "4A".to_owned();
        let tile = create_tile(&definition, Coordinate::new(4, 7)).expect("valid pit");
        assert_eq!(tile.board(), "4A");
        assert_eq!(tile.cell(), Coordinate::new(4, 7));
    }

    #[test]
    fn cell_annotation_preserves_root_cause() {
        let error = ConfigError::UnknownTileType("Lava".to_owned()).at(Coordinate::new(1, 2));
        assert_eq!(error.to_string(), "tile at (1, 2): unknown tile type `Lava`");
        assert_eq!(error.root(), &ConfigError::UnknownTileType("Lava".to_owned()));
    }
}
