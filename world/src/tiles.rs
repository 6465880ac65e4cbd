//! Tile variants stored on the board.

use std::collections::BTreeSet;

use roborally_core::{Coordinate, Direction, Rotation};

/// Wall flags for the four sides of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WallEdges {
    north: bool,
    east: bool,
    south: bool,
    west: bool,
}

impl WallEdges {
    /// Edges with no wall on any side.
    pub const NONE: Self = Self {
        north: false,
        east: false,
        south: false,
        west: false,
    };

    /// Builds edges with a wall on every listed side.
    #[must_use]
    pub fn from_sides(sides: impl IntoIterator<Item = Direction>) -> Self {
        sides.into_iter().fold(Self::NONE, |edges, side| edges.with(side))
    }

    /// Returns a copy with a wall added on `side`.
    #[must_use]
    pub fn with(mut self, side: Direction) -> Self {
        match side {
            Direction::North => self.north = true,
            Direction::East => self.east = true,
            Direction::South => self.south = true,
            Direction::West => self.west = true,
        }
        self
    }

    /// Reports whether a wall covers `side`.
    #[must_use]
    pub const fn blocks(&self, side: Direction) -> bool {
        match side {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Reports whether no side carries a wall.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !(self.north || self.east || self.south || self.west)
    }
}

/// Variant-specific state of a tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TileKind {
    /// Plain floor.
    Empty,
    /// Cell a robot may enter the game on.
    StartPoint,
    /// Cell robots are returned to when they reboot.
    RestartPoint {
        /// Facing given to rebooted robots.
        facing: Direction,
    },
    /// Wall segments; the blocked sides live in the tile's [`WallEdges`].
    Wall,
    /// Hole that destroys any robot resting on it.
    Pit,
    /// Waypoint that must be touched in ascending order.
    Checkpoint {
        /// Position of the checkpoint in the sequence, starting at one.
        number: u32,
    },
    /// Rotating platform.
    Gear {
        /// Sense the gear turns a resting robot.
        rotation: Rotation,
    },
    /// Panel that shoves robots during selected registers.
    PushPanel {
        /// Direction robots are pushed toward.
        direction: Direction,
        /// Registers the panel fires in.
        registers: BTreeSet<u8>,
    },
    /// Moving floor.
    ConveyorBelt {
        /// Direction of travel.
        direction: Direction,
        /// Cells moved per activation.
        speed: u32,
    },
    /// Energy space holding cubes.
    Energy {
        /// Cubes handed to a robot that ends its move here.
        cubes: u32,
    },
    /// Board laser.
    Laser {
        /// Direction the beam travels.
        facing: Direction,
        /// Number of beams fired.
        strength: u32,
    },
    /// Priority antenna.
    Antenna {
        /// Side the antenna points toward.
        facing: Direction,
    },
}

impl TileKind {
    /// Type tag used by the map exchange format.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::StartPoint => "StartPoint",
            Self::RestartPoint { .. } => "RestartPoint",
            Self::Wall => "Wall",
            Self::Pit => "Pit",
            Self::Checkpoint { .. } => "Checkpoint",
            Self::Gear { .. } => "Gear",
            Self::PushPanel { .. } => "PushPanel",
            Self::ConveyorBelt { .. } => "ConveyorBelt",
            Self::Energy { .. } => "Energy",
            Self::Laser { .. } => "Laser",
            Self::Antenna { .. } => "Antenna",
        }
    }
}

/// A single tile placed on the board.
///
/// Several tiles may share a cell. The coordinate is fixed when the tile is
/// constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    cell: Coordinate,
    board: String,
    walls: WallEdges,
    kind: TileKind,
}

impl Tile {
    pub(crate) fn new(cell: Coordinate, board: String, walls: WallEdges, kind: TileKind) -> Self {
        Self {
            cell,
            board,
            walls,
            kind,
        }
    }

    /// Cell the tile occupies.
    #[must_use]
    pub const fn cell(&self) -> Coordinate {
        self.cell
    }

    /// Board section the tile was printed on.
    #[must_use]
    pub fn board(&self) -> &str {
        &self.board
    }

    /// Wall flags carried by this tile.
    #[must_use]
    pub const fn walls(&self) -> WallEdges {
        self.walls
    }

    /// Variant-specific state.
    #[must_use]
    pub const fn kind(&self) -> &TileKind {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_record_each_side_independently() {
        let edges = WallEdges::from_sides([Direction::North, Direction::West]);
        assert!(edges.blocks(Direction::North));
        assert!(edges.blocks(Direction::West));
        assert!(!edges.blocks(Direction::East));
        assert!(!edges.blocks(Direction::South));
        assert!(!edges.is_open());
        assert!(WallEdges::NONE.is_open());
    }

    #[test]
    fn tile_preserves_constructor_fields() {
        let tile = Tile::new(
            Coordinate::new(3, 1),
            "5B".to_owned(),
            WallEdges::NONE,
            TileKind::Checkpoint { number: 2 },
        );
        assert_eq!(tile.cell(), Coordinate::new(3, 1));
        assert_eq!(tile.board(), "5B");
        assert_eq!(tile.kind().tag(), "Checkpoint");
    }
}
