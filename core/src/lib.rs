#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Robo Rally rules engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing every
//! robot-state transition that resulted. Map data enters the engine as plain
//! [`TileDefinition`] records; decoding them from any wire format happens
//! outside this crate.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Registers a player that owns damage card piles.
    AddPlayer {
        /// Identifier assigned to the player.
        player: PlayerId,
    },
    /// Places a robot on the board.
    SpawnRobot {
        /// Identifier assigned to the robot.
        robot: RobotId,
        /// Player controlling the robot, if any.
        owner: Option<PlayerId>,
        /// Cell the robot starts on.
        cell: Coordinate,
        /// Initial facing of the robot.
        facing: Direction,
    },
    /// Selects the program register the robot is currently executing.
    SetRegister {
        /// Robot whose register changes.
        robot: RobotId,
        /// Zero-based register index, or `None` outside the program phase.
        register: Option<u8>,
    },
    /// Advances a robot along its facing.
    MoveRobot {
        /// Robot to move.
        robot: RobotId,
        /// Number of cells to attempt.
        steps: u32,
    },
    /// Moves a robot one cell backwards without changing its facing.
    BackUp {
        /// Robot to move.
        robot: RobotId,
    },
    /// Turns a robot in place.
    TurnRobot {
        /// Robot to turn.
        robot: RobotId,
        /// Turn to perform.
        turn: Turn,
    },
    /// Resolves the effect of a damage card for the provided robot.
    ApplyDamageCard {
        /// Robot the card was played for.
        robot: RobotId,
        /// Card whose effect should be applied.
        card: DamageCard,
    },
    /// Returns a robot to the board at its restart point.
    RebootRobot {
        /// Robot to reboot.
        robot: RobotId,
    },
    /// Places a damage card on top of a player's draw pile.
    DealToDrawPile {
        /// Player receiving the card.
        player: PlayerId,
        /// Card to deal.
        card: DamageCard,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a player was registered.
    PlayerAdded {
        /// Identifier of the new player.
        player: PlayerId,
    },
    /// Confirms that a robot was placed on the board.
    RobotSpawned {
        /// Identifier of the robot.
        robot: RobotId,
        /// Cell the robot occupies.
        cell: Coordinate,
        /// Facing the robot was given.
        facing: Direction,
    },
    /// Reports the program register a robot now executes.
    RegisterChanged {
        /// Robot whose register changed.
        robot: RobotId,
        /// Newly active register.
        register: Option<u8>,
    },
    /// Confirms a single step taken under the robot's own power.
    RobotMoved {
        /// Robot that moved.
        robot: RobotId,
        /// Cell occupied before the step.
        from: Coordinate,
        /// Cell occupied after the step.
        to: Coordinate,
    },
    /// Reports that a step was refused.
    MovementBlocked {
        /// Robot whose step was refused.
        robot: RobotId,
        /// Cell the robot remained on.
        cell: Coordinate,
        /// Reason the step was refused.
        reason: BlockReason,
    },
    /// Summarises a complete move command.
    MoveResolved {
        /// Robot the command targeted.
        robot: RobotId,
        /// How much of the requested movement took place.
        outcome: MoveOutcome,
    },
    /// Reports a changed facing.
    RobotTurned {
        /// Robot that turned.
        robot: RobotId,
        /// Facing after the turn.
        facing: Direction,
    },
    /// Reports displacement by a conveyor belt.
    ConveyorCarried {
        /// Robot that was carried.
        robot: RobotId,
        /// Cell where the belt picked the robot up.
        from: Coordinate,
        /// Cell where the robot came to rest.
        to: Coordinate,
    },
    /// Reports displacement by a push panel.
    RobotPushed {
        /// Robot that was pushed.
        robot: RobotId,
        /// Cell before the push.
        from: Coordinate,
        /// Cell after the push.
        to: Coordinate,
    },
    /// Reports that a robot touched the next checkpoint in sequence.
    CheckpointReached {
        /// Robot that reached the checkpoint.
        robot: RobotId,
        /// Number printed on the checkpoint.
        checkpoint: u32,
    },
    /// Reports that a robot has touched every checkpoint on the board.
    AllCheckpointsReached {
        /// Robot that completed the course.
        robot: RobotId,
    },
    /// Reports energy picked up from an energy space.
    EnergyCollected {
        /// Robot that collected energy.
        robot: RobotId,
        /// Cubes collected.
        amount: u32,
        /// Reserve after collection.
        total: u32,
    },
    /// Reports that a robot was destroyed and left active play.
    RobotDestroyed {
        /// Robot that was destroyed.
        robot: RobotId,
        /// Cell where the robot was destroyed.
        cell: Coordinate,
    },
    /// Reports that a robot returned to the board.
    RobotRebooted {
        /// Robot that rebooted.
        robot: RobotId,
        /// Cell the robot was placed on.
        cell: Coordinate,
        /// Facing after the reboot.
        facing: Direction,
    },
    /// Reports that a damage card effect was resolved for a robot.
    DamageCardApplied {
        /// Robot the card was played for.
        robot: RobotId,
        /// Card that was resolved.
        card: DamageCard,
    },
    /// Reports that a damage card landed in a player's pile.
    DamageCardDealt {
        /// Player receiving the card.
        player: PlayerId,
        /// Card that was dealt.
        card: DamageCard,
        /// Pile the card was placed in.
        pile: Pile,
    },
    /// Reports that a command could not be executed.
    CommandRejected {
        /// Reason the command was refused.
        reason: Rejection,
    },
}

/// Reasons a command may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// No robot with the identifier exists.
    UnknownRobot(RobotId),
    /// No player with the identifier exists.
    UnknownPlayer(PlayerId),
    /// A robot with the identifier already exists.
    DuplicateRobot(RobotId),
    /// The requested cell lies outside the board.
    OutOfBounds(Coordinate),
}

/// Piles a player keeps damage cards in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pile {
    /// Cards waiting to be drawn.
    Draw,
    /// Cards accumulated from effects.
    Discard,
}

/// Unique identifier assigned to a robot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RobotId(u32);

impl RobotId {
    /// Creates a new robot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single board cell.
///
/// `x` grows toward the east and `y` grows toward the south, so row zero is
/// the northern edge of the board. Coordinates are signed so that a step off
/// the board is representable and can be rejected by a bounds check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new board coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring coordinate one cell toward `direction`.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dy) = direction.unit_offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Computes the Euclidean distance between two coordinates.
    #[must_use]
    pub fn distance(self, other: Coordinate) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass facings available to robots and directional tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction obtained by a quarter turn to the right.
    #[must_use]
    pub const fn rotate_clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Direction obtained by a quarter turn to the left.
    #[must_use]
    pub const fn rotate_counterclockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Opposite direction.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Column and row delta of a single step toward the direction.
    #[must_use]
    pub const fn unit_offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

impl FromStr for Direction {
    type Err = UnknownName;

    /// Parses compass names case-insensitively. The board-edge names used by
    /// map editors (`top`, `right`, `bottom`, `left`) are accepted as well.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "north" | "top" => Ok(Self::North),
            "east" | "right" => Ok(Self::East),
            "south" | "bottom" => Ok(Self::South),
            "west" | "left" => Ok(Self::West),
            _ => Err(UnknownName(value.to_owned())),
        }
    }
}

/// Sense of rotation applied by gears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// Turns to the right.
    Clockwise,
    /// Turns to the left.
    Counterclockwise,
}

impl Rotation {
    /// Applies the rotation to a facing.
    #[must_use]
    pub fn apply(self, facing: Direction) -> Direction {
        Turn::from(self).apply(facing)
    }
}

impl FromStr for Rotation {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clockwise" | "right" | "cw" => Ok(Self::Clockwise),
            "counterclockwise" | "anticlockwise" | "left" | "ccw" => Ok(Self::Counterclockwise),
            _ => Err(UnknownName(value.to_owned())),
        }
    }
}

/// Turns a robot may perform in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    /// Quarter turn to the right.
    Clockwise,
    /// Quarter turn to the left.
    Counterclockwise,
    /// Half turn.
    UTurn,
}

impl Turn {
    /// Applies the turn to a facing.
    #[must_use]
    pub const fn apply(self, facing: Direction) -> Direction {
        match self {
            Self::Clockwise => facing.rotate_clockwise(),
            Self::Counterclockwise => facing.rotate_counterclockwise(),
            Self::UTurn => facing.reverse(),
        }
    }
}

impl From<Rotation> for Turn {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::Clockwise => Self::Clockwise,
            Rotation::Counterclockwise => Self::Counterclockwise,
        }
    }
}

/// Error returned when a direction or rotation name is not recognised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownName(String);

impl UnknownName {
    /// Text that failed to parse.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognised name `{}`", self.0)
    }
}

impl std::error::Error for UnknownName {}

/// Hazard cards that clog a player's programming deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageCard {
    /// Occupies a register without further effect.
    Spam,
    /// Hands the owner two additional SPAM cards.
    TrojanHorse,
    /// Spreads to every robot in a radius around the source.
    Virus,
    /// Forces the robot to reboot.
    Worm,
}

impl DamageCard {
    /// Every card in the catalog.
    pub const ALL: [DamageCard; 4] = [
        DamageCard::Spam,
        DamageCard::TrojanHorse,
        DamageCard::Virus,
        DamageCard::Worm,
    ];

    /// Name printed on the card.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Spam => "SPAM",
            Self::TrojanHorse => "TROJAN HORSE",
            Self::Virus => "VIRUS",
            Self::Worm => "WORM",
        }
    }

    /// Rules text printed on the card.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Spam => "Blocks a programming register",
            Self::TrojanHorse => "Take 2 SPAM cards",
            Self::Virus => "Every Robot within a 6-space radius must take a VIRUS card",
            Self::Worm => "Reboot your Robot",
        }
    }
}

impl fmt::Display for DamageCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a single step may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockReason {
    /// The destination lies outside the board.
    Boundary,
    /// A wall on the robot's own cell covers the side it is leaving through.
    SourceWall,
    /// A wall on the destination covers the side the robot would enter through.
    TargetWall,
}

/// How much of a requested movement took place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// Every requested step was taken.
    Completed {
        /// Steps taken.
        steps: u32,
    },
    /// Some steps were taken before a block ended the move.
    Partial {
        /// Steps taken before the block.
        steps: u32,
        /// Block that ended the move.
        reason: BlockReason,
    },
    /// The first step was refused.
    Blocked {
        /// Block that refused the step.
        reason: BlockReason,
    },
    /// The robot is destroyed and does not take part in movement.
    Inactive,
}

impl MoveOutcome {
    /// Number of cells travelled under the robot's own power.
    #[must_use]
    pub const fn steps_taken(&self) -> u32 {
        match self {
            Self::Completed { steps } | Self::Partial { steps, .. } => *steps,
            Self::Blocked { .. } | Self::Inactive => 0,
        }
    }
}

/// Immutable representation of a single robot's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    /// Unique identifier assigned to the robot.
    pub id: RobotId,
    /// Player controlling the robot, if any.
    pub owner: Option<PlayerId>,
    /// Cell currently occupied by the robot.
    pub position: Coordinate,
    /// Current facing.
    pub facing: Direction,
    /// Register currently executing.
    pub register: Option<u8>,
    /// Whether the robot has been removed from active play.
    pub destroyed: bool,
    /// Highest checkpoint reached in sequence.
    pub checkpoint: u32,
    /// Energy cubes held in reserve.
    pub energy: u32,
}

/// External description of a single tile as supplied by a map file.
///
/// Fields mirror the map exchange format. Which fields are required depends
/// on `kind`; validation happens when the tile is constructed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDefinition {
    /// Tile type tag, for example `ConveyorBelt`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Board section the tile was printed on.
    #[serde(default)]
    pub is_on_board: String,
    /// Compass names whose meaning depends on the tile type.
    #[serde(default)]
    pub orientations: Vec<String>,
    /// Cells moved per activation, for conveyor belts.
    #[serde(default)]
    pub speed: Option<i32>,
    /// Program registers a push panel is active in.
    #[serde(default)]
    pub registers: Option<Vec<i32>>,
    /// Checkpoint number, energy cubes, or laser strength.
    #[serde(default)]
    pub count: Option<i32>,
    /// Rotation sense, for gears.
    #[serde(default)]
    pub rotation: Option<String>,
}

impl TileDefinition {
    /// Creates a definition carrying only a type tag.
    #[must_use]
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Returns the definition with the provided orientations.
    #[must_use]
    pub fn with_orientations<I, S>(mut self, orientations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.orientations = orientations.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the definition with the provided speed.
    #[must_use]
    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Returns the definition with the provided active registers.
    #[must_use]
    pub fn with_registers(mut self, registers: impl Into<Vec<i32>>) -> Self {
        self.registers = Some(registers.into());
        self
    }

    /// Returns the definition with the provided count.
    #[must_use]
    pub fn with_count(mut self, count: i32) -> Self {
        self.count = Some(count);
        self
    }

    /// Returns the definition with the provided rotation sense.
    #[must_use]
    pub fn with_rotation(mut self, rotation: impl Into<String>) -> Self {
        self.rotation = Some(rotation.into());
        self
    }
}

/// Rectangular grid of tile definitions describing a complete board.
///
/// `cells[y][x]` lists the tiles stacked at `(x, y)` in storage order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDefinition {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Tile definitions indexed by row, then column.
    pub cells: Vec<Vec<Vec<TileDefinition>>>,
}

impl MapDefinition {
    /// Creates a map of the given size with no tiles.
    #[must_use]
    pub fn empty(width: u32, height: u32) -> Self {
        let row = vec![Vec::new(); width as usize];
        Self {
            width,
            height,
            cells: vec![row; height as usize],
        }
    }

    /// Returns the map with `definition` stacked on top of the cell at `(x, y)`.
    ///
    /// Coordinates outside the grid are ignored.
    #[must_use]
    pub fn with_tile(mut self, x: usize, y: usize, definition: TileDefinition) -> Self {
        if let Some(cell) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            cell.push(definition);
        }
        self
    }
}
