//! Robot and player state owned by the world.

use roborally_core::{Coordinate, DamageCard, Direction, PlayerId, RobotId, RobotSnapshot};

/// Mutable state of a single robot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Robot {
    pub(crate) id: RobotId,
    pub(crate) owner: Option<PlayerId>,
    pub(crate) position: Coordinate,
    pub(crate) facing: Direction,
    pub(crate) start: Coordinate,
    pub(crate) start_facing: Direction,
    pub(crate) register: Option<u8>,
    pub(crate) destroyed: bool,
    pub(crate) checkpoint: u32,
    pub(crate) energy: u32,
}

impl Robot {
    /// Creates an active robot standing on `cell`.
    ///
    /// The cell and facing are remembered as the fallback reboot location for
    /// boards without restart points.
    #[must_use]
    pub const fn new(
        id: RobotId,
        owner: Option<PlayerId>,
        cell: Coordinate,
        facing: Direction,
    ) -> Self {
        Self {
            id,
            owner,
            position: cell,
            facing,
            start: cell,
            start_facing: facing,
            register: None,
            destroyed: false,
            checkpoint: 0,
            energy: 0,
        }
    }

    /// Identifier of the robot.
    #[must_use]
    pub const fn id(&self) -> RobotId {
        self.id
    }

    /// Player controlling the robot, if any.
    #[must_use]
    pub const fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Cell the robot occupies.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Current facing.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Register currently executing, or `None` outside the program phase.
    #[must_use]
    pub const fn register(&self) -> Option<u8> {
        self.register
    }

    /// Selects the register the robot is executing.
    pub fn set_register(&mut self, register: Option<u8>) {
        self.register = register;
    }

    /// Whether the robot has been removed from active play.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Highest checkpoint reached in sequence; zero before the first.
    #[must_use]
    pub const fn checkpoint(&self) -> u32 {
        self.checkpoint
    }

    /// Energy cubes held in reserve.
    #[must_use]
    pub const fn energy(&self) -> u32 {
        self.energy
    }

    /// Captures an immutable copy of the robot's state.
    #[must_use]
    pub fn snapshot(&self) -> RobotSnapshot {
        RobotSnapshot {
            id: self.id,
            owner: self.owner,
            position: self.position,
            facing: self.facing,
            register: self.register,
            destroyed: self.destroyed,
            checkpoint: self.checkpoint,
            energy: self.energy,
        }
    }
}

/// Ordered pile of damage cards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<DamageCard>,
}

impl Deck {
    /// Places `card` on top of the pile.
    pub fn push(&mut self, card: DamageCard) {
        self.cards.push(card);
    }

    /// Cards in the order they were added.
    #[must_use]
    pub fn cards(&self) -> &[DamageCard] {
        &self.cards
    }

    /// Number of cards in the pile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Reports whether the pile holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of copies of `card` in the pile.
    #[must_use]
    pub fn count_of(&self, card: DamageCard) -> usize {
        self.cards.iter().filter(|held| **held == card).count()
    }
}

/// Participant owning draw and discard piles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub(crate) id: PlayerId,
    pub(crate) draw_pile: Deck,
    pub(crate) discard_pile: Deck,
}

impl Player {
    /// Creates a player with empty piles.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            draw_pile: Deck::default(),
            discard_pile: Deck::default(),
        }
    }

    /// Identifier of the player.
    #[must_use]
    pub const fn id(&self) -> PlayerId {
        self.id
    }

    /// Cards waiting to be drawn.
    #[must_use]
    pub const fn draw_pile(&self) -> &Deck {
        &self.draw_pile
    }

    /// Cards accumulated from effects.
    #[must_use]
    pub const fn discard_pile(&self) -> &Deck {
        &self.discard_pile
    }
}
