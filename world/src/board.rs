//! Fixed-size grid of stacked tiles.

use roborally_core::{Coordinate, Direction, MapDefinition};

use crate::{
    construction::{create_tile, ConfigError},
    tiles::{Tile, TileKind},
};

/// Cell robots are returned to when they reboot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestartPoint {
    cell: Coordinate,
    facing: Direction,
}

impl RestartPoint {
    /// Cell that hosts the restart point.
    #[must_use]
    pub const fn cell(&self) -> Coordinate {
        self.cell
    }

    /// Facing given to rebooted robots.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }
}

/// Game board mapping every cell to the ordered tiles stacked on it.
///
/// The board is assembled once from a [`MapDefinition`] and is read-only
/// afterwards. Start points, restart points and the number of checkpoints
/// are recorded during assembly so rules can consult them without scanning
/// the grid.
#[derive(Clone, Debug)]
pub struct Board {
    width: u32,
    height: u32,
    cells: Vec<Vec<Tile>>,
    start_points: Vec<Coordinate>,
    restart_points: Vec<RestartPoint>,
    checkpoint_count: u32,
}

impl Board {
    /// Assembles a board from a grid of tile definitions.
    ///
    /// The first invalid definition aborts assembly; no partially built board
    /// is ever returned.
    pub fn assemble(map: &MapDefinition) -> Result<Self, ConfigError> {
        if map.cells.len() != map.height as usize {
            return Err(ConfigError::RowCountMismatch {
                expected: map.height,
                found: map.cells.len(),
            });
        }

        let mut board = Self::empty(map.width, map.height);
        for (y, row) in map.cells.iter().enumerate() {
            if row.len() != map.width as usize {
                return Err(ConfigError::ColumnCountMismatch {
                    row: y,
                    expected: map.width,
                    found: row.len(),
                });
            }

            for (x, definitions) in row.iter().enumerate() {
                let cell = Coordinate::new(to_i32(x), to_i32(y));
                for definition in definitions {
                    let tile = create_tile(definition, cell).map_err(|error| error.at(cell))?;
                    board.insert(tile);
                }
            }
        }

        board.index_landmarks();
        Ok(board)
    }

    fn empty(width: u32, height: u32) -> Self {
        let capacity = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![Vec::new(); capacity],
            start_points: Vec::new(),
            restart_points: Vec::new(),
            checkpoint_count: 0,
        }
    }

    fn insert(&mut self, tile: Tile) {
        if let Some(index) = self.index(tile.cell()) {
            self.cells[index].push(tile);
        }
    }

    fn index_landmarks(&mut self) {
        let mut start_points = Vec::new();
        let mut restart_points = Vec::new();
        let mut checkpoint_count = 0;

        // Cells are stored row-major, so landmarks come out in reading order.
        for tile in self.cells.iter().flatten() {
            match tile.kind() {
                TileKind::StartPoint => start_points.push(tile.cell()),
                TileKind::RestartPoint { facing } => restart_points.push(RestartPoint {
                    cell: tile.cell(),
                    facing: *facing,
                }),
                TileKind::Checkpoint { number } => checkpoint_count = checkpoint_count.max(*number),
                _ => {}
            }
        }

        self.start_points = start_points;
        self.restart_points = restart_points;
        self.checkpoint_count = checkpoint_count;
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether `cell` lies on the board.
    #[must_use]
    pub fn is_in_bounds(&self, cell: Coordinate) -> bool {
        self.index(cell).is_some()
    }

    /// Tiles stacked at `cell` in storage order.
    ///
    /// Cells outside the board and empty cells both yield an empty slice.
    #[must_use]
    pub fn tiles_at(&self, cell: Coordinate) -> &[Tile] {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reports whether any tile at `cell` carries a wall on `side`.
    #[must_use]
    pub fn blocks_exit(&self, cell: Coordinate, side: Direction) -> bool {
        self.tiles_at(cell)
            .iter()
            .any(|tile| tile.walls().blocks(side))
    }

    /// Start points in reading order.
    #[must_use]
    pub fn start_points(&self) -> &[Coordinate] {
        &self.start_points
    }

    /// Restart points in reading order.
    #[must_use]
    pub fn restart_points(&self) -> &[RestartPoint] {
        &self.restart_points
    }

    /// Highest checkpoint number on the board.
    #[must_use]
    pub const fn checkpoint_count(&self) -> u32 {
        self.checkpoint_count
    }

    fn index(&self, cell: Coordinate) -> Option<usize> {
        let column = u32::try_from(cell.x()).ok()?;
        let row = u32::try_from(cell.y()).ok()?;
        if column < self.width && row < self.height {
            let width = usize::try_from(self.width).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use roborally_core::TileDefinition;

    use super::*;

    fn sample_map() -> MapDefinition {
        MapDefinition::empty(3, 2)
            .with_tile(0, 0, TileDefinition::of_kind("StartPoint"))
            .with_tile(2, 0, TileDefinition::of_kind("Wall").with_orientations(["east"]))
            .with_tile(2, 0, TileDefinition::of_kind("Checkpoint").with_count(2))
            .with_tile(1, 1, TileDefinition::of_kind("RestartPoint").with_orientations(["west"]))
            .with_tile(0, 1, TileDefinition::of_kind("Checkpoint").with_count(1))
    }

    #[test]
    fn tiles_keep_storage_order() {
        let board = Board::assemble(&sample_map()).expect("valid map");
        let tags: Vec<_> = board
            .tiles_at(Coordinate::new(2, 0))
            .iter()
            .map(|tile| tile.kind().tag())
            .collect();
        assert_eq!(tags, vec!["Wall", "Checkpoint"]);
    }

    #[test]
    fn out_of_bounds_lookup_is_empty() {
        let board = Board::assemble(&sample_map()).expect("valid map");
        assert!(board.tiles_at(Coordinate::new(-1, 0)).is_empty());
        assert!(board.tiles_at(Coordinate::new(3, 0)).is_empty());
        assert!(board.tiles_at(Coordinate::new(0, 2)).is_empty());
        assert!(board.tiles_at(Coordinate::new(1, 0)).is_empty());
        assert!(!board.is_in_bounds(Coordinate::new(0, -1)));
        assert!(board.is_in_bounds(Coordinate::new(2, 1)));
    }

    #[test]
    fn walls_union_across_stack() {
        let board = Board::assemble(&sample_map()).expect("valid map");
        assert!(board.blocks_exit(Coordinate::new(2, 0), Direction::East));
        assert!(!board.blocks_exit(Coordinate::new(2, 0), Direction::West));
        assert!(!board.blocks_exit(Coordinate::new(7, 7), Direction::East));
    }

    #[test]
    fn landmarks_are_indexed() {
        let board = Board::assemble(&sample_map()).expect("valid map");
        assert_eq!(board.start_points(), &[Coordinate::new(0, 0)]);
        assert_eq!(
            board.restart_points(),
            &[RestartPoint {
                cell: Coordinate::new(1, 1),
                facing: Direction::West,
            }]
        );
        assert_eq!(board.checkpoint_count(), 2);
    }

    #[test]
    fn two_orientation_push_panel_aborts_assembly() {
        let map = MapDefinition::empty(2, 2).with_tile(
            1,
            1,
            TileDefinition::of_kind("PushPanel")
                .with_orientations(["north", "east"])
                .with_registers([1]),
        );
        let error = Board::assemble(&map).expect_err("invalid push panel");
        assert!(matches!(
            error,
            ConfigError::AtCell { cell, .. } if cell == Coordinate::new(1, 1)
        ));
        assert!(matches!(
            error.root(),
            ConfigError::OrientationCount { found: 2, .. }
        ));
    }

    #[test]
    fn ragged_grid_is_rejected() {
        let mut map = MapDefinition::empty(2, 2);
        let _ = map.cells[1].pop();
        assert_eq!(
            Board::assemble(&map).expect_err("ragged grid"),
            ConfigError::ColumnCountMismatch {
                row: 1,
                expected: 2,
                found: 1,
            }
        );
    }

    #[test]
    fn missing_rows_are_rejected() {
        let mut map = MapDefinition::empty(2, 2);
        map.height = 3;
        assert_eq!(
            Board::assemble(&map).expect_err("short grid"),
            ConfigError::RowCountMismatch {
                expected: 3,
                found: 2,
            }
        );
    }
}
