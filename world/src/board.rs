//! Tile grid, content storage, and transactional placement toggles.

use gridfort_core::{BoardConfig, GridCoord, PlacementError, TileContentKind};

use crate::pathfinding::PathField;

/// Outcome of a single placement toggle, converted into events by `apply`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToggleResult {
    /// New content was committed to the tile.
    Placed(TileContentKind),
    /// Existing content was removed from the tile.
    Removed(TileContentKind),
    /// Existing content was replaced in one step, footprint unchanged.
    Converted {
        /// Content recycled by the conversion.
        removed: TileContentKind,
        /// Content now occupying the tile.
        placed: TileContentKind,
    },
    /// The request was refused and the board is unchanged.
    Rejected(PlacementError),
}

/// Fixed-size tile grid with flat row-major content storage.
///
/// Every connectivity-affecting mutation runs the propose, validate, commit
/// or rollback protocol with a synchronous path recompute inside the call.
/// Adjacency is computed from coordinates, so neighbor symmetry holds by
/// construction.
#[derive(Debug)]
pub(crate) struct Board {
    width: u32,
    height: u32,
    contents: Vec<TileContentKind>,
    spawn_points: Vec<GridCoord>,
    path: PathField,
}

impl Board {
    /// Builds the initial board: empty tiles, `destination_count`
    /// destinations spaced along the middle row, one spawn point at the
    /// origin corner.
    #[must_use]
    pub(crate) fn new(config: &BoardConfig) -> Self {
        let tile_count = config.width as usize * config.height as usize;
        let mut board = Self {
            width: config.width,
            height: config.height,
            contents: vec![TileContentKind::Empty; tile_count],
            spawn_points: Vec::new(),
            path: PathField::default(),
        };

        let middle_row = config.height / 2;
        for slot in 0..config.destination_count {
            let x = (2 * slot + 1) * config.width / (2 * config.destination_count);
            let tile = GridCoord::new(x, middle_row);
            if let Some(index) = board.index(tile) {
                board.contents[index] = TileContentKind::Destination;
            }
        }

        let origin = GridCoord::new(0, 0);
        if let Some(index) = board.index(origin) {
            board.contents[index] = TileContentKind::SpawnPoint;
            board.spawn_points.push(origin);
        }

        let connected = board.recompute();
        debug_assert!(connected, "an unobstructed board is always connected");
        board
    }

    fn index(&self, tile: GridCoord) -> Option<usize> {
        if tile.x() < self.width && tile.y() < self.height {
            let x = usize::try_from(tile.x()).ok()?;
            let y = usize::try_from(tile.y()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            y.checked_mul(width)?.checked_add(x)
        } else {
            None
        }
    }

    /// Number of tile columns.
    #[must_use]
    pub(crate) const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    /// Content currently occupying the tile, or `None` out of bounds.
    #[must_use]
    pub(crate) fn content(&self, tile: GridCoord) -> Option<TileContentKind> {
        self.index(tile).map(|index| self.contents[index])
    }

    /// Spawn point tiles in insertion order.
    #[must_use]
    pub(crate) fn spawn_points(&self) -> &[GridCoord] {
        &self.spawn_points
    }

    /// Steps to the nearest destination, `None` when unreachable or out of
    /// bounds.
    #[must_use]
    pub(crate) fn distance(&self, tile: GridCoord) -> Option<u16> {
        self.path.distance(tile)
    }

    /// Adjacent tile a path-follower on `tile` should move to next.
    #[must_use]
    pub(crate) fn next_hop(&self, tile: GridCoord) -> Option<GridCoord> {
        self.path.next_hop(tile)
    }

    /// Reports whether the tile currently has a route to a destination.
    #[must_use]
    pub(crate) fn has_path(&self, tile: GridCoord) -> bool {
        self.path.has_path(tile)
    }

    /// Rebuilds the path field from the current content. Sole authority for
    /// path validity; runs synchronously inside every placement toggle.
    fn recompute(&mut self) -> bool {
        let mut destinations = Vec::new();
        for (index, content) in self.contents.iter().enumerate() {
            if *content == TileContentKind::Destination {
                let x = (index % self.width as usize) as u32;
                let y = (index / self.width as usize) as u32;
                destinations.push(GridCoord::new(x, y));
            }
        }

        let width = self.width as usize;
        let contents = &self.contents;
        self.path
            .rebuild_with(self.width, self.height, &destinations, |tile| {
                let offset = tile.y() as usize * width + tile.x() as usize;
                contents[offset].blocks_path()
            })
    }

    /// Toggles a wall on the tile.
    pub(crate) fn toggle_wall(&mut self, tile: GridCoord) -> ToggleResult {
        let Some(index) = self.index(tile) else {
            return ToggleResult::Rejected(PlacementError::OutOfBounds);
        };
        match self.contents[index] {
            TileContentKind::Wall => {
                self.contents[index] = TileContentKind::Empty;
                // Removing an obstruction cannot disconnect the graph.
                let connected = self.recompute();
                debug_assert!(connected);
                ToggleResult::Removed(TileContentKind::Wall)
            }
            TileContentKind::Empty => {
                self.contents[index] = TileContentKind::Wall;
                if self.recompute() {
                    ToggleResult::Placed(TileContentKind::Wall)
                } else {
                    self.contents[index] = TileContentKind::Empty;
                    let restored = self.recompute();
                    debug_assert!(restored, "rollback restores the prior field");
                    ToggleResult::Rejected(PlacementError::DisconnectsPaths)
                }
            }
            _ => ToggleResult::Rejected(PlacementError::Occupied),
        }
    }

    /// Toggles a tower on the tile. A wall converts to a tower directly:
    /// the blocking footprint is identical, so connectivity cannot change
    /// and no recompute runs.
    pub(crate) fn toggle_tower(&mut self, tile: GridCoord) -> ToggleResult {
        let Some(index) = self.index(tile) else {
            return ToggleResult::Rejected(PlacementError::OutOfBounds);
        };
        match self.contents[index] {
            TileContentKind::Tower => {
                self.contents[index] = TileContentKind::Empty;
                let connected = self.recompute();
                debug_assert!(connected);
                ToggleResult::Removed(TileContentKind::Tower)
            }
            TileContentKind::Empty => {
                self.contents[index] = TileContentKind::Tower;
                if self.recompute() {
                    ToggleResult::Placed(TileContentKind::Tower)
                } else {
                    self.contents[index] = TileContentKind::Empty;
                    let restored = self.recompute();
                    debug_assert!(restored, "rollback restores the prior field");
                    ToggleResult::Rejected(PlacementError::DisconnectsPaths)
                }
            }
            TileContentKind::Wall => {
                self.contents[index] = TileContentKind::Tower;
                ToggleResult::Converted {
                    removed: TileContentKind::Wall,
                    placed: TileContentKind::Tower,
                }
            }
            _ => ToggleResult::Rejected(PlacementError::Occupied),
        }
    }

    /// Toggles a destination on the tile. Removal must leave every tile with
    /// a route to one of the remaining destinations.
    pub(crate) fn toggle_destination(&mut self, tile: GridCoord) -> ToggleResult {
        let Some(index) = self.index(tile) else {
            return ToggleResult::Rejected(PlacementError::OutOfBounds);
        };
        match self.contents[index] {
            TileContentKind::Destination => {
                self.contents[index] = TileContentKind::Empty;
                if self.recompute() {
                    ToggleResult::Removed(TileContentKind::Destination)
                } else {
                    self.contents[index] = TileContentKind::Destination;
                    let restored = self.recompute();
                    debug_assert!(restored, "rollback restores the prior field");
                    ToggleResult::Rejected(PlacementError::DisconnectsPaths)
                }
            }
            TileContentKind::Empty => {
                self.contents[index] = TileContentKind::Destination;
                // Adding a search source cannot disconnect anything.
                let connected = self.recompute();
                debug_assert!(connected);
                ToggleResult::Placed(TileContentKind::Destination)
            }
            _ => ToggleResult::Rejected(PlacementError::Occupied),
        }
    }

    /// Toggles a spawn point on the tile. Spawn points do not block, so no
    /// recompute runs; at least one spawn point must always remain.
    pub(crate) fn toggle_spawn_point(&mut self, tile: GridCoord) -> ToggleResult {
        let Some(index) = self.index(tile) else {
            return ToggleResult::Rejected(PlacementError::OutOfBounds);
        };
        match self.contents[index] {
            TileContentKind::SpawnPoint => {
                if self.spawn_points.len() <= 1 {
                    return ToggleResult::Rejected(PlacementError::LastSpawnPoint);
                }
                self.contents[index] = TileContentKind::Empty;
                self.spawn_points.retain(|point| *point != tile);
                ToggleResult::Removed(TileContentKind::SpawnPoint)
            }
            TileContentKind::Empty => {
                self.contents[index] = TileContentKind::SpawnPoint;
                self.spawn_points.push(tile);
                ToggleResult::Placed(TileContentKind::SpawnPoint)
            }
            _ => ToggleResult::Rejected(PlacementError::Occupied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(width: u32, height: u32) -> Board {
        Board::new(&BoardConfig {
            width,
            height,
            destination_count: 1,
        })
    }

    fn field_fingerprint(board: &Board) -> Vec<(Option<TileContentKind>, Option<u16>, Option<GridCoord>)> {
        let mut cells = Vec::new();
        for y in 0..board.height() {
            for x in 0..board.width() {
                let tile = GridCoord::new(x, y);
                cells.push((board.content(tile), board.distance(tile), board.next_hop(tile)));
            }
        }
        cells
    }

    #[test]
    fn initial_board_is_fully_connected() {
        let board = board(5, 5);
        assert_eq!(
            board.content(GridCoord::new(2, 2)),
            Some(TileContentKind::Destination)
        );
        assert_eq!(board.spawn_points(), &[GridCoord::new(0, 0)]);
        for y in 0..5 {
            for x in 0..5 {
                assert!(board.has_path(GridCoord::new(x, y)));
            }
        }
    }

    #[test]
    fn wall_toggle_places_and_removes() {
        let mut board = board(5, 5);
        let tile = GridCoord::new(1, 1);

        assert_eq!(
            board.toggle_wall(tile),
            ToggleResult::Placed(TileContentKind::Wall)
        );
        assert_eq!(board.content(tile), Some(TileContentKind::Wall));
        assert!(board.has_path(tile), "blocked tiles keep an assigned route");

        assert_eq!(
            board.toggle_wall(tile),
            ToggleResult::Removed(TileContentKind::Wall)
        );
        assert_eq!(board.content(tile), Some(TileContentKind::Empty));
    }

    #[test]
    fn encircling_the_destination_is_rejected_exactly() {
        let mut board = board(5, 5);
        let ring = [
            GridCoord::new(2, 1),
            GridCoord::new(2, 3),
            GridCoord::new(1, 2),
        ];
        for tile in ring {
            assert_eq!(
                board.toggle_wall(tile),
                ToggleResult::Placed(TileContentKind::Wall)
            );
        }

        let before = field_fingerprint(&board);
        let sealing = GridCoord::new(3, 2);
        assert_eq!(
            board.toggle_wall(sealing),
            ToggleResult::Rejected(PlacementError::DisconnectsPaths)
        );
        assert_eq!(field_fingerprint(&board), before, "rollback must be exact");

        // Rejection must not poison later toggles on the ring itself.
        assert_eq!(
            board.toggle_wall(GridCoord::new(2, 1)),
            ToggleResult::Removed(TileContentKind::Wall)
        );
    }

    #[test]
    fn wall_converts_to_tower_without_a_connectivity_check() {
        let mut board = board(5, 5);
        let tile = GridCoord::new(3, 3);
        assert_eq!(
            board.toggle_wall(tile),
            ToggleResult::Placed(TileContentKind::Wall)
        );

        assert_eq!(
            board.toggle_tower(tile),
            ToggleResult::Converted {
                removed: TileContentKind::Wall,
                placed: TileContentKind::Tower,
            }
        );
        assert_eq!(board.content(tile), Some(TileContentKind::Tower));
    }

    #[test]
    fn removing_the_only_destination_is_rejected() {
        let mut board = board(5, 5);
        let destination = GridCoord::new(2, 2);

        assert_eq!(
            board.toggle_destination(destination),
            ToggleResult::Rejected(PlacementError::DisconnectsPaths)
        );
        assert_eq!(board.content(destination), Some(TileContentKind::Destination));
    }

    #[test]
    fn second_destination_allows_removing_the_first() {
        let mut board = board(5, 5);
        let original = GridCoord::new(2, 2);
        let extra = GridCoord::new(4, 4);

        assert_eq!(
            board.toggle_destination(extra),
            ToggleResult::Placed(TileContentKind::Destination)
        );
        assert_eq!(
            board.toggle_destination(original),
            ToggleResult::Removed(TileContentKind::Destination)
        );
        assert!(board.has_path(GridCoord::new(0, 4)));
    }

    #[test]
    fn last_spawn_point_cannot_be_removed() {
        let mut board = board(5, 5);
        let origin = GridCoord::new(0, 0);

        assert_eq!(
            board.toggle_spawn_point(origin),
            ToggleResult::Rejected(PlacementError::LastSpawnPoint)
        );

        let extra = GridCoord::new(4, 0);
        assert_eq!(
            board.toggle_spawn_point(extra),
            ToggleResult::Placed(TileContentKind::SpawnPoint)
        );
        assert_eq!(
            board.toggle_spawn_point(origin),
            ToggleResult::Removed(TileContentKind::SpawnPoint)
        );
        assert_eq!(board.spawn_points(), &[extra]);
    }

    #[test]
    fn occupied_tiles_reject_other_content() {
        let mut board = board(5, 5);
        let destination = GridCoord::new(2, 2);

        assert_eq!(
            board.toggle_wall(destination),
            ToggleResult::Rejected(PlacementError::Occupied)
        );
        assert_eq!(
            board.toggle_spawn_point(destination),
            ToggleResult::Rejected(PlacementError::Occupied)
        );
    }

    #[test]
    fn out_of_bounds_toggles_are_rejected() {
        let mut board = board(5, 5);
        assert_eq!(
            board.toggle_wall(GridCoord::new(5, 0)),
            ToggleResult::Rejected(PlacementError::OutOfBounds)
        );
    }
}
