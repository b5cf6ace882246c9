#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Gridfort.
//!
//! The world owns the board, the path field, the tower registry, and every
//! live enemy. All mutation flows through [`apply`]; all reads flow through
//! [`query`]. Placement toggles validate connectivity transactionally: a
//! toggle that would leave any tile without a route is rolled back exactly
//! and reported as a rejection event, never an error.

mod board;
mod enemies;
mod pathfinding;
mod pool;
mod towers;

use gridfort_core::{Command, Event, GameConfig, TileContentKind, TowerConfig};

use board::{Board, ToggleResult};
use enemies::EnemyRoster;
use towers::TowerRegistry;

/// Represents the authoritative Gridfort world state.
#[derive(Debug)]
pub struct World {
    board: Board,
    enemies: EnemyRoster,
    towers: TowerRegistry,
    tower_config: TowerConfig,
}

impl World {
    /// Creates a new world laid out according to the provided configuration.
    ///
    /// The caller validates the configuration; the world assumes a board of
    /// at least 3x3 with at least one destination.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            board: Board::new(&config.board),
            enemies: EnemyRoster::new(config.enemies, config.rng_seed),
            towers: TowerRegistry::default(),
            tower_config: config.tower,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ToggleWall { tile } => {
            let result = world.board.toggle_wall(tile);
            emit_toggle_events(tile, TileContentKind::Wall, result, out_events);
        }
        Command::ToggleTower { tile } => {
            let result = world.board.toggle_tower(tile);
            match result {
                ToggleResult::Placed(_) | ToggleResult::Converted { .. } => {
                    world.towers.register(tile, world.tower_config);
                }
                ToggleResult::Removed(_) => world.towers.unregister(tile),
                ToggleResult::Rejected(_) => {}
            }
            emit_toggle_events(tile, TileContentKind::Tower, result, out_events);
        }
        Command::ToggleDestination { tile } => {
            let result = world.board.toggle_destination(tile);
            emit_toggle_events(tile, TileContentKind::Destination, result, out_events);
        }
        Command::ToggleSpawnPoint { tile } => {
            let result = world.board.toggle_spawn_point(tile);
            emit_toggle_events(tile, TileContentKind::SpawnPoint, result, out_events);
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            let board = &world.board;
            world
                .enemies
                .advance_all(dt.as_secs_f32(), |tile| board.next_hop(tile), out_events);
        }
        Command::SpawnEnemy { spawn_point, kind } => {
            if world.board.content(spawn_point) != Some(TileContentKind::SpawnPoint) {
                tracing::warn!(
                    x = spawn_point.x(),
                    y = spawn_point.y(),
                    "spawn requested on a tile without a spawn point"
                );
                return;
            }
            let next_hop = world.board.next_hop(spawn_point);
            let enemy = world.enemies.spawn(spawn_point, kind, next_hop);
            out_events.push(Event::EnemySpawned {
                enemy,
                kind,
                tile: spawn_point,
            });
        }
        Command::DamageEnemy { enemy, amount } => {
            world.enemies.damage(enemy, amount, out_events);
        }
    }
}

fn emit_toggle_events(
    tile: gridfort_core::GridCoord,
    requested: TileContentKind,
    result: ToggleResult,
    out_events: &mut Vec<Event>,
) {
    match result {
        ToggleResult::Placed(kind) => out_events.push(Event::ContentPlaced { tile, kind }),
        ToggleResult::Removed(kind) => out_events.push(Event::ContentRemoved { tile, kind }),
        ToggleResult::Converted { removed, placed } => {
            out_events.push(Event::ContentRemoved {
                tile,
                kind: removed,
            });
            out_events.push(Event::ContentPlaced { tile, kind: placed });
        }
        ToggleResult::Rejected(reason) => out_events.push(Event::PlacementRejected {
            tile,
            kind: requested,
            reason,
        }),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gridfort_core::{
        Direction, EnemyView, GridCoord, TileContentKind, TowerView,
    };

    use super::World;

    /// Board dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.board.width(), world.board.height())
    }

    /// Content currently occupying the tile, or `None` out of bounds.
    #[must_use]
    pub fn tile_content(world: &World, tile: GridCoord) -> Option<TileContentKind> {
        world.board.content(tile)
    }

    /// Reports whether the tile currently has a route to a destination.
    #[must_use]
    pub fn has_path(world: &World, tile: GridCoord) -> bool {
        world.board.has_path(tile)
    }

    /// Steps from the tile to its nearest destination, `None` when the tile
    /// is unreachable or out of bounds.
    #[must_use]
    pub fn path_distance(world: &World, tile: GridCoord) -> Option<u16> {
        world.board.distance(tile)
    }

    /// Direction of travel from the tile toward its destination. Pure
    /// pass-through state for a renderer; the world never consumes it.
    #[must_use]
    pub fn next_hop_direction(world: &World, tile: GridCoord) -> Option<Direction> {
        let hop = world.board.next_hop(tile)?;
        direction_between(tile, hop)
    }

    /// Spawn point tiles in insertion order.
    #[must_use]
    pub fn spawn_points(world: &World) -> &[GridCoord] {
        world.board.spawn_points()
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.snapshots())
    }

    /// Captures a read-only view of the registered towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.snapshots())
    }

    /// Number of live enemies.
    #[must_use]
    pub fn active_enemies(world: &World) -> usize {
        world.enemies.len()
    }

    fn direction_between(from: GridCoord, to: GridCoord) -> Option<Direction> {
        if from.manhattan_distance(to) != 1 {
            return None;
        }
        if to.x() > from.x() {
            Some(Direction::East)
        } else if to.x() < from.x() {
            Some(Direction::West)
        } else if to.y() > from.y() {
            Some(Direction::North)
        } else {
            Some(Direction::South)
        }
    }
}
