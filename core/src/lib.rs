#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridfort simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest board edge accepted by configuration validation.
pub const MIN_BOARD_EDGE: u32 = 3;

/// Largest starting player health accepted by configuration validation.
pub const MAX_PLAYER_HEALTH: u32 = 100;

/// Location of a single board tile expressed as column and row coordinates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    x: u32,
    y: u32,
}

impl GridCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Returns the adjacent coordinate in `direction`, if it lies within a
    /// `width` by `height` board.
    #[must_use]
    pub fn neighbor(self, direction: Direction, width: u32, height: u32) -> Option<GridCoord> {
        let (x, y) = match direction {
            Direction::North => (Some(self.x), self.y.checked_add(1).filter(|y| *y < height)),
            Direction::East => (self.x.checked_add(1).filter(|x| *x < width), Some(self.y)),
            Direction::South => (Some(self.x), self.y.checked_sub(1)),
            Direction::West => (self.x.checked_sub(1), Some(self.y)),
        };
        Some(GridCoord::new(x?, y?))
    }

    /// Reports whether the tile sits on the alternative half of the
    /// checkerboard. Fixed by coordinate parity, consumed only as a
    /// path-search expansion-order tie-break.
    #[must_use]
    pub const fn is_alternative(&self) -> bool {
        (self.x + self.y) & 1 == 1
    }

    /// Continuous position of the tile's center, in tile units.
    #[must_use]
    pub fn center(self) -> TilePoint {
        TilePoint::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }
}

/// Cardinal adjacency directions between tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward increasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward decreasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

/// Continuous position measured in tile units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePoint {
    x: f32,
    y: f32,
}

impl TilePoint {
    /// Creates a new continuous position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component in tile units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component in tile units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Squared distance to `other`, avoiding the square root.
    #[must_use]
    pub fn distance_squared(self, other: TilePoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Unique identifier assigned to an enemy by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
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

/// Enemy archetypes that spawn sequences may reference.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EnemyKind {
    /// Fast, fragile enemy.
    Small,
    /// Baseline enemy.
    Medium,
    /// Slow, durable enemy.
    Large,
}

/// Tagged content occupying a tile, exactly one variant at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileContentKind {
    /// Nothing occupies the tile.
    Empty,
    /// Enemies exit the board here; seeds the path search at distance zero.
    Destination,
    /// Player-built obstruction.
    Wall,
    /// Enemies enter the board here; does not block paths.
    SpawnPoint,
    /// Player-built obstruction with per-frame combat behavior.
    Tower,
}

impl TileContentKind {
    /// Reports whether the content obstructs path traversal.
    ///
    /// Walls and towers share an identical single-tile blocking footprint;
    /// the wall-to-tower conversion shortcut relies on this equivalence.
    #[must_use]
    pub const fn blocks_path(&self) -> bool {
        matches!(self, Self::Wall | Self::Tower)
    }
}

/// Tri-state outcome of a content toggle, consumed by the caller to adjust
/// resource counters or surface rejection feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleOutcome {
    /// New content was committed to the tile.
    Placed,
    /// Existing content was removed from the tile.
    Removed,
    /// The request was refused and the board is unchanged.
    Rejected,
}

/// Reasons a content toggle may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The coordinate lies outside the board.
    OutOfBounds,
    /// The tile holds content the requested toggle cannot replace.
    Occupied,
    /// Committing the content would leave some tile without a path.
    DisconnectsPaths,
    /// The last remaining spawn point cannot be removed.
    LastSpawnPoint,
    /// The player has no remaining allowance for this content kind.
    AllowanceExhausted,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests the wall toggle protocol on the provided tile.
    ToggleWall {
        /// Tile targeted by the toggle.
        tile: GridCoord,
    },
    /// Requests the tower toggle protocol on the provided tile.
    ToggleTower {
        /// Tile targeted by the toggle.
        tile: GridCoord,
    },
    /// Requests the destination toggle protocol on the provided tile.
    ToggleDestination {
        /// Tile targeted by the toggle.
        tile: GridCoord,
    },
    /// Requests the spawn-point toggle protocol on the provided tile.
    ToggleSpawnPoint {
        /// Tile targeted by the toggle.
        tile: GridCoord,
    },
    /// Advances the simulation clock, moving every active enemy.
    Tick {
        /// Duration of simulated time elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that an enemy enter the board at a spawn point.
    SpawnEnemy {
        /// Spawn-point tile the enemy should appear on.
        spawn_point: GridCoord,
        /// Archetype to draw from the matching enemy pool.
        kind: EnemyKind,
    },
    /// Applies continuous combat damage to an enemy.
    DamageEnemy {
        /// Identifier of the enemy receiving damage.
        enemy: EnemyId,
        /// Damage amount for this frame; must be non-negative.
        amount: f32,
    },
}

/// Events broadcast by the world (and the simulation loop) after processing
/// commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that content was committed to a tile.
    ContentPlaced {
        /// Tile that received the content.
        tile: GridCoord,
        /// Content kind now occupying the tile.
        kind: TileContentKind,
    },
    /// Confirms that content was removed from a tile.
    ContentRemoved {
        /// Tile the content was removed from.
        tile: GridCoord,
        /// Content kind that previously occupied the tile.
        kind: TileContentKind,
    },
    /// Reports that a content toggle was refused.
    PlacementRejected {
        /// Tile named in the refused request.
        tile: GridCoord,
        /// Content kind the request attempted to toggle.
        kind: TileContentKind,
        /// Specific reason the toggle failed.
        reason: PlacementError,
    },
    /// Confirms that an enemy entered the board.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype the enemy was drawn from.
        kind: EnemyKind,
        /// Spawn-point tile the enemy appeared on.
        tile: GridCoord,
    },
    /// Confirms that an enemy crossed from one tile to an adjacent one.
    EnemyAdvanced {
        /// Identifier of the enemy that advanced.
        enemy: EnemyId,
        /// Tile the enemy departed.
        from: GridCoord,
        /// Tile the enemy now occupies.
        to: GridCoord,
    },
    /// Announces that an enemy's health reached zero.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
    },
    /// Announces that an enemy reached a destination tile.
    EnemyReachedDestination {
        /// Identifier of the enemy that arrived.
        enemy: EnemyId,
    },
    /// Pass-through presentation signal for health-bar rendering.
    HealthBarVisibilityChanged {
        /// Whether health bars should be drawn.
        visible: bool,
    },
    /// Announces defeat; terminal until an explicit reset.
    GameOver,
    /// Announces victory; terminal until an explicit reset.
    GameClear,
}

/// Target assignment computed by the targeting system for one tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerTarget {
    /// Tile of the tower holding the target.
    pub tower: GridCoord,
    /// Enemy the tower should damage this frame.
    pub enemy: EnemyId,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype the enemy was drawn from.
    pub kind: EnemyKind,
    /// Interpolated position in tile units.
    pub position: TilePoint,
    /// Visual scale factor; widens the effective targeting radius.
    pub scale: f32,
    /// Remaining health.
    pub health: f32,
}

/// Read-only snapshot describing all enemies on the board.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for `enemy`, if it is still active.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of active enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Tile the tower occupies; towers are identified by their tile.
    pub tile: GridCoord,
    /// Base targeting range in tile units.
    pub range: f32,
    /// Continuous damage applied to the current target.
    pub damage_per_second: f32,
}

/// Read-only snapshot describing all towers placed on the board.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tile);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot for the tower on `tile`, if one exists.
    #[must_use]
    pub fn get(&self, tile: GridCoord) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&tile, |snapshot| snapshot.tile)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Reports whether the view captured no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Inclusive numeric range sampled uniformly when an enemy is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatRange {
    min: f32,
    max: f32,
}

impl StatRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Creates a degenerate range that always yields `value`.
    #[must_use]
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Lower inclusive bound.
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Upper inclusive bound.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Reports whether the bounds are finite and correctly ordered.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Stat ranges applied when constructing one enemy archetype.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Visual scale factor range.
    pub scale: StatRange,
    /// Movement speed range, in tiles per second.
    pub speed: StatRange,
    /// Lateral path offset range, in tile units.
    pub path_offset: StatRange,
    /// Starting health range.
    pub health: StatRange,
}

/// Per-archetype stat ranges for every enemy kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyCatalog {
    /// Stats applied to [`EnemyKind::Small`] enemies.
    pub small: EnemyStats,
    /// Stats applied to [`EnemyKind::Medium`] enemies.
    pub medium: EnemyStats,
    /// Stats applied to [`EnemyKind::Large`] enemies.
    pub large: EnemyStats,
}

impl EnemyCatalog {
    /// Retrieves the stat ranges configured for `kind`.
    #[must_use]
    pub const fn stats_for(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Small => &self.small,
            EnemyKind::Medium => &self.medium,
            EnemyKind::Large => &self.large,
        }
    }
}

impl Default for EnemyCatalog {
    fn default() -> Self {
        Self {
            small: EnemyStats {
                scale: StatRange::new(0.5, 0.7),
                speed: StatRange::new(2.0, 2.5),
                path_offset: StatRange::new(-0.25, 0.25),
                health: StatRange::new(10.0, 15.0),
            },
            medium: EnemyStats {
                scale: StatRange::new(0.9, 1.1),
                speed: StatRange::new(1.0, 1.2),
                path_offset: StatRange::new(-0.2, 0.2),
                health: StatRange::new(30.0, 40.0),
            },
            large: EnemyStats {
                scale: StatRange::new(1.4, 1.6),
                speed: StatRange::new(0.5, 0.75),
                path_offset: StatRange::new(-0.1, 0.1),
                health: StatRange::new(80.0, 100.0),
            },
        }
    }
}

/// Static parameters shared by every placed tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerConfig {
    /// Base targeting range in tile units.
    pub range: f32,
    /// Continuous damage applied to the current target.
    pub damage_per_second: f32,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            range: 2.5,
            damage_per_second: 25.0,
        }
    }
}

/// Board dimensions and initial destination layout.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of tile columns.
    pub width: u32,
    /// Number of tile rows.
    pub height: u32,
    /// Destinations placed along the middle row at initialization.
    pub destination_count: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 11,
            height: 11,
            destination_count: 1,
        }
    }
}

/// One burst of a single enemy archetype within a wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnSequenceConfig {
    /// Archetype emitted by the sequence.
    pub kind: EnemyKind,
    /// Total number of enemies the sequence emits.
    pub amount: u32,
    /// Simulated time between successive spawns.
    pub cooldown: Duration,
}

/// Ordered sequences forming one wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Sequences executed in order, leftover time carrying between them.
    pub sequences: Vec<SpawnSequenceConfig>,
}

/// Waves repeated across cycles with escalating speed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Waves executed in order within each cycle.
    pub waves: Vec<WaveConfig>,
    /// Number of cycles to run; zero repeats forever.
    pub cycles: u32,
    /// Time-scale increase applied at each cycle wraparound.
    pub cycle_speed_up: f32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            waves: vec![
                WaveConfig {
                    sequences: vec![
                        SpawnSequenceConfig {
                            kind: EnemyKind::Medium,
                            amount: 8,
                            cooldown: Duration::from_millis(1_500),
                        },
                        SpawnSequenceConfig {
                            kind: EnemyKind::Small,
                            amount: 12,
                            cooldown: Duration::from_millis(500),
                        },
                    ],
                },
                WaveConfig {
                    sequences: vec![
                        SpawnSequenceConfig {
                            kind: EnemyKind::Large,
                            amount: 4,
                            cooldown: Duration::from_secs(3),
                        },
                        SpawnSequenceConfig {
                            kind: EnemyKind::Medium,
                            amount: 10,
                            cooldown: Duration::from_secs(1),
                        },
                    ],
                },
            ],
            cycles: 2,
            cycle_speed_up: 0.5,
        }
    }
}

/// Complete configuration consumed once at game construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board dimensions and initial destinations.
    pub board: BoardConfig,
    /// Starting player health in 0..=100; zero disables defeat entirely.
    pub player_health: u32,
    /// Starting wall allowance.
    pub starting_walls: u32,
    /// Starting tower allowance.
    pub starting_towers: u32,
    /// Parameters shared by every tower.
    pub tower: TowerConfig,
    /// Per-archetype enemy stat ranges.
    pub enemies: EnemyCatalog,
    /// Wave and cycle schedule.
    pub scenario: ScenarioConfig,
    /// Seed from which all simulation randomness derives.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            player_health: 10,
            starting_walls: 15,
            starting_towers: 15,
            tower: TowerConfig::default(),
            enemies: EnemyCatalog::default(),
            scenario: ScenarioConfig::default(),
            rng_seed: 0x6f72_7467_6466_7269,
        }
    }
}

impl GameConfig {
    /// Validates the configuration, reporting the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.width < MIN_BOARD_EDGE || self.board.height < MIN_BOARD_EDGE {
            return Err(ConfigError::BoardTooSmall {
                width: self.board.width,
                height: self.board.height,
            });
        }
        if self.board.destination_count == 0 {
            return Err(ConfigError::NoDestinations);
        }
        if self.board.destination_count > self.board.width {
            return Err(ConfigError::TooManyDestinations {
                count: self.board.destination_count,
                width: self.board.width,
            });
        }
        if self.player_health > MAX_PLAYER_HEALTH {
            return Err(ConfigError::PlayerHealthOutOfRange {
                health: self.player_health,
            });
        }
        if self.scenario.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        for (wave_index, wave) in self.scenario.waves.iter().enumerate() {
            if wave.sequences.is_empty() {
                return Err(ConfigError::EmptyWave { wave: wave_index });
            }
            for (sequence_index, sequence) in wave.sequences.iter().enumerate() {
                if sequence.amount == 0 {
                    return Err(ConfigError::EmptySequence {
                        wave: wave_index,
                        sequence: sequence_index,
                    });
                }
                if sequence.cooldown.is_zero() {
                    return Err(ConfigError::ZeroCooldown {
                        wave: wave_index,
                        sequence: sequence_index,
                    });
                }
            }
        }
        if !(self.scenario.cycle_speed_up.is_finite() && self.scenario.cycle_speed_up >= 0.0) {
            return Err(ConfigError::NegativeCycleSpeedUp {
                cycle_speed_up: self.scenario.cycle_speed_up,
            });
        }
        for kind in [EnemyKind::Small, EnemyKind::Medium, EnemyKind::Large] {
            let stats = self.enemies.stats_for(kind);
            let ranges = [stats.scale, stats.speed, stats.path_offset, stats.health];
            if ranges.iter().any(|range| !range.is_well_formed()) {
                return Err(ConfigError::MalformedStatRange { kind });
            }
        }
        Ok(())
    }
}

/// Configuration violations detected before the simulation starts.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The board is smaller than the supported minimum.
    #[error("board {width}x{height} is smaller than the {MIN_BOARD_EDGE}x{MIN_BOARD_EDGE} minimum")]
    BoardTooSmall {
        /// Configured column count.
        width: u32,
        /// Configured row count.
        height: u32,
    },
    /// The scenario cannot run without at least one destination.
    #[error("at least one destination is required")]
    NoDestinations,
    /// More initial destinations were requested than the middle row holds.
    #[error("{count} destinations do not fit a board {width} tiles wide")]
    TooManyDestinations {
        /// Configured destination count.
        count: u32,
        /// Configured column count.
        width: u32,
    },
    /// Starting player health exceeds the supported maximum.
    #[error("player health {health} exceeds the maximum of {MAX_PLAYER_HEALTH}")]
    PlayerHealthOutOfRange {
        /// Configured starting health.
        health: u32,
    },
    /// A scenario with no waves can never progress.
    #[error("scenario defines no waves")]
    NoWaves,
    /// A wave with no sequences can never progress.
    #[error("wave {wave} defines no sequences")]
    EmptyWave {
        /// Index of the offending wave.
        wave: usize,
    },
    /// A sequence that spawns nothing can never complete meaningfully.
    #[error("wave {wave} sequence {sequence} spawns no enemies")]
    EmptySequence {
        /// Index of the wave containing the sequence.
        wave: usize,
        /// Index of the offending sequence.
        sequence: usize,
    },
    /// A zero cooldown would spin the scheduler forever within one frame.
    #[error("wave {wave} sequence {sequence} has a zero spawn cooldown")]
    ZeroCooldown {
        /// Index of the wave containing the sequence.
        wave: usize,
        /// Index of the offending sequence.
        sequence: usize,
    },
    /// The time scale must stay monotonically non-decreasing across cycles.
    #[error("cycle speed-up {cycle_speed_up} must be finite and non-negative")]
    NegativeCycleSpeedUp {
        /// Configured per-cycle increment.
        cycle_speed_up: f32,
    },
    /// An enemy stat range has reversed or non-finite bounds.
    #[error("stat range for {kind:?} enemies is malformed")]
    MalformedStatRange {
        /// Archetype with the offending range.
        kind: EnemyKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = GridCoord::new(1, 1);
        let destination = GridCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn neighbor_respects_board_bounds() {
        let corner = GridCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::South, 5, 5), None);
        assert_eq!(corner.neighbor(Direction::West, 5, 5), None);
        assert_eq!(
            corner.neighbor(Direction::North, 5, 5),
            Some(GridCoord::new(0, 1))
        );
        assert_eq!(
            corner.neighbor(Direction::East, 5, 5),
            Some(GridCoord::new(1, 0))
        );

        let far = GridCoord::new(4, 4);
        assert_eq!(far.neighbor(Direction::North, 5, 5), None);
        assert_eq!(far.neighbor(Direction::East, 5, 5), None);
    }

    #[test]
    fn alternative_parity_forms_a_checkerboard() {
        assert!(!GridCoord::new(0, 0).is_alternative());
        assert!(GridCoord::new(1, 0).is_alternative());
        assert!(GridCoord::new(0, 1).is_alternative());
        assert!(!GridCoord::new(1, 1).is_alternative());
    }

    #[test]
    fn only_walls_and_towers_block_paths() {
        assert!(TileContentKind::Wall.blocks_path());
        assert!(TileContentKind::Tower.blocks_path());
        assert!(!TileContentKind::Empty.blocks_path());
        assert!(!TileContentKind::Destination.blocks_path());
        assert!(!TileContentKind::SpawnPoint.blocks_path());
    }

    #[test]
    fn views_sort_snapshots_for_determinism() {
        let enemies = EnemyView::from_snapshots(vec![
            EnemySnapshot {
                id: EnemyId::new(7),
                kind: EnemyKind::Small,
                position: TilePoint::new(0.5, 0.5),
                scale: 0.6,
                health: 12.0,
            },
            EnemySnapshot {
                id: EnemyId::new(2),
                kind: EnemyKind::Medium,
                position: TilePoint::new(1.5, 0.5),
                scale: 1.0,
                health: 35.0,
            },
        ]);
        let ids: Vec<_> = enemies.iter().map(|snapshot| snapshot.id).collect();
        assert_eq!(ids, vec![EnemyId::new(2), EnemyId::new(7)]);
        assert!(enemies.get(EnemyId::new(7)).is_some());
        assert!(enemies.get(EnemyId::new(3)).is_none());
    }

    #[test]
    fn default_config_validates() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn undersized_board_is_rejected() {
        let mut config = GameConfig::default();
        config.board.width = 2;
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardTooSmall {
                width: 2,
                height: 11
            })
        );
    }

    #[test]
    fn empty_scenario_is_rejected() {
        let mut config = GameConfig::default();
        config.scenario.waves.clear();
        assert_eq!(config.validate(), Err(ConfigError::NoWaves));
    }

    #[test]
    fn zero_cooldown_is_rejected() {
        let mut config = GameConfig::default();
        config.scenario.waves[0].sequences[0].cooldown = Duration::ZERO;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCooldown {
                wave: 0,
                sequence: 0
            })
        );
    }

    #[test]
    fn reversed_stat_range_is_rejected() {
        let mut config = GameConfig::default();
        config.enemies.medium.speed = StatRange::new(2.0, 1.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::MalformedStatRange {
                kind: EnemyKind::Medium
            })
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: serde::Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn grid_coord_round_trips_through_bincode() {
        assert_round_trip(&GridCoord::new(5, 7));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::DisconnectsPaths);
    }

    #[test]
    fn game_config_round_trips_through_bincode() {
        assert_round_trip(&GameConfig::default());
    }
}
