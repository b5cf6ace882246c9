#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-stepped simulation loop for Gridfort.
//!
//! [`Game`] owns the world, the spawn scheduler, and the combat systems, and
//! drives one tick per [`Game::update`] call in a fixed order: placement
//! (applied synchronously by the toggle calls between frames), scheduler
//! progress, enemy movement, tower targeting, tower combat, counter
//! bookkeeping, and finally win/loss evaluation. All cross-system
//! communication flows through explicit command batches and the per-frame
//! event drain; there is no ambient global state.

use std::time::Duration;

use gridfort_core::{
    Command, ConfigError, Direction, EnemyView, Event, GameConfig, GridCoord, PlacementError,
    TileContentKind, ToggleOutcome, TowerTarget, TowerView,
};
use gridfort_system_spawning::{Config as SpawningConfig, Spawning};
use gridfort_system_tower_combat as tower_combat;
use gridfort_system_tower_targeting::{Config as TargetingConfig, TowerTargeting};
use gridfort_world::{self as world, query, World};

const SPAWNING_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;
const TARGETING_SEED_SALT: u64 = 0x5851_f42d_4c95_7f2d;

/// Terminal-state tracking for one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// The simulation advances on every unpaused update.
    Playing,
    /// Player health reached zero; progress is halted until a reset.
    GameOver,
    /// The scenario completed with the board empty of enemies.
    Cleared,
}

/// Owns the simulation and exposes the collaborator-facing surface.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    world: World,
    spawning: Spawning,
    targeting: TowerTargeting,
    walls_remaining: u32,
    towers_remaining: u32,
    score: u32,
    player_health: u32,
    status: GameStatus,
    paused: bool,
    show_paths: bool,
    show_grid: bool,
    health_bars_visible: bool,
    events: Vec<Event>,
    events_flushed: bool,
    command_scratch: Vec<Command>,
    target_scratch: Vec<TowerTarget>,
}

impl Game {
    /// Validates the configuration and builds a ready-to-run session.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: World::new(&config),
            spawning: Spawning::new(SpawningConfig::new(
                config.scenario.clone(),
                config.rng_seed ^ SPAWNING_SEED_SALT,
            )),
            targeting: TowerTargeting::new(TargetingConfig::new(
                config.rng_seed ^ TARGETING_SEED_SALT,
            )),
            walls_remaining: config.starting_walls,
            towers_remaining: config.starting_towers,
            score: 0,
            player_health: config.player_health,
            status: GameStatus::Playing,
            paused: false,
            show_paths: false,
            show_grid: true,
            health_bars_visible: true,
            events: Vec::new(),
            events_flushed: false,
            command_scratch: Vec::new(),
            target_scratch: Vec::new(),
            config,
        })
    }

    /// Rebuilds the world and scenario from the stored configuration,
    /// clearing any terminal state. Presentation flags survive the reset.
    pub fn reset(&mut self) {
        self.world = World::new(&self.config);
        self.spawning = Spawning::new(SpawningConfig::new(
            self.config.scenario.clone(),
            self.config.rng_seed ^ SPAWNING_SEED_SALT,
        ));
        self.targeting = TowerTargeting::new(TargetingConfig::new(
            self.config.rng_seed ^ TARGETING_SEED_SALT,
        ));
        self.walls_remaining = self.config.starting_walls;
        self.towers_remaining = self.config.starting_towers;
        self.score = 0;
        self.player_health = self.config.player_health;
        self.status = GameStatus::Playing;
        self.events.clear();
        self.events_flushed = false;
    }

    fn begin_mutation(&mut self) {
        if self.events_flushed {
            self.events.clear();
            self.events_flushed = false;
        }
    }

    /// Requests the wall toggle protocol on the provided tile.
    pub fn toggle_wall(&mut self, tile: GridCoord) -> ToggleOutcome {
        self.begin_mutation();
        if query::tile_content(&self.world, tile) == Some(TileContentKind::Empty)
            && self.walls_remaining == 0
        {
            self.events.push(Event::PlacementRejected {
                tile,
                kind: TileContentKind::Wall,
                reason: PlacementError::AllowanceExhausted,
            });
            return ToggleOutcome::Rejected;
        }
        self.apply_toggle(Command::ToggleWall { tile })
    }

    /// Requests the tower toggle protocol on the provided tile. Both the
    /// empty-tile placement and the wall conversion spend tower allowance.
    pub fn toggle_tower(&mut self, tile: GridCoord) -> ToggleOutcome {
        self.begin_mutation();
        let placing = matches!(
            query::tile_content(&self.world, tile),
            Some(TileContentKind::Empty | TileContentKind::Wall)
        );
        if placing && self.towers_remaining == 0 {
            self.events.push(Event::PlacementRejected {
                tile,
                kind: TileContentKind::Tower,
                reason: PlacementError::AllowanceExhausted,
            });
            return ToggleOutcome::Rejected;
        }
        self.apply_toggle(Command::ToggleTower { tile })
    }

    /// Requests the destination toggle protocol on the provided tile.
    pub fn toggle_destination(&mut self, tile: GridCoord) -> ToggleOutcome {
        self.begin_mutation();
        self.apply_toggle(Command::ToggleDestination { tile })
    }

    /// Requests the spawn-point toggle protocol on the provided tile.
    pub fn toggle_spawn_point(&mut self, tile: GridCoord) -> ToggleOutcome {
        self.begin_mutation();
        self.apply_toggle(Command::ToggleSpawnPoint { tile })
    }

    fn apply_toggle(&mut self, command: Command) -> ToggleOutcome {
        let start = self.events.len();
        world::apply(&mut self.world, command, &mut self.events);

        let mut outcome = ToggleOutcome::Rejected;
        let mut walls = self.walls_remaining;
        let mut towers = self.towers_remaining;
        for event in &self.events[start..] {
            match event {
                Event::ContentPlaced { kind, .. } => {
                    match kind {
                        TileContentKind::Wall => walls = walls.saturating_sub(1),
                        TileContentKind::Tower => towers = towers.saturating_sub(1),
                        _ => {}
                    }
                    outcome = ToggleOutcome::Placed;
                }
                Event::ContentRemoved { kind, .. } => {
                    match kind {
                        TileContentKind::Wall => walls += 1,
                        TileContentKind::Tower => towers += 1,
                        _ => {}
                    }
                    if outcome == ToggleOutcome::Rejected {
                        outcome = ToggleOutcome::Removed;
                    }
                }
                Event::PlacementRejected { .. } => outcome = ToggleOutcome::Rejected,
                _ => {}
            }
        }
        self.walls_remaining = walls;
        self.towers_remaining = towers;
        outcome
    }

    /// Advances the simulation by one frame and drains the frame's events.
    ///
    /// Pause is a zero multiplier on `dt`, not a suspension: the frame still
    /// runs, moving nothing. Terminal states halt all progress until
    /// [`Game::reset`].
    pub fn update(&mut self, dt: Duration) -> &[Event] {
        self.begin_mutation();
        self.events_flushed = true;
        if self.status != GameStatus::Playing {
            return &self.events;
        }

        let dt = if self.paused { Duration::ZERO } else { dt };
        let frame_start = self.events.len();

        // Scheduler progress, then the spawn commands it produced.
        let mut commands = std::mem::take(&mut self.command_scratch);
        commands.clear();
        let _ = self
            .spawning
            .progress(dt, query::spawn_points(&self.world), &mut commands);
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }

        // Enemy movement.
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        // Tower targeting and combat against the post-movement views.
        let tower_view = query::tower_view(&self.world);
        let enemy_view = query::enemy_view(&self.world);
        let mut targets = std::mem::take(&mut self.target_scratch);
        targets.clear();
        self.targeting.handle(&tower_view, &enemy_view, &mut targets);
        tower_combat::handle(&targets, &tower_view, dt, &mut commands);
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
        self.target_scratch = targets;
        self.command_scratch = commands;

        // Bookkeeping from this frame's lifecycle events.
        let mut kills: u32 = 0;
        let mut arrivals: u32 = 0;
        for event in &self.events[frame_start..] {
            match event {
                Event::EnemyKilled { .. } => kills += 1,
                Event::EnemyReachedDestination { .. } => arrivals += 1,
                _ => {}
            }
        }
        self.score += kills;
        self.walls_remaining += kills;
        self.towers_remaining += kills;

        // Starting health of zero means invincible; arrivals cost nothing.
        if self.config.player_health > 0 {
            self.player_health = self.player_health.saturating_sub(arrivals);
            if self.player_health == 0 {
                self.status = GameStatus::GameOver;
                self.events.push(Event::GameOver);
                tracing::debug!(score = self.score, "game over");
                return &self.events;
            }
        }

        if self.spawning.is_complete() && query::active_enemies(&self.world) == 0 {
            self.status = GameStatus::Cleared;
            self.events.push(Event::GameClear);
            tracing::debug!(score = self.score, "scenario cleared");
        }

        &self.events
    }

    /// Sets the pause state consumed by the next update.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Reports whether updates currently advance with a zero delta.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Updates the pass-through health-bar visibility flag, emitting the
    /// change notification when the value actually flips.
    pub fn set_health_bar_visibility(&mut self, visible: bool) {
        if self.health_bars_visible == visible {
            return;
        }
        self.begin_mutation();
        self.health_bars_visible = visible;
        self.events.push(Event::HealthBarVisibilityChanged { visible });
    }

    /// Pass-through flag: whether a renderer should draw health bars.
    #[must_use]
    pub fn health_bars_visible(&self) -> bool {
        self.health_bars_visible
    }

    /// Pass-through flag: whether a renderer should draw path arrows.
    #[must_use]
    pub fn show_paths(&self) -> bool {
        self.show_paths
    }

    /// Sets the pass-through path-arrow flag. No core-side behavior.
    pub fn set_show_paths(&mut self, show: bool) {
        self.show_paths = show;
    }

    /// Pass-through flag: whether a renderer should draw grid lines.
    #[must_use]
    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    /// Sets the pass-through grid-line flag. No core-side behavior.
    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    /// Remaining wall allowance; grows by one per kill.
    #[must_use]
    pub fn walls_remaining(&self) -> u32 {
        self.walls_remaining
    }

    /// Remaining tower allowance; grows by one per kill.
    #[must_use]
    pub fn towers_remaining(&self) -> u32 {
        self.towers_remaining
    }

    /// Enemies killed this session.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Remaining player health; zero-started sessions stay at zero and are
    /// invincible.
    #[must_use]
    pub fn player_health(&self) -> u32 {
        self.player_health
    }

    /// Current terminal-state tracking.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Board dimensions as `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        query::dimensions(&self.world)
    }

    /// Content currently occupying the tile, or `None` out of bounds.
    #[must_use]
    pub fn content_at(&self, tile: GridCoord) -> Option<TileContentKind> {
        query::tile_content(&self.world, tile)
    }

    /// Reports whether the tile currently has a route to a destination.
    #[must_use]
    pub fn has_path(&self, tile: GridCoord) -> bool {
        query::has_path(&self.world, tile)
    }

    /// Direction a renderer should draw for the tile's path arrow.
    #[must_use]
    pub fn next_hop_direction(&self, tile: GridCoord) -> Option<Direction> {
        query::next_hop_direction(&self.world, tile)
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }
}
