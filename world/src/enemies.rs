//! Enemy lifecycle, pooled allocation, and path-following movement.

use gridfort_core::{
    EnemyCatalog, EnemyId, EnemyKind, EnemySnapshot, Event, GridCoord, StatRange, TilePoint,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::pool::{Pool, Pooled};

/// Mutable state of one enemy while it is on loan from its pool.
#[derive(Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    health: f32,
    max_health: f32,
    scale: f32,
    speed: f32,
    path_offset: f32,
    tile_from: GridCoord,
    tile_to: Option<GridCoord>,
    progress: f32,
}

impl Enemy {
    fn dormant() -> Self {
        Self {
            id: EnemyId::new(0),
            kind: EnemyKind::Medium,
            health: 0.0,
            max_health: 0.0,
            scale: 0.0,
            speed: 0.0,
            path_offset: 0.0,
            tile_from: GridCoord::new(0, 0),
            tile_to: None,
            progress: 0.0,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn reset(
        &mut self,
        id: EnemyId,
        kind: EnemyKind,
        health: f32,
        scale: f32,
        speed: f32,
        path_offset: f32,
        tile_from: GridCoord,
        tile_to: Option<GridCoord>,
    ) {
        self.id = id;
        self.kind = kind;
        self.health = health;
        self.max_health = health;
        self.scale = scale;
        self.speed = speed;
        self.path_offset = path_offset;
        self.tile_from = tile_from;
        self.tile_to = tile_to;
        self.progress = 0.0;
    }

    /// Interpolated position between the bounding tile centers, shifted
    /// laterally by the enemy's path offset. Progress past the bounds
    /// extrapolates rather than clamps.
    fn position(&self) -> TilePoint {
        let from = self.tile_from.center();
        let Some(to) = self.tile_to else {
            return from;
        };
        let to = to.center();
        let dx = to.x() - from.x();
        let dy = to.y() - from.y();
        TilePoint::new(
            from.x() + dx * self.progress - dy * self.path_offset,
            from.y() + dy * self.progress + dx * self.path_offset,
        )
    }
}

/// Owner of all live enemies and their per-kind recycling pools.
#[derive(Debug)]
pub(crate) struct EnemyRoster {
    catalog: EnemyCatalog,
    small: Pool<Enemy>,
    medium: Pool<Enemy>,
    large: Pool<Enemy>,
    active: Vec<Pooled<Enemy>>,
    next_id: u32,
    rng: ChaCha8Rng,
}

impl EnemyRoster {
    pub(crate) fn new(catalog: EnemyCatalog, seed: u64) -> Self {
        Self {
            catalog,
            small: Pool::new(),
            medium: Pool::new(),
            large: Pool::new(),
            active: Vec::new(),
            next_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn pool_mut(&mut self, kind: EnemyKind) -> &mut Pool<Enemy> {
        match kind {
            EnemyKind::Small => &mut self.small,
            EnemyKind::Medium => &mut self.medium,
            EnemyKind::Large => &mut self.large,
        }
    }

    /// Draws an enemy of `kind` from its pool, samples its stats, and binds
    /// it to the spawn tile and the tile's current next hop.
    pub(crate) fn spawn(
        &mut self,
        tile: GridCoord,
        kind: EnemyKind,
        next_hop: Option<GridCoord>,
    ) -> EnemyId {
        let stats = *self.catalog.stats_for(kind);
        let health = sample(&mut self.rng, stats.health);
        let scale = sample(&mut self.rng, stats.scale);
        let speed = sample(&mut self.rng, stats.speed);
        let path_offset = sample(&mut self.rng, stats.path_offset);

        let id = EnemyId::new(self.next_id);
        self.next_id += 1;

        let mut enemy = self.pool_mut(kind).acquire_with(Enemy::dormant);
        enemy.reset(id, kind, health, scale, speed, path_offset, tile, next_hop);
        self.active.push(enemy);
        id
    }

    /// Advances every enemy by `dt` seconds, crossing as many tiles as the
    /// accumulated progress covers. Arrivals are reclaimed after their
    /// `EnemyReachedDestination` event.
    pub(crate) fn advance_all<F>(&mut self, dt: f32, mut next_hop: F, out_events: &mut Vec<Event>)
    where
        F: FnMut(GridCoord) -> Option<GridCoord>,
    {
        let mut index = 0;
        while index < self.active.len() {
            let enemy = &mut self.active[index];
            enemy.progress += dt * enemy.speed;

            let mut arrived = enemy.tile_to.is_none();
            while !arrived && enemy.progress >= 1.0 {
                let from = enemy.tile_from;
                let to = enemy.tile_to.take().unwrap_or(from);
                enemy.tile_from = to;
                enemy.tile_to = next_hop(to);
                out_events.push(Event::EnemyAdvanced {
                    enemy: enemy.id,
                    from,
                    to,
                });
                if enemy.tile_to.is_none() {
                    arrived = true;
                } else {
                    enemy.progress -= 1.0;
                }
            }

            if arrived {
                let id = enemy.id;
                out_events.push(Event::EnemyReachedDestination { enemy: id });
                let reclaimed = self.active.swap_remove(index);
                let kind = reclaimed.kind;
                self.pool_mut(kind).reclaim(reclaimed);
            } else {
                index += 1;
            }
        }
    }

    /// Applies combat damage to an enemy, reclaiming it when health reaches
    /// zero. A negative amount is an invariant violation: the operation is
    /// logged and halted instead of corrupting health state.
    pub(crate) fn damage(&mut self, id: EnemyId, amount: f32, out_events: &mut Vec<Event>) {
        if amount < 0.0 {
            tracing::error!(enemy = id.get(), amount, "negative damage requested");
            debug_assert!(amount >= 0.0, "damage amounts must be non-negative");
            return;
        }

        let Some(index) = self.active.iter().position(|enemy| enemy.id == id) else {
            return;
        };
        let enemy = &mut self.active[index];
        enemy.health -= amount;
        if enemy.health <= 0.0 {
            out_events.push(Event::EnemyKilled { enemy: id });
            let reclaimed = self.active.swap_remove(index);
            let kind = reclaimed.kind;
            self.pool_mut(kind).reclaim(reclaimed);
        }
    }

    /// Captures snapshots of every live enemy.
    #[must_use]
    pub(crate) fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.active
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                position: enemy.position(),
                scale: enemy.scale,
                health: enemy.health,
            })
            .collect()
    }

    /// Number of live enemies.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.active.len()
    }

    /// Total instances ever built for `kind`; exposed for reuse checks.
    #[cfg(test)]
    pub(crate) fn allocated(&self, kind: EnemyKind) -> usize {
        match kind {
            EnemyKind::Small => self.small.allocated(),
            EnemyKind::Medium => self.medium.allocated(),
            EnemyKind::Large => self.large.allocated(),
        }
    }
}

fn sample(rng: &mut ChaCha8Rng, range: StatRange) -> f32 {
    rng.gen_range(range.min()..=range.max())
}
