#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Target acquisition and retention for towers.
//!
//! The system is stateful: a tower keeps damaging its current target for as
//! long as that enemy stays alive and inside the tower's effective range,
//! even when closer candidates appear. Only when the target is lost does the
//! tower scan again, picking uniformly at random among the enemies in range.

use std::collections::BTreeMap;

use gridfort_core::{EnemyId, EnemySnapshot, EnemyView, GridCoord, TowerTarget, TowerView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fraction of an enemy's visual scale added to the tower's base range.
const SCALE_RANGE_BONUS: f32 = 0.125;

/// Configuration parameters required to construct the targeting system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that assigns each tower at most one enemy per frame.
#[derive(Debug)]
pub struct TowerTargeting {
    targets: BTreeMap<GridCoord, EnemyId>,
    rng: ChaCha8Rng,
    candidates: Vec<EnemyId>,
}

impl TowerTargeting {
    /// Creates a new targeting system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            targets: BTreeMap::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            candidates: Vec::new(),
        }
    }

    /// Consumes immutable views and emits one target pair per tower that can
    /// retain or acquire an enemy this frame. Towers without a candidate
    /// idle; they emit nothing.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<TowerTarget>) {
        // Forget towers that were removed from the board.
        self.targets
            .retain(|tile, _| towers.get(*tile).is_some());

        for tower in towers.iter() {
            let origin = tower.tile.center();

            let retained = self
                .targets
                .get(&tower.tile)
                .copied()
                .and_then(|id| enemies.get(id))
                .filter(|enemy| in_range(origin, tower.range, enemy))
                .map(|enemy| enemy.id);

            let target = match retained {
                Some(id) => Some(id),
                None => {
                    self.candidates.clear();
                    self.candidates.extend(
                        enemies
                            .iter()
                            .filter(|enemy| in_range(origin, tower.range, enemy))
                            .map(|enemy| enemy.id),
                    );
                    match self.candidates.len() {
                        0 => None,
                        1 => Some(self.candidates[0]),
                        count => Some(self.candidates[self.rng.gen_range(0..count)]),
                    }
                }
            };

            match target {
                Some(enemy) => {
                    let _ = self.targets.insert(tower.tile, enemy);
                    out.push(TowerTarget {
                        tower: tower.tile,
                        enemy,
                    });
                }
                None => {
                    let _ = self.targets.remove(&tower.tile);
                }
            }
        }
    }
}

/// Squared-distance range check; the effective radius grows with the
/// enemy's visual scale so large enemies are hit at their edge.
fn in_range(origin: gridfort_core::TilePoint, base_range: f32, enemy: &EnemySnapshot) -> bool {
    let effective = base_range + enemy.scale * SCALE_RANGE_BONUS;
    enemy.position.distance_squared(origin) <= effective * effective
}
