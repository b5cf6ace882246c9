#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Damage application for towers with an assigned target.
//!
//! Damage is continuous: `damage_per_second × dt` per frame, never
//! discretized into ticks, so kill times are independent of the frame rate.

use std::time::Duration;

use gridfort_core::{Command, TowerTarget, TowerView};

/// Translates this frame's target assignments into damage commands.
///
/// Tower stats are resolved from the sorted view; assignments whose tower
/// vanished between targeting and combat are skipped.
pub fn handle(targets: &[TowerTarget], towers: &TowerView, dt: Duration, out: &mut Vec<Command>) {
    if dt.is_zero() {
        return;
    }
    let seconds = dt.as_secs_f32();
    for target in targets {
        let Some(tower) = towers.get(target.tower) else {
            continue;
        };
        out.push(Command::DamageEnemy {
            enemy: target.enemy,
            amount: tower.damage_per_second * seconds,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfort_core::{EnemyId, GridCoord, TowerSnapshot};

    fn towers() -> TowerView {
        TowerView::from_snapshots(vec![TowerSnapshot {
            tile: GridCoord::new(1, 1),
            range: 2.5,
            damage_per_second: 25.0,
        }])
    }

    #[test]
    fn damage_scales_with_the_frame_delta() {
        let targets = [TowerTarget {
            tower: GridCoord::new(1, 1),
            enemy: EnemyId::new(3),
        }];
        let mut out = Vec::new();

        handle(&targets, &towers(), Duration::from_millis(40), &mut out);

        let [Command::DamageEnemy { enemy, amount }] = out.as_slice() else {
            panic!("expected a single damage command, got {out:?}");
        };
        assert_eq!(*enemy, EnemyId::new(3));
        assert!((amount - 1.0).abs() < 1e-6, "25 dps over 40ms is 1 damage");
    }

    #[test]
    fn unknown_towers_are_skipped() {
        let targets = [TowerTarget {
            tower: GridCoord::new(4, 4),
            enemy: EnemyId::new(3),
        }];
        let mut out = Vec::new();

        handle(&targets, &towers(), Duration::from_millis(40), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn zero_delta_applies_no_damage() {
        let targets = [TowerTarget {
            tower: GridCoord::new(1, 1),
            enemy: EnemyId::new(3),
        }];
        let mut out = Vec::new();

        handle(&targets, &towers(), Duration::ZERO, &mut out);

        assert!(out.is_empty());
    }
}
