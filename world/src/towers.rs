//! Registry of the content that requires per-frame combat updates.

use std::collections::BTreeMap;

use gridfort_core::{GridCoord, TowerConfig, TowerSnapshot};

#[derive(Clone, Copy, Debug)]
struct TowerState {
    range: f32,
    damage_per_second: f32,
}

/// Explicit list of active-update content, keyed by tile.
///
/// Registration happens at the moment of successful placement, never by a
/// later discovery pass.
#[derive(Debug, Default)]
pub(crate) struct TowerRegistry {
    towers: BTreeMap<GridCoord, TowerState>,
}

impl TowerRegistry {
    /// Registers the tower placed on `tile` for per-frame updates.
    pub(crate) fn register(&mut self, tile: GridCoord, config: TowerConfig) {
        let previous = self.towers.insert(
            tile,
            TowerState {
                range: config.range,
                damage_per_second: config.damage_per_second,
            },
        );
        debug_assert!(previous.is_none(), "tile already held an active tower");
    }

    /// Unregisters the tower removed from `tile`.
    pub(crate) fn unregister(&mut self, tile: GridCoord) {
        let removed = self.towers.remove(&tile);
        debug_assert!(removed.is_some(), "tile held no active tower");
    }

    /// Captures snapshots of every registered tower.
    #[must_use]
    pub(crate) fn snapshots(&self) -> Vec<TowerSnapshot> {
        self.towers
            .iter()
            .map(|(tile, state)| TowerSnapshot {
                tile: *tile,
                range: state.range,
                damage_per_second: state.damage_per_second,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_tracks_registration_lifecycle() {
        let mut registry = TowerRegistry::default();
        let tile = GridCoord::new(2, 3);

        registry.register(tile, TowerConfig::default());
        let snapshots = registry.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].tile, tile);

        registry.unregister(tile);
        assert!(registry.snapshots().is_empty());
    }
}
