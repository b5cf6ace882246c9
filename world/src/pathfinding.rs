//! Path field builder used by the world crate.

use std::collections::VecDeque;

use gridfort_core::{Direction, GridCoord};

const UNREACHABLE: u16 = u16::MAX;

const ALTERNATIVE_ORDER: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
];

const STANDARD_ORDER: [Direction; 4] = [
    Direction::West,
    Direction::East,
    Direction::South,
    Direction::North,
];

/// Dense breadth-first distance and next-hop field seeded from destinations.
///
/// Distances default to `u16::MAX` for tiles no search wave reached. Blocked
/// tiles are assigned a distance and next hop when first discovered, so the
/// tile regains a valid route the instant its obstruction is removed, but
/// they never expand the frontier themselves.
#[derive(Clone, Debug, Default)]
pub(crate) struct PathField {
    width: u32,
    height: u32,
    distances: Vec<u16>,
    next_hops: Vec<Option<GridCoord>>,
}

impl PathField {
    /// Rebuilds the field with a multi-source breadth-first search.
    ///
    /// Returns `false` when no destinations exist or any tile (blocked ones
    /// included) remains without a finite distance after full expansion.
    pub(crate) fn rebuild_with<F>(
        &mut self,
        width: u32,
        height: u32,
        destinations: &[GridCoord],
        mut is_blocked: F,
    ) -> bool
    where
        F: FnMut(GridCoord) -> bool,
    {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let tile_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;

        if self.distances.len() != tile_count {
            self.distances = vec![UNREACHABLE; tile_count];
            self.next_hops = vec![None; tile_count];
        } else {
            self.distances.fill(UNREACHABLE);
            self.next_hops.fill(None);
        }

        if tile_count == 0 || destinations.is_empty() {
            return false;
        }

        let mut frontier = VecDeque::new();

        for &destination in destinations {
            let Some(index) = index(width_usize, destination, width, height) else {
                continue;
            };
            if self.distances[index] == 0 {
                continue;
            }
            self.distances[index] = 0;
            frontier.push_back(destination);
        }

        while let Some(tile) = frontier.pop_front() {
            let Some(current_index) = index(width_usize, tile, width, height) else {
                continue;
            };
            let current_distance = self.distances[current_index];
            if current_distance >= UNREACHABLE.saturating_sub(1) {
                continue;
            }
            let next_distance = current_distance + 1;

            // The expansion order alternates by checkerboard parity. It is a
            // tie-break between equally short paths, never a reachability
            // concern.
            let order = if tile.is_alternative() {
                ALTERNATIVE_ORDER
            } else {
                STANDARD_ORDER
            };

            for direction in order {
                let Some(neighbor) = tile.neighbor(direction, width, height) else {
                    continue;
                };
                let Some(neighbor_index) = index(width_usize, neighbor, width, height) else {
                    continue;
                };
                if self.distances[neighbor_index] != UNREACHABLE {
                    continue;
                }
                self.distances[neighbor_index] = next_distance;
                self.next_hops[neighbor_index] = Some(tile);
                if !is_blocked(neighbor) {
                    frontier.push_back(neighbor);
                }
            }
        }

        self.distances.iter().all(|distance| *distance != UNREACHABLE)
    }

    /// Steps to the nearest destination, if the tile lies within the field
    /// and a search wave reached it.
    #[must_use]
    pub(crate) fn distance(&self, tile: GridCoord) -> Option<u16> {
        let width = usize::try_from(self.width).ok()?;
        let offset = index(width, tile, self.width, self.height)?;
        let distance = self.distances.get(offset).copied()?;
        (distance != UNREACHABLE).then_some(distance)
    }

    /// Adjacent tile a path-follower on `tile` should move to next.
    #[must_use]
    pub(crate) fn next_hop(&self, tile: GridCoord) -> Option<GridCoord> {
        let width = usize::try_from(self.width).ok()?;
        let offset = index(width, tile, self.width, self.height)?;
        self.next_hops.get(offset).copied().flatten()
    }

    /// Reports whether the tile currently has a route to a destination.
    #[must_use]
    pub(crate) fn has_path(&self, tile: GridCoord) -> bool {
        self.distance(tile).is_some()
    }
}

fn index(width_usize: usize, tile: GridCoord, width: u32, height: u32) -> Option<usize> {
    if tile.x() >= width || tile.y() >= height {
        return None;
    }
    let x = usize::try_from(tile.x()).ok()?;
    let y = usize::try_from(tile.y()).ok()?;
    y.checked_mul(width_usize)?.checked_add(x)
}
