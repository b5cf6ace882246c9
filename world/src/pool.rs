//! Recyclable entity pool with origin-tag reclaim validation.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_TAG: AtomicU32 = AtomicU32::new(0);

/// Identity of the pool an instance was acquired from.
///
/// The tag is bound once at acquisition and never reassigned; an instance
/// cannot migrate between pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PoolTag(u32);

impl PoolTag {
    fn next() -> Self {
        Self(NEXT_TAG.fetch_add(1, Ordering::Relaxed))
    }
}

/// Pool-owned instance on loan to the world.
///
/// The pool owns the instance while idle; the borrower owns it while live.
/// Reclaiming transfers it back, never shares it.
#[derive(Debug)]
pub(crate) struct Pooled<T> {
    value: T,
    origin: PoolTag,
}

impl<T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

/// Recycling allocator that reuses idle instances before building new ones.
#[derive(Debug)]
pub(crate) struct Pool<T> {
    tag: PoolTag,
    idle: Vec<T>,
    live: usize,
    allocated: usize,
}

impl<T> Pool<T> {
    /// Creates an empty pool with a fresh identity tag.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            tag: PoolTag::next(),
            idle: Vec::new(),
            live: 0,
            allocated: 0,
        }
    }

    /// Acquires an instance, reusing an idle one when available and invoking
    /// `build` only when the pool must grow.
    pub(crate) fn acquire_with<F>(&mut self, build: F) -> Pooled<T>
    where
        F: FnOnce() -> T,
    {
        let value = match self.idle.pop() {
            Some(value) => value,
            None => {
                self.allocated += 1;
                build()
            }
        };
        self.live += 1;
        Pooled {
            value,
            origin: self.tag,
        }
    }

    /// Returns an instance to the pool for reuse.
    ///
    /// # Panics
    ///
    /// Panics when the instance was acquired from a different pool. That is
    /// cross-pool corruption, not a recoverable condition.
    pub(crate) fn reclaim(&mut self, instance: Pooled<T>) {
        assert!(
            instance.origin == self.tag,
            "instance reclaimed into a foreign pool ({:?} != {:?})",
            instance.origin,
            self.tag
        );
        self.live -= 1;
        self.idle.push(instance.value);
    }

    /// Number of instances currently on loan.
    #[cfg(test)]
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Total number of instances ever built; the allocation high-water mark.
    #[cfg(test)]
    pub(crate) fn allocated(&self) -> usize {
        self.allocated
    }
}
