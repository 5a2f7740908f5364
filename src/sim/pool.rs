//! Reusable-instance pool
//!
//! A slab of instances addressed by stable ids, split between a FIFO free
//! queue and an active list. Instances are never destroyed; the pool only
//! grows. The pool does not clear recycled state - callers reconfigure an
//! instance before reuse.

use std::collections::VecDeque;

/// Stable slot index into the pool slab. Ids are never invalidated because
/// the slab never shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolId(u32);

impl PoolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Generic object pool with warm-up and on-demand growth.
pub struct ObjectPool<T> {
    slots: Vec<T>,
    /// Per-slot flag: currently sitting in the free queue
    in_free: Vec<bool>,
    free: VecDeque<PoolId>,
    active: Vec<PoolId>,
    factory: Box<dyn Fn() -> T>,
}

impl<T> ObjectPool<T> {
    pub fn new(factory: impl Fn() -> T + 'static) -> Self {
        Self {
            slots: Vec::new(),
            in_free: Vec::new(),
            free: VecDeque::with_capacity(32),
            active: Vec::with_capacity(32),
            factory: Box::new(factory),
        }
    }

    /// Pre-construct `n` instances to avoid first-frame allocation spikes.
    pub fn warm_up(&mut self, n: usize) {
        for _ in 0..n {
            let id = self.construct();
            self.in_free[id.index()] = true;
            self.free.push_back(id);
        }
    }

    fn construct(&mut self) -> PoolId {
        let id = PoolId(self.slots.len() as u32);
        self.slots.push((self.factory)());
        self.in_free.push(false);
        id
    }

    /// Take an inactive instance, constructing a new one if the free queue
    /// is empty. Never fails, never blocks.
    pub fn acquire(&mut self) -> PoolId {
        let id = match self.free.pop_front() {
            Some(id) => {
                self.in_free[id.index()] = false;
                id
            }
            None => self.construct(),
        };
        self.active.push(id);
        id
    }

    /// Return an instance to the free queue. Double-release is a caller bug;
    /// it is absorbed (logged, no state change) rather than corrupting the
    /// queue.
    pub fn release(&mut self, id: PoolId) -> bool {
        if self.in_free[id.index()] {
            log::warn!("pool: double release of slot {}", id.index());
            return false;
        }
        if let Some(pos) = self.active.iter().position(|a| *a == id) {
            self.active.swap_remove(pos);
        }
        self.in_free[id.index()] = true;
        self.free.push_back(id);
        true
    }

    /// Recycle every active instance back to the free queue.
    pub fn release_all(&mut self) {
        for i in (0..self.active.len()).rev() {
            let id = self.active[i];
            self.active.swap_remove(i);
            self.in_free[id.index()] = true;
            self.free.push_back(id);
        }
    }

    #[inline]
    pub fn get(&self, id: PoolId) -> &T {
        &self.slots[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: PoolId) -> &mut T {
        &mut self.slots[id.index()]
    }

    /// Ids currently checked out, in acquisition order (until removals).
    #[inline]
    pub fn active(&self) -> &[PoolId] {
        &self.active
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Total instances ever constructed.
    #[inline]
    pub fn total(&self) -> usize {
        self.slots.len()
    }
}

impl<T> std::fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("total", &self.total())
            .field("free", &self.free_len())
            .field("active", &self.active_len())
            .finish()
    }
}
