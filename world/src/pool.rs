//! Recycling allocator for transient entities.

use std::collections::{BTreeMap, VecDeque};

use galaxy_shooter_core::{EntityHandle, PoolKind};
use thiserror::Error;

/// Failures reported by the pool allocator.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// The pool was prewarmed twice.
    #[error("pool {0:?} is already registered")]
    AlreadyRegistered(PoolKind),
    /// The pool was never prewarmed.
    #[error("no pool registered for {0:?}")]
    UnknownPoolKind(PoolKind),
}

/// Result of a successful acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Acquired {
    /// Handle of the activated instance.
    pub handle: EntityHandle,
    /// `true` when an existing instance was recycled, `false` when the pool grew.
    pub reused: bool,
}

/// Occupancy counters of a single pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances ever created for the pool.
    pub capacity: usize,
    /// Instances waiting in the free queue.
    pub free: usize,
    /// Instances currently active.
    pub live: usize,
    /// Instances created when the pool was registered.
    pub prewarmed: usize,
}

/// Fixed-registry recycling allocator.
///
/// Instances are created at prewarm or when a pool runs dry and are never
/// dropped afterwards; releasing an instance parks it on its pool's free
/// queue until the next acquisition.
#[derive(Debug)]
pub struct PoolAllocator<T> {
    entries: BTreeMap<PoolKind, PoolEntry<T>>,
}

#[derive(Debug)]
struct PoolEntry<T> {
    free: VecDeque<u32>,
    slots: Vec<Slot<T>>,
    live: usize,
    prewarmed: usize,
}

#[derive(Debug)]
struct Slot<T> {
    active: bool,
    value: T,
}

impl<T> Default for PoolAllocator<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Default> PoolAllocator<T> {
    /// Creates an allocator without registered pools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the pool and fills it with `count` deactivated instances.
    pub fn prewarm(&mut self, kind: PoolKind, count: usize) -> Result<(), PoolError> {
        if self.entries.contains_key(&kind) {
            return Err(PoolError::AlreadyRegistered(kind));
        }

        let mut entry = PoolEntry {
            free: VecDeque::with_capacity(count),
            slots: Vec::with_capacity(count),
            live: 0,
            prewarmed: count,
        };
        for index in 0..count {
            entry.slots.push(Slot {
                active: false,
                value: T::default(),
            });
            entry.free.push_back(slot_index(index));
        }
        let _ = self.entries.insert(kind, entry);
        Ok(())
    }

    /// Activates a free instance, growing the pool when none is available.
    pub fn acquire(&mut self, kind: PoolKind) -> Result<Acquired, PoolError> {
        let entry = self
            .entries
            .get_mut(&kind)
            .ok_or(PoolError::UnknownPoolKind(kind))?;

        let (index, reused) = match entry.free.pop_front() {
            Some(index) => (index, true),
            None => {
                let index = slot_index(entry.slots.len());
                entry.slots.push(Slot {
                    active: false,
                    value: T::default(),
                });
                log::debug!(
                    "pool {kind:?} grew to {} instances",
                    entry.slots.len()
                );
                (index, false)
            }
        };

        if let Some(slot) = entry.slots.get_mut(index as usize) {
            slot.active = true;
        }
        entry.live += 1;

        Ok(Acquired {
            handle: EntityHandle::new(kind, index),
            reused,
        })
    }
}

impl<T> PoolAllocator<T> {
    /// Deactivates the instance and queues it for reuse.
    ///
    /// Returns `false` without side effects when the handle is not active.
    pub fn release(&mut self, handle: EntityHandle) -> bool {
        let Some(entry) = self.entries.get_mut(&handle.kind()) else {
            return false;
        };
        let Some(slot) = entry.slots.get_mut(handle.index() as usize) else {
            return false;
        };
        if !slot.active {
            return false;
        }

        slot.active = false;
        entry.live = entry.live.saturating_sub(1);
        entry.free.push_back(handle.index());
        true
    }

    /// Reports whether the pool has been prewarmed.
    #[must_use]
    pub fn is_registered(&self, kind: PoolKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Reports whether the handle currently refers to an active instance.
    #[must_use]
    pub fn is_active(&self, handle: EntityHandle) -> bool {
        self.slot(handle).is_some_and(|slot| slot.active)
    }

    /// Active instance referenced by the handle.
    #[must_use]
    pub fn get(&self, handle: EntityHandle) -> Option<&T> {
        self.slot(handle)
            .filter(|slot| slot.active)
            .map(|slot| &slot.value)
    }

    /// Mutable access to the active instance referenced by the handle.
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut T> {
        self.entries
            .get_mut(&handle.kind())
            .and_then(|entry| entry.slots.get_mut(handle.index() as usize))
            .filter(|slot| slot.active)
            .map(|slot| &mut slot.value)
    }

    /// Iterates active instances in registry order.
    pub fn iter_active(&self) -> impl Iterator<Item = (EntityHandle, &T)> {
        self.entries.iter().flat_map(|(kind, entry)| {
            let kind = *kind;
            entry
                .slots
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.active)
                .map(move |(index, slot)| (EntityHandle::new(kind, slot_index(index)), &slot.value))
        })
    }

    /// Iterates active instances mutably in registry order.
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (EntityHandle, &mut T)> {
        self.entries.iter_mut().flat_map(|(kind, entry)| {
            let kind = *kind;
            entry
                .slots
                .iter_mut()
                .enumerate()
                .filter(|(_, slot)| slot.active)
                .map(move |(index, slot)| {
                    (EntityHandle::new(kind, slot_index(index)), &mut slot.value)
                })
        })
    }

    /// Occupancy counters of the pool, or `None` when it is not registered.
    #[must_use]
    pub fn stats(&self, kind: PoolKind) -> Option<PoolStats> {
        self.entries.get(&kind).map(|entry| PoolStats {
            capacity: entry.slots.len(),
            free: entry.free.len(),
            live: entry.live,
            prewarmed: entry.prewarmed,
        })
    }

    fn slot(&self, handle: EntityHandle) -> Option<&Slot<T>> {
        self.entries
            .get(&handle.kind())
            .and_then(|entry| entry.slots.get(handle.index() as usize))
    }
}

fn slot_index(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
