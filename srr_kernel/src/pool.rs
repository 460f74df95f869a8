//! Fixed-capacity task arena.
//!
//! The original design kept an intrusive free list threaded through the
//! descriptors themselves; here the slots are plain storage and the free
//! list is a deque of indices. Freed slots are reused in the order they
//! were freed, which is part of the observable contract.

use crate::task::{Parentage, TaskDescriptor};
use core_types::{Generation, KernelConfig, Priority, Tid};
use hal::TaskContext;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A generation-stamped reference to a task slot.
///
/// Every cross-slot reference the kernel stores (ready-queue entries,
/// mailbox entries, event waiters) is one of these; a popped reference
/// whose generation no longer matches the slot is stale and gets dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub tid: Tid,
    pub generation: Generation,
}

#[derive(Debug)]
struct Slot {
    task: Option<TaskDescriptor>,
    generation: Generation,
}

/// Arena allocator for task descriptors.
///
/// Invariant: `num_allocated() + free_count() == capacity()` at all times.
#[derive(Debug)]
pub struct TaskPool {
    config: KernelConfig,
    slots: Vec<Slot>,
    free: VecDeque<usize>,
}

impl TaskPool {
    /// Creates an empty pool sized by the configuration.
    pub fn new(config: KernelConfig) -> Self {
        let slots = (0..config.max_tasks)
            .map(|_| Slot {
                task: None,
                generation: Generation::initial(),
            })
            .collect();
        let free = (0..config.max_tasks).collect();
        Self {
            config,
            slots,
            free,
        }
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn num_allocated(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Returns whether the next allocation would fail.
    ///
    /// The syscall layer checks this before calling [`TaskPool::allocate`]
    /// so exhaustion is reported to the requesting task, never panicked on.
    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty()
    }

    /// Constructs a task in the oldest free slot. O(1).
    ///
    /// `make_context` receives the chosen slot index so the caller can seed
    /// the context with that slot's dedicated stack region.
    pub fn allocate(
        &mut self,
        parent: Option<Parentage>,
        priority: Priority,
        make_context: impl FnOnce(usize) -> TaskContext,
    ) -> Option<Tid> {
        let index = self.free.pop_front()?;
        let tid = self.config.tid_of_slot(index);
        let context = make_context(index);
        self.slots[index].task = Some(TaskDescriptor::new(tid, parent, priority, context));
        Some(tid)
    }

    /// Destroys a task in place, bumps the slot generation, and returns the
    /// slot to the back of the free list.
    ///
    /// A no-op returning `false` for out-of-range or already-free tids, so
    /// a corrupted tid cannot damage the pool.
    pub fn free(&mut self, tid: Tid) -> bool {
        let Some(index) = self.config.slot_of_tid(tid) else {
            return false;
        };
        let slot = &mut self.slots[index];
        if slot.task.take().is_none() {
            return false;
        }
        slot.generation = slot.generation.next();
        self.free.push_back(index);
        true
    }

    /// The live task named by `tid`, or `None` if the slot is free or the
    /// tid falls outside the arena.
    pub fn get(&self, tid: Tid) -> Option<&TaskDescriptor> {
        let index = self.config.slot_of_tid(tid)?;
        self.slots[index].task.as_ref()
    }

    pub fn get_mut(&mut self, tid: Tid) -> Option<&mut TaskDescriptor> {
        let index = self.config.slot_of_tid(tid)?;
        self.slots[index].task.as_mut()
    }

    /// The current generation of the slot `tid` names, live or not.
    pub fn slot_generation(&self, tid: Tid) -> Option<Generation> {
        let index = self.config.slot_of_tid(tid)?;
        Some(self.slots[index].generation)
    }

    /// A generation-stamped reference to a currently-live task.
    pub fn task_ref(&self, tid: Tid) -> Option<TaskRef> {
        let index = self.config.slot_of_tid(tid)?;
        let slot = &self.slots[index];
        slot.task.as_ref()?;
        Some(TaskRef {
            tid,
            generation: slot.generation,
        })
    }

    /// Returns whether a stored reference still names the task it was
    /// stamped for: the slot is occupied and its generation matches.
    pub fn is_current(&self, task_ref: TaskRef) -> bool {
        match self.config.slot_of_tid(task_ref.tid) {
            Some(index) => {
                let slot = &self.slots[index];
                slot.task.is_some() && slot.generation == task_ref.generation
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskState;
    use core_types::KernelConfig;
    use hal::StackRegion;

    fn pool() -> TaskPool {
        TaskPool::new(KernelConfig {
            max_tasks: 8,
            ..KernelConfig::default()
        })
    }

    fn alloc(pool: &mut TaskPool, priority: u8) -> Tid {
        let config = pool.config().clone();
        pool.allocate(None, Priority::new(priority), |slot| {
            TaskContext::seed(0, StackRegion::for_slot(&config, slot), config.stack_align)
        })
        .expect("pool has capacity")
    }

    #[test]
    fn test_allocation_starts_at_slot_zero() {
        let mut pool = pool();
        let base = pool.config().tid_base;
        assert_eq!(alloc(&mut pool, 0).raw(), base);
        assert_eq!(alloc(&mut pool, 0).raw(), base + 1);
        assert_eq!(alloc(&mut pool, 0).raw(), base + 2);
    }

    #[test]
    fn test_freed_slots_reused_in_free_order() {
        let mut pool = pool();
        let tids: Vec<Tid> = (0..5).map(|_| alloc(&mut pool, 0)).collect();

        // Free two non-adjacent slots, most-recently-allocated first.
        assert!(pool.free(tids[3]));
        assert!(pool.free(tids[1]));

        // New allocations must land in exactly those slots, freed order.
        assert_eq!(alloc(&mut pool, 0), tids[3]);
        assert_eq!(alloc(&mut pool, 0), tids[1]);
    }

    #[test]
    fn test_capacity_invariant_holds_across_churn() {
        let mut pool = pool();
        assert_eq!(pool.num_allocated() + pool.free_count(), pool.capacity());
        let a = alloc(&mut pool, 0);
        let b = alloc(&mut pool, 1);
        assert_eq!(pool.num_allocated() + pool.free_count(), pool.capacity());
        pool.free(a);
        assert_eq!(pool.num_allocated() + pool.free_count(), pool.capacity());
        pool.free(b);
        assert_eq!(pool.num_allocated(), 0);
    }

    #[test]
    fn test_exhaustion_is_reported_not_panicked() {
        let mut pool = pool();
        for _ in 0..pool.capacity() {
            alloc(&mut pool, 0);
        }
        assert!(pool.is_exhausted());
        let config = pool.config().clone();
        let result = pool.allocate(None, Priority::new(0), |slot| {
            TaskContext::seed(0, StackRegion::for_slot(&config, slot), config.stack_align)
        });
        assert_eq!(result, None);
    }

    #[test]
    fn test_free_rejects_foreign_tids() {
        let mut pool = pool();
        let tid = alloc(&mut pool, 0);
        assert!(!pool.free(Tid::from_raw(0)));
        assert!(!pool.free(Tid::from_raw(1000)));
        assert!(pool.free(tid));
        // Double free is a no-op too.
        assert!(!pool.free(tid));
        assert_eq!(pool.num_allocated(), 0);
    }

    #[test]
    fn test_generation_rejects_reused_slot() {
        let mut pool = pool();
        let tid = alloc(&mut pool, 0);
        let stale = pool.task_ref(tid).unwrap();
        assert!(pool.is_current(stale));

        pool.free(tid);
        assert!(!pool.is_current(stale));

        // Reuse the slot: same tid, different generation.
        let reused = alloc(&mut pool, 0);
        assert_eq!(reused, tid);
        assert!(!pool.is_current(stale));
        assert!(pool.is_current(pool.task_ref(tid).unwrap()));
    }

    #[test]
    fn test_get_pairs_tid_with_liveness() {
        let mut pool = pool();
        let tid = alloc(&mut pool, 3);
        assert_eq!(pool.get(tid).unwrap().state(), TaskState::Ready);
        pool.free(tid);
        assert!(pool.get(tid).is_none());
        // The slot's generation remains readable for parent checks.
        assert_eq!(pool.slot_generation(tid), Some(Generation::initial().next()));
    }
}
