//! Priority-leveled ready queue.
//!
//! P FIFOs, one per priority level. Push is O(1); pop scans the levels from
//! most to least urgent and takes the front of the first non-empty one,
//! giving strict priority with round-robin among equals.

use crate::pool::TaskRef;
use core_types::Priority;
use std::collections::VecDeque;

/// The set of tasks eligible to run, ordered by priority then arrival.
#[derive(Debug)]
pub struct ReadyQueue {
    levels: Vec<VecDeque<TaskRef>>,
}

impl ReadyQueue {
    /// Creates a queue with the given number of priority levels.
    pub fn new(priority_levels: u8) -> Self {
        Self {
            levels: (0..priority_levels).map(|_| VecDeque::new()).collect(),
        }
    }

    /// Appends a task at its priority level. O(1).
    ///
    /// The priority has already been validated against the configured
    /// levels by the syscall layer.
    pub fn push(&mut self, entry: TaskRef, priority: Priority) {
        let level = priority.level() as usize;
        debug_assert!(level < self.levels.len(), "priority validated upstream");
        self.levels[level].push_back(entry);
    }

    /// Removes and returns the most urgent ready task. O(P).
    ///
    /// `None` means no task is ready; for the dispatch loop that is the
    /// normal idle condition, never an error to recover from.
    pub fn pop(&mut self) -> Option<TaskRef> {
        self.levels
            .iter_mut()
            .rev()
            .find(|level| !level.is_empty())?
            .pop_front()
    }

    /// The task `pop` would return, without removing it.
    pub fn peek(&self) -> Option<TaskRef> {
        self.levels
            .iter()
            .rev()
            .find(|level| !level.is_empty())?
            .front()
            .copied()
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(VecDeque::is_empty)
    }
}
