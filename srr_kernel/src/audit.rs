//! Schedule event log.
//!
//! Every state transition the task manager performs is recorded here so
//! tests can assert on exact scheduling behavior (activation order, enqueue
//! order, copy sizes) without reaching into kernel internals.

use crate::task::TaskState;
use core_types::{EventId, Priority, Tid};
use serde::{Deserialize, Serialize};

/// One recorded scheduling decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleEvent {
    /// A task slot was allocated
    TaskCreated {
        tid: Tid,
        parent: Option<Tid>,
        priority: Priority,
    },
    /// A task was popped from the ready queue and made active
    TaskActivated { tid: Tid },
    /// A task was pushed onto the ready queue
    TaskReadied { tid: Tid },
    /// A task left the processor blocked
    TaskBlocked { tid: Tid, state: TaskState },
    /// A task exited and its slot was freed
    TaskExited { tid: Tid },
    /// Message or reply bytes were copied between two tasks
    MessageCopied { from: Tid, to: Tid, bytes: usize },
    /// A syscall failed validation and the caller got a sentinel
    SyscallFailed { tid: Tid, code: i64 },
    /// An event fired and its wait list was drained
    EventFired { event: EventId, woken: usize },
}

/// Append-only log of schedule events.
#[derive(Debug, Default)]
pub struct ScheduleLog {
    events: Vec<ScheduleEvent>,
}

impl ScheduleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: ScheduleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns whether any recorded event matches the predicate.
    pub fn has_event(&self, predicate: impl Fn(&ScheduleEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
