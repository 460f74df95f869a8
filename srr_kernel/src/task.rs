//! Task descriptors and their lifecycle state.

use core_types::{EventId, Generation, Priority, Tid};
use hal::TaskContext;
use serde::{Deserialize, Serialize};

/// Scheduling state of a task.
///
/// Exactly one task is `Active` at any instant. A task appears in the ready
/// queue iff it is `Ready`, and in a mailbox iff it is `SendWait`; tasks in
/// `ReplyWait` sit in no container at all; the receiver remembers them by
/// tid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    /// Eligible to run, queued at its priority level
    Ready,
    /// Currently running (or being handled by a syscall)
    Active,
    /// Blocked in Send, waiting for the target to Receive
    SendWait,
    /// Blocked in Receive on an empty mailbox
    ReceiveWait,
    /// Rendezvoused; waiting for the receiver's Reply
    ReplyWait,
    /// Blocked in AwaitEvent
    EventWait { event: EventId },
}

/// The parent link recorded at creation time.
///
/// The generation is the parent slot's generation when the child was
/// created; a later mismatch means the parent exited, even if the slot has
/// been reused by an unrelated task since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parentage {
    pub tid: Tid,
    pub generation: Generation,
}

/// Transfer bookkeeping parked with a blocked task.
///
/// Message bytes are never queued inside the kernel: a blocked sender keeps
/// its own outgoing bytes here (its task memory, in the simulation model),
/// and the queues carry task references only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingTransfer {
    /// `SendWait`: the outgoing message and the declared reply capacity
    AwaitingReceiver {
        message: Vec<u8>,
        reply_capacity: usize,
    },
    /// `ReceiveWait`: the declared receive capacity
    AwaitingSender { capacity: usize },
    /// `ReplyWait`: the declared reply capacity, message already delivered
    AwaitingReply { reply_capacity: usize },
}

/// One task: identity, scheduling state, saved context, transfer record.
///
/// Descriptors are constructed and dropped in place; identity is entirely
/// positional (slot index derives the tid), so a descriptor never moves
/// across slots.
#[derive(Debug)]
pub struct TaskDescriptor {
    pub(crate) tid: Tid,
    pub(crate) parent: Option<Parentage>,
    pub(crate) priority: Priority,
    pub(crate) state: TaskState,
    pub(crate) context: TaskContext,
    pub(crate) pending: Option<PendingTransfer>,
}

impl TaskDescriptor {
    /// Creates a descriptor in the born state: `Ready`, nothing pending.
    pub fn new(
        tid: Tid,
        parent: Option<Parentage>,
        priority: Priority,
        context: TaskContext,
    ) -> Self {
        Self {
            tid,
            parent,
            priority,
            state: TaskState::Ready,
            context,
            pending: None,
        }
    }

    pub fn tid(&self) -> Tid {
        self.tid
    }

    pub fn parent(&self) -> Option<Parentage> {
        self.parent
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn context(&self) -> &TaskContext {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::KernelConfig;
    use hal::StackRegion;

    #[test]
    fn test_descriptor_is_born_ready() {
        let config = KernelConfig::default();
        let context = TaskContext::seed(
            0x40,
            StackRegion::for_slot(&config, 2),
            config.stack_align,
        );
        let task = TaskDescriptor::new(Tid::from_raw(3), None, Priority::new(2), context);
        assert_eq!(task.state(), TaskState::Ready);
        assert_eq!(task.tid(), Tid::from_raw(3));
        assert_eq!(task.parent(), None);
        assert_eq!(task.priority(), Priority::new(2));
    }

    #[test]
    fn test_event_wait_states_compare_by_event() {
        let a = TaskState::EventWait {
            event: EventId::from_raw(1),
        };
        let b = TaskState::EventWait {
            event: EventId::from_raw(2),
        };
        assert_ne!(a, b);
        assert_eq!(
            a,
            TaskState::EventWait {
                event: EventId::from_raw(1)
            }
        );
    }
}
