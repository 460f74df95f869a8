//! Trap causes: the decoded form of a task's saved argument registers.
//!
//! The context-switch trampoline resumes a task and eventually comes back
//! with one of these values. Message payloads are opaque byte vectors of
//! caller-declared length; the kernel copies them, it never parses them.

use core_types::{EventId, Priority, Tid};
use serde::{Deserialize, Serialize};

/// Why control returned from an activated task.
///
/// Seven syscalls, the event-wait request, and hardware interrupt delivery.
/// Everything a task can ask of the kernel is one of these variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapCause {
    /// Create a task at `priority` starting at `entry`
    Create { priority: Priority, entry: usize },
    /// Ask for the caller's own tid
    MyTid,
    /// Ask for the caller's parent tid (tagged if the parent exited)
    MyParentTid,
    /// Give up the processor, stay ready
    Yield,
    /// Destroy the caller
    Exit,
    /// Block until `target` receives `message` and later replies;
    /// at most `reply_capacity` reply bytes will be accepted
    Send {
        target: Tid,
        message: Vec<u8>,
        reply_capacity: usize,
    },
    /// Accept the oldest queued sender, or block until one arrives;
    /// at most `capacity` message bytes will be accepted
    Receive { capacity: usize },
    /// Unblock a sender previously accepted via Receive
    Reply { to: Tid, reply: Vec<u8> },
    /// Block until `event` fires
    AwaitEvent { event: EventId },
    /// Hardware interrupt: the running task asked for nothing
    Interrupt { event: EventId, value: i64 },
}

impl TrapCause {
    /// Returns whether this cause suspends the trapping task when the
    /// counterpart is absent (the only suspension points in the kernel).
    pub fn may_block(&self) -> bool {
        matches!(
            self,
            TrapCause::Send { .. } | TrapCause::Receive { .. } | TrapCause::AwaitEvent { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_classification() {
        assert!(TrapCause::Receive { capacity: 16 }.may_block());
        assert!(TrapCause::Send {
            target: Tid::from_raw(2),
            message: b"hi".to_vec(),
            reply_capacity: 4,
        }
        .may_block());
        assert!(TrapCause::AwaitEvent {
            event: EventId::from_raw(1)
        }
        .may_block());
        assert!(!TrapCause::Yield.may_block());
        assert!(!TrapCause::Reply {
            to: Tid::from_raw(2),
            reply: Vec::new(),
        }
        .may_block());
    }

    #[test]
    fn test_trap_cause_round_trips_through_serde() {
        let cause = TrapCause::Send {
            target: Tid::from_raw(3),
            message: vec![1, 2, 3],
            reply_capacity: 8,
        };
        let json = serde_json::to_string(&cause).unwrap();
        let back: TrapCause = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cause);
    }
}
