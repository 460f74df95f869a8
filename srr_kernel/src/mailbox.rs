//! Per-task sender queues.
//!
//! One FIFO per arena slot holding the tasks currently blocked trying to
//! Send to that slot's task. Senders are served strictly in arrival order,
//! independent of their priorities. Mailboxes hold task references, never
//! message bytes; a mailbox can hold at most N-1 entries by construction,
//! so there is no capacity to enforce.

use crate::pool::TaskRef;
use std::collections::VecDeque;

/// FIFO of senders blocked on one task.
#[derive(Debug, Default)]
pub struct Mailbox {
    senders: VecDeque<TaskRef>,
}

impl Mailbox {
    pub fn enqueue(&mut self, sender: TaskRef) {
        self.senders.push_back(sender);
    }

    pub fn dequeue(&mut self) -> Option<TaskRef> {
        self.senders.pop_front()
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

/// All mailboxes, indexed like the task arena.
#[derive(Debug)]
pub struct MailboxTable {
    boxes: Vec<Mailbox>,
}

impl MailboxTable {
    pub fn new(max_tasks: usize) -> Self {
        Self {
            boxes: (0..max_tasks).map(|_| Mailbox::default()).collect(),
        }
    }

    pub fn slot(&self, index: usize) -> &Mailbox {
        &self.boxes[index]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut Mailbox {
        &mut self.boxes[index]
    }

    /// Total senders blocked across all mailboxes.
    pub fn total_waiting(&self) -> usize {
        self.boxes.iter().map(Mailbox::len).sum()
    }
}
