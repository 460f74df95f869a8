//! Saved task execution context.
//!
//! A [`TaskContext`] stands in for the register-file snapshot a real port
//! would save at trap entry. The kernel core is allowed to touch exactly
//! three things in it (the return register, the declared transfer buffer,
//! and the recorded-sender slot), mirroring the syscall ABI of the hardware
//! trampoline. Everything else is the architecture's business.

use crate::StackRegion;
use core_types::Tid;
use serde::{Deserialize, Serialize};

/// Snapshot of one task's registers and stack assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    /// Entry point the task starts (or resumed) at.
    entry: usize,
    /// The task's reserved stack region.
    stack: StackRegion,
    /// Current stack pointer.
    sp: usize,
    /// The register the kernel writes syscall results into.
    return_value: i64,
    /// Bytes most recently copied into this task's declared buffer.
    transfer: Vec<u8>,
    /// Sender recorded by the kernel for a completed Receive.
    sender: Option<Tid>,
}

impl TaskContext {
    /// Seeds a fresh context: entry point set, stack pointer at the aligned
    /// top of the region, no pending results.
    pub fn seed(entry: usize, stack: StackRegion, stack_align: usize) -> Self {
        Self {
            entry,
            stack,
            sp: stack.initial_sp(stack_align),
            return_value: 0,
            transfer: Vec::new(),
            sender: None,
        }
    }

    /// The entry point this context was seeded with.
    pub fn entry(&self) -> usize {
        self.entry
    }

    /// The stack region backing this context.
    pub fn stack(&self) -> StackRegion {
        self.stack
    }

    /// Current stack pointer.
    pub fn sp(&self) -> usize {
        self.sp
    }

    // --- syscall ABI surface used by the kernel core ---

    /// Writes the syscall return register.
    pub fn set_return_value(&mut self, value: i64) {
        self.return_value = value;
    }

    /// Reads the syscall return register.
    pub fn return_value(&self) -> i64 {
        self.return_value
    }

    /// Copies `bytes` into the task's declared buffer, truncating to
    /// `capacity`. Returns the number of bytes actually copied.
    pub fn deliver(&mut self, bytes: &[u8], capacity: usize) -> usize {
        let copied = bytes.len().min(capacity);
        self.transfer.clear();
        self.transfer.extend_from_slice(&bytes[..copied]);
        copied
    }

    /// The bytes last delivered into this task's buffer.
    pub fn transfer(&self) -> &[u8] {
        &self.transfer
    }

    /// Records the sender tid for a completed Receive.
    pub fn set_sender(&mut self, sender: Tid) {
        self.sender = Some(sender);
    }

    /// The sender recorded by the most recent completed Receive.
    pub fn sender(&self) -> Option<Tid> {
        self.sender
    }
}
