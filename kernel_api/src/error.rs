//! Kernel error types and their return-register encoding.

use thiserror::Error;

/// Errors a syscall can report to the calling task.
///
/// All of these are local and non-fatal: the kernel writes the sentinel code
/// into the caller's return register and re-queues the caller ready. Nothing
/// in this enum ever aborts kernel execution.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// Create was asked for a priority outside the configured levels
    #[error("priority {0} is outside the configured range")]
    InvalidPriority(u8),

    /// Create was called with every task slot already allocated
    #[error("task pool exhausted")]
    PoolExhausted,

    /// The tid names a free slot or falls outside the arena
    #[error("tid {0} does not name a live task")]
    InvalidTid(u32),

    /// A task tried to Send to itself
    #[error("a task may not send to itself")]
    SelfSend,

    /// Reply targeted a task that is not awaiting a reply
    ///
    /// Covers stale tids whose slot was reused as well as double replies.
    #[error("reply target {0} is not awaiting a reply")]
    StaleReplyTarget(u32),
}

impl KernelError {
    /// Returns the negative sentinel written into the return register.
    ///
    /// The codes are part of the syscall ABI and must stay stable.
    pub const fn code(self) -> i64 {
        match self {
            KernelError::InvalidPriority(_) => -1,
            KernelError::PoolExhausted => -2,
            KernelError::InvalidTid(_) => -3,
            KernelError::SelfSend => -4,
            KernelError::StaleReplyTarget(_) => -5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_codes_are_stable() {
        assert_eq!(KernelError::InvalidPriority(9).code(), -1);
        assert_eq!(KernelError::PoolExhausted.code(), -2);
        assert_eq!(KernelError::InvalidTid(0).code(), -3);
        assert_eq!(KernelError::SelfSend.code(), -4);
        assert_eq!(KernelError::StaleReplyTarget(5).code(), -5);
    }

    #[test]
    fn test_sentinel_codes_are_negative_and_distinct() {
        let codes = [
            KernelError::InvalidPriority(0).code(),
            KernelError::PoolExhausted.code(),
            KernelError::InvalidTid(0).code(),
            KernelError::SelfSend.code(),
            KernelError::StaleReplyTarget(0).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert!(*a < 0);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_error_messages_name_the_offender() {
        let message = KernelError::InvalidTid(42).to_string();
        assert!(message.contains("42"));
    }
}
