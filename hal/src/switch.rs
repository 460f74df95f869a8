//! Context-switch abstraction.

use crate::TaskContext;
use core_types::Tid;
use kernel_api::TrapCause;

/// The architecture trampoline.
///
/// `activate` resumes the task whose saved context is given and returns when
/// that task next traps, because it made a syscall or because an interrupt
/// arrived. The returned [`TrapCause`] is the decoded reason.
///
/// Implementations:
/// - a real port wraps the assembly context-switch path
/// - the test harness replays scripted causes deterministically
pub trait ContextSwitch {
    /// Resumes `tid` and returns the cause of its next trap.
    fn activate(&mut self, tid: Tid, context: &mut TaskContext) -> TrapCause;
}
