//! Deterministic scripted trampoline for in-process testing.
//!
//! A [`ScriptedTrampoline`] implements [`ContextSwitch`] without any real
//! context switching: each entry-point address maps to a fixed script of
//! [`Step`]s, and activating a task replays the next step of its script.
//! Scripts are keyed by entry point so the same program can be instantiated
//! many times, and a slot reused by a new task starts that task's own
//! script from the top.
//!
//! Interrupts are injected explicitly with
//! [`ScriptedTrampoline::raise_interrupt`]; the next activation delivers
//! the interrupt instead of consuming a script step, exactly like hardware
//! preempting a running task.

use core_types::{EventId, Tid};
use hal::{ContextSwitch, TaskContext};
use kernel_api::TrapCause;
use std::collections::{HashMap, VecDeque};

/// One scripted action of a simulated task.
#[derive(Debug, Clone)]
pub enum Step {
    /// Trap with exactly this cause.
    Syscall(TrapCause),
    /// Reply to whichever sender the previous Receive delivered.
    ///
    /// Resolved at activation time from the context's recorded sender, so
    /// scripts do not need to hard-code tids.
    ReplyToSender { reply: Vec<u8> },
}

/// Replays per-entry-point scripts as trap causes.
#[derive(Debug, Default)]
pub struct ScriptedTrampoline {
    /// Program text: entry point to script.
    programs: HashMap<usize, Vec<Step>>,
    /// Remaining steps of each task currently executing a program.
    running: HashMap<u32, VecDeque<Step>>,
    /// Interrupts waiting to preempt the next activation.
    pending_interrupts: VecDeque<(EventId, i64)>,
}

impl ScriptedTrampoline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the script run by every task created at `entry`.
    pub fn install(&mut self, entry: usize, script: Vec<Step>) {
        self.programs.insert(entry, script);
    }

    /// Queues an interrupt; the next activation is preempted by it.
    pub fn raise_interrupt(&mut self, event: EventId, value: i64) {
        self.pending_interrupts.push_back((event, value));
    }
}

impl ContextSwitch for ScriptedTrampoline {
    fn activate(&mut self, tid: Tid, context: &mut TaskContext) -> TrapCause {
        if let Some((event, value)) = self.pending_interrupts.pop_front() {
            return TrapCause::Interrupt { event, value };
        }

        // First activation of this task (or of a reused slot running a new
        // program): instantiate the script for its entry point.
        let script = self.running.entry(tid.raw()).or_insert_with(|| {
            self.programs
                .get(&context.entry())
                .cloned()
                .unwrap_or_default()
                .into()
        });

        match script.pop_front() {
            Some(Step::Syscall(cause)) => cause,
            Some(Step::ReplyToSender { reply }) => match context.sender() {
                Some(to) => TrapCause::Reply { to, reply },
                // No completed Receive to answer; nothing left to do.
                None => {
                    self.running.remove(&tid.raw());
                    TrapCause::Exit
                }
            },
            // Script exhausted: the task falls off the end of its program.
            // Dropping the running entry lets a reused tid start fresh.
            None => {
                self.running.remove(&tid.raw());
                TrapCause::Exit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::KernelConfig;
    use hal::StackRegion;

    fn context(entry: usize) -> TaskContext {
        let config = KernelConfig::default();
        TaskContext::seed(entry, StackRegion::for_slot(&config, 0), config.stack_align)
    }

    #[test]
    fn test_script_replays_in_order_then_exits() {
        let mut tramp = ScriptedTrampoline::new();
        tramp.install(
            0x100,
            vec![Step::Syscall(TrapCause::MyTid), Step::Syscall(TrapCause::Yield)],
        );
        let mut ctx = context(0x100);
        let tid = Tid::from_raw(1);
        assert_eq!(tramp.activate(tid, &mut ctx), TrapCause::MyTid);
        assert_eq!(tramp.activate(tid, &mut ctx), TrapCause::Yield);
        assert_eq!(tramp.activate(tid, &mut ctx), TrapCause::Exit);
    }

    #[test]
    fn test_unknown_entry_point_just_exits() {
        let mut tramp = ScriptedTrampoline::new();
        let mut ctx = context(0xDEAD);
        assert_eq!(tramp.activate(Tid::from_raw(2), &mut ctx), TrapCause::Exit);
    }

    #[test]
    fn test_reused_tid_restarts_its_program() {
        let mut tramp = ScriptedTrampoline::new();
        tramp.install(0x100, vec![Step::Syscall(TrapCause::MyTid)]);
        tramp.install(0x200, vec![Step::Syscall(TrapCause::Yield)]);
        let tid = Tid::from_raw(3);

        let mut first = context(0x100);
        assert_eq!(tramp.activate(tid, &mut first), TrapCause::MyTid);
        assert_eq!(tramp.activate(tid, &mut first), TrapCause::Exit);

        // Same tid, new task at a different entry point.
        let mut second = context(0x200);
        assert_eq!(tramp.activate(tid, &mut second), TrapCause::Yield);
    }

    #[test]
    fn test_interrupt_preempts_without_consuming_a_step() {
        let mut tramp = ScriptedTrampoline::new();
        tramp.install(0x100, vec![Step::Syscall(TrapCause::MyTid)]);
        tramp.raise_interrupt(EventId::from_raw(5), 77);
        let mut ctx = context(0x100);
        let tid = Tid::from_raw(1);
        assert_eq!(
            tramp.activate(tid, &mut ctx),
            TrapCause::Interrupt {
                event: EventId::from_raw(5),
                value: 77,
            }
        );
        // The script resumes where it left off.
        assert_eq!(tramp.activate(tid, &mut ctx), TrapCause::MyTid);
    }

    #[test]
    fn test_reply_to_sender_reads_the_recorded_sender() {
        let mut tramp = ScriptedTrampoline::new();
        tramp.install(
            0x100,
            vec![Step::ReplyToSender {
                reply: b"ack".to_vec(),
            }],
        );
        let mut ctx = context(0x100);
        ctx.set_sender(Tid::from_raw(9));
        assert_eq!(
            tramp.activate(Tid::from_raw(1), &mut ctx),
            TrapCause::Reply {
                to: Tid::from_raw(9),
                reply: b"ack".to_vec(),
            }
        );
    }
}
