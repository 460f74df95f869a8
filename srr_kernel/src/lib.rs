//! # SRR Kernel
//!
//! The kernel core of Switchyard: a fixed-capacity task arena, a
//! priority+round-robin ready queue, and synchronous Send/Receive/Reply
//! rendezvous IPC.
//!
//! ## Purpose
//!
//! Everything else in the system (drivers, name resolution, applications)
//! is an ordinary task talking through these primitives. This crate holds
//! the only state machine with genuine coordination hazards: stale tids
//! after slot reuse, exactly-once wake-up, bounded-copy rendezvous.
//!
//! ## Philosophy
//!
//! **Testability is a first-class design constraint.**
//!
//! The whole core runs in-process under `cargo test`: the task manager is a
//! plain value constructed from a [`core_types::KernelConfig`] (no global
//! kernel instance), the dispatch loop drives any [`hal::ContextSwitch`]
//! implementation, and the scripted trampoline replays deterministic
//! syscall sequences. Same inputs, same schedule, every run.
//!
//! ## Structure
//!
//! - [`pool`]: arena allocator; tids are slot positions, generations detect
//!   reuse
//! - [`ready_queue`]: P FIFO levels, strict priority with round-robin ties
//! - [`mailbox`]: per-slot FIFOs of blocked senders
//! - [`manager`]: the syscall state machine over the three containers
//! - [`dispatch`]: activate/trap/handle loop
//! - [`trampoline`]: deterministic scripted [`hal::ContextSwitch`]
//! - [`audit`]: schedule event log for test inspection

pub mod audit;
pub mod dispatch;
pub mod mailbox;
pub mod manager;
pub mod pool;
pub mod ready_queue;
pub mod task;
pub mod test_utils;
pub mod trampoline;

pub use audit::{ScheduleEvent, ScheduleLog};
pub use dispatch::Dispatcher;
pub use mailbox::{Mailbox, MailboxTable};
pub use manager::TaskManager;
pub use pool::{TaskPool, TaskRef};
pub use ready_queue::ReadyQueue;
pub use task::{Parentage, PendingTransfer, TaskDescriptor, TaskState};
pub use trampoline::{ScriptedTrampoline, Step};
