//! # Hardware Abstraction Layer (HAL)
//!
//! This crate defines the architecture seam of the kernel.
//!
//! ## Philosophy
//!
//! **Architecture must be fully abstracted and swappable.**
//!
//! The kernel core never touches registers, trap frames, or stacks directly.
//! It holds an opaque [`TaskContext`] per task and drives execution through
//! the [`ContextSwitch`] trait; a real port implements the trait with an
//! assembly trampoline, the test harness implements it in-process.
//!
//! ## Design Principles
//!
//! 1. **Opaque contexts**: the core stores and hands back contexts, it does
//!    not interpret them beyond the fixed ABI accessors
//! 2. **Trait-based**: one trait, one obligation: resume a task, return its
//!    trap cause
//! 3. **Testable**: a deterministic in-process switcher satisfies the trait

pub mod context;
pub mod stack;
pub mod switch;

pub use context::TaskContext;
pub use stack::StackRegion;
pub use switch::ContextSwitch;
