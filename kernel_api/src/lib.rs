//! # Kernel API
//!
//! This crate defines the syscall boundary between tasks and the kernel.
//!
//! ## Philosophy
//!
//! The kernel provides **mechanisms**, not policies:
//! - Task creation with an explicit priority and entry point (not forking)
//! - Synchronous rendezvous message passing (not shared memory)
//! - Opaque byte payloads of caller-declared length (not kernel-parsed data)
//!
//! ## Design Goals
//!
//! 1. **Testability**: every trap is a plain value that can be constructed
//!    and replayed in tests
//! 2. **Explicitness**: arguments travel as a tagged sum type, never as a
//!    header plus raw payload bytes
//! 3. **No fatal syscalls**: every validation failure is a negative sentinel
//!    in the caller's return register, never a kernel abort

pub mod error;
pub mod trap;

pub use error::KernelError;
pub use trap::TrapCause;
