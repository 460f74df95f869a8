//! # Inter-Process Communication (IPC)
//!
//! Typed messages layered over the kernel's raw rendezvous byte spans.
//!
//! ## Philosophy
//!
//! - **The kernel copies bytes, user space gives them meaning**: Send and
//!   Receive move opaque byte spans; this crate is where those spans become
//!   typed values
//! - **Typed, not stringly-typed**: payload bodies are serde sum types, not
//!   hand-packed headers
//! - **Traceable**: every envelope carries a correlation id so a reply can
//!   be matched to its request in traces and tests
//!
//! ## Truncation contract
//!
//! The kernel truncates a transfer to the receiver's declared capacity and
//! reports the copied byte count; that is not an error at the kernel level.
//! At this layer a truncated envelope simply fails to decode, which is how
//! an undersized receive buffer surfaces to protocol code.

pub mod envelope;

pub use envelope::{Envelope, MsgId, PayloadError};
