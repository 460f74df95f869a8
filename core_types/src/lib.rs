//! # Core Types
//!
//! This crate defines the fundamental types used throughout Switchyard.
//!
//! ## Philosophy
//!
//! Core types are designed with these principles:
//! - **Positional identity**: A task id names an arena slot, nothing more.
//! - **Explicit staleness**: Generations make reuse of a slot detectable.
//! - **Type safety first**: Ids, priorities, and events cannot be confused.
//!
//! ## Key Types
//!
//! - [`Tid`]: Stable small-integer task identifier derived from slot position
//! - [`Priority`]: One of the configured discrete scheduling levels
//! - [`Generation`]: Per-slot reuse counter
//! - [`EventId`]: Identifier for interrupt/event wake-up channels
//! - [`KernelConfig`]: Boot-time kernel sizing and layout

pub mod config;
pub mod ids;

pub use config::{ConfigError, KernelConfig};
pub use ids::{EventId, Generation, Priority, Tid, PARENT_EXITED_BIT};
