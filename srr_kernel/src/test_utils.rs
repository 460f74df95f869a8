//! Shared helpers for kernel tests.
//!
//! Kept in the library (not `#[cfg(test)]`) so integration tests can use
//! them too.

use crate::dispatch::Dispatcher;
use crate::manager::TaskManager;
use crate::trampoline::{ScriptedTrampoline, Step};
use core_types::{KernelConfig, Priority, Tid};
use kernel_api::KernelError;

/// A small arena that makes exhaustion and slot reuse easy to provoke.
pub fn small_config() -> KernelConfig {
    KernelConfig {
        max_tasks: 8,
        priority_levels: 4,
        tid_base: 1,
        stack_size: 4096,
        stack_align: 16,
        stack_region_base: 0x10000,
    }
}

/// A task to boot before dispatch starts.
#[derive(Debug, Clone)]
pub struct Program {
    pub priority: Priority,
    pub entry: usize,
    pub script: Vec<Step>,
}

impl Program {
    pub fn new(priority: u8, entry: usize, script: Vec<Step>) -> Self {
        Self {
            priority: Priority::new(priority),
            entry,
            script,
        }
    }
}

/// Builds a dispatcher with each program installed and booted, queued in
/// the order given. Returns the boot tids alongside.
pub fn scripted_dispatcher(
    config: KernelConfig,
    programs: Vec<Program>,
) -> Result<(Dispatcher<ScriptedTrampoline>, Vec<Tid>), BuildError> {
    let mut manager = TaskManager::new(config)?;
    let mut trampoline = ScriptedTrampoline::new();
    let mut tids = Vec::with_capacity(programs.len());
    for program in programs {
        trampoline.install(program.entry, program.script);
        tids.push(manager.bootstrap(program.priority, program.entry)?);
    }
    Ok((Dispatcher::new(manager, trampoline), tids))
}

/// Setup can fail on a bad configuration or a full arena.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] core_types::ConfigError),
    #[error(transparent)]
    Kernel(#[from] KernelError),
}
