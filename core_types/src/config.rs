//! Kernel sizing and memory-layout configuration.
//!
//! All capacities are fixed before the kernel starts: the task arena never
//! grows, stacks come from one flat pre-reserved region indexed by slot, and
//! the number of priority levels bounds the ready-queue scan.

use crate::{Priority, Tid};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_tasks must be non-zero")]
    ZeroTasks,

    #[error("priority_levels must be non-zero")]
    ZeroPriorityLevels,

    #[error("stack_size must be non-zero")]
    ZeroStackSize,

    #[error("stack_align must be a power of two, got {0}")]
    BadStackAlign(usize),
}

/// Kernel configuration.
///
/// Constructed once at boot and threaded through the task manager; there is
/// no global instance, so tests can run many differently-sized kernels side
/// by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Maximum number of simultaneously live tasks (arena capacity).
    pub max_tasks: usize,
    /// Number of discrete priority levels; valid priorities are
    /// `0..priority_levels`, larger is more urgent.
    pub priority_levels: u8,
    /// Numeric value of the tid assigned to slot 0.
    pub tid_base: u32,
    /// Bytes reserved for each task's stack region.
    pub stack_size: usize,
    /// Required alignment of the initial stack pointer.
    pub stack_align: usize,
    /// Base address of the flat stack region array.
    pub stack_region_base: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            max_tasks: 64,
            priority_levels: 8,
            tid_base: 1,
            stack_size: 256 * 1024,
            stack_align: 16,
            stack_region_base: 0x0100_0000,
        }
    }
}

impl KernelConfig {
    /// Checks the configuration for internally inconsistent values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tasks == 0 {
            return Err(ConfigError::ZeroTasks);
        }
        if self.priority_levels == 0 {
            return Err(ConfigError::ZeroPriorityLevels);
        }
        if self.stack_size == 0 {
            return Err(ConfigError::ZeroStackSize);
        }
        if !self.stack_align.is_power_of_two() {
            return Err(ConfigError::BadStackAlign(self.stack_align));
        }
        Ok(())
    }

    /// Returns whether `priority` names one of the configured levels.
    pub fn priority_in_range(&self, priority: Priority) -> bool {
        priority.level() < self.priority_levels
    }

    /// Returns the tid for an arena slot index.
    pub fn tid_of_slot(&self, slot: usize) -> Tid {
        Tid::from_raw(slot as u32 + self.tid_base)
    }

    /// Returns the arena slot index a tid names, if it is in range.
    pub fn slot_of_tid(&self, tid: Tid) -> Option<usize> {
        let raw = tid.raw();
        if raw < self.tid_base {
            return None;
        }
        let slot = (raw - self.tid_base) as usize;
        if slot < self.max_tasks {
            Some(slot)
        } else {
            None
        }
    }
}
