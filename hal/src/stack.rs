//! Task stack layout.
//!
//! Stacks come from one flat pre-reserved array: region `i` belongs to arena
//! slot `i`, and the initial stack pointer is the aligned top of the region,
//! growing downward.

use core_types::KernelConfig;
use serde::{Deserialize, Serialize};

/// One task's stack region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRegion {
    base: usize,
    size: usize,
}

impl StackRegion {
    /// Returns the stack region reserved for an arena slot.
    pub fn for_slot(config: &KernelConfig, slot: usize) -> Self {
        Self {
            base: config.stack_region_base + slot * config.stack_size,
            size: config.stack_size,
        }
    }

    /// Lowest address of the region.
    pub const fn base(&self) -> usize {
        self.base
    }

    /// Size of the region in bytes.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Initial stack pointer: one past the region, aligned down.
    pub const fn initial_sp(&self, align: usize) -> usize {
        (self.base + self.size) & !(align - 1)
    }

    /// Returns whether an address falls inside this region.
    pub const fn contains(&self, addr: usize) -> bool {
        addr >= self.base && addr < self.base + self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_are_disjoint_and_ordered() {
        let config = KernelConfig::default();
        let a = StackRegion::for_slot(&config, 0);
        let b = StackRegion::for_slot(&config, 1);
        assert_eq!(a.base() + a.size(), b.base());
        assert!(!a.contains(b.base()));
        assert!(b.contains(b.base()));
    }

    #[test]
    fn test_initial_sp_is_aligned() {
        let config = KernelConfig {
            stack_region_base: 0x1000,
            stack_size: 0x1000,
            stack_align: 16,
            ..KernelConfig::default()
        };
        let region = StackRegion::for_slot(&config, 3);
        let sp = region.initial_sp(config.stack_align);
        assert_eq!(sp % 16, 0);
        assert_eq!(sp, region.base() + region.size());
    }
}
