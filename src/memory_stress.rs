use log::debug;
use sysinfo::System;

use crate::error::{Error, Result};

/// Allocate `bytes` bytes and write to every one of them so the pages are
/// physically committed rather than left as lazily zeroed mappings.
///
/// The buffer is handed back to the caller, who decides how long it lives.
pub fn touch_memory(bytes: u64) -> Result<Vec<u8>> {
    let len = usize::try_from(bytes).map_err(|_| Error::AllocationTooLarge { bytes })?;

    let mut memory_block = vec![0u8; len];
    for (i, byte) in memory_block.iter_mut().enumerate() {
        *byte = i as u8;
    }

    Ok(memory_block)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total_bytes: u64,
    pub used_bytes: u64,
}

impl MemorySnapshot {
    pub fn capture() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();

        Self {
            total_bytes: sys.total_memory(),
            used_bytes: sys.used_memory(),
        }
    }

    pub fn log(&self, label: &str) {
        debug!(
            "{}: total memory {} MB, used memory {} MB",
            label,
            self.total_bytes / (1024 * 1024),
            self.used_bytes / (1024 * 1024)
        );
    }
}
