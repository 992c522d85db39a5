//! Common test utilities: mock block device and partition registry

use gpt_disk_types::{BlockSize, Lba};
use ptable::{BlockDev, DeviceError, PartitionRegistry};

/// In-memory block device for testing
///
/// Failure injection: `rescan_error` makes rescan fail, `fail_read_at`
/// makes the read covering that LBA return zero blocks, and `short_write`
/// makes every write come up one block short.
pub struct MemoryBlockDevice {
    pub data: Vec<u8>,
    pub block_size: usize,
    pub rescan_error: Option<DeviceError>,
    pub fail_read_at: Option<u64>,
    pub short_write: bool,
}

impl MemoryBlockDevice {
    /// Create a zeroed device with `num_blocks` 512-byte blocks
    pub fn new(num_blocks: u64) -> Self {
        Self {
            data: vec![0u8; num_blocks as usize * 512],
            block_size: 512,
            rescan_error: None,
            fail_read_at: None,
            short_write: false,
        }
    }
}

impl BlockDev for MemoryBlockDevice {
    fn rescan(&mut self) -> Result<(), DeviceError> {
        match self.rescan_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn total_blocks(&mut self) -> u64 {
        (self.data.len() / self.block_size) as u64
    }

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size as u32).expect("valid block size")
    }

    fn read(&mut self, start: Lba, count: u64, dst: &mut [u8]) -> u64 {
        if let Some(bad) = self.fail_read_at {
            if start.0 <= bad && bad < start.0 + count {
                return 0;
            }
        }

        let offset = start.0 as usize * self.block_size;
        let len = count as usize * self.block_size;
        if offset + len > self.data.len() {
            return 0;
        }
        dst[..len].copy_from_slice(&self.data[offset..offset + len]);
        count
    }

    fn write(&mut self, start: Lba, count: u64, src: &[u8]) -> u64 {
        let offset = start.0 as usize * self.block_size;
        let len = count as usize * self.block_size;
        if offset + len > self.data.len() {
            return 0;
        }
        self.data[offset..offset + len].copy_from_slice(&src[..len]);

        if self.short_write {
            count.saturating_sub(1)
        } else {
            count
        }
    }
}

/// One publication captured by the mock registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub name: String,
    pub start_byte: u64,
    pub length: u64,
    pub flags: u32,
}

/// Recording partition registry
pub struct MockRegistry {
    pub entries: Vec<Published>,
    pub resets: usize,
    pub name_cap: usize,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            resets: 0,
            name_cap: 15,
        }
    }
}

impl PartitionRegistry for MockRegistry {
    fn reset(&mut self) {
        self.entries.clear();
        self.resets += 1;
    }

    fn max_name_len(&self) -> usize {
        self.name_cap
    }

    fn publish(&mut self, name: &str, start_byte: u64, length: u64, flags: u32) {
        self.entries.push(Published {
            name: name.to_string(),
            start_byte,
            length,
            flags,
        });
    }
}
