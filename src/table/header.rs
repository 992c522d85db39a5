//! GPT header encoding and decoding
//!
//! The header occupies the first 92 bytes of LBA 1; the rest of the sector
//! is reserved padding. Field offsets are fixed and little-endian.

use crate::error::{Result, TableError};
use crate::table::{put_u32, put_u64, u32_at, u64_at, GPT_MAGIC};

/// Encoded header size in bytes
pub const HEADER_SIZE: usize = 92;

/// Byte offset of the header's own crc32 field
pub const CRC32_OFFSET: usize = 16;

/// Byte offset of the entries-array crc32 field
pub const ENTRIES_CRC32_OFFSET: usize = 88;

/// Decoded GPT header values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GptHeader {
    /// Magic bytes, "EFI PART"
    pub magic: [u8; 8],
    /// Format revision, 0x00010000
    pub version: u32,
    /// Encoded header size in bytes
    pub header_sz: u32,
    /// CRC32 of the header, see [`PartitionTable::finish`](crate::PartitionTable::finish)
    pub crc32: u32,
    /// Reserved, zero
    pub reserved: u32,
    /// LBA holding this header
    pub header_lba: u64,
    /// LBA where a backup header would live (none is written)
    pub backup_lba: u64,
    /// First LBA usable by partitions
    pub first_lba: u64,
    /// Last LBA usable by partitions, inclusive
    pub last_lba: u64,
    /// Volume GUID, wire form
    pub volume_uuid: [u8; 16],
    /// LBA where the entry array starts
    pub entries_lba: u64,
    /// Number of entry slots
    pub entries_count: u32,
    /// Encoded size of one entry
    pub entries_size: u32,
    /// CRC32 of the full entry array
    pub entries_crc32: u32,
}

impl GptHeader {
    /// Decode a header block, validating the magic
    ///
    /// Fails with `MagicMismatch` if the block is too short or does not
    /// start with "EFI PART".
    pub fn decode(block: &[u8]) -> Result<Self> {
        if block.len() < HEADER_SIZE || &block[..8] != GPT_MAGIC {
            return Err(TableError::MagicMismatch);
        }
        Ok(Self::read_from(block))
    }

    /// Decode without validation; `block` must hold at least 92 bytes
    pub(crate) fn read_from(block: &[u8]) -> Self {
        let mut magic = [0u8; 8];
        magic.copy_from_slice(&block[..8]);
        let mut volume_uuid = [0u8; 16];
        volume_uuid.copy_from_slice(&block[56..72]);

        Self {
            magic,
            version: u32_at(block, 8),
            header_sz: u32_at(block, 12),
            crc32: u32_at(block, CRC32_OFFSET),
            reserved: u32_at(block, 20),
            header_lba: u64_at(block, 24),
            backup_lba: u64_at(block, 32),
            first_lba: u64_at(block, 40),
            last_lba: u64_at(block, 48),
            volume_uuid,
            entries_lba: u64_at(block, 72),
            entries_count: u32_at(block, 80),
            entries_size: u32_at(block, 84),
            entries_crc32: u32_at(block, ENTRIES_CRC32_OFFSET),
        }
    }

    pub(crate) fn encode_into(&self, block: &mut [u8]) {
        block[..8].copy_from_slice(&self.magic);
        put_u32(block, 8, self.version);
        put_u32(block, 12, self.header_sz);
        put_u32(block, CRC32_OFFSET, self.crc32);
        put_u32(block, 20, self.reserved);
        put_u64(block, 24, self.header_lba);
        put_u64(block, 32, self.backup_lba);
        put_u64(block, 40, self.first_lba);
        put_u64(block, 48, self.last_lba);
        block[56..72].copy_from_slice(&self.volume_uuid);
        put_u64(block, 72, self.entries_lba);
        put_u32(block, 80, self.entries_count);
        put_u32(block, 84, self.entries_size);
        put_u32(block, ENTRIES_CRC32_OFFSET, self.entries_crc32);
    }
}
