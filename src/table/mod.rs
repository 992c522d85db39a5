//! Partition table image and codec
//!
//! The on-disk table is a single contiguous image: a 512-byte protective
//! MBR, a 512-byte GPT header block, and 128 partition entries of 128
//! bytes each. All multi-byte integers are little-endian. [`PartitionTable`]
//! owns the image and fills it in three steps: `start`, repeated `add`,
//! then `finish` to seal both CRC32 fields.

pub mod entry;
pub mod header;

pub use entry::GptEntry;
pub use header::GptHeader;

use crc::{Crc, CRC_32_ISO_HDLC};
use uguid::{guid, Guid};

use crate::error::{Result, TableError};

/// GPT header magic
pub const GPT_MAGIC: &[u8; 8] = b"EFI PART";

/// GPT revision 1.0
pub const GPT_VERSION: u32 = 0x0001_0000;

/// Number of entry slots in the table
pub const TABLE_ENTRIES: usize = 128;

/// Size of one encoded entry in bytes
pub const ENTRY_SIZE: usize = 128;

/// Name field width in UTF-16 code units
pub const ENTRY_NAME_LEN: usize = 36;

/// Sector size the table layout is defined against
pub const SECTOR_SIZE: usize = 512;

/// First LBA usable by partitions: MBR + header + 32 entry-array sectors
pub const FIRST_USABLE_LBA: u64 = 34;

/// LBA where the entry array starts
pub const ENTRIES_LBA: u64 = 2;

/// Total size of the table image in bytes
pub const TABLE_BYTES: usize = 2 * SECTOR_SIZE + TABLE_ENTRIES * ENTRY_SIZE;

/// Type GUID marking a native firmware partition (basic-data GUID)
pub const NATIVE_PARTITION_GUID: Guid = guid!("ebd0a0a2-b9e5-4433-87c0-68b6b72699c7");

/// Fixed seed for volume and per-entry unique GUIDs
///
/// Entries get this GUID with byte 0 replaced by their slot index, which
/// keeps them distinct within one table without a randomness source.
pub const UNIQUE_SEED_GUID: Guid = guid!("f9f21fff-a8d4-5f0e-9746-594869aec34e");

pub(crate) const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

const HEADER_OFFSET: usize = SECTOR_SIZE;
const ENTRIES_OFFSET: usize = 2 * SECTOR_SIZE;

/// Byte offset of an entry's `last_lba` field, used for the free-slot scan
const ENTRY_LAST_LBA: usize = 40;

/// An owned partition table image being built or inspected
///
/// One value per format/load cycle; callers serialize access.
pub struct PartitionTable {
    image: [u8; TABLE_BYTES],
}

impl PartitionTable {
    /// Begin a fresh table for a device of `total_blocks` 512-byte sectors
    ///
    /// Zeroes the image, writes the protective MBR, and writes every GPT
    /// header field except the two CRCs (see [`finish`](Self::finish)).
    pub fn start(total_blocks: u64) -> Self {
        let mut table = Self {
            image: [0u8; TABLE_BYTES],
        };

        init_mbr(
            &mut table.image[..SECTOR_SIZE],
            total_blocks.saturating_sub(1),
        );

        let header = GptHeader {
            magic: *GPT_MAGIC,
            version: GPT_VERSION,
            header_sz: header::HEADER_SIZE as u32,
            crc32: 0,
            reserved: 0,
            header_lba: 1,
            backup_lba: total_blocks.saturating_sub(1),
            first_lba: FIRST_USABLE_LBA,
            last_lba: total_blocks.saturating_sub(1),
            volume_uuid: UNIQUE_SEED_GUID.to_bytes(),
            entries_lba: ENTRIES_LBA,
            entries_count: TABLE_ENTRIES as u32,
            entries_size: ENTRY_SIZE as u32,
            entries_crc32: 0,
        };
        header.encode_into(&mut table.image[HEADER_OFFSET..HEADER_OFFSET + header::HEADER_SIZE]);

        table
    }

    /// Add a partition covering the inclusive LBA range `[first, last]`
    ///
    /// The first free slot wins; a slot is free while its `last_lba` is
    /// zero. Names longer than 36 code units are truncated silently.
    pub fn add(&mut self, first_lba: u64, last_lba: u64, name: &str) -> Result<()> {
        if first_lba < FIRST_USABLE_LBA {
            return Err(TableError::PartitionOverlapsTable);
        }
        if last_lba > self.header().last_lba {
            return Err(TableError::PartitionTooLarge);
        }

        for slot in 0..TABLE_ENTRIES {
            let off = ENTRIES_OFFSET + slot * ENTRY_SIZE;
            if u64_at(&self.image, off + ENTRY_LAST_LBA) != 0 {
                continue;
            }

            let mut uniq_uuid = UNIQUE_SEED_GUID.to_bytes();
            uniq_uuid[0] = slot as u8;

            let entry = GptEntry {
                type_uuid: NATIVE_PARTITION_GUID.to_bytes(),
                uniq_uuid,
                first_lba,
                last_lba,
                attr: 0,
                name: entry::encode_name(name),
            };
            entry.encode_into(&mut self.image[off..off + ENTRY_SIZE]);
            return Ok(());
        }

        Err(TableError::TableFull)
    }

    /// Seal the table by filling in both CRC32 fields
    ///
    /// The entries CRC covers the full 128-slot array, zeroed slots
    /// included. The header CRC is then taken over the 92-byte header as it
    /// stands, with the header's own crc32 field still holding its zeroed
    /// value. On-disk compatibility requires this exact two-pass order.
    pub fn finish(&mut self) {
        let entries_crc32 = CRC32.checksum(&self.image[ENTRIES_OFFSET..]);
        put_u32(&mut self.image, HEADER_OFFSET + header::ENTRIES_CRC32_OFFSET, entries_crc32);

        let header_crc32 =
            CRC32.checksum(&self.image[HEADER_OFFSET..HEADER_OFFSET + header::HEADER_SIZE]);
        put_u32(&mut self.image, HEADER_OFFSET + header::CRC32_OFFSET, header_crc32);
    }

    /// Decoded view of the header block
    pub fn header(&self) -> GptHeader {
        GptHeader::read_from(&self.image[HEADER_OFFSET..HEADER_OFFSET + header::HEADER_SIZE])
    }

    /// Decoded view of entry slot `index`
    pub fn entry(&self, index: usize) -> Option<GptEntry> {
        if index >= TABLE_ENTRIES {
            return None;
        }
        let off = ENTRIES_OFFSET + index * ENTRY_SIZE;
        GptEntry::decode(&self.image[off..off + ENTRY_SIZE])
    }

    /// The full on-disk image
    pub fn as_bytes(&self) -> &[u8; TABLE_BYTES] {
        &self.image
    }
}

/// Write the protective MBR: one 0xEE partition spanning the device so
/// GPT-unaware tools leave the disk alone.
fn init_mbr(mbr: &mut [u8], size_blocks: u64) {
    mbr[0x1be] = 0x00; // nonbootable
    mbr[0x1bf] = 0xff; // bogus CHS
    mbr[0x1c0] = 0xff;
    mbr[0x1c1] = 0xff;

    mbr[0x1c2] = 0xee; // GPT protective
    mbr[0x1c3] = 0xff; // bogus CHS
    mbr[0x1c4] = 0xff;
    mbr[0x1c5] = 0xff;

    // start LBA 1, size is the low 32 bits of the remaining device
    mbr[0x1c6..0x1ca].copy_from_slice(&1u32.to_le_bytes());
    mbr[0x1ca..0x1ce].copy_from_slice(&(size_blocks as u32).to_le_bytes());

    mbr[0x1fe] = 0x55;
    mbr[0x1ff] = 0xaa;
}

pub(crate) fn u32_at(buf: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(raw)
}

pub(crate) fn u64_at(buf: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(raw)
}

pub(crate) fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn put_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}
