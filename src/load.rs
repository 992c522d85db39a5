//! Table read-back and registry publication
//!
//! `load` runs at boot: it validates the header magic at LBA 1, scans the
//! 32 entry-array blocks, and publishes every native entry into the
//! partition registry. Matching the original loader it trusts the magic
//! alone; callers wanting CRC checking use [`verify`].

use alloc::vec::Vec;

use gpt_disk_types::Lba;

use crate::device::BlockDev;
use crate::error::{Result, TableError};
use crate::registry::{PartitionRegistry, FLAG_WRITE_ENV};
use crate::table::{header, GptEntry, GptHeader, CRC32};
use crate::table::{ENTRIES_LBA, ENTRY_SIZE, GPT_MAGIC, SECTOR_SIZE, TABLE_ENTRIES};

const ENTRIES_PER_BLOCK: usize = SECTOR_SIZE / ENTRY_SIZE;
const ENTRY_BLOCKS: u64 = (TABLE_ENTRIES / ENTRIES_PER_BLOCK) as u64;

/// Populate `registry` from the table stored on `dev`
///
/// Entries whose type GUID is not the native constant are skipped. A read
/// failure aborts the scan; partitions already published in this run stay
/// in the registry.
pub fn load<D, R>(dev: &mut D, registry: &mut R) -> Result<()>
where
    D: BlockDev,
    R: PartitionRegistry,
{
    dev.rescan()?;

    let mut block = alloc_block(dev.block_size().to_u32() as usize)?;

    if dev.read(Lba(1), 1, &mut block) != 1 {
        return Err(TableError::ShortRead);
    }
    if block.len() < GPT_MAGIC.len() || &block[..GPT_MAGIC.len()] != GPT_MAGIC {
        return Err(TableError::MagicMismatch);
    }

    for n in 0..ENTRY_BLOCKS {
        if dev.read(Lba(ENTRIES_LBA + n), 1, &mut block) != 1 {
            return Err(TableError::ShortRead);
        }
        for raw in block.chunks_exact(ENTRY_SIZE).take(ENTRIES_PER_BLOCK) {
            if let Some(entry) = GptEntry::decode(raw) {
                import_entry(&entry, registry);
            }
        }
    }

    Ok(())
}

/// Strict integrity check of the on-disk table
///
/// Re-reads the header and the full entry array and checks both stored
/// CRC32 fields. The header CRC is recomputed with the crc32 field bytes
/// zeroed, which is what the writer's two-pass sealing leaves on disk.
pub fn verify<D: BlockDev>(dev: &mut D) -> Result<()> {
    dev.rescan()?;

    let mut block = alloc_block(dev.block_size().to_u32() as usize)?;

    if dev.read(Lba(1), 1, &mut block) != 1 {
        return Err(TableError::ShortRead);
    }
    let stored = GptHeader::decode(&block)?;

    let mut raw = [0u8; header::HEADER_SIZE];
    raw.copy_from_slice(&block[..header::HEADER_SIZE]);
    raw[header::CRC32_OFFSET..header::CRC32_OFFSET + 4].fill(0);
    if CRC32.checksum(&raw) != stored.crc32 {
        return Err(TableError::CrcMismatch);
    }

    let mut digest = CRC32.digest();
    for n in 0..ENTRY_BLOCKS {
        if dev.read(Lba(ENTRIES_LBA + n), 1, &mut block) != 1 {
            return Err(TableError::ShortRead);
        }
        digest.update(&block[..ENTRIES_PER_BLOCK * ENTRY_SIZE]);
    }
    if digest.finalize() != stored.entries_crc32 {
        return Err(TableError::CrcMismatch);
    }

    Ok(())
}

/// One-block scratch buffer; load must fail cleanly when memory is tight
fn alloc_block(len: usize) -> Result<Vec<u8>> {
    let mut block = Vec::new();
    block
        .try_reserve_exact(len)
        .map_err(|_| TableError::AllocationFailed)?;
    block.resize(len, 0);
    Ok(block)
}

fn import_entry<R: PartitionRegistry>(entry: &GptEntry, registry: &mut R) {
    if !entry.is_native() {
        return;
    }

    let (bytes, len) = entry.name_ascii();
    let len = len.min(registry.max_name_len());
    // name_ascii only emits ASCII, so this cannot fail
    let name = core::str::from_utf8(&bytes[..len]).unwrap_or("");

    let mut flags = 0;
    if name == "environment" {
        flags |= FLAG_WRITE_ENV;
    }

    let start_byte = entry.first_lba * SECTOR_SIZE as u64;
    let length = (entry.last_lba.saturating_sub(entry.first_lba) + 1) * SECTOR_SIZE as u64;
    registry.publish(name, start_byte, length, flags);
}
