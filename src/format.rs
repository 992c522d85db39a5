//! Table construction and device write
//!
//! `format` is the "oem format" entry point: it plans the declared layout,
//! seals the table, and persists it from block 0. The operation is not
//! transactional; on failure the on-disk table may be partially written.

use gpt_disk_types::Lba;

use crate::device::BlockDev;
use crate::error::{Result, TableError};
use crate::layout::{plan, PartitionSpec};
use crate::load::load;
use crate::registry::PartitionRegistry;
use crate::table::{PartitionTable, TABLE_BYTES};

/// Build a fresh partition table from `specs` and write it to `dev`
///
/// On success the table is read back from the device and every partition
/// is republished into `registry`, verifying the round trip. The registry
/// is reset before the write, so a failed format leaves it empty.
pub fn format<D, R>(dev: &mut D, specs: &[PartitionSpec<'_>], registry: &mut R) -> Result<()>
where
    D: BlockDev,
    R: PartitionRegistry,
{
    // rescan so a card inserted after boot is picked up
    dev.rescan()?;

    let total_blocks = dev.total_blocks();
    if total_blocks == 0 {
        return Err(TableError::DeviceEmpty);
    }

    let mut table = PartitionTable::start(total_blocks);
    plan(&mut table, specs, total_blocks)?;
    table.finish();

    registry.reset();

    let block_size = u64::from(dev.block_size().to_u32());
    let blocks_to_write = (TABLE_BYTES as u64).div_ceil(block_size);
    let written = dev.write(Lba(0), blocks_to_write, table.as_bytes());
    if written != blocks_to_write {
        return Err(TableError::ShortWrite);
    }

    load(dev, registry)
}
