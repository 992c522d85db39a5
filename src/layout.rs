//! Layout planning
//!
//! Boards declare their flash layout as an ordered spec list; the planner
//! walks it with a running sector cursor and converts each spec into a
//! concrete LBA range, feeding the table codec. 1 KB = 2 sectors.

use crate::error::{Result, TableError};
use crate::table::{PartitionTable, FIRST_USABLE_LBA};

/// Sectors per declared KB
const SECTORS_PER_KB: u64 = 2;

/// One board-declared partition spec
///
/// Raw board tables use two sentinels: the name `"-"` for a gap and a size
/// of zero for "consume the rest of the device". [`from_raw`](Self::from_raw)
/// maps them onto the explicit variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionSpec<'a> {
    /// Skip space without creating a partition
    Gap {
        /// Gap size in KB
        size_kb: u64,
    },
    /// A fixed-size named partition
    Fixed {
        /// Partition name
        name: &'a str,
        /// Partition size in KB; zero behaves like [`FillRemaining`](Self::FillRemaining)
        size_kb: u64,
    },
    /// A named partition claiming all remaining device space
    ///
    /// Anything declared after this one fails the fit check, since nothing
    /// is left to allocate. The planner does not reorder specs.
    FillRemaining {
        /// Partition name
        name: &'a str,
    },
}

impl<'a> PartitionSpec<'a> {
    /// Build a spec from a raw board (name, size_kb) pair, applying the
    /// gap and fill-remaining sentinels
    pub fn from_raw(name: &'a str, size_kb: u64) -> Self {
        if name == "-" {
            Self::Gap { size_kb }
        } else if size_kb == 0 {
            Self::FillRemaining { name }
        } else {
            Self::Fixed { name, size_kb }
        }
    }
}

/// Place every spec into the table, in declaration order
///
/// The cursor starts at the first usable LBA (the table itself occupies
/// sectors 0..34). Any placement failure aborts the whole plan.
pub fn plan(
    table: &mut PartitionTable,
    specs: &[PartitionSpec<'_>],
    total_blocks: u64,
) -> Result<()> {
    let mut next = FIRST_USABLE_LBA;

    for spec in specs {
        let (name, size) = match *spec {
            PartitionSpec::Gap { size_kb } => {
                next += size_kb * SECTORS_PER_KB;
                continue;
            }
            PartitionSpec::Fixed { name, size_kb } if size_kb > 0 => {
                (name, size_kb * SECTORS_PER_KB)
            }
            PartitionSpec::Fixed { name, .. } | PartitionSpec::FillRemaining { name } => {
                (name, total_blocks.saturating_sub(next))
            }
        };

        if size == 0 {
            return Err(TableError::PartitionTooLarge);
        }

        table.add(next, next + size - 1, name)?;
        next += size;
    }

    Ok(())
}
