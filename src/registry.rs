//! Partition registry interface
//!
//! The firmware keeps a registry of known partitions (for flashing, erase,
//! and environment lookup). This core only produces entries and hands them
//! off; the registry owns them afterwards.

/// Entry flag: this is the environment partition, mark it writable
pub const FLAG_WRITE_ENV: u32 = 1 << 0;

/// The external partition registry populated by [`load`](crate::load)
pub trait PartitionRegistry {
    /// Drop all known partitions
    fn reset(&mut self);

    /// Maximum name length the registry can store, in bytes, excluding any
    /// terminator. Longer names are truncated before publication.
    fn max_name_len(&self) -> usize;

    /// Publish one partition
    ///
    /// `start_byte` and `length` are byte quantities derived from the
    /// entry's LBA range; `flags` is a bitset of `FLAG_*` constants.
    fn publish(&mut self, name: &str, start_byte: u64, length: u64, flags: u32);
}
