//! Error types for partition table operations

use core::fmt;

use crate::device::DeviceError;

/// Result type for partition table operations
pub type Result<T> = core::result::Result<T, TableError>;

/// Errors that can occur while building, writing, or loading the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// Block device not present
    DeviceNotFound,

    /// Block device failed to (re)initialize
    DeviceInitFailed,

    /// Block device reports zero blocks
    DeviceEmpty,

    /// Partition starts inside the partition table region (LBA < 34)
    PartitionOverlapsTable,

    /// Partition extends past the last usable LBA
    PartitionTooLarge,

    /// No free entry slots left in the table
    TableFull,

    /// Device wrote fewer blocks than requested
    ShortWrite,

    /// Device read fewer blocks than requested
    ShortRead,

    /// Header block does not carry the "EFI PART" magic
    MagicMismatch,

    /// Scratch buffer allocation failed
    AllocationFailed,

    /// Stored CRC32 does not match the recomputed value
    CrcMismatch,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotFound => write!(f, "block device not found"),
            Self::DeviceInitFailed => write!(f, "error initializing block device"),
            Self::DeviceEmpty => write!(f, "block device has no space"),
            Self::PartitionOverlapsTable => write!(f, "partition overlaps partition table"),
            Self::PartitionTooLarge => write!(f, "partition does not fit"),
            Self::TableFull => write!(f, "out of partition table entries"),
            Self::ShortWrite => write!(f, "device wrote fewer blocks than requested"),
            Self::ShortRead => write!(f, "error reading partition table"),
            Self::MagicMismatch => write!(f, "partition table not found"),
            Self::AllocationFailed => write!(f, "error allocating block buffer"),
            Self::CrcMismatch => write!(f, "partition table checksum mismatch"),
        }
    }
}

impl From<DeviceError> for TableError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::NotFound => Self::DeviceNotFound,
            DeviceError::InitFailed => Self::DeviceInitFailed,
        }
    }
}
