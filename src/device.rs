//! Block device interface
//!
//! The table core never talks to hardware directly; the platform supplies
//! an implementation of [`BlockDev`] (eMMC, SD, a RAM disk in tests).
//!
//! Reads and writes return the number of blocks actually transferred, the
//! convention of bootloader block drivers. The core compares the count
//! against the request to detect short transfers; there are no retries.

use gpt_disk_types::{BlockSize, Lba};

/// Errors a device can report while re-probing media
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// No device is present at all
    NotFound,

    /// Device is present but failed to initialize
    InitFailed,
}

/// A block storage device holding the partition table
///
/// The on-disk table layout addresses 512-byte sectors; devices with other
/// block sizes must present 512-byte logical blocks.
pub trait BlockDev {
    /// Reinitialize the device, picking up late-inserted media
    fn rescan(&mut self) -> Result<(), DeviceError>;

    /// Total number of blocks on the device
    fn total_blocks(&mut self) -> u64;

    /// Logical block size in bytes
    fn block_size(&self) -> BlockSize;

    /// Read `count` blocks starting at `start` into `dst`
    ///
    /// `dst` must hold at least `count * block_size` bytes. Returns the
    /// number of blocks actually read.
    fn read(&mut self, start: Lba, count: u64, dst: &mut [u8]) -> u64;

    /// Write `count` blocks starting at `start` from `src`
    ///
    /// `src` must hold at least `count * block_size` bytes. Returns the
    /// number of blocks actually written.
    fn write(&mut self, start: Lba, count: u64, src: &[u8]) -> u64;
}
