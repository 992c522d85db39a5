//! Hybrid MBR/GPT Partition Table Builder and Loader
//!
//! A `no_std` implementation of the compact hybrid partition table used by
//! flash boot firmware: one protective MBR sector, one GPT header sector,
//! and a fixed array of 128 partition entries, written contiguously from
//! LBA 0 of the boot device.
//!
//! # Overview
//!
//! Boards declare their flash layout as an ordered list of partition specs
//! (name plus size in KB). This crate provides:
//! - A byte-exact codec for the on-disk table image (protective MBR, GPT
//!   header, entry array, CRC32 integrity fields)
//! - A layout planner that turns the declarative spec list into concrete
//!   LBA ranges
//! - `format` to build and persist a fresh table to a block device
//! - `load` to read the table back at boot and publish each partition into
//!   the firmware's partition registry
//!
//! # Architecture
//!
//! The implementation is layered:
//! 1. **Table layer** - the owned table image and its encode/decode codec
//! 2. **Layout layer** - spec list to LBA range planning
//! 3. **Format layer** - table construction and device write
//! 4. **Load layer** - device read, validation, and registry publication
//!
//! Collaborators (block device, partition registry, reboot-mode store) are
//! traits implemented by the platform.
//!
//! # Usage
//!
//! ```ignore
//! use ptable::{format, load, PartitionSpec};
//!
//! let layout = [
//!     PartitionSpec::from_raw("xloader", 128),
//!     PartitionSpec::from_raw("bootloader", 256),
//!     PartitionSpec::from_raw("-", 512),
//!     PartitionSpec::from_raw("environment", 128),
//!     PartitionSpec::from_raw("userdata", 0),
//! ];
//!
//! // "oem format": build the table and write it to the device
//! format(&mut device, &layout, &mut registry)?;
//!
//! // at boot: repopulate the registry from the on-disk table
//! load(&mut device, &mut registry)?;
//! ```
//!
//! The on-disk format assumes 512-byte sectors. It deliberately omits the
//! backup header and alternate entry array of full GPT.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod device;
pub mod error;
pub mod format;
pub mod layout;
pub mod load;
pub mod reboot;
pub mod registry;
pub mod table;

pub use error::{Result, TableError};
pub use device::{BlockDev, DeviceError};
pub use registry::{PartitionRegistry, FLAG_WRITE_ENV};
pub use reboot::{RebootMode, RebootModeStore};
pub use table::{GptEntry, GptHeader, PartitionTable};
pub use layout::{plan, PartitionSpec};

// High-level API exports
pub use format::format;
pub use load::{load, verify};
