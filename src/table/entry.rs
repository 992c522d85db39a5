//! GPT entry encoding and decoding
//!
//! Each of the 128 slots is 128 bytes: type GUID, unique GUID, LBA range,
//! attribute bits, and a 36-code-unit UTF-16 name. Names are ASCII widened
//! on write and narrowed on read; the firmware never stores wide names.

use crate::table::{put_u64, u64_at, ENTRY_NAME_LEN, ENTRY_SIZE, NATIVE_PARTITION_GUID};

const NAME_OFFSET: usize = 56;

/// Decoded partition entry values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GptEntry {
    /// Partition type GUID, wire form
    pub type_uuid: [u8; 16],
    /// Per-entry unique GUID, wire form
    pub uniq_uuid: [u8; 16],
    /// First LBA of the partition
    pub first_lba: u64,
    /// Last LBA of the partition, inclusive; zero marks a free slot
    pub last_lba: u64,
    /// Attribute bits, unused
    pub attr: u64,
    /// Name as UTF-16 code units, zero padded
    pub name: [u16; ENTRY_NAME_LEN],
}

impl GptEntry {
    /// Decode one entry; `raw` must hold at least 128 bytes
    pub fn decode(raw: &[u8]) -> Option<Self> {
        if raw.len() < ENTRY_SIZE {
            return None;
        }

        let mut type_uuid = [0u8; 16];
        type_uuid.copy_from_slice(&raw[..16]);
        let mut uniq_uuid = [0u8; 16];
        uniq_uuid.copy_from_slice(&raw[16..32]);

        let mut name = [0u16; ENTRY_NAME_LEN];
        for (i, unit) in name.iter_mut().enumerate() {
            let off = NAME_OFFSET + i * 2;
            *unit = u16::from_le_bytes([raw[off], raw[off + 1]]);
        }

        Some(Self {
            type_uuid,
            uniq_uuid,
            first_lba: u64_at(raw, 32),
            last_lba: u64_at(raw, 40),
            attr: u64_at(raw, 48),
            name,
        })
    }

    pub(crate) fn encode_into(&self, raw: &mut [u8]) {
        raw[..16].copy_from_slice(&self.type_uuid);
        raw[16..32].copy_from_slice(&self.uniq_uuid);
        put_u64(raw, 32, self.first_lba);
        put_u64(raw, 40, self.last_lba);
        put_u64(raw, 48, self.attr);
        for (i, unit) in self.name.iter().enumerate() {
            let off = NAME_OFFSET + i * 2;
            raw[off..off + 2].copy_from_slice(&unit.to_le_bytes());
        }
    }

    /// A slot is free while its `last_lba` is zero
    pub fn is_free(&self) -> bool {
        self.last_lba == 0
    }

    /// Does the type GUID mark this as a native firmware partition?
    pub fn is_native(&self) -> bool {
        self.type_uuid == NATIVE_PARTITION_GUID.to_bytes()
    }

    /// Narrow the name back to ASCII bytes
    ///
    /// Returns the byte buffer and the name length. A NUL or any code unit
    /// above 0x7f ends the name.
    pub fn name_ascii(&self) -> ([u8; ENTRY_NAME_LEN], usize) {
        let mut bytes = [0u8; ENTRY_NAME_LEN];
        let mut len = 0;
        for &unit in &self.name {
            if unit == 0 || unit > 0x7f {
                break;
            }
            bytes[len] = unit as u8;
            len += 1;
        }
        (bytes, len)
    }
}

/// Widen an ASCII name to the fixed UTF-16 field, truncating at 36 units
pub(crate) fn encode_name(name: &str) -> [u16; ENTRY_NAME_LEN] {
    let mut units = [0u16; ENTRY_NAME_LEN];
    for (unit, byte) in units.iter_mut().zip(name.bytes()) {
        *unit = u16::from(byte);
    }
    units
}
