//! Load path tests: magic validation, entry import, and strict verification

mod common;

use common::{MemoryBlockDevice, MockRegistry};
use ptable::{format, load, verify, DeviceError, PartitionSpec, TableError, FLAG_WRITE_ENV};

/// Format a device with the given layout, discarding the format-time
/// registry so load can be exercised on its own.
fn formatted(specs: &[PartitionSpec<'_>]) -> MemoryBlockDevice {
    let mut dev = MemoryBlockDevice::new(10000);
    let mut registry = MockRegistry::new();
    format(&mut dev, specs, &mut registry).expect("format should succeed");
    dev
}

#[test]
fn load_rejects_missing_magic() {
    let mut dev = MemoryBlockDevice::new(10000);
    let mut registry = MockRegistry::new();

    assert_eq!(load(&mut dev, &mut registry), Err(TableError::MagicMismatch));
    assert!(registry.entries.is_empty());
}

#[test]
fn load_republishes_written_table() {
    let mut dev = formatted(&[
        PartitionSpec::from_raw("boot", 100),
        PartitionSpec::from_raw("environment", 64),
        PartitionSpec::from_raw("userdata", 0),
    ]);

    let mut registry = MockRegistry::new();
    load(&mut dev, &mut registry).unwrap();

    let names: Vec<&str> = registry.entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["boot", "environment", "userdata"]);

    assert_eq!(registry.entries[0].start_byte, 34 * 512);
    assert_eq!(registry.entries[0].length, 200 * 512);
    assert_eq!(registry.entries[1].flags, FLAG_WRITE_ENV);
    assert_eq!(registry.entries[2].flags, 0);
}

#[test]
fn load_truncates_names_to_registry_limit() {
    let mut dev = formatted(&[
        PartitionSpec::from_raw("verylongname", 100),
        PartitionSpec::from_raw("rest", 0),
    ]);

    let mut registry = MockRegistry::new();
    registry.name_cap = 8;
    load(&mut dev, &mut registry).unwrap();

    assert_eq!(registry.entries[0].name, "verylong");
}

#[test]
fn table_truncates_names_to_36_units() {
    let long = "x".repeat(40);
    let mut dev = formatted(&[
        PartitionSpec::from_raw(&long, 100),
        PartitionSpec::from_raw("rest", 0),
    ]);

    let mut registry = MockRegistry::new();
    registry.name_cap = 64;
    load(&mut dev, &mut registry).unwrap();

    assert_eq!(registry.entries[0].name, "x".repeat(36));
}

#[test]
fn foreign_type_uuid_is_skipped() {
    let mut dev = formatted(&[
        PartitionSpec::from_raw("boot", 100),
        PartitionSpec::from_raw("userdata", 0),
    ]);

    // flip a byte of entry 0's type GUID; load trusts the magic alone, so
    // the entry is skipped rather than the whole table rejected
    dev.data[1024] ^= 0xff;

    let mut registry = MockRegistry::new();
    load(&mut dev, &mut registry).unwrap();

    assert_eq!(registry.entries.len(), 1);
    assert_eq!(registry.entries[0].name, "userdata");
}

#[test]
fn mid_scan_read_failure_keeps_earlier_entries() {
    // six partitions: entries 0-3 live in block 2, entries 4-5 in block 3
    let specs: Vec<PartitionSpec<'_>> = ["p0", "p1", "p2", "p3", "p4", "p5"]
        .iter()
        .map(|&name| PartitionSpec::from_raw(name, 10))
        .collect();
    let mut dev = formatted(&specs);

    dev.fail_read_at = Some(3);

    let mut registry = MockRegistry::new();
    assert_eq!(load(&mut dev, &mut registry), Err(TableError::ShortRead));
    assert_eq!(registry.entries.len(), 4);
}

#[test]
fn header_read_failure_publishes_nothing() {
    let mut dev = formatted(&[PartitionSpec::from_raw("userdata", 0)]);
    dev.fail_read_at = Some(1);

    let mut registry = MockRegistry::new();
    assert_eq!(load(&mut dev, &mut registry), Err(TableError::ShortRead));
    assert!(registry.entries.is_empty());
}

#[test]
fn load_rescan_failure_maps_to_device_error() {
    let mut dev = formatted(&[PartitionSpec::from_raw("userdata", 0)]);
    dev.rescan_error = Some(DeviceError::InitFailed);

    let mut registry = MockRegistry::new();
    assert_eq!(
        load(&mut dev, &mut registry),
        Err(TableError::DeviceInitFailed)
    );
}

#[test]
fn verify_accepts_intact_table() {
    let mut dev = formatted(&[
        PartitionSpec::from_raw("boot", 100),
        PartitionSpec::from_raw("userdata", 0),
    ]);
    verify(&mut dev).expect("freshly written table should verify");
}

#[test]
fn verify_detects_entry_corruption() {
    let mut dev = formatted(&[PartitionSpec::from_raw("userdata", 0)]);
    dev.data[1024 + 33] ^= 0x01;

    assert_eq!(verify(&mut dev), Err(TableError::CrcMismatch));

    // the boot-time loader does not check CRCs and still accepts it
    let mut registry = MockRegistry::new();
    load(&mut dev, &mut registry).unwrap();
    assert_eq!(registry.entries.len(), 1);
}

#[test]
fn verify_detects_header_corruption() {
    let mut dev = formatted(&[PartitionSpec::from_raw("userdata", 0)]);
    dev.data[512 + 48] ^= 0x01; // last usable LBA

    assert_eq!(verify(&mut dev), Err(TableError::CrcMismatch));
}

#[test]
fn verify_rejects_missing_magic() {
    let mut dev = MemoryBlockDevice::new(10000);
    assert_eq!(verify(&mut dev), Err(TableError::MagicMismatch));
}
