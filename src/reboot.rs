//! Reboot-mode signaling interface
//!
//! Fastboot-style firmware records the requested reboot target (normal
//! boot, back to the bootloader, recovery) in platform scratch storage
//! that survives a warm reset. The storage mechanism is platform business;
//! this core only defines the capability.

/// Where the next boot should go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebootMode {
    /// Regular boot path
    #[default]
    Normal,

    /// Stay in the bootloader (fastboot)
    Bootloader,

    /// Boot the recovery image
    Recovery,
}

/// Platform store for the reboot-mode flag
pub trait RebootModeStore {
    /// Record the mode for the next boot
    fn set(&mut self, mode: RebootMode);

    /// Read the recorded mode and clear it so it applies to one boot only
    fn take(&mut self) -> RebootMode;
}
