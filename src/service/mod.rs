//! Background-service lifecycle: trait seam plus the systemd implementation.

pub mod systemd;

use crate::core::errors::Result;

/// Unit name the notifier registers under.
pub const SERVICE_NAME: &str = "boot-notifier";

/// Lifecycle operations against the host init system. A single systemd
/// implementation exists; tests substitute a recording mock so no flow
/// depends on shelling out.
pub trait ServiceManager {
    /// Whether the unit appears in the init system's unit list. This check
    /// runs unprivileged.
    fn is_installed(&self) -> Result<bool>;
    /// Write the unit definition and enable + start it. Guard-free; partial
    /// failure is not rolled back.
    fn install(&self) -> Result<()>;
    /// Stop, disable, delete the unit definition, and reload.
    fn uninstall(&self) -> Result<()>;
    /// Start the unit.
    fn start(&self) -> Result<()>;
    /// Stop the unit.
    fn stop(&self) -> Result<()>;
}
