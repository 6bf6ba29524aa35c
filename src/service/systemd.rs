//! Systemd-backed service management via privileged `systemctl` calls.
//!
//! All privileged operations assume passwordless `sudo`. The unit file is
//! staged in the temp directory and moved into place, so the only writes to
//! `/etc/systemd/system` happen under elevation.

use std::path::PathBuf;
use std::process::Command;

use super::{SERVICE_NAME, ServiceManager};
use crate::core::errors::{NotifyError, Result};

const UNIT_DIR: &str = "/etc/systemd/system";

/// Static description of the unit to register.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    /// Unit name without the `.service` suffix.
    pub unit_name: String,
    /// `Description=` line.
    pub description: String,
    /// `WorkingDirectory=` — the executable's directory.
    pub working_dir: PathBuf,
    /// `ExecStart=` — absolute path of the executable.
    pub exec_start: PathBuf,
}

impl UnitSpec {
    /// Spec for the currently running executable.
    pub fn for_current_exe() -> Result<Self> {
        let exe = std::env::current_exe().map_err(|e| NotifyError::io("<current_exe>", e))?;
        let working_dir = exe
            .parent()
            .map_or_else(|| PathBuf::from("/"), std::path::Path::to_path_buf);
        Ok(Self {
            unit_name: SERVICE_NAME.to_string(),
            description: "Send host startup information".to_string(),
            working_dir,
            exec_start: exe,
        })
    }

    /// `<unit_name>.service`.
    #[must_use]
    pub fn unit_file_name(&self) -> String {
        format!("{}.service", self.unit_name)
    }
}

/// Render the unit file text. The program waits for the network itself, and
/// the unit additionally orders after network-online.
#[must_use]
pub fn render_unit(spec: &UnitSpec) -> String {
    format!(
        "[Unit]\n\
         Description={description}\n\
         After=network-online.target\n\
         Wants=network-online.target\n\
         \n\
         [Service]\n\
         Type=oneshot\n\
         WorkingDirectory={working_dir}\n\
         ExecStart={exec_start}\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n",
        description = spec.description,
        working_dir = spec.working_dir.display(),
        exec_start = spec.exec_start.display(),
    )
}

/// Whether `systemctl list-units` output names the unit.
#[must_use]
pub fn unit_listed(listing: &str, unit_name: &str) -> bool {
    let needle = format!("{unit_name}.service");
    listing
        .lines()
        .any(|line| line.split_whitespace().any(|field| field == needle))
}

/// The one real [`ServiceManager`].
#[derive(Debug, Clone)]
pub struct SystemdManager {
    spec: UnitSpec,
}

impl SystemdManager {
    /// Manage the unit described by `spec`.
    #[must_use]
    pub const fn new(spec: UnitSpec) -> Self {
        Self { spec }
    }

    /// Manage a unit that runs the current executable.
    pub fn for_current_exe() -> Result<Self> {
        Ok(Self::new(UnitSpec::for_current_exe()?))
    }

    fn unit_path(&self) -> PathBuf {
        PathBuf::from(UNIT_DIR).join(self.spec.unit_file_name())
    }

    fn staging_path(&self) -> PathBuf {
        std::env::temp_dir().join(self.spec.unit_file_name())
    }

    fn sudo_systemctl(&self, action: &'static str, args: &[&str]) -> Result<()> {
        let mut full = vec!["systemctl"];
        full.extend_from_slice(args);
        run_privileged(action, &full)
    }
}

impl ServiceManager for SystemdManager {
    fn is_installed(&self) -> Result<bool> {
        let output = Command::new("systemctl")
            .args(["list-units", "--type=service", "--all"])
            .output()
            .map_err(|e| NotifyError::ServiceCommand {
                action: "list-units",
                details: e.to_string(),
            })?;
        Ok(unit_listed(
            &String::from_utf8_lossy(&output.stdout),
            &self.spec.unit_name,
        ))
    }

    fn install(&self) -> Result<()> {
        let staged = self.staging_path();
        std::fs::write(&staged, render_unit(&self.spec))
            .map_err(|e| NotifyError::io(&staged, e))?;

        let unit_path = self.unit_path();
        run_privileged(
            "install",
            &[
                "mv",
                &staged.display().to_string(),
                &unit_path.display().to_string(),
            ],
        )?;
        self.sudo_systemctl("daemon-reload", &["daemon-reload"])?;
        self.sudo_systemctl("enable", &["enable", &self.spec.unit_file_name()])?;
        self.sudo_systemctl("start", &["start", &self.spec.unit_file_name()])?;
        Ok(())
    }

    fn uninstall(&self) -> Result<()> {
        let unit = self.spec.unit_file_name();
        self.sudo_systemctl("stop", &["stop", &unit])?;
        self.sudo_systemctl("disable", &["disable", &unit])?;
        run_privileged("remove-unit", &["rm", &self.unit_path().display().to_string()])?;
        self.sudo_systemctl("daemon-reload", &["daemon-reload"])?;
        Ok(())
    }

    fn start(&self) -> Result<()> {
        self.sudo_systemctl("start", &["start", &self.spec.unit_file_name()])
    }

    fn stop(&self) -> Result<()> {
        self.sudo_systemctl("stop", &["stop", &self.spec.unit_file_name()])
    }
}

fn run_privileged(action: &'static str, args: &[&str]) -> Result<()> {
    let output = Command::new("sudo")
        .args(args)
        .output()
        .map_err(|e| NotifyError::ServiceCommand {
            action,
            details: e.to_string(),
        })?;
    if output.status.success() {
        Ok(())
    } else {
        Err(NotifyError::ServiceCommand {
            action,
            details: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{UnitSpec, render_unit, unit_listed};

    fn spec() -> UnitSpec {
        UnitSpec {
            unit_name: "boot-notifier".into(),
            description: "Send host startup information".into(),
            working_dir: PathBuf::from("/opt/bootnotify"),
            exec_start: PathBuf::from("/opt/bootnotify/bootnotify"),
        }
    }

    #[test]
    fn rendered_unit_carries_paths_and_targets() {
        let text = render_unit(&spec());
        assert!(text.contains("Description=Send host startup information"));
        assert!(text.contains("After=network-online.target"));
        assert!(text.contains("Type=oneshot"));
        assert!(text.contains("WorkingDirectory=/opt/bootnotify"));
        assert!(text.contains("ExecStart=/opt/bootnotify/bootnotify"));
        assert!(text.contains("WantedBy=multi-user.target"));
    }

    #[test]
    fn unit_file_name_appends_service_suffix() {
        assert_eq!(spec().unit_file_name(), "boot-notifier.service");
    }

    #[test]
    fn listing_match_is_exact_on_the_unit_field() {
        let listing = "\
            UNIT                      LOAD   ACTIVE SUB     DESCRIPTION\n\
            boot-notifier.service     loaded active exited  Send host startup information\n\
            cron.service              loaded active running Regular background jobs\n";
        assert!(unit_listed(listing, "boot-notifier"));
        assert!(!unit_listed(listing, "boot"));
        assert!(!unit_listed(listing, "notifier"));
        assert!(!unit_listed("", "boot-notifier"));
    }
}
