//! Flat key/value configuration for the SMTP session and recipient.
//!
//! The config file lives next to the executable (the program is installed
//! as a self-contained directory) and is written only by the interactive
//! configure flow. Missing keys are never an error: per-field defaults fill
//! the gaps on load, so every field is present afterwards.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{NotifyError, Result};

/// SMTP and recipient settings.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// SMTP relay hostname.
    pub smtp_host: String,
    /// SMTP submission port (587 for STARTTLS).
    pub smtp_port: u16,
    /// Username for SMTP auth; also the From address.
    pub smtp_username: String,
    /// Password for SMTP auth. Redacted from Debug output.
    pub smtp_password: String,
    /// Single recipient of the startup report.
    pub recipient: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            recipient: "alert@example.com".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"<redacted>")
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl Config {
    /// Load the config from `path`. A missing file yields the defaults;
    /// a present file has absent keys filled with defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| NotifyError::io(path, e))?;
        Ok(toml::from_str(&raw)?)
    }

    /// Persist the config as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| NotifyError::io(parent, e))?;
        }
        std::fs::write(path, toml_str).map_err(|e| NotifyError::io(path, e))?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Well-known file locations
// ---------------------------------------------------------------------------

/// Locations of the files the program owns, anchored at the executable's
/// directory like the service's working directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Flat TOML config file.
    pub config_file: PathBuf,
    /// Append-only error log.
    pub error_log: PathBuf,
}

impl AppPaths {
    /// Resolve paths relative to the running executable.
    pub fn discover() -> Result<Self> {
        let exe = std::env::current_exe().map_err(|e| NotifyError::io("<current_exe>", e))?;
        let dir = exe
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(Self::in_dir(&dir))
    }

    /// Paths rooted at an explicit directory.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config_file: dir.join("config.toml"),
            error_log: dir.join("error.log"),
        }
    }
}

// ---------------------------------------------------------------------------
// Interactive configure flow
// ---------------------------------------------------------------------------

/// Prompt for each setting, keeping the current value on empty input, then
/// save. Generic over reader/writer so tests can drive it with buffers.
pub fn configure<R: BufRead, W: Write>(
    path: &Path,
    input: &mut R,
    output: &mut W,
    verbose: bool,
) -> Result<()> {
    let mut config = Config::load(path)?;

    if let Some(host) = prompt(
        input,
        output,
        &format!("SMTP server (current: {}): ", config.smtp_host),
    )? {
        config.smtp_host = host;
    }

    if let Some(port) = prompt(
        input,
        output,
        &format!("SMTP port (current: {}): ", config.smtp_port),
    )? {
        config.smtp_port = port.parse().map_err(|_| NotifyError::InvalidConfig {
            details: format!("port must be an integer in 1-65535, got {port:?}"),
        })?;
    }

    if let Some(user) = prompt(
        input,
        output,
        &format!("SMTP username (current: {}): ", config.smtp_username),
    )? {
        config.smtp_username = user;
    }

    // Current password is never echoed back.
    if let Some(pass) = prompt(input, output, "SMTP password: ")? {
        config.smtp_password = pass;
    }

    if let Some(recipient) = prompt(
        input,
        output,
        &format!("Recipient (current: {}): ", config.recipient),
    )? {
        config.recipient = recipient;
    }

    config.save(path)?;
    if verbose {
        writeln!(output, "Configuration saved.").map_err(|e| NotifyError::io(path, e))?;
    }
    Ok(())
}

/// Write the prompt, read one line. `None` means "keep the current value"
/// (empty input or EOF).
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>> {
    write!(output, "{label}").map_err(|e| NotifyError::io("<stdout>", e))?;
    output.flush().map_err(|e| NotifyError::io("<stdout>", e))?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| NotifyError::io("<stdin>", e))?;
    if read == 0 {
        return Ok(None);
    }
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
