//! BN-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Top-level error type for the boot notifier.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("[BN-1001] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[BN-1002] invalid configuration input: {details}")]
    InvalidConfig { details: String },

    #[error("[BN-2001] bad mail address in {field}: {details}")]
    MailAddress {
        field: &'static str,
        details: String,
    },

    #[error("[BN-2002] mail message build failure: {details}")]
    MailMessage { details: String },

    #[error("[BN-2003] mail transport failure: {details}")]
    MailTransport { details: String },

    #[error("[BN-3001] service command failure during {action}: {details}")]
    ServiceCommand {
        action: &'static str,
        details: String,
    },

    #[error("[BN-3900] runtime failure: {details}")]
    Runtime { details: String },

    #[error("[BN-3901] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl NotifyError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ConfigParse { .. } => "BN-1001",
            Self::InvalidConfig { .. } => "BN-1002",
            Self::MailAddress { .. } => "BN-2001",
            Self::MailMessage { .. } => "BN-2002",
            Self::MailTransport { .. } => "BN-2003",
            Self::ServiceCommand { .. } => "BN-3001",
            Self::Runtime { .. } => "BN-3900",
            Self::Io { .. } => "BN-3901",
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<toml::de::Error> for NotifyError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for NotifyError {
    fn from(value: toml::ser::Error) -> Self {
        Self::ConfigParse {
            context: "toml serialization",
            details: value.to_string(),
        }
    }
}

impl From<lettre::error::Error> for NotifyError {
    fn from(value: lettre::error::Error) -> Self {
        Self::MailMessage {
            details: value.to_string(),
        }
    }
}

impl From<lettre::transport::smtp::Error> for NotifyError {
    fn from(value: lettre::transport::smtp::Error) -> Self {
        Self::MailTransport {
            details: value.to_string(),
        }
    }
}
