//! Boot-time host notifier.
//!
//! On boot (typically as a systemd oneshot unit) the program waits for
//! outbound network reachability, gathers host facts (hostname, primary
//! IPv4 address, uptime), and emails a plain-text startup report over
//! authenticated STARTTLS SMTP. It can also install/remove itself as the
//! systemd unit and manage a small persisted configuration.

pub mod cli_app;
pub mod core;
pub mod logger;
pub mod notify;
pub mod probe;
pub mod report;
pub mod service;
