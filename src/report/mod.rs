//! Host facts snapshot: hostname, primary IPv4 address, uptime.
//!
//! Built fresh once per run and rendered as a fixed-layout text block; the
//! email body treats the rendering as opaque text.

use std::fmt;
use std::net::Ipv4Addr;

use if_addrs::IfAddr;

/// Placeholder when no non-loopback IPv4 interface exists. The IP field is
/// never blank.
pub const IP_UNAVAILABLE: &str = "Unavailable";

/// Ephemeral snapshot of the host at boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostReport {
    /// OS-resolved hostname, `"unknown"` when unresolvable.
    pub hostname: String,
    /// First non-loopback IPv4 address, or [`IP_UNAVAILABLE`].
    pub ip_address: String,
    /// Whole seconds since boot.
    pub uptime_secs: u64,
}

impl HostReport {
    /// Gather the current host facts.
    #[must_use]
    pub fn collect() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|s| s.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string());

        let ip_address = if_addrs::get_if_addrs()
            .map(|interfaces| {
                select_ipv4(interfaces.into_iter().filter_map(|ifa| match ifa.addr {
                    IfAddr::V4(v4) => Some(v4.ip),
                    IfAddr::V6(_) => None,
                }))
            })
            .unwrap_or_default()
            .map_or_else(|| IP_UNAVAILABLE.to_string(), |ip| ip.to_string());

        let uptime_secs = uptime_seconds(
            sysinfo::System::boot_time(),
            chrono::Utc::now().timestamp(),
        );

        Self {
            hostname,
            ip_address,
            uptime_secs,
        }
    }
}

impl fmt::Display for HostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hostname: {}", self.hostname)?;
        writeln!(f, "IP Address: {}", self.ip_address)?;
        write!(f, "Uptime: {}", format_uptime(self.uptime_secs))
    }
}

/// First address outside 127.0.0.0/8, in interface enumeration order.
pub(crate) fn select_ipv4<I>(addrs: I) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = Ipv4Addr>,
{
    addrs.into_iter().find(|ip| !ip.is_loopback())
}

/// Whole seconds between boot and now; clamps a clock that reads earlier
/// than boot to zero.
pub(crate) fn uptime_seconds(boot_epoch_secs: u64, now_epoch_secs: i64) -> u64 {
    let boot = i64::try_from(boot_epoch_secs).unwrap_or(i64::MAX);
    now_epoch_secs.saturating_sub(boot).max(0).unsigned_abs()
}

/// Render seconds as `H:MM:SS`, with a day prefix past 24 hours
/// (`1 day, 1:30:00`). No fractional seconds.
#[must_use]
pub fn format_uptime(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    match days {
        0 => format!("{hours}:{minutes:02}:{seconds:02}"),
        1 => format!("1 day, {hours}:{minutes:02}:{seconds:02}"),
        n => format!("{n} days, {hours}:{minutes:02}:{seconds:02}"),
    }
}
