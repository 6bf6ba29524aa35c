//! Network readiness wait loop: linear polling of a fixed public endpoint.

use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::logger::ErrorLog;

/// One outbound connection attempt used to test reachability.
pub trait Probe {
    /// Attempt one probe. `true` means the network is reachable.
    fn attempt(&self) -> bool;
}

/// TCP probe against a well-known public DNS endpoint.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    endpoint: SocketAddr,
    connect_timeout: Duration,
}

impl TcpProbe {
    /// Probe with an explicit endpoint and per-attempt connect timeout.
    #[must_use]
    pub const fn new(endpoint: SocketAddr, connect_timeout: Duration) -> Self {
        Self {
            endpoint,
            connect_timeout,
        }
    }
}

impl Default for TcpProbe {
    /// Google public DNS on port 53, 5s per attempt.
    fn default() -> Self {
        Self::new(
            SocketAddr::from(([8, 8, 8, 8], 53)),
            Duration::from_secs(5),
        )
    }
}

impl Probe for TcpProbe {
    fn attempt(&self) -> bool {
        TcpStream::connect_timeout(&self.endpoint, self.connect_timeout).is_ok()
    }
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// A probe succeeded; the network is reachable.
    Connected,
    /// Elapsed time reached the timeout without a successful probe.
    TimedOut,
    /// SIGINT/SIGTERM arrived during the wait.
    Interrupted,
}

/// Poll `probe` every `interval` until it succeeds, `timeout` elapses, or
/// the interrupt flag is raised.
///
/// The elapsed check runs before each attempt, so timeout=10s/interval=5s
/// makes at most two attempts before giving up. A timeout appends one line
/// to the error log and prints a user-visible message.
pub fn wait_for_network(
    probe: &dyn Probe,
    timeout: Duration,
    interval: Duration,
    interrupted: &AtomicBool,
    log: &ErrorLog,
    verbose: bool,
) -> WaitOutcome {
    let start = Instant::now();
    loop {
        if interrupted.load(Ordering::Relaxed) {
            return WaitOutcome::Interrupted;
        }
        if start.elapsed() >= timeout {
            log.append("Network connection timed out.");
            println!("Network connection timed out.");
            return WaitOutcome::TimedOut;
        }
        if probe.attempt() {
            if verbose {
                println!("Network connected.");
            }
            return WaitOutcome::Connected;
        }
        if verbose {
            println!("Network not connected, waiting...");
        }
        std::thread::sleep(interval);
    }
}
