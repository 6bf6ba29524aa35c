//! Top-level CLI definition and dispatch.
//!
//! Modes are mutually exclusive flags; the default (no mode flag) runs the
//! probe -> report -> notify pipeline. Every flow receives its collaborators
//! through [`AppEnv`] rather than globals, so tests can substitute mocks.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::Parser;
use colored::Colorize as _;
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::core::config::{AppPaths, Config, configure};
use crate::core::errors::{NotifyError, Result};
use crate::logger::ErrorLog;
use crate::notify::{Mailer, REPORT_SUBJECT, SmtpMailer, send_or_log};
use crate::probe::{Probe, TcpProbe, WaitOutcome, wait_for_network};
use crate::report::HostReport;
use crate::service::systemd::SystemdManager;
use crate::service::{SERVICE_NAME, ServiceManager};

/// Boot-time host notifier: wait for the network, then email a startup report.
#[derive(Debug, Parser)]
#[command(name = "bootnotify", version, about)]
pub struct Cli {
    /// Only display the report without sending the notification.
    #[arg(long)]
    pub console: bool,

    /// Echo progress and the report to the console.
    #[arg(long)]
    pub verbose: bool,

    /// Install the notifier as a systemd service.
    #[arg(long, group = "mode")]
    pub install: bool,

    /// Uninstall the systemd service.
    #[arg(long, group = "mode")]
    pub uninstall: bool,

    /// Start the service if installed.
    #[arg(long, group = "mode")]
    pub start: bool,

    /// Stop the service if installed.
    #[arg(long, group = "mode")]
    pub stop: bool,

    /// Interactively edit the persisted settings.
    #[arg(long, group = "mode")]
    pub configure: bool,
}

/// Timing of the network readiness wait.
#[derive(Debug, Clone, Copy)]
pub struct WaitPolicy {
    /// Total time to keep polling before giving up.
    pub timeout: Duration,
    /// Sleep between probe attempts.
    pub interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(5),
        }
    }
}

/// Collaborators for one run. Production wiring lives in [`run`]; tests
/// build this directly with mocks.
pub struct AppEnv<'a> {
    /// Loaded SMTP/recipient settings.
    pub config: Config,
    /// Append-only failure log.
    pub log: ErrorLog,
    /// Init-system operations.
    pub service: &'a dyn ServiceManager,
    /// Outbound mail delivery.
    pub mailer: &'a dyn Mailer,
    /// Reachability probe.
    pub probe: &'a dyn Probe,
    /// Wait loop timing.
    pub wait: WaitPolicy,
    /// Raised by SIGINT/SIGTERM.
    pub interrupted: Arc<AtomicBool>,
}

/// Wire up the production environment and dispatch.
pub fn run(cli: &Cli) -> Result<()> {
    let paths = AppPaths::discover()?;

    if cli.configure {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        return configure(&paths.config_file, &mut input, &mut output, cli.verbose);
    }

    let config = Config::load(&paths.config_file)?;

    let interrupted = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&interrupted)).map_err(|e| {
            NotifyError::Runtime {
                details: format!("signal handler registration failed: {e}"),
            }
        })?;
    }

    let service = SystemdManager::for_current_exe()?;
    let mailer = SmtpMailer;
    let probe = TcpProbe::default();
    let env = AppEnv {
        config,
        log: ErrorLog::new(paths.error_log),
        service: &service,
        mailer: &mailer,
        probe: &probe,
        wait: WaitPolicy::default(),
        interrupted,
    };
    run_with(cli, &env)
}

/// Dispatch one mode against an explicit environment.
///
/// Only the install path propagates failure to the exit code; service
/// start/stop/uninstall and mail failures are logged and swallowed.
pub fn run_with(cli: &Cli, env: &AppEnv) -> Result<()> {
    if cli.install {
        return install_service(env, cli.verbose);
    }
    if cli.uninstall {
        guarded_service_op(
            env,
            cli.verbose,
            |s| s.uninstall(),
            "Failed to remove service",
            "Service removed.",
        );
        return Ok(());
    }
    if cli.start {
        guarded_service_op(
            env,
            cli.verbose,
            |s| s.start(),
            "Failed to start service",
            "Service started.",
        );
        return Ok(());
    }
    if cli.stop {
        guarded_service_op(
            env,
            cli.verbose,
            |s| s.stop(),
            "Failed to stop service",
            "Service stopped.",
        );
        return Ok(());
    }
    default_run(cli, env)
}

fn install_service(env: &AppEnv, verbose: bool) -> Result<()> {
    match env.service.install() {
        Ok(()) => {
            if verbose {
                println!("{}", "Service installed, enabled and started.".green());
            }
            Ok(())
        }
        Err(e) => {
            env.log.append(&format!("Failed to install service: {e}"));
            Err(e)
        }
    }
}

/// Run a lifecycle operation only when the unit is installed; otherwise
/// print a notice and make no privileged call.
fn guarded_service_op(
    env: &AppEnv,
    verbose: bool,
    op: impl FnOnce(&dyn ServiceManager) -> Result<()>,
    failure_label: &str,
    done_message: &str,
) {
    match env.service.is_installed() {
        Ok(true) => match op(env.service) {
            Ok(()) => {
                if verbose {
                    println!("{}", done_message.green());
                }
            }
            Err(e) => {
                let line = format!("{failure_label}: {e}");
                env.log.append(&line);
                eprintln!("{}", line.as_str().red());
            }
        },
        Ok(false) => {
            println!("Service '{SERVICE_NAME}.service' is not installed.");
        }
        Err(e) => {
            let line = format!("Failed to query service state: {e}");
            env.log.append(&line);
            eprintln!("{}", line.as_str().red());
        }
    }
}

fn default_run(cli: &Cli, env: &AppEnv) -> Result<()> {
    match wait_for_network(
        env.probe,
        env.wait.timeout,
        env.wait.interval,
        &env.interrupted,
        &env.log,
        cli.verbose,
    ) {
        WaitOutcome::Connected => {}
        WaitOutcome::TimedOut => {
            println!("Network is not available. Exiting.");
            return Ok(());
        }
        WaitOutcome::Interrupted => {
            if cli.verbose {
                println!("Stopping...");
            }
            return Ok(());
        }
    }

    let report = HostReport::collect();
    let body = report.to_string();
    if cli.verbose {
        println!("{body}");
    }
    if !cli.console {
        send_or_log(
            env.mailer,
            REPORT_SUBJECT,
            &body,
            &env.config,
            &env.log,
            cli.verbose,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::Cli;

    #[test]
    fn default_invocation_selects_no_mode() {
        let cli = Cli::try_parse_from(["bootnotify"]).unwrap();
        assert!(!cli.console && !cli.verbose);
        assert!(!cli.install && !cli.uninstall && !cli.start && !cli.stop && !cli.configure);
    }

    #[test]
    fn console_and_verbose_combine() {
        let cli = Cli::try_parse_from(["bootnotify", "--console", "--verbose"]).unwrap();
        assert!(cli.console);
        assert!(cli.verbose);
    }

    #[test]
    fn mode_flags_are_mutually_exclusive() {
        for args in [
            ["bootnotify", "--install", "--uninstall"],
            ["bootnotify", "--start", "--stop"],
            ["bootnotify", "--configure", "--install"],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{args:?} should conflict");
        }
    }

    #[test]
    fn verbose_combines_with_a_mode_flag() {
        let cli = Cli::try_parse_from(["bootnotify", "--install", "--verbose"]).unwrap();
        assert!(cli.install);
        assert!(cli.verbose);
    }

    #[test]
    fn host_list_flags_are_not_part_of_the_surface() {
        assert!(Cli::try_parse_from(["bootnotify", "--add", "pi5"]).is_err());
        assert!(Cli::try_parse_from(["bootnotify", "--remove", "pi5"]).is_err());
    }
}
