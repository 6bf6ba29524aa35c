//! Startup-report delivery over authenticated STARTTLS SMTP.

use colored::Colorize as _;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::core::config::Config;
use crate::core::errors::{NotifyError, Result};
use crate::logger::ErrorLog;

/// Subject line of the startup report.
pub const REPORT_SUBJECT: &str = "Host Startup Info";

/// Outbound mail delivery. One implementation speaks SMTP; tests substitute
/// a recording mock.
pub trait Mailer {
    /// Deliver one plain-text message to the configured recipient.
    fn send(&self, subject: &str, body: &str, config: &Config) -> Result<()>;
}

/// Production mailer: STARTTLS session against `(smtp_host, smtp_port)`,
/// authenticated with the configured credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

impl Mailer for SmtpMailer {
    fn send(&self, subject: &str, body: &str, config: &Config) -> Result<()> {
        let from = config
            .smtp_username
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::MailAddress {
                field: "smtp_username",
                details: e.to_string(),
            })?;
        let to = config
            .recipient
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::MailAddress {
                field: "recipient",
                details: e.to_string(),
            })?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .date_now()
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let transport = SmtpTransport::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        transport.send(&message)?;
        Ok(())
    }
}

/// Send the report, converting any failure into exactly one error-log line.
/// Delivery failures never propagate; the run still exits zero.
pub fn send_or_log(
    mailer: &dyn Mailer,
    subject: &str,
    body: &str,
    config: &Config,
    log: &ErrorLog,
    verbose: bool,
) {
    match mailer.send(subject, body, config) {
        Ok(()) => {
            if verbose {
                println!("{}", "Email sent successfully!".green());
            }
        }
        Err(e) => {
            log.append(&format!("Failed to send email: {e}"));
            if verbose {
                let line = format!("Failed to send email: {e}");
                println!("{}", line.as_str().red());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tempfile::TempDir;

    use super::{Mailer, REPORT_SUBJECT, SmtpMailer, send_or_log};
    use crate::core::config::Config;
    use crate::core::errors::{NotifyError, Result};
    use crate::logger::ErrorLog;

    struct FailingMailer;

    impl Mailer for FailingMailer {
        fn send(&self, _subject: &str, _body: &str, _config: &Config) -> Result<()> {
            Err(NotifyError::MailTransport {
                details: "connection refused".into(),
            })
        }
    }

    struct CountingMailer {
        sent: Cell<usize>,
    }

    impl Mailer for CountingMailer {
        fn send(&self, _subject: &str, _body: &str, _config: &Config) -> Result<()> {
            self.sent.set(self.sent.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn delivery_failure_logs_exactly_one_line_and_does_not_raise() {
        let tmp = TempDir::new().unwrap();
        let log = ErrorLog::new(tmp.path().join("error.log"));

        send_or_log(
            &FailingMailer,
            REPORT_SUBJECT,
            "body",
            &Config::default(),
            &log,
            false,
        );

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("Failed to send email:"));
        assert!(contents.contains("BN-2003"));
    }

    #[test]
    fn successful_delivery_writes_no_log_line() {
        let tmp = TempDir::new().unwrap();
        let log = ErrorLog::new(tmp.path().join("error.log"));
        let mailer = CountingMailer { sent: Cell::new(0) };

        send_or_log(&mailer, REPORT_SUBJECT, "body", &Config::default(), &log, false);

        assert_eq!(mailer.sent.get(), 1);
        assert!(!log.path().exists());
    }

    #[test]
    fn empty_from_address_is_a_field_tagged_error() {
        // Default config carries empty credentials; the From mailbox cannot
        // parse, so the failure is categorized before any network activity.
        let err = SmtpMailer
            .send(REPORT_SUBJECT, "body", &Config::default())
            .unwrap_err();
        assert!(
            matches!(
                err,
                NotifyError::MailAddress {
                    field: "smtp_username",
                    ..
                }
            ),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn bad_recipient_is_reported_as_recipient() {
        let config = Config {
            smtp_username: "robot@example.com".into(),
            recipient: "not an address".into(),
            ..Config::default()
        };
        let err = SmtpMailer.send(REPORT_SUBJECT, "body", &config).unwrap_err();
        assert!(matches!(
            err,
            NotifyError::MailAddress {
                field: "recipient",
                ..
            }
        ));
    }
}
