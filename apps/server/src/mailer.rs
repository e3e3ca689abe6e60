//! # Outbound Email
//!
//! The server only ever sends one kind of email: a short-lived 6-digit code.
//! `Mailer` is the seam; the default implementation writes the code to the
//! log, which is what development and the test environment use. A real
//! delivery backend plugs in behind the same trait.

use tracing::info;

/// What a code email is for; picks the wording.
#[derive(Debug, Clone, Copy)]
pub enum CodeEmail {
    Verification,
    PasswordReset,
}

/// Delivery seam for code emails.
pub trait Mailer: Send + Sync {
    fn send_code(&self, to: &str, kind: CodeEmail, code: &str);
}

/// Development mailer: the "delivery" is a log line.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_code(&self, to: &str, kind: CodeEmail, code: &str) {
        info!(to = %to, kind = ?kind, code = %code, "Code email (log delivery)");
    }
}
