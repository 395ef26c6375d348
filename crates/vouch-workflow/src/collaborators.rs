//! Collaborator traits consumed by the workflow services.
//!
//! Transport specifics (SMTP, filesystem, sockets) live behind these
//! traits in the server crate; the workflow never depends on them.

use uuid::Uuid;
use vouch_core::error::VouchResult;
use vouch_core::models::event::VerificationEvent;

/// A file received from a caller, already decoded to raw bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Delivers one-time codes to an account's registered email address.
pub trait Mailer: Send + Sync {
    fn send_otp(&self, to: &str, code: &str) -> impl Future<Output = VouchResult<()>> + Send;
}

/// Persists uploaded files and hands back addressable references.
pub trait DocumentStore: Send + Sync {
    /// Store the upload and return a stable file reference.
    fn store(&self, upload: &Upload) -> impl Future<Output = VouchResult<String>> + Send;
    /// Resolve a file reference to a retrievable URL.
    fn resolve(&self, file_ref: &str) -> impl Future<Output = VouchResult<String>> + Send;
}

/// Dispatches verification events to the affected employer account.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        account_id: Uuid,
        event: &VerificationEvent,
    ) -> impl Future<Output = VouchResult<()>> + Send;
}
