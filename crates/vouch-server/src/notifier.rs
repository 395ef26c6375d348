//! Structured-log notification dispatcher.
//!
//! Delivery transport (push, queue) is out of scope; the event stream
//! lands in the structured log where downstream tooling can pick it up.

use tracing::info;
use uuid::Uuid;
use vouch_core::error::VouchResult;
use vouch_core::models::event::VerificationEvent;
use vouch_workflow::Notifier;

pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    async fn notify(&self, account_id: Uuid, event: &VerificationEvent) -> VouchResult<()> {
        let payload = serde_json::to_string(event)
            .unwrap_or_else(|_| "<unserializable event>".into());
        info!(account_id = %account_id, event = %payload, "verification event");
        Ok(())
    }
}
