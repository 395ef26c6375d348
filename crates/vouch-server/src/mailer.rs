//! SMTP delivery of one-time codes via lettre.

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;
use vouch_core::error::{VouchError, VouchResult};
use vouch_workflow::Mailer;

use crate::config::ServerConfig;

pub struct SmtpMailer {
    mailer: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl SmtpMailer {
    /// Build the transport from configuration.
    ///
    /// In the `dev` environment no transport is created; codes are
    /// logged instead of sent.
    pub fn new(config: &ServerConfig) -> VouchResult<Self> {
        if config.app_env == "dev" || config.app_env == "test" {
            return Ok(Self {
                mailer: None,
                from: "dev@vouch.local".into(),
            });
        }

        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| VouchError::Internal("SMTP_HOST must be set outside dev".into()))?;
        let user = config
            .smtp_user
            .clone()
            .ok_or_else(|| VouchError::Internal("SMTP_USER must be set outside dev".into()))?;
        let password = config
            .smtp_password
            .clone()
            .ok_or_else(|| VouchError::Internal("SMTP_PASSWORD must be set outside dev".into()))?;
        let from = config.smtp_from.clone().unwrap_or_else(|| user.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| VouchError::Internal(format!("failed to build mailer: {e}")))?
            .credentials(Credentials::new(user, password))
            .build();

        Ok(Self {
            mailer: Some(mailer),
            from,
        })
    }
}

impl Mailer for SmtpMailer {
    async fn send_otp(&self, to: &str, code: &str) -> VouchResult<()> {
        let Some(mailer) = &self.mailer else {
            info!(to, code, "dev mode: verification code");
            return Ok(());
        };

        let email = Message::builder()
            .from(self.from.parse().map_err(|e| {
                VouchError::Internal(format!("invalid from address: {e}"))
            })?)
            .to(to.parse().map_err(|e| VouchError::Validation {
                message: format!("invalid recipient address: {e}"),
            })?)
            .subject("Your VOUCH verification code")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Your verification code is: {code}\n\nIt expires in 10 minutes."
            ))
            .map_err(|e| VouchError::Internal(format!("failed to build email: {e}")))?;

        mailer
            .send(email)
            .await
            .map_err(|e| VouchError::Internal(format!("failed to send email: {e}")))?;

        Ok(())
    }
}
