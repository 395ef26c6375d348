//! Workflow configuration.

/// Configuration for the verification workflow and account services.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// OTP challenge lifetime in seconds (default: 600 = 10 minutes).
    /// Doubles as the resend cooldown: a new code cannot be requested
    /// while a non-expired challenge exists.
    pub otp_lifetime_secs: u64,
    /// Login session lifetime in seconds (default: 2_592_000 = 30 days).
    pub session_lifetime_secs: u64,
    /// Upload size ceiling in bytes (default: 5 MiB). Enforced
    /// server-side regardless of any client-side check.
    pub max_upload_bytes: usize,
    /// Optional pepper prepended to passwords before Argon2id
    /// verification. Must match the pepper used during hashing.
    pub pepper: Option<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            otp_lifetime_secs: 600,
            session_lifetime_secs: 2_592_000,
            max_upload_bytes: 5 * 1024 * 1024,
            pepper: None,
        }
    }
}
