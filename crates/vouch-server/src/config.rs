//! Environment-driven server configuration.

use std::env;

use dotenvy::dotenv;
use vouch_db::DbConfig;
use vouch_workflow::WorkflowConfig;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// `dev` logs OTP codes instead of sending mail.
    pub app_env: String,

    pub db_url: String,
    pub db_namespace: String,
    pub db_database: String,
    pub db_username: String,
    pub db_password: String,

    /// Directory for stored ID cards and legal documents.
    pub document_dir: String,

    pub admin_email: String,
    pub admin_password: String,

    pub smtp_host: Option<String>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: Option<String>,

    pub otp_lifetime_secs: u64,
    pub session_lifetime_secs: u64,
    pub pepper: Option<String>,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    pub fn init() -> Self {
        dotenv().ok();

        let port = var_or("SERVER_PORT", "3000")
            .parse::<u16>()
            .expect("SERVER_PORT must be a valid number");
        let otp_lifetime_secs = var_or("OTP_LIFETIME_SECS", "600")
            .parse::<u64>()
            .expect("OTP_LIFETIME_SECS must be a valid number");
        let session_lifetime_secs = var_or("SESSION_LIFETIME_SECS", "2592000")
            .parse::<u64>()
            .expect("SESSION_LIFETIME_SECS must be a valid number");

        Self {
            host: var_or("SERVER_HOST", "0.0.0.0"),
            port,
            rust_log: var_or("RUST_LOG", "info"),
            app_env: var_or("APP_ENV", "dev"),
            db_url: var_or("SURREALDB_URL", "127.0.0.1:8000"),
            db_namespace: var_or("SURREALDB_NAMESPACE", "vouch"),
            db_database: var_or("SURREALDB_DATABASE", "main"),
            db_username: var_or("SURREALDB_USERNAME", "root"),
            db_password: var_or("SURREALDB_PASSWORD", "root"),
            document_dir: var_or("DOCUMENT_DIR", "./documents"),
            admin_email: var_or("ADMIN_EMAIL", "admin@vouch.local"),
            admin_password: env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set"),
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            smtp_from: env::var("SMTP_FROM").ok(),
            otp_lifetime_secs,
            session_lifetime_secs,
            pepper: env::var("PASSWORD_PEPPER").ok(),
        }
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.db_url.clone(),
            namespace: self.db_namespace.clone(),
            database: self.db_database.clone(),
            username: self.db_username.clone(),
            password: self.db_password.clone(),
        }
    }

    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            otp_lifetime_secs: self.otp_lifetime_secs,
            session_lifetime_secs: self.session_lifetime_secs,
            pepper: self.pepper.clone(),
            ..WorkflowConfig::default()
        }
    }
}
