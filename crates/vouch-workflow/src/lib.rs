//! VOUCH Workflow — the OTP channel, the verification workflow
//! controller, and the account/session service.
//!
//! Services are generic over the `vouch-core` repository traits and the
//! collaborator traits defined here, so this crate has no dependency on
//! the database crate or on any transport.

pub mod account;
pub mod collaborators;
pub mod config;
pub mod otp;
pub mod password;
pub mod service;
pub mod token;

pub use account::{AccountService, LoginOutput};
pub use collaborators::{DocumentStore, Mailer, Notifier, Upload};
pub use config::WorkflowConfig;
pub use service::VerificationService;
