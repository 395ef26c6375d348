//! Employer account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountRole {
    Employer,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Employer => "Employer",
            AccountRole::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployerAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub company_name: String,
    /// Parent company entity, shared by colleague accounts. Used to grant
    /// inherited business verification.
    pub company_id: Option<Uuid>,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    pub email: String,
    /// Raw password (will be hashed with Argon2id before storage).
    pub password: String,
    pub company_name: String,
    pub company_id: Option<Uuid>,
    pub role: AccountRole,
}
