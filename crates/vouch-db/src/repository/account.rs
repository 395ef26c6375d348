//! SurrealDB implementation of [`AccountRepository`].
//!
//! Raw passwords never reach the table: they are hashed here at create
//! time with Argon2id at the OWASP baseline (19 MiB memory, two
//! iterations, one lane), salted per call, with an optional server-side
//! pepper prepended first.

use std::borrow::Cow;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;
use vouch_core::error::VouchResult;
use vouch_core::models::account::{AccountRole, CreateAccount, EmployerAccount};
use vouch_core::repository::AccountRepository;

use crate::error::DbError;

/// Row shape for queries keyed by a known record id.
#[derive(Debug, Deserialize)]
struct AccountRow {
    email: String,
    password_hash: String,
    company_name: String,
    company_id: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row shape carrying the record id, for the lookup by email.
#[derive(Debug, Deserialize)]
struct AccountRowWithId {
    record_id: String,
    email: String,
    password_hash: String,
    company_name: String,
    company_id: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<AccountRole, DbError> {
    match s {
        "Employer" => Ok(AccountRole::Employer),
        "Admin" => Ok(AccountRole::Admin),
        other => Err(DbError::Decode(format!("unknown account role: {other}"))),
    }
}

fn parse_company_id(raw: Option<String>) -> Result<Option<Uuid>, DbError> {
    raw.map(|s| {
        Uuid::parse_str(&s).map_err(|e| DbError::Decode(format!("invalid company UUID: {e}")))
    })
    .transpose()
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Result<EmployerAccount, DbError> {
        Ok(EmployerAccount {
            id,
            email: self.email,
            password_hash: self.password_hash,
            company_name: self.company_name,
            company_id: parse_company_id(self.company_id)?,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AccountRowWithId {
    fn try_into_account(self) -> Result<EmployerAccount, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid UUID: {e}")))?;
        Ok(EmployerAccount {
            id,
            email: self.email,
            password_hash: self.password_hash,
            company_name: self.company_name,
            company_id: parse_company_id(self.company_id)?,
            role: parse_role(&self.role)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Hash a password for storage. The pepper, when configured, must match
/// the one the login path verifies with.
fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    let input: Cow<[u8]> = match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}").into_bytes()),
        None => Cow::Borrowed(password.as_bytes()),
    };

    // m=19456 KiB, t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Crypto(format!("argon2 params: {e}")))?;
    let hasher = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);

    hasher
        .hash_password(&input, &salt)
        .map(|h| h.to_string())
        .map_err(|e| DbError::Crypto(format!("password hash: {e}")))
}

/// SurrealDB implementation of the Account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create(&self, input: CreateAccount) -> VouchResult<EmployerAccount> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('account', $id) SET \
                 email = $email, \
                 password_hash = $password_hash, \
                 company_name = $company_name, \
                 company_id = $company_id, \
                 role = $role",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email.clone()))
            .bind(("password_hash", password_hash))
            .bind(("company_name", input.company_name))
            .bind(("company_id", input.company_id.map(|c| c.to_string())))
            .bind(("role", input.role.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| {
            let msg = e.to_string();
            if msg.contains("idx_account_email") {
                DbError::Conflict(format!("account with email '{}' already exists", input.email))
            } else {
                DbError::Decode(msg)
            }
        })?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VouchResult<EmployerAccount> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('account', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_email(&self, email: &str) -> VouchResult<EmployerAccount> {
        let email_owned = email.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM account \
                 WHERE email = $email",
            )
            .bind(("email", email_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AccountRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: format!("email={email_owned}"),
        })?;

        Ok(row.try_into_account()?)
    }
}
