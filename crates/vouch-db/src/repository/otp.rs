//! SurrealDB implementation of [`OtpRepository`].
//!
//! Challenges are keyed by account id, so storing a new one is a single
//! `UPSERT` that atomically replaces the prior challenge for the
//! account. Expiry is the caller's concern; this layer only stores.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;
use vouch_core::error::VouchResult;
use vouch_core::models::otp::OtpChallenge;
use vouch_core::repository::OtpRepository;

use crate::error::DbError;

#[derive(Debug, Deserialize)]
struct OtpRow {
    account_id: String,
    code_hash: String,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl OtpRow {
    fn try_into_challenge(self) -> Result<OtpChallenge, DbError> {
        let account_id = Uuid::parse_str(&self.account_id)
            .map_err(|e| DbError::Decode(format!("invalid account UUID: {e}")))?;
        Ok(OtpChallenge {
            account_id,
            code_hash: self.code_hash,
            expires_at: self.expires_at,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the OTP repository.
#[derive(Clone)]
pub struct SurrealOtpRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOtpRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OtpRepository for SurrealOtpRepository<C> {
    async fn put(&self, challenge: OtpChallenge) -> VouchResult<()> {
        self.db
            .query(
                "UPSERT type::record('otp_challenge', $account_id) SET \
                 account_id = $account_id, \
                 code_hash = $code_hash, \
                 expires_at = $expires_at, \
                 created_at = $created_at",
            )
            .bind(("account_id", challenge.account_id.to_string()))
            .bind(("code_hash", challenge.code_hash))
            .bind(("expires_at", challenge.expires_at))
            .bind(("created_at", challenge.created_at))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Decode(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, account_id: Uuid) -> VouchResult<OtpChallenge> {
        let account_id_str = account_id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('otp_challenge', $account_id)")
            .bind(("account_id", account_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OtpRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "otp_challenge".into(),
            id: account_id_str,
        })?;

        Ok(row.try_into_challenge()?)
    }

    async fn delete(&self, account_id: Uuid) -> VouchResult<()> {
        self.db
            .query("DELETE type::record('otp_challenge', $account_id)")
            .bind(("account_id", account_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
