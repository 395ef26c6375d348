//! SurrealDB implementation of [`VerificationRepository`].
//!
//! The verification record is one document per account, keyed by the
//! account id. `save` is a single compare-and-set `UPDATE ... WHERE
//! revision = $expected` statement; a revision mismatch surfaces as
//! `Conflict` and is never retried here.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use uuid::Uuid;
use vouch_core::error::VouchResult;
use vouch_core::level::TrustLevel;
use vouch_core::models::verification::{IdCard, LegalDocument, VerificationRecord};
use vouch_core::repository::{PaginatedResult, Pagination, VerificationRepository};

use crate::error::DbError;

/// DB-side row struct. The nested id-card object and document array are
/// stored FLEXIBLE and deserialize through the domain types directly.
#[derive(Debug, Deserialize)]
struct VerificationRow {
    account_id: String,
    company_id: Option<String>,
    email_verified: bool,
    domain_verified: bool,
    id_card: IdCard,
    documents: Vec<LegalDocument>,
    inherited_from_company: bool,
    level: TrustLevel,
    pending_items: u32,
    revision: u64,
    updated_at: DateTime<Utc>,
}

impl VerificationRow {
    fn try_into_record(self) -> Result<VerificationRecord, DbError> {
        let account_id = Uuid::parse_str(&self.account_id)
            .map_err(|e| DbError::Decode(format!("invalid account UUID: {e}")))?;
        let company_id = self
            .company_id
            .map(|s| {
                Uuid::parse_str(&s)
                    .map_err(|e| DbError::Decode(format!("invalid company UUID: {e}")))
            })
            .transpose()?;
        Ok(VerificationRecord {
            account_id,
            company_id,
            email_verified: self.email_verified,
            domain_verified: self.domain_verified,
            id_card: self.id_card,
            documents: self.documents,
            inherited_from_company: self.inherited_from_company,
            level: self.level,
            pending_items: self.pending_items,
            revision: self.revision,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, Deserialize)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Verification repository.
#[derive(Clone)]
pub struct SurrealVerificationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealVerificationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> VerificationRepository for SurrealVerificationRepository<C> {
    async fn create(&self, record: VerificationRecord) -> VouchResult<VerificationRecord> {
        let account_id_str = record.account_id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('verification', $account_id) SET \
                 account_id = $account_id, \
                 company_id = $company_id, \
                 email_verified = $email_verified, \
                 domain_verified = $domain_verified, \
                 id_card = $id_card, \
                 documents = $documents, \
                 inherited_from_company = $inherited_from_company, \
                 level = $level, \
                 pending_items = $pending_items, \
                 revision = 0",
            )
            .bind(("account_id", account_id_str.clone()))
            .bind(("company_id", record.company_id.map(|c| c.to_string())))
            .bind(("email_verified", record.email_verified))
            .bind(("domain_verified", record.domain_verified))
            .bind(("id_card", record.id_card))
            .bind(("documents", record.documents))
            .bind(("inherited_from_company", record.inherited_from_company))
            .bind(("level", record.level))
            .bind(("pending_items", record.pending_items))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| {
            let msg = e.to_string();
            if msg.contains("already exists") || msg.contains("idx_verification_account") {
                DbError::Conflict(format!(
                    "account {account_id_str} already has a verification record"
                ))
            } else {
                DbError::Decode(msg)
            }
        })?;

        let rows: Vec<VerificationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "verification".into(),
            id: account_id_str,
        })?;

        Ok(row.try_into_record()?)
    }

    async fn get(&self, account_id: Uuid) -> VouchResult<VerificationRecord> {
        let account_id_str = account_id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('verification', $account_id)")
            .bind(("account_id", account_id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VerificationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "verification".into(),
            id: account_id_str,
        })?;

        Ok(row.try_into_record()?)
    }

    async fn save(&self, record: VerificationRecord) -> VouchResult<VerificationRecord> {
        let account_id_str = record.account_id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('verification', $account_id) SET \
                 email_verified = $email_verified, \
                 domain_verified = $domain_verified, \
                 id_card = $id_card, \
                 documents = $documents, \
                 level = $level, \
                 pending_items = $pending_items, \
                 revision = revision + 1, \
                 updated_at = time::now() \
                 WHERE revision = $expected_revision",
            )
            .bind(("account_id", account_id_str.clone()))
            .bind(("email_verified", record.email_verified))
            .bind(("domain_verified", record.domain_verified))
            .bind(("id_card", record.id_card))
            .bind(("documents", record.documents))
            .bind(("level", record.level))
            .bind(("pending_items", record.pending_items))
            .bind(("expected_revision", record.revision))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VerificationRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(row.try_into_record()?),
            // The guarded update matched nothing: either the record is
            // gone or another writer won the revision race.
            None => match self.get(record.account_id).await {
                Ok(_) => Err(DbError::Conflict(format!(
                    "verification record for account {account_id_str} was modified concurrently"
                ))
                .into()),
                Err(e) => Err(e),
            },
        }
    }

    async fn company_has_business_approval(&self, company_id: Uuid) -> VouchResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM verification \
                 WHERE company_id = $company_id \
                 AND documents[WHERE status = 'Approved'] != [] \
                 GROUP ALL",
            )
            .bind(("company_id", company_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0) > 0)
    }

    async fn list_pending(
        &self,
        pagination: Pagination,
    ) -> VouchResult<PaginatedResult<VerificationRecord>> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM verification \
                 WHERE pending_items > 0 GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT * FROM verification \
                 WHERE pending_items > 0 \
                 ORDER BY updated_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<VerificationRow> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_record())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
