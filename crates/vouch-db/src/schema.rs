//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. The nested id-card object and
//! the legal-document array are FLEXIBLE; their shape is owned by the
//! domain types in `vouch-core`.

use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, Deserialize)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Employer accounts
-- =======================================================================
DEFINE TABLE account SCHEMAFULL;
DEFINE FIELD email ON TABLE account TYPE string;
DEFINE FIELD password_hash ON TABLE account TYPE string;
DEFINE FIELD company_name ON TABLE account TYPE string;
DEFINE FIELD company_id ON TABLE account TYPE option<string>;
DEFINE FIELD role ON TABLE account TYPE string \
    ASSERT $value IN ['Employer', 'Admin'];
DEFINE FIELD created_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_account_email ON TABLE account COLUMNS email UNIQUE;

-- =======================================================================
-- Verification records (one per account, keyed by account id)
-- =======================================================================
DEFINE TABLE verification SCHEMAFULL;
DEFINE FIELD account_id ON TABLE verification TYPE string;
DEFINE FIELD company_id ON TABLE verification TYPE option<string>;
DEFINE FIELD email_verified ON TABLE verification TYPE bool \
    DEFAULT false;
DEFINE FIELD domain_verified ON TABLE verification TYPE bool \
    DEFAULT false;
DEFINE FIELD id_card ON TABLE verification TYPE object FLEXIBLE;
DEFINE FIELD documents ON TABLE verification TYPE array DEFAULT [];
DEFINE FIELD documents.* ON TABLE verification TYPE object FLEXIBLE;
DEFINE FIELD inherited_from_company ON TABLE verification TYPE bool \
    DEFAULT false;
DEFINE FIELD level ON TABLE verification TYPE int \
    ASSERT $value IN [0, 1, 2];
DEFINE FIELD pending_items ON TABLE verification TYPE int DEFAULT 0;
DEFINE FIELD revision ON TABLE verification TYPE int DEFAULT 0;
DEFINE FIELD updated_at ON TABLE verification TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_verification_account ON TABLE verification \
    COLUMNS account_id UNIQUE;
DEFINE INDEX idx_verification_company ON TABLE verification \
    COLUMNS company_id;
DEFINE INDEX idx_verification_pending ON TABLE verification \
    COLUMNS pending_items;

-- =======================================================================
-- OTP challenges (at most one per account, keyed by account id)
-- =======================================================================
DEFINE TABLE otp_challenge SCHEMAFULL;
DEFINE FIELD account_id ON TABLE otp_challenge TYPE string;
DEFINE FIELD code_hash ON TABLE otp_challenge TYPE string;
DEFINE FIELD expires_at ON TABLE otp_challenge TYPE datetime;
DEFINE FIELD created_at ON TABLE otp_challenge TYPE datetime;
DEFINE INDEX idx_otp_account ON TABLE otp_challenge \
    COLUMNS account_id UNIQUE;

-- =======================================================================
-- Login sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD account_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_account ON TABLE session COLUMNS account_id;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
