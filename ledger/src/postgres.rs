//! Postgres-backed claim store.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::info;

use spigot_common::{Address, ClaimRecord, Timestamp};

use crate::store::{ClaimStore, Reservation, StoreError, StoreResult};

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS claim_records (
    address     TEXT PRIMARY KEY,
    claimed     BOOLEAN NOT NULL,
    claimed_at  TIMESTAMPTZ
)";

/// The reservation is one conditional upsert: the insert path wins a
/// fresh address, the update path wins a released one, and the WHERE
/// clause makes an already-claimed record a no-op. Concurrent claims for
/// the same address race inside the database, not in process.
const RESERVE: &str = "
INSERT INTO claim_records (address, claimed, claimed_at)
VALUES ($1, TRUE, $2)
ON CONFLICT (address) DO UPDATE
    SET claimed = TRUE, claimed_at = EXCLUDED.claimed_at
    WHERE claim_records.claimed = FALSE";

const RELEASE: &str = "
UPDATE claim_records
SET claimed = FALSE, claimed_at = NULL
WHERE address = $1";

const GET: &str = "
SELECT claimed, claimed_at
FROM claim_records
WHERE address = $1";

/// Claim store backed by Postgres.
pub struct PgClaimStore {
    pool: PgPool,
}

impl PgClaimStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await
            .map_err(unavailable)?;

        Ok(Self::new(pool))
    }

    /// Create the claim table if it does not exist.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(CREATE_TABLE)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        info!("Claim record schema ready");
        Ok(())
    }
}

fn unavailable(error: sqlx::Error) -> StoreError {
    StoreError::Unavailable(error.to_string())
}

#[async_trait::async_trait]
impl ClaimStore for PgClaimStore {
    async fn get(&self, address: &Address) -> StoreResult<Option<ClaimRecord>> {
        let row = sqlx::query(GET)
            .bind(address.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;

        match row {
            Some(row) => {
                let claimed: bool = row.try_get("claimed").map_err(unavailable)?;
                let claimed_at: Option<Timestamp> =
                    row.try_get("claimed_at").map_err(unavailable)?;

                Ok(Some(ClaimRecord {
                    address: address.clone(),
                    claimed,
                    claimed_at,
                }))
            }
            None => Ok(None),
        }
    }

    async fn reserve(&self, address: &Address, at: Timestamp) -> StoreResult<Reservation> {
        let result = sqlx::query(RESERVE)
            .bind(address.as_str())
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        if result.rows_affected() == 1 {
            Ok(Reservation::Reserved)
        } else {
            Ok(Reservation::AlreadyClaimed)
        }
    }

    async fn release(&self, address: &Address) -> StoreResult<()> {
        let result = sqlx::query(RELEASE)
            .bind(address.as_str())
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(address.clone()));
        }

        Ok(())
    }
}
