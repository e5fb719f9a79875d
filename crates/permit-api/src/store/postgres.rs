//! PostgreSQL permit store.
//!
//! All functions operate on the `permits` table created by the embedded
//! migrations in `migrations/`.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use uuid::Uuid;

use permit_core::{PermitId, Timestamp};
use permit_state::{Permit, PermitStatus, TransitionOutcome, TransitionTarget};

use super::{PermitStore, StoreError, Transitioned};

/// Permit store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgPermitStore {
    pool: PgPool,
}

impl PgPermitStore {
    /// Connect to `url`, select `database`, and apply migrations.
    ///
    /// # Errors
    ///
    /// [`StoreError::Unavailable`] when the server cannot be reached;
    /// [`StoreError::Backend`] for a malformed URL or a failed migration.
    pub async fn connect(url: &str, database: &str) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(url)?.database(database);

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        tracing::info!(database, "connected to PostgreSQL");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool. Migrations are not run.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermitStore for PgPermitStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, permit: &Permit) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO permits (id, name, license_plate, address, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(*permit.id.as_uuid())
        .bind(&permit.name)
        .bind(&permit.license_plate)
        .bind(&permit.address)
        .bind(permit.status.as_str())
        .bind(*permit.created_at.as_datetime())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, status: Option<PermitStatus>) -> Result<Vec<Permit>, StoreError> {
        let rows = sqlx::query_as::<_, PermitRow>(
            "SELECT id, name, license_plate, address, status, created_at
             FROM permits WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at ASC, id ASC",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PermitRow::into_permit).collect()
    }

    async fn transition(
        &self,
        id: PermitId,
        target: TransitionTarget,
    ) -> Result<Option<Transitioned>, StoreError> {
        // The sub-select locks the row so the returned previous status is
        // the one this statement overwrote.
        let row = sqlx::query_as::<_, TransitionRow>(
            "UPDATE permits AS p SET status = $2
             FROM (SELECT id, status FROM permits WHERE id = $1 FOR UPDATE) AS old
             WHERE p.id = old.id
             RETURNING p.id, p.name, p.license_plate, p.address, p.status, p.created_at,
                       old.status AS previous_status",
        )
        .bind(*id.as_uuid())
        .bind(target.status().as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransitionRow::into_transitioned).transpose()
    }

    async fn expire_pending_before(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE permits SET status = $1 WHERE status = $2 AND created_at < $3",
        )
        .bind(PermitStatus::Expired.as_str())
        .bind(PermitStatus::Pending.as_str())
        .bind(*cutoff.as_datetime())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}

#[derive(sqlx::FromRow)]
struct PermitRow {
    id: Uuid,
    name: String,
    license_plate: String,
    address: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl PermitRow {
    fn into_permit(self) -> Result<Permit, StoreError> {
        let status = parse_status(&self.id, &self.status)?;
        Ok(Permit {
            id: PermitId::from_uuid(self.id),
            name: self.name,
            license_plate: self.license_plate,
            address: self.address,
            status,
            created_at: Timestamp::from_utc(self.created_at),
        })
    }
}

#[derive(sqlx::FromRow)]
struct TransitionRow {
    #[sqlx(flatten)]
    permit: PermitRow,
    previous_status: String,
}

impl TransitionRow {
    fn into_transitioned(self) -> Result<Transitioned, StoreError> {
        let from = parse_status(&self.permit.id, &self.previous_status)?;
        let permit = self.permit.into_permit()?;
        Ok(Transitioned {
            outcome: TransitionOutcome {
                from,
                to: permit.status,
            },
            permit,
        })
    }
}

fn parse_status(id: &Uuid, raw: &str) -> Result<PermitStatus, StoreError> {
    raw.parse().map_err(|e: permit_core::ValidationError| StoreError::Corrupt {
        id: id.to_string(),
        reason: e.to_string(),
    })
}
