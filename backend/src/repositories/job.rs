//! Job repository for database operations
//!
//! Reads go through the pool. Owner-gated writes take a connection so the
//! service can run lock, check and write inside one transaction.

use crate::auth::Owned;
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, company, position, created_by, status, created_at, updated_at";

/// Job record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRecord {
    pub id: Uuid,
    pub company: String,
    pub position: String,
    pub created_by: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for JobRecord {
    fn owner(&self) -> &str {
        &self.created_by
    }
}

/// Input for creating a job
#[derive(Debug, Clone)]
pub struct CreateJob {
    pub company: String,
    pub position: String,
    pub created_by: String,
}

/// Input for a partial job update
#[derive(Debug, Clone, Default)]
pub struct UpdateJob {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<String>,
}

/// Job repository for database operations
pub struct JobRepository;

impl JobRepository {
    /// Create a new job with status `pending`
    pub async fn create(pool: &PgPool, input: CreateJob) -> Result<JobRecord> {
        let record = sqlx::query_as::<_, JobRecord>(&format!(
            r#"
            INSERT INTO jobs (company, position, created_by)
            VALUES ($1, $2, $3)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(&input.company)
        .bind(&input.position)
        .bind(&input.created_by)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find a job by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<JobRecord>> {
        let record = sqlx::query_as::<_, JobRecord>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// List every job, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<JobRecord>> {
        let records = sqlx::query_as::<_, JobRecord>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// List jobs created by `owner`, newest first
    pub async fn list_by_owner(pool: &PgPool, owner: &str) -> Result<Vec<JobRecord>> {
        let records = sqlx::query_as::<_, JobRecord>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE created_by = $1 ORDER BY created_at DESC"
        ))
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Find a job and lock its row until the transaction ends
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<JobRecord>> {
        let record = sqlx::query_as::<_, JobRecord>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(record)
    }

    /// Update a job only if it is still owned by `owner`
    pub async fn update_owned(
        conn: &mut PgConnection,
        id: Uuid,
        owner: &str,
        updates: UpdateJob,
    ) -> Result<Option<JobRecord>> {
        let record = sqlx::query_as::<_, JobRecord>(&format!(
            r#"
            UPDATE jobs SET
                company = COALESCE($3, company),
                position = COALESCE($4, position),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1 AND created_by = $2
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(updates.company)
        .bind(updates.position)
        .bind(updates.status)
        .fetch_optional(conn)
        .await?;

        Ok(record)
    }

    /// Delete a job only if it is still owned by `owner`, returning it
    pub async fn delete_owned(
        conn: &mut PgConnection,
        id: Uuid,
        owner: &str,
    ) -> Result<Option<JobRecord>> {
        let record = sqlx::query_as::<_, JobRecord>(&format!(
            "DELETE FROM jobs WHERE id = $1 AND created_by = $2 RETURNING {JOB_COLUMNS}"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(conn)
        .await?;

        Ok(record)
    }
}
