//! User repository for database operations
//!
//! This is the credential store: uniqueness of `username` and `email` is
//! enforced by unique indexes, the `*_exists` lookups only give friendlier
//! errors ahead of the insert.

use anyhow::Result;
use chrono::{DateTime, Utc};
use job_tracker_shared::User;
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
            email: record.email,
            username: record.username,
            hashed_password: record.hashed_password,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Input for creating a user; `username` must already be lowercase
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
}

/// Input for a partial profile update
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user
    pub async fn create(pool: &PgPool, input: CreateUser) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (full_name, email, username, hashed_password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, full_name, email, username, hashed_password, created_at, updated_at
            "#,
        )
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.username)
        .bind(&input.hashed_password)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by (lowercase) username
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, full_name, email, username, hashed_password, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Check if a username is taken, optionally ignoring one user
    pub async fn username_exists(
        pool: &PgPool,
        username: &str,
        except_id: Option<Uuid>,
    ) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(username)
        .bind(except_id)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Check if an email is registered, optionally ignoring one user
    pub async fn email_exists(
        pool: &PgPool,
        email: &str,
        except_id: Option<Uuid>,
    ) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except_id)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }

    /// Apply a partial update to the user identified by `username`
    ///
    /// A username change cascades to the `created_by` column of owned jobs.
    pub async fn update(
        pool: &PgPool,
        username: &str,
        updates: UpdateUser,
    ) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email),
                username = COALESCE($4, username),
                updated_at = NOW()
            WHERE username = $1
            RETURNING id, full_name, email, username, hashed_password, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(updates.full_name)
        .bind(updates.email)
        .bind(updates.username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_converts_to_model() {
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            full_name: "Alice Johnson".to_string(),
            email: "alice@example.com".to_string(),
            username: "alicej".to_string(),
            hashed_password: "$argon2id$...".to_string(),
            created_at: now,
            updated_at: now,
        };

        let user = User::from(record.clone());
        assert_eq!(user.id, record.id);
        assert_eq!(user.username, "alicej");
    }
}
