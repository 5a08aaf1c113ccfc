/// Workspace model and database operations
///
/// A workspace is a container for boards, owned exclusively by one user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE workspaces (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     owner_id VARCHAR(255) NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Workspace owning a set of boards
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workspace {
    /// Unique workspace id
    pub id: i64,

    /// Workspace name
    pub name: String,

    /// Owning user's id
    pub owner_id: String,

    /// When the workspace was created
    pub created_at: DateTime<Utc>,

    /// When the workspace was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspace {
    /// Workspace name
    pub name: String,

    /// Owning user's id
    pub owner_id: String,
}

impl Workspace {
    /// Creates a new workspace
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database connection fails
    pub async fn create(pool: &PgPool, data: CreateWorkspace) -> Result<Self, sqlx::Error> {
        let workspace = sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspaces (name, owner_id)
            VALUES ($1, $2)
            RETURNING id, name, owner_id, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(workspace)
    }

    /// Finds a workspace by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let workspace = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, name, owner_id, created_at, updated_at
            FROM workspaces
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(workspace)
    }

    /// Lists workspaces owned by a user, oldest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let workspaces = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT id, name, owner_id, created_at, updated_at
            FROM workspaces
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(workspaces)
    }

    /// Renames a workspace
    ///
    /// # Returns
    ///
    /// The updated workspace if found, None if the workspace doesn't exist
    pub async fn rename(
        pool: &PgPool,
        id: i64,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let workspace = sqlx::query_as::<_, Workspace>(
            r#"
            UPDATE workspaces
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(workspace)
    }

    /// Deletes a workspace, cascading to its boards
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the workspace did not exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workspaces WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
