/// User model and database operations
///
/// Users are owned by the external identity provider: the `id` column holds
/// the provider's opaque string key, and rows are written only in response
/// to provider lifecycle webhooks (`user.created`, `user.updated`,
/// `user.deleted`). Everything else in the system references users by that
/// stable id.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id VARCHAR(255) PRIMARY KEY,
///     name TEXT,
///     email TEXT NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::models::user::{User, UpsertUser};
/// use corkboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::upsert(&pool, UpsertUser {
///     id: "user_2x9yK".to_string(),
///     name: Some("Ada".to_string()),
///     email: "ada@example.com".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User mirrored from the external identity provider
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Identity provider's stable user id
    pub id: String,

    /// Display name
    pub name: Option<String>,

    /// Email address (unique)
    pub email: String,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or refreshing a user from a lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertUser {
    /// Identity provider's stable user id
    pub id: String,

    /// Display name
    pub name: Option<String>,

    /// Email address
    pub email: String,
}

impl User {
    /// Inserts or refreshes a user row from an identity lifecycle event
    ///
    /// `user.created` and `user.updated` events both land here: an existing
    /// row is updated in place, keyed by the provider id.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already taken by a different user (unique violation)
    /// - Database connection fails
    pub async fn upsert(pool: &PgPool, data: UpsertUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                email = EXCLUDED.email,
                updated_at = NOW()
            RETURNING id, name, email, created_at, updated_at
            "#,
        )
        .bind(&data.id)
        .bind(&data.name)
        .bind(&data.email)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by the identity provider's id
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Deletes a user (identity provider `user.deleted` event)
    ///
    /// Cascades to owned workspaces, created boards, and membership rows
    /// via the schema's foreign keys.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the user did not exist
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists the members of a board (user rows joined through board_members)
    ///
    /// Ordered by membership creation time so the member list is stable.
    /// The board's creator is not included: creator access is implicit and
    /// never stored as a membership row.
    pub async fn list_board_members(
        pool: &PgPool,
        board_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.created_at, u.updated_at
            FROM users u
            JOIN board_members bm ON bm.member_id = u.id
            WHERE bm.board_id = $1
            ORDER BY bm.created_at ASC, u.id ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists the members assigned to a card
    pub async fn list_card_members(
        pool: &PgPool,
        card_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.created_at, u.updated_at
            FROM users u
            JOIN card_members cm ON cm.member_id = u.id
            WHERE cm.card_id = $1
            ORDER BY cm.created_at ASC, u.id ASC
            "#,
        )
        .bind(card_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Lists users who could still be added to a board
    ///
    /// Excludes existing members and the board's creator.
    pub async fn list_available_for_board(
        pool: &PgPool,
        board_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.created_at, u.updated_at
            FROM users u
            WHERE u.id NOT IN (
                SELECT member_id FROM board_members WHERE board_id = $1
            )
            AND u.id NOT IN (
                SELECT created_by FROM boards WHERE id = $1
            )
            ORDER BY u.email ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}
