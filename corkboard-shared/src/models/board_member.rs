/// Board membership join rows
///
/// A `(board, user)` row grants read access and card/list mutation rights
/// on the board, short of the creator's administrative rights. The board's
/// creator never appears here: creator access is implicit and irrevocable.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE board_members (
///     board_id BIGINT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     member_id VARCHAR(255) NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (board_id, member_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Board membership row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BoardMember {
    /// Board id
    pub board_id: i64,

    /// Member's user id
    pub member_id: String,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

impl BoardMember {
    /// Adds a user to a board
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The membership already exists (unique constraint violation)
    /// - The board or user doesn't exist (foreign key violation)
    pub async fn add(
        pool: &PgPool,
        board_id: i64,
        member_id: &str,
    ) -> Result<Self, sqlx::Error> {
        let membership = sqlx::query_as::<_, BoardMember>(
            r#"
            INSERT INTO board_members (board_id, member_id)
            VALUES ($1, $2)
            RETURNING board_id, member_id, created_at
            "#,
        )
        .bind(board_id)
        .bind(member_id)
        .fetch_one(pool)
        .await?;

        Ok(membership)
    }

    /// Removes a user from a board
    ///
    /// # Returns
    ///
    /// `true` if a row was removed, `false` if no such membership existed
    pub async fn remove(
        pool: &PgPool,
        board_id: i64,
        member_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM board_members WHERE board_id = $1 AND member_id = $2")
                .bind(board_id)
                .bind(member_id)
                .execute(pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a user has a membership row for a board
    ///
    /// Note this is membership only; the creator holds access without a
    /// row (see [`crate::auth::authorization::board_role`]).
    pub async fn has(pool: &PgPool, board_id: i64, member_id: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM board_members WHERE board_id = $1 AND member_id = $2)",
        )
        .bind(board_id)
        .bind(member_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Counts members of a board (excluding the implicit creator)
    pub async fn count_by_board(pool: &PgPool, board_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM board_members WHERE board_id = $1")
                .bind(board_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}
