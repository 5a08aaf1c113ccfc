/// Card-member join rows (many-to-many)
///
/// Card membership is independent of board membership: a user removed from
/// a board keeps their card assignments until explicitly detached, so the
/// remove path never requires the user to still hold board access.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE card_members (
///     card_id BIGINT NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
///     member_id VARCHAR(255) NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (card_id, member_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Card-member assignment row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CardMember {
    /// Card id
    pub card_id: i64,

    /// Member's user id
    pub member_id: String,

    /// When the member was assigned
    pub created_at: DateTime<Utc>,
}

impl CardMember {
    /// Assigns a user to a card
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment already exists (unique constraint
    /// violation) or the card/user doesn't exist (foreign key violation)
    pub async fn add(pool: &PgPool, card_id: i64, member_id: &str) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, CardMember>(
            r#"
            INSERT INTO card_members (card_id, member_id)
            VALUES ($1, $2)
            RETURNING card_id, member_id, created_at
            "#,
        )
        .bind(card_id)
        .bind(member_id)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    /// Unassigns a user from a card
    ///
    /// # Returns
    ///
    /// `true` if a row was removed, `false` if the user was not assigned
    pub async fn remove(
        pool: &PgPool,
        card_id: i64,
        member_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM card_members WHERE card_id = $1 AND member_id = $2")
            .bind(card_id)
            .bind(member_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a user is assigned to a card
    pub async fn has(pool: &PgPool, card_id: i64, member_id: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM card_members WHERE card_id = $1 AND member_id = $2)",
        )
        .bind(card_id)
        .bind(member_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}
