/// Card-label join rows (many-to-many)
///
/// # Schema
///
/// ```sql
/// CREATE TABLE card_labels (
///     card_id BIGINT NOT NULL REFERENCES cards(id) ON DELETE CASCADE,
///     label_id BIGINT NOT NULL REFERENCES labels(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (card_id, label_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Card-label attachment row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CardLabel {
    /// Card id
    pub card_id: i64,

    /// Label id
    pub label_id: i64,

    /// When the label was attached
    pub created_at: DateTime<Utc>,
}

impl CardLabel {
    /// Attaches a label to a card
    ///
    /// # Errors
    ///
    /// Returns an error if the attachment already exists (unique constraint
    /// violation) or the card/label doesn't exist (foreign key violation)
    pub async fn add(pool: &PgPool, card_id: i64, label_id: i64) -> Result<Self, sqlx::Error> {
        let row = sqlx::query_as::<_, CardLabel>(
            r#"
            INSERT INTO card_labels (card_id, label_id)
            VALUES ($1, $2)
            RETURNING card_id, label_id, created_at
            "#,
        )
        .bind(card_id)
        .bind(label_id)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    /// Detaches a label from a card
    ///
    /// # Returns
    ///
    /// `true` if a row was removed, `false` if the label was not attached
    pub async fn remove(pool: &PgPool, card_id: i64, label_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM card_labels WHERE card_id = $1 AND label_id = $2")
            .bind(card_id)
            .bind(label_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a label is attached to a card
    pub async fn has(pool: &PgPool, card_id: i64, label_id: i64) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM card_labels WHERE card_id = $1 AND label_id = $2)",
        )
        .bind(card_id)
        .bind(label_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }
}
