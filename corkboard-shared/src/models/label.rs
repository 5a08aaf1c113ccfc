/// Label model and database operations
///
/// Labels are global, not board-scoped: any label can be attached to any
/// card through the `card_labels` join table. Colors are stored as
/// `#rrggbb` and checked by the schema.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE labels (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     color VARCHAR(7) NOT NULL CHECK (color ~ '^#[0-9a-fA-F]{6}$'),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Global label attachable to cards
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Label {
    /// Unique label id
    pub id: i64,

    /// Label name
    pub name: String,

    /// RGB color as `#rrggbb`
    pub color: String,

    /// When the label was created
    pub created_at: DateTime<Utc>,

    /// When the label was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLabel {
    /// Label name
    pub name: String,

    /// RGB color as `#rrggbb`
    pub color: String,
}

impl Label {
    /// Creates a new label
    ///
    /// # Errors
    ///
    /// Returns an error if the color fails the schema check or the
    /// database connection fails
    pub async fn create(pool: &PgPool, data: CreateLabel) -> Result<Self, sqlx::Error> {
        let label = sqlx::query_as::<_, Label>(
            r#"
            INSERT INTO labels (name, color)
            VALUES ($1, $2)
            RETURNING id, name, color, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.color)
        .fetch_one(pool)
        .await?;

        Ok(label)
    }

    /// Finds a label by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let label = sqlx::query_as::<_, Label>(
            r#"
            SELECT id, name, color, created_at, updated_at
            FROM labels
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(label)
    }

    /// Lists all labels, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let labels = sqlx::query_as::<_, Label>(
            r#"
            SELECT id, name, color, created_at, updated_at
            FROM labels
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(labels)
    }

    /// Lists the labels attached to a card, in attach order
    pub async fn list_by_card(pool: &PgPool, card_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let labels = sqlx::query_as::<_, Label>(
            r#"
            SELECT l.id, l.name, l.color, l.created_at, l.updated_at
            FROM labels l
            JOIN card_labels cl ON cl.label_id = l.id
            WHERE cl.card_id = $1
            ORDER BY cl.created_at ASC, l.id ASC
            "#,
        )
        .bind(card_id)
        .fetch_all(pool)
        .await?;

        Ok(labels)
    }
}
