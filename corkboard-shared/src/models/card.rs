/// Card model and database operations
///
/// Cards are ordered within their list by the integer `position` column and
/// carry an optional due date. A card's lineage is fixed to one board for
/// its lifetime: the reorder engine moves cards between lists of the same
/// board only.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE cards (
///     id BIGSERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT,
///     list_id BIGINT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
///     position INTEGER NOT NULL,
///     created_by VARCHAR(255) NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::models::card::{Card, CreateCard, UpdateCard};
/// use corkboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let card = Card::create(&pool, CreateCard {
///     title: "Write release notes".to_string(),
///     description: None,
///     list_id: 7,
///     position: 1,
///     created_by: "user_2x9yK".to_string(),
/// }).await?;
///
/// // Clear the description, leave everything else untouched
/// let update = UpdateCard {
///     description: Some(None),
///     ..Default::default()
/// };
/// Card::update(&pool, card.id, update).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Card ordered by position within a list
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    /// Unique card id
    pub id: i64,

    /// Card title
    pub title: String,

    /// Markdown description
    pub description: Option<String>,

    /// Owning list id
    pub list_id: i64,

    /// Ordering key within the list (1..N among siblings)
    pub position: i32,

    /// Creator's user id
    pub created_by: String,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// When the card was created
    pub created_at: DateTime<Utc>,

    /// When the card was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCard {
    /// Card title
    pub title: String,

    /// Markdown description
    pub description: Option<String>,

    /// Owning list id
    pub list_id: i64,

    /// Position among siblings (callers use the allocator's append position)
    pub position: i32,

    /// Creator's user id
    pub created_by: String,
}

/// Fields to update on a card
///
/// Only `Some` fields are written; omitted fields are untouched. The outer
/// Option selects the field, the inner Option carries nullability: for
/// example `description: Some(None)` clears the description while
/// `description: None` leaves it alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCard {
    /// New title
    pub title: Option<String>,

    /// New description (Some(None) clears it)
    pub description: Option<Option<String>>,

    /// New due date (Some(None) clears it)
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl UpdateCard {
    /// Whether this update touches any field
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none()
    }
}

impl Card {
    /// Creates a new card at the given position
    ///
    /// Callers appending to the end of a list should compute the position
    /// with [`crate::ordering::position::append_position`] over
    /// [`Card::max_position`].
    ///
    /// # Errors
    ///
    /// Returns an error if the list or creator does not exist (foreign key
    /// violation) or the database connection fails
    pub async fn create(pool: &PgPool, data: CreateCard) -> Result<Self, sqlx::Error> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            INSERT INTO cards (title, description, list_id, position, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, list_id, position, created_by,
                      due_date, created_at, updated_at
            "#,
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.list_id)
        .bind(data.position)
        .bind(&data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(card)
    }

    /// Finds a card by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, title, description, list_id, position, created_by,
                   due_date, created_at, updated_at
            FROM cards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(card)
    }

    /// Lists the sibling cards of a list ordered by position, ties broken
    /// by id ascending
    pub async fn list_by_list(pool: &PgPool, list_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let cards = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, title, description, list_id, position, created_by,
                   due_date, created_at, updated_at
            FROM cards
            WHERE list_id = $1
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(list_id)
        .fetch_all(pool)
        .await?;

        Ok(cards)
    }

    /// Returns the highest position among a list's cards, or None if the
    /// list has no cards
    pub async fn max_position(pool: &PgPool, list_id: i64) -> Result<Option<i32>, sqlx::Error> {
        let (max,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(position) FROM cards WHERE list_id = $1")
                .bind(list_id)
                .fetch_one(pool)
                .await?;

        Ok(max)
    }

    /// Updates a card's content fields
    ///
    /// Only fields present in `data` are written, plus `updated_at`.
    /// Omitted fields are never reset. List and position changes go through
    /// the reorder engine, never through this method.
    ///
    /// # Returns
    ///
    /// The updated card if found, None if the card doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateCard,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE cards SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }

        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }

        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, description, list_id, position, \
             created_by, due_date, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Card>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }

        if let Some(description) = data.description {
            q = q.bind(description);
        }

        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let card = q.fetch_optional(pool).await?;

        Ok(card)
    }

    /// Deletes a card, cascading to its label and member join rows
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the card did not exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_card_is_empty() {
        assert!(UpdateCard::default().is_empty());

        let update = UpdateCard {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());

        // Clearing a nullable field still counts as an update
        let update = UpdateCard {
            due_date: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
