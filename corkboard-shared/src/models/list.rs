/// List model and database operations
///
/// Lists are ordered within their board by the integer `position` column.
/// Readers always observe the siblings of one board as a contiguous 1..N
/// sequence; the reorder engine renumbers the whole board on every move.
/// Ties are broken by id ascending, so a partially-applied legacy ordering
/// still reads deterministically.
///
/// `card_order_version` is the per-list version of the card ordering,
/// maintained by the reorder engine the same way boards track their list
/// ordering.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE lists (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     board_id BIGINT NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     position INTEGER NOT NULL,
///     card_order_version BIGINT NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// List ordered by position within a board
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct List {
    /// Unique list id
    pub id: i64,

    /// List name
    pub name: String,

    /// Owning board id
    pub board_id: i64,

    /// Ordering key within the board (1..N among siblings)
    pub position: i32,

    /// Version of the list's card ordering, bumped on every renumber
    #[serde(skip_serializing, default)]
    pub card_order_version: i64,

    /// When the list was created
    pub created_at: DateTime<Utc>,

    /// When the list was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateList {
    /// List name
    pub name: String,

    /// Owning board id
    pub board_id: i64,

    /// Position among siblings (callers use the allocator's append position)
    pub position: i32,
}

impl List {
    /// Creates a new list at the given position
    ///
    /// Callers appending to the end of a board should compute the position
    /// with [`crate::ordering::position::append_position`] over
    /// [`List::max_position`].
    ///
    /// # Errors
    ///
    /// Returns an error if the board does not exist (foreign key violation)
    /// or the database connection fails
    pub async fn create(pool: &PgPool, data: CreateList) -> Result<Self, sqlx::Error> {
        let list = sqlx::query_as::<_, List>(
            r#"
            INSERT INTO lists (name, board_id, position)
            VALUES ($1, $2, $3)
            RETURNING id, name, board_id, position, card_order_version,
                      created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(data.board_id)
        .bind(data.position)
        .fetch_one(pool)
        .await?;

        Ok(list)
    }

    /// Finds a list by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let list = sqlx::query_as::<_, List>(
            r#"
            SELECT id, name, board_id, position, card_order_version,
                   created_at, updated_at
            FROM lists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(list)
    }

    /// Lists the sibling lists of a board ordered by position, ties broken
    /// by id ascending
    pub async fn list_by_board(pool: &PgPool, board_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let lists = sqlx::query_as::<_, List>(
            r#"
            SELECT id, name, board_id, position, card_order_version,
                   created_at, updated_at
            FROM lists
            WHERE board_id = $1
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(board_id)
        .fetch_all(pool)
        .await?;

        Ok(lists)
    }

    /// Returns the highest position among a board's lists, or None if the
    /// board has no lists
    pub async fn max_position(pool: &PgPool, board_id: i64) -> Result<Option<i32>, sqlx::Error> {
        let (max,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(position) FROM lists WHERE board_id = $1")
                .bind(board_id)
                .fetch_one(pool)
                .await?;

        Ok(max)
    }

    /// Renames a list
    ///
    /// # Returns
    ///
    /// The updated list if found, None if the list doesn't exist
    pub async fn rename(pool: &PgPool, id: i64, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let list = sqlx::query_as::<_, List>(
            r#"
            UPDATE lists
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, board_id, position, card_order_version,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(list)
    }

    /// Deletes a list, cascading to its cards and their join rows
    ///
    /// The remaining siblings keep their positions; the sequence stays
    /// strictly ordered (with a gap) and the next renumber restores 1..N.
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the list did not exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
