/// Board model and database operations
///
/// Boards belong to exactly one workspace and have exactly one creator. The
/// creator holds irrevocable elevated rights (rename, delete, manage
/// membership) distinct from ordinary members.
///
/// `list_order_version` is the per-board version of the list ordering: the
/// reorder engine bumps it on every list renumber and uses the observed
/// value to reject a renumber computed against a stale ordering.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id BIGSERIAL PRIMARY KEY,
///     name TEXT NOT NULL,
///     workspace_id BIGINT NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
///     created_by VARCHAR(255) NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     list_order_version BIGINT NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::models::board::{Board, CreateBoard};
/// use corkboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let board = Board::create(&pool, CreateBoard {
///     name: "Launch plan".to_string(),
///     workspace_id: 1,
///     created_by: "user_2x9yK".to_string(),
/// }).await?;
///
/// assert!(board.is_creator("user_2x9yK"));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Board holding an ordered sequence of lists
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Board {
    /// Unique board id
    pub id: i64,

    /// Board name
    pub name: String,

    /// Owning workspace id
    pub workspace_id: i64,

    /// Creator's user id (holds elevated rights)
    pub created_by: String,

    /// Version of the board's list ordering, bumped on every renumber
    #[serde(skip_serializing, default)]
    pub list_order_version: i64,

    /// When the board was created
    pub created_at: DateTime<Utc>,

    /// When the board was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoard {
    /// Board name
    pub name: String,

    /// Owning workspace id
    pub workspace_id: i64,

    /// Creator's user id
    pub created_by: String,
}

impl Board {
    /// Whether the given user is this board's creator
    pub fn is_creator(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }

    /// Creates a new board
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace or creator does not exist
    /// (foreign key violation) or the database connection fails
    pub async fn create(pool: &PgPool, data: CreateBoard) -> Result<Self, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (name, workspace_id, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, workspace_id, created_by, list_order_version,
                      created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(data.workspace_id)
        .bind(&data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(board)
    }

    /// Finds a board by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, name, workspace_id, created_by, list_order_version,
                   created_at, updated_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Lists boards visible to a user: created by them or shared with them
    /// through a membership row
    pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT DISTINCT b.id, b.name, b.workspace_id, b.created_by,
                   b.list_order_version, b.created_at, b.updated_at
            FROM boards b
            LEFT JOIN board_members bm ON bm.board_id = b.id
            WHERE b.created_by = $1 OR bm.member_id = $1
            ORDER BY b.created_at ASC, b.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    /// Lists boards in a workspace, oldest first
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let boards = sqlx::query_as::<_, Board>(
            r#"
            SELECT id, name, workspace_id, created_by, list_order_version,
                   created_at, updated_at
            FROM boards
            WHERE workspace_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(workspace_id)
        .fetch_all(pool)
        .await?;

        Ok(boards)
    }

    /// Renames a board
    ///
    /// # Returns
    ///
    /// The updated board if found, None if the board doesn't exist
    pub async fn rename(pool: &PgPool, id: i64, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            UPDATE boards
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, workspace_id, created_by, list_order_version,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(board)
    }

    /// Deletes a board, cascading to its lists, cards, and join rows
    ///
    /// # Returns
    ///
    /// `true` if a row was deleted, `false` if the board did not exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
