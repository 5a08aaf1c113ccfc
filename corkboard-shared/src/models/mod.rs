/// Database models for Corkboard
///
/// This module contains all database models and their CRUD operations.
/// Each child entity validates its parent reference before insert; deletes
/// cascade through the schema (board -> lists -> cards -> join rows).
///
/// # Models
///
/// - `user`: Users mirrored from the external identity provider
/// - `workspace`: Workspaces owning boards
/// - `board`: Boards with creator and per-board list ordering version
/// - `list`: Lists ordered by position within a board
/// - `card`: Cards ordered by position within a list
/// - `label`: Global labels attachable to cards
/// - `board_member`: Board membership join rows
/// - `card_label`: Card-label join rows
/// - `card_member`: Card-member join rows
/// - `aggregate`: The full nested board read-model
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
///     name: "Roadmap".to_string(),
///     workspace_id: 1,
///     created_by: "user_2x9yK".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod aggregate;
pub mod board;
pub mod board_member;
pub mod card;
pub mod card_label;
pub mod card_member;
pub mod label;
pub mod list;
pub mod user;
pub mod workspace;
