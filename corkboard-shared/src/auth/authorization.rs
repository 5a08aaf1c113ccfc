/// Board access evaluation
///
/// A stateless predicate over (acting user, board): the user is the
/// board's **creator**, an explicit **member**, or has no access. The
/// creator never appears in `board_members`; creator access is implicit
/// and cannot be revoked.
///
/// # Authorization policy
///
/// - Board rename/delete/membership management: creator only
/// - List and card create/update/delete/move, card label/member
///   attach-detach: creator or member
/// - Board read (the aggregate): creator or member
///
/// Handlers check resource existence first and evaluate access second, so
/// a missing board is reported as not-found to everyone.
///
/// # Example
///
/// ```no_run
/// use corkboard_shared::auth::authorization::{require_access, require_creator};
/// use corkboard_shared::models::board::Board;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, board: Board) -> Result<(), Box<dyn std::error::Error>> {
/// // Any mutation of lists/cards needs creator-or-member
/// let role = require_access(&pool, &board, "user_2x9yK").await?;
///
/// // Board administration needs the creator
/// require_creator(&board, "user_2x9yK")?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::models::board::Board;
use crate::models::board_member::BoardMember;

/// Role an acting user holds on a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardRole {
    /// The board's creator: full control including rename, delete, and
    /// membership management
    Creator,

    /// An explicit member: may read the board and mutate its lists and
    /// cards, but not administer the board
    Member,
}

impl BoardRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardRole::Creator => "creator",
            BoardRole::Member => "member",
        }
    }

    /// Can rename/delete the board and manage its membership
    pub fn can_administer(&self) -> bool {
        matches!(self, BoardRole::Creator)
    }

    /// Can create, update, delete, and move the board's lists and cards
    pub fn can_mutate_contents(&self) -> bool {
        matches!(self, BoardRole::Creator | BoardRole::Member)
    }
}

/// Error type for access checks
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The acting user holds no sufficient role on the board
    #[error("not authorized to access board {0}")]
    Forbidden(i64),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Determines the role an acting user holds on a board
///
/// Creator wins over membership if both somehow hold.
///
/// # Returns
///
/// The role, or None when the user is neither creator nor member
pub async fn board_role(
    pool: &PgPool,
    board: &Board,
    user_id: &str,
) -> Result<Option<BoardRole>, sqlx::Error> {
    if board.is_creator(user_id) {
        return Ok(Some(BoardRole::Creator));
    }

    if BoardMember::has(pool, board.id, user_id).await? {
        return Ok(Some(BoardRole::Member));
    }

    Ok(None)
}

/// Requires the acting user to be the board's creator or a member
///
/// This is the gate for list/card mutation and for reading the board.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] when neither role holds
pub async fn require_access(
    pool: &PgPool,
    board: &Board,
    user_id: &str,
) -> Result<BoardRole, AccessError> {
    board_role(pool, board, user_id)
        .await?
        .ok_or(AccessError::Forbidden(board.id))
}

/// Requires the acting user to be the board's creator
///
/// This is the gate for board administration: rename, delete, and
/// membership management. Purely computed from the board row; no query.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] when the user is not the creator
pub fn require_creator(board: &Board, user_id: &str) -> Result<(), AccessError> {
    if board.is_creator(user_id) {
        Ok(())
    } else {
        Err(AccessError::Forbidden(board.id))
    }
}
