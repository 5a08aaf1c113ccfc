/// Board endpoints
///
/// Boards live in a workspace and have one creator with irrevocable
/// administrative rights. Reading a board returns the full nested
/// aggregate (workspace, creator, members, lists in position order, each
/// list's cards in position order with labels and members).
///
/// Authorization policy:
/// - create: workspace owner
/// - read: creator or member
/// - rename/delete: creator only
///
/// # Endpoints
///
/// - `POST /v1/boards` - Create a board
/// - `GET /v1/boards` - List boards the acting user created or joined
/// - `GET /v1/boards/:id` - Full aggregate
/// - `PATCH /v1/boards/:id` - Rename (creator)
/// - `DELETE /v1/boards/:id` - Delete and cascade (creator)

use crate::{
    app::AppState,
    error::{validation_errors, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use corkboard_shared::auth::authorization::{require_access, require_creator};
use corkboard_shared::auth::middleware::Identity;
use corkboard_shared::models::aggregate::BoardAggregate;
use corkboard_shared::models::board::{Board, CreateBoard};
use corkboard_shared::models::workspace::Workspace;
use serde::Deserialize;
use validator::Validate;

/// Create board request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    /// Owning workspace id
    pub workspace_id: i64,

    /// Board name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Rename board request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBoardRequest {
    /// New board name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Create a board in a workspace the acting user owns
///
/// # Errors
///
/// - `404 Not Found`: workspace does not exist
/// - `403 Forbidden`: acting user does not own the workspace
pub async fn create_board(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<Json<Board>> {
    req.validate().map_err(validation_errors)?;

    let workspace = Workspace::find_by_id(&state.db, req.workspace_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workspace not found".to_string()))?;

    if workspace.owner_id != identity.user_id() {
        return Err(ApiError::Forbidden(
            "Not authorized to access this workspace".to_string(),
        ));
    }

    let board = Board::create(
        &state.db,
        CreateBoard {
            name: req.name,
            workspace_id: workspace.id,
            created_by: identity.user_id().to_string(),
        },
    )
    .await?;

    Ok(Json(board))
}

/// List boards the acting user created or was added to
pub async fn list_boards(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<Board>>> {
    let boards = Board::list_for_user(&state.db, identity.user_id()).await?;
    Ok(Json(boards))
}

/// Fetch the full board aggregate (creator or member)
///
/// Lists come back ordered by position, each with its cards ordered by
/// position; empty sub-collections serialize as empty arrays, never null.
///
/// # Errors
///
/// - `404 Not Found`: board does not exist
/// - `403 Forbidden`: acting user is neither creator nor member
pub async fn get_board(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(board_id): Path<i64>,
) -> ApiResult<Json<BoardAggregate>> {
    let board = Board::find_by_id(&state.db, board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    require_access(&state.db, &board, identity.user_id()).await?;

    let aggregate = BoardAggregate::load(&state.db, board.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    Ok(Json(aggregate))
}

/// Rename a board (creator only)
pub async fn update_board(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(board_id): Path<i64>,
    Json(req): Json<UpdateBoardRequest>,
) -> ApiResult<Json<Board>> {
    req.validate().map_err(validation_errors)?;

    let board = Board::find_by_id(&state.db, board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    require_creator(&board, identity.user_id())?;

    let board = Board::rename(&state.db, board_id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    Ok(Json(board))
}

/// Delete a board (creator only)
///
/// Cascades to the board's lists, cards, and membership/label/member join
/// rows.
pub async fn delete_board(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(board_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let board = Board::find_by_id(&state.db, board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    require_creator(&board, identity.user_id())?;

    Board::delete(&state.db, board_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
