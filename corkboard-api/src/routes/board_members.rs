/// Board membership endpoints
///
/// Only the board's creator manages membership. The creator never holds a
/// membership row (creator access is implicit and irrevocable), so adding
/// or removing the creator is rejected.
///
/// # Endpoints
///
/// - `GET /v1/boards/:id/members` - List members (creator or member)
/// - `POST /v1/boards/:id/members` - Add a member (creator)
/// - `DELETE /v1/boards/:id/members/:user_id` - Remove a member (creator)
/// - `GET /v1/boards/:id/available-members` - Users not yet on the board (creator)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use corkboard_shared::auth::authorization::{require_access, require_creator};
use corkboard_shared::auth::middleware::Identity;
use corkboard_shared::models::board::Board;
use corkboard_shared::models::board_member::BoardMember;
use corkboard_shared::models::user::User;
use serde::Deserialize;

/// Add member request
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// The user to add
    pub member_id: String,
}

/// List a board's members (creator or member)
pub async fn list_members(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(board_id): Path<i64>,
) -> ApiResult<Json<Vec<User>>> {
    let board = find_board(&state, board_id).await?;
    require_access(&state.db, &board, identity.user_id()).await?;

    let members = User::list_board_members(&state.db, board_id).await?;
    Ok(Json(members))
}

/// Add a member to a board (creator only)
///
/// # Errors
///
/// - `404 Not Found`: board or user does not exist
/// - `403 Forbidden`: acting user is not the creator
/// - `400 Bad Request`: target is the creator, or already a member
pub async fn add_member(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(board_id): Path<i64>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<Json<BoardMember>> {
    let board = find_board(&state, board_id).await?;
    require_creator(&board, identity.user_id())?;

    let user = User::find_by_id(&state.db, &req.member_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if board.is_creator(&user.id) {
        return Err(ApiError::BadRequest(
            "The creator already has access to the board".to_string(),
        ));
    }

    if BoardMember::has(&state.db, board_id, &user.id).await? {
        return Err(ApiError::BadRequest(
            "User is already a member of this board".to_string(),
        ));
    }

    let membership = BoardMember::add(&state.db, board_id, &user.id).await?;
    Ok(Json(membership))
}

/// Remove a member from a board (creator only)
///
/// Removing the creator is impossible: there is no membership row to
/// remove and creator access cannot be revoked.
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((board_id, user_id)): Path<(i64, String)>,
) -> ApiResult<StatusCode> {
    let board = find_board(&state, board_id).await?;
    require_creator(&board, identity.user_id())?;

    if board.is_creator(&user_id) {
        return Err(ApiError::BadRequest(
            "The creator cannot be removed from the board".to_string(),
        ));
    }

    let removed = BoardMember::remove(&state.db, board_id, &user_id).await?;
    if !removed {
        return Err(ApiError::NotFound(
            "User is not a member of this board".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// List users who could be added to a board (creator only)
pub async fn available_members(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(board_id): Path<i64>,
) -> ApiResult<Json<Vec<User>>> {
    let board = find_board(&state, board_id).await?;
    require_creator(&board, identity.user_id())?;

    let users = User::list_available_for_board(&state.db, board_id).await?;
    Ok(Json(users))
}

async fn find_board(state: &AppState, board_id: i64) -> Result<Board, ApiError> {
    Board::find_by_id(&state.db, board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))
}
