/// List endpoints
///
/// Lists are created at the end of their board's sequence and repositioned
/// through the reorder engine, which renumbers the whole board to 1..N in
/// one transaction. Any creator or member of the board may mutate its
/// lists.
///
/// # Endpoints
///
/// - `POST /v1/lists` - Create a list appended at the end of the board
/// - `PATCH /v1/lists/:id` - Rename and/or reposition
/// - `DELETE /v1/lists/:id` - Delete and cascade to cards

use crate::{
    app::AppState,
    error::{validation_errors, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use corkboard_shared::auth::authorization::require_access;
use corkboard_shared::auth::middleware::Identity;
use corkboard_shared::models::board::Board;
use corkboard_shared::models::list::{CreateList, List};
use corkboard_shared::ordering::{engine, position::append_position};
use serde::Deserialize;
use validator::Validate;

/// Create list request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateListRequest {
    /// Owning board id
    pub board_id: i64,

    /// List name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Update list request
///
/// `position` is the 1-based target position among the board's lists;
/// out-of-range values are clamped. Omitted fields are untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateListRequest {
    /// New list name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// Target position (1-based)
    pub position: Option<i32>,
}

/// Create a list appended at the end of the board's sequence
///
/// # Endpoint
///
/// ```text
/// POST /v1/lists
/// Authorization: Bearer <session token>
/// Content-Type: application/json
///
/// {"board_id": 7, "name": "In review"}
/// ```
///
/// # Errors
///
/// - `404 Not Found`: board does not exist
/// - `403 Forbidden`: acting user is neither creator nor member
pub async fn create_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateListRequest>,
) -> ApiResult<Json<List>> {
    req.validate().map_err(validation_errors)?;

    let board = Board::find_by_id(&state.db, req.board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    require_access(&state.db, &board, identity.user_id()).await?;

    let max = List::max_position(&state.db, board.id).await?;
    let list = List::create(
        &state.db,
        CreateList {
            name: req.name,
            board_id: board.id,
            position: append_position(max),
        },
    )
    .await?;

    Ok(Json(list))
}

/// Rename and/or reposition a list
///
/// A position change triggers a full renumber of the board's lists; a
/// move to the current slot writes nothing.
///
/// # Errors
///
/// - `404 Not Found`: list does not exist
/// - `403 Forbidden`: acting user is neither creator nor member
/// - `409 Conflict`: a concurrent move renumbered the board first
pub async fn update_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(list_id): Path<i64>,
    Json(req): Json<UpdateListRequest>,
) -> ApiResult<Json<List>> {
    req.validate().map_err(validation_errors)?;

    let list = List::find_by_id(&state.db, list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    let board = Board::find_by_id(&state.db, list.board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    require_access(&state.db, &board, identity.user_id()).await?;

    if let Some(name) = &req.name {
        List::rename(&state.db, list.id, name)
            .await?
            .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;
    }

    if let Some(position) = req.position {
        let index = (position.max(1) - 1) as usize;
        engine::move_list(&state.db, board.id, list.id, index).await?;
    }

    let list = List::find_by_id(&state.db, list.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    Ok(Json(list))
}

/// Delete a list and its cards
///
/// The surviving lists keep their positions; the next move restores a
/// contiguous sequence.
pub async fn delete_list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(list_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let list = List::find_by_id(&state.db, list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    let board = Board::find_by_id(&state.db, list.board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    require_access(&state.db, &board, identity.user_id()).await?;

    List::delete(&state.db, list.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
