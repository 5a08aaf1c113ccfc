/// Card endpoints
///
/// Cards are created at the end of their list's sequence. A PATCH carrying
/// `list_id` and/or `position` is a move: the reorder engine renumbers the
/// affected list(s) to 1..N in one transaction, rejecting cross-board
/// destinations. Content fields (`title`, `description`, `due_date`)
/// update independently of moves; `description` and `due_date` distinguish
/// "omitted" from "explicitly null", so clients can clear them.
///
/// # Endpoints
///
/// - `POST /v1/cards` - Create a card appended at the end of a list
/// - `GET /v1/cards/:id` - Card with labels and members
/// - `PATCH /v1/cards/:id` - Update content and/or move
/// - `DELETE /v1/cards/:id` - Delete and cascade join rows

use crate::{
    app::AppState,
    error::{validation_errors, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use corkboard_shared::auth::authorization::require_access;
use corkboard_shared::auth::middleware::Identity;
use corkboard_shared::models::aggregate::CardAggregate;
use corkboard_shared::models::board::Board;
use corkboard_shared::models::card::{Card, CreateCard, UpdateCard};
use corkboard_shared::models::list::List;
use corkboard_shared::ordering::{engine, position::append_position};
use serde::{Deserialize, Deserializer};
use validator::Validate;

/// Create card request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCardRequest {
    /// Card title
    #[validate(length(min = 1, max = 1024, message = "Title must be 1-1024 characters"))]
    pub title: String,

    /// Owning list id
    pub list_id: i64,

    /// Markdown description
    pub description: Option<String>,
}

/// Update card request
///
/// Omitted fields are untouched. `description` and `due_date` accept
/// explicit null to clear the stored value. `list_id`/`position` together
/// describe a move: `list_id` alone appends to the destination list,
/// `position` alone reorders within the current list. `position` is
/// 1-based and clamped.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCardRequest {
    /// New title
    #[validate(length(min = 1, max = 1024, message = "Title must be 1-1024 characters"))]
    pub title: Option<String>,

    /// New description (null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New due date (null clears it)
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// Destination list id
    pub list_id: Option<i64>,

    /// Target position (1-based)
    pub position: Option<i32>,
}

/// Distinguishes an absent field from an explicit null: absent stays
/// `None`, null becomes `Some(None)`
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Create a card appended at the end of a list
///
/// # Endpoint
///
/// ```text
/// POST /v1/cards
/// Authorization: Bearer <session token>
/// Content-Type: application/json
///
/// {"title": "Ship it", "list_id": 7, "description": "Optional notes"}
/// ```
///
/// # Errors
///
/// - `404 Not Found`: list does not exist
/// - `403 Forbidden`: acting user is neither creator nor member of the
///   list's board
pub async fn create_card(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateCardRequest>,
) -> ApiResult<Json<Card>> {
    req.validate().map_err(validation_errors)?;

    let list = List::find_by_id(&state.db, req.list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    authorize_board(&state, list.board_id, identity.user_id()).await?;

    let max = Card::max_position(&state.db, list.id).await?;
    let card = Card::create(
        &state.db,
        CreateCard {
            title: req.title,
            description: req.description,
            list_id: list.id,
            position: append_position(max),
            created_by: identity.user_id().to_string(),
        },
    )
    .await?;

    Ok(Json(card))
}

/// Fetch a card with its labels and members
pub async fn get_card(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(card_id): Path<i64>,
) -> ApiResult<Json<CardAggregate>> {
    let (card, _) = find_authorized_card(&state, card_id, identity.user_id()).await?;

    let detail = CardAggregate::load(&state.db, card).await?;
    Ok(Json(detail))
}

/// Update a card's content and/or move it
///
/// Content fields are written first, then the move runs in its own
/// transaction. Moving to the current slot writes nothing.
///
/// # Errors
///
/// - `404 Not Found`: card or destination list does not exist
/// - `403 Forbidden`: acting user is neither creator nor member
/// - `400 Bad Request` (`invalid_destination`): destination list belongs
///   to a different board
/// - `409 Conflict`: a concurrent move renumbered an affected list first
pub async fn update_card(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(card_id): Path<i64>,
    Json(req): Json<UpdateCardRequest>,
) -> ApiResult<Json<Card>> {
    req.validate().map_err(validation_errors)?;

    let (card, _) = find_authorized_card(&state, card_id, identity.user_id()).await?;

    let update = UpdateCard {
        title: req.title,
        description: req.description,
        due_date: req.due_date,
    };

    let mut card = if update.is_empty() {
        card
    } else {
        Card::update(&state.db, card.id, update)
            .await?
            .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?
    };

    if req.list_id.is_some() || req.position.is_some() {
        let dest_list_id = req.list_id.unwrap_or(card.list_id);
        // 1-based position to zero-based index; absent position appends to
        // the end of the destination (the planner clamps)
        let dest_index = req
            .position
            .map(|p| (p.max(1) - 1) as usize)
            .unwrap_or(usize::MAX);

        card = engine::move_card(&state.db, card.id, dest_list_id, dest_index).await?;
    }

    Ok(Json(card))
}

/// Delete a card and its label/member join rows
pub async fn delete_card(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(card_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let (card, _) = find_authorized_card(&state, card_id, identity.user_id()).await?;

    Card::delete(&state.db, card.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Loads a card, enforcing existence first and board access second.
/// Returns the card and its board.
pub(crate) async fn find_authorized_card(
    state: &AppState,
    card_id: i64,
    user_id: &str,
) -> Result<(Card, Board), ApiError> {
    let card = Card::find_by_id(&state.db, card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    let list = List::find_by_id(&state.db, card.list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("List not found".to_string()))?;

    let board = authorize_board(state, list.board_id, user_id).await?;

    Ok((card, board))
}

async fn authorize_board(
    state: &AppState,
    board_id: i64,
    user_id: &str,
) -> Result<Board, ApiError> {
    let board = Board::find_by_id(&state.db, board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    require_access(&state.db, &board, user_id).await?;

    Ok(board)
}
