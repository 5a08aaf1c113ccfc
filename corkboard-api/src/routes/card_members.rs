/// Card member assignment endpoints
///
/// A user must currently hold access to the card's board (creator or
/// member) to be assigned to one of its cards. Assignments are independent
/// of board membership afterwards: removing a user from the board leaves
/// their card assignments in place, and detaching never re-checks the
/// assignee's board access.
///
/// # Endpoints
///
/// - `POST /v1/cards/:id/members` - Assign a user
/// - `DELETE /v1/cards/:id/members/:user_id` - Unassign a user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use corkboard_shared::auth::authorization::board_role;
use corkboard_shared::auth::middleware::Identity;
use corkboard_shared::models::card_member::CardMember;
use corkboard_shared::models::user::User;
use serde::Deserialize;

use super::cards::find_authorized_card;

/// Assign member request
#[derive(Debug, Deserialize)]
pub struct AttachMemberRequest {
    /// The user to assign
    pub member_id: String,
}

/// Assign a user to a card
///
/// # Errors
///
/// - `404 Not Found`: card or user does not exist
/// - `403 Forbidden`: acting user lacks access to the card's board
/// - `400 Bad Request`: assignee has no access to the board, or is
///   already assigned
pub async fn attach_member(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(card_id): Path<i64>,
    Json(req): Json<AttachMemberRequest>,
) -> ApiResult<Json<CardMember>> {
    let (card, board) = find_authorized_card(&state, card_id, identity.user_id()).await?;

    let user = User::find_by_id(&state.db, &req.member_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    if board_role(&state.db, &board, &user.id).await?.is_none() {
        return Err(ApiError::BadRequest(
            "User is not a member of this board".to_string(),
        ));
    }

    if CardMember::has(&state.db, card.id, &user.id).await? {
        return Err(ApiError::BadRequest(
            "User is already assigned to this card".to_string(),
        ));
    }

    let assignment = CardMember::add(&state.db, card.id, &user.id).await?;
    Ok(Json(assignment))
}

/// Unassign a user from a card
///
/// # Errors
///
/// - `404 Not Found`: card does not exist, or the user was not assigned
pub async fn detach_member(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((card_id, user_id)): Path<(i64, String)>,
) -> ApiResult<StatusCode> {
    let (card, _) = find_authorized_card(&state, card_id, identity.user_id()).await?;

    let removed = CardMember::remove(&state.db, card.id, &user_id).await?;
    if !removed {
        return Err(ApiError::NotFound(
            "User is not assigned to this card".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
