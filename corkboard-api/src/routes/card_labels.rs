/// Card label attachment endpoints
///
/// Labels are global; attaching one to a card only requires access to the
/// card's board. Attaching an already-attached label is reported as a
/// bad request, not a crash.
///
/// # Endpoints
///
/// - `POST /v1/cards/:id/labels` - Attach a label
/// - `DELETE /v1/cards/:id/labels/:label_id` - Detach a label

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use corkboard_shared::auth::middleware::Identity;
use corkboard_shared::models::card_label::CardLabel;
use corkboard_shared::models::label::Label;
use serde::Deserialize;

use super::cards::find_authorized_card;

/// Attach label request
#[derive(Debug, Deserialize)]
pub struct AttachLabelRequest {
    /// The label to attach
    pub label_id: i64,
}

/// Attach a label to a card
///
/// # Errors
///
/// - `404 Not Found`: card or label does not exist
/// - `403 Forbidden`: acting user lacks access to the card's board
/// - `400 Bad Request`: label already attached
pub async fn attach_label(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(card_id): Path<i64>,
    Json(req): Json<AttachLabelRequest>,
) -> ApiResult<Json<CardLabel>> {
    let (card, _) = find_authorized_card(&state, card_id, identity.user_id()).await?;

    let label = Label::find_by_id(&state.db, req.label_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Label not found".to_string()))?;

    if CardLabel::has(&state.db, card.id, label.id).await? {
        return Err(ApiError::BadRequest(
            "Label is already attached to this card".to_string(),
        ));
    }

    let attachment = CardLabel::add(&state.db, card.id, label.id).await?;
    Ok(Json(attachment))
}

/// Detach a label from a card
///
/// # Errors
///
/// - `404 Not Found`: card does not exist, or the label was not attached
pub async fn detach_label(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path((card_id, label_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    let (card, _) = find_authorized_card(&state, card_id, identity.user_id()).await?;

    let removed = CardLabel::remove(&state.db, card.id, label_id).await?;
    if !removed {
        return Err(ApiError::NotFound(
            "Label is not attached to this card".to_string(),
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
