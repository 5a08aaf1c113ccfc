/// Identity provider lifecycle webhook
///
/// The identity provider owns the user lifecycle; this endpoint keeps the
/// local `users` table in sync. Requests are authenticated by the signed
/// `X-Identity-Signature` header (timestamped HMAC over the raw body),
/// never by a session token.
///
/// # Endpoint
///
/// ```text
/// POST /v1/identity/webhook
/// X-Identity-Signature: t=1735900000,v1=<hex hmac-sha256>
/// Content-Type: application/json
///
/// {"type": "user.created", "data": {"id": "user_2x9yK", "name": "Ada", "email": "ada@example.com"}}
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use chrono::Utc;
use corkboard_shared::auth::webhook::{
    verify_signature, LifecycleEvent, WebhookError, DEFAULT_TOLERANCE_SECONDS, SIGNATURE_HEADER,
};
use corkboard_shared::models::user::{UpsertUser, User};
use serde::Serialize;

/// Webhook acknowledgement response
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Whether the event was applied
    pub received: bool,
}

/// Receives and applies one identity lifecycle event
///
/// # Errors
///
/// - `400 Bad Request`: missing/malformed signature header or unparseable
///   event payload
/// - `401 Unauthorized`: signature does not verify or is outside the
///   replay tolerance window
pub async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingSignature)?;

    verify_signature(
        &state.config.identity.webhook_secret,
        signature,
        &body,
        Utc::now(),
        DEFAULT_TOLERANCE_SECONDS,
    )?;

    let event: LifecycleEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Unparseable event: {}", e)))?;

    match event {
        LifecycleEvent::UserCreated(payload) | LifecycleEvent::UserUpdated(payload) => {
            let user = User::upsert(
                &state.db,
                UpsertUser {
                    id: payload.id,
                    name: payload.name,
                    email: payload.email,
                },
            )
            .await?;
            tracing::info!(user_id = %user.id, "Applied identity lifecycle upsert");
        }
        LifecycleEvent::UserDeleted(payload) => {
            let deleted = User::delete(&state.db, &payload.id).await?;
            tracing::info!(
                user_id = %payload.id,
                deleted,
                "Applied identity lifecycle delete"
            );
        }
    }

    Ok(Json(WebhookResponse { received: true }))
}
