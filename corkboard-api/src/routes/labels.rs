/// Global label endpoints
///
/// Labels are global, not board-scoped; any authenticated user can list
/// and create them. Attachment to cards lives in `card_labels`.
///
/// # Endpoints
///
/// - `GET /v1/labels` - List all labels
/// - `POST /v1/labels` - Create a label

use crate::{
    app::AppState,
    error::{validation_errors, ApiResult},
};
use axum::{extract::State, Json};
use corkboard_shared::models::label::{CreateLabel, Label};
use serde::Deserialize;
use validator::Validate;

/// Create label request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLabelRequest {
    /// Label name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// RGB color as `#rrggbb`
    pub color: String,
}

/// Checks a `#rrggbb` color code
fn is_valid_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// List all labels
pub async fn list_labels(State(state): State<AppState>) -> ApiResult<Json<Vec<Label>>> {
    let labels = Label::list_all(&state.db).await?;
    Ok(Json(labels))
}

/// Create a label
///
/// # Errors
///
/// - `422 Unprocessable Entity`: name or color fails validation
pub async fn create_label(
    State(state): State<AppState>,
    Json(req): Json<CreateLabelRequest>,
) -> ApiResult<Json<Label>> {
    req.validate().map_err(validation_errors)?;

    if !is_valid_color(&req.color) {
        return Err(crate::error::ApiError::ValidationError(vec![
            crate::error::ValidationErrorDetail {
                field: "color".to_string(),
                message: "Color must be a 6-hex-digit RGB code like #f97316".to_string(),
            },
        ]));
    }

    let label = Label::create(
        &state.db,
        CreateLabel {
            name: req.name,
            color: req.color.to_lowercase(),
        },
    )
    .await?;

    Ok(Json(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_color() {
        assert!(is_valid_color("#f97316"));
        assert!(is_valid_color("#ABCDEF"));

        assert!(!is_valid_color("f97316"));
        assert!(!is_valid_color("#f9731"));
        assert!(!is_valid_color("#f97316a"));
        assert!(!is_valid_color("#f9731g"));
        assert!(!is_valid_color(""));
    }
}
