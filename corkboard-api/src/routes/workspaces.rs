/// Workspace endpoints
///
/// Workspaces are owned exclusively by one user; only the owner may read,
/// rename, or delete them. Existence is checked before ownership, so a
/// missing workspace is a 404 for everyone.
///
/// # Endpoints
///
/// - `POST /v1/workspaces` - Create a workspace
/// - `GET /v1/workspaces` - List own workspaces
/// - `GET /v1/workspaces/:id` - Fetch one workspace
/// - `PATCH /v1/workspaces/:id` - Rename
/// - `DELETE /v1/workspaces/:id` - Delete (cascades to boards)

use crate::{
    app::AppState,
    error::{validation_errors, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use corkboard_shared::auth::middleware::Identity;
use corkboard_shared::models::workspace::{CreateWorkspace, Workspace};
use serde::Deserialize;
use validator::Validate;

/// Create workspace request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkspaceRequest {
    /// Workspace name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Rename workspace request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateWorkspaceRequest {
    /// New workspace name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
}

/// Create a workspace owned by the acting user
pub async fn create_workspace(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CreateWorkspaceRequest>,
) -> ApiResult<Json<Workspace>> {
    req.validate().map_err(validation_errors)?;

    let workspace = Workspace::create(
        &state.db,
        CreateWorkspace {
            name: req.name,
            owner_id: identity.user_id().to_string(),
        },
    )
    .await?;

    Ok(Json(workspace))
}

/// List workspaces owned by the acting user
pub async fn list_workspaces(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Json<Vec<Workspace>>> {
    let workspaces = Workspace::list_by_owner(&state.db, identity.user_id()).await?;
    Ok(Json(workspaces))
}

/// Fetch one workspace (owner only)
pub async fn get_workspace(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(workspace_id): Path<i64>,
) -> ApiResult<Json<Workspace>> {
    let workspace = find_owned(&state, workspace_id, identity.user_id()).await?;
    Ok(Json(workspace))
}

/// Rename a workspace (owner only)
pub async fn update_workspace(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(workspace_id): Path<i64>,
    Json(req): Json<UpdateWorkspaceRequest>,
) -> ApiResult<Json<Workspace>> {
    req.validate().map_err(validation_errors)?;

    find_owned(&state, workspace_id, identity.user_id()).await?;

    let workspace = Workspace::rename(&state.db, workspace_id, &req.name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workspace not found".to_string()))?;

    Ok(Json(workspace))
}

/// Delete a workspace and everything under it (owner only)
pub async fn delete_workspace(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(workspace_id): Path<i64>,
) -> ApiResult<StatusCode> {
    find_owned(&state, workspace_id, identity.user_id()).await?;

    Workspace::delete(&state.db, workspace_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Loads a workspace, enforcing existence first and ownership second
async fn find_owned(
    state: &AppState,
    workspace_id: i64,
    user_id: &str,
) -> Result<Workspace, ApiError> {
    let workspace = Workspace::find_by_id(&state.db, workspace_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Workspace not found".to_string()))?;

    if workspace.owner_id != user_id {
        return Err(ApiError::Forbidden(
            "Not authorized to access this workspace".to_string(),
        ));
    }

    Ok(workspace)
}
