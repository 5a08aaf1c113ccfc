/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use corkboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = corkboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::error::ApiError;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use corkboard_shared::auth::middleware::resolve_identity;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<crate::config::Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: crate::config::Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                         # Health check (public)
/// └── /v1/                            # API v1 (versioned)
///     ├── /identity/webhook           # Lifecycle webhooks (signature-verified)
///     ├── /workspaces[/:id]           # Workspace CRUD (authenticated)
///     ├── /boards[/:id]               # Board CRUD + aggregate read
///     ├── /boards/:id/members[...]    # Board membership management
///     ├── /boards/:id/available-members
///     ├── /lists[/:id]               # List create/rename/move/delete
///     ├── /cards[/:id]               # Card create/read/update/move/delete
///     ├── /cards/:id/labels[...]      # Label attach/detach
///     ├── /cards/:id/members[...]     # Member attach/detach
///     └── /labels                     # Global label list/create
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Identity resolution (all /v1 routes except the webhook)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Identity lifecycle webhook (public, verified by signature instead)
    let webhook_routes = Router::new().route(
        "/identity/webhook",
        post(routes::identity_webhook::receive_event),
    );

    // Workspace CRUD
    let workspace_routes = Router::new()
        .route("/", post(routes::workspaces::create_workspace))
        .route("/", get(routes::workspaces::list_workspaces))
        .route("/:workspace_id", get(routes::workspaces::get_workspace))
        .route("/:workspace_id", patch(routes::workspaces::update_workspace))
        .route("/:workspace_id", delete(routes::workspaces::delete_workspace));

    // Board CRUD, aggregate read, and membership management
    let board_routes = Router::new()
        .route("/", post(routes::boards::create_board))
        .route("/", get(routes::boards::list_boards))
        .route("/:board_id", get(routes::boards::get_board))
        .route("/:board_id", patch(routes::boards::update_board))
        .route("/:board_id", delete(routes::boards::delete_board))
        .route("/:board_id/members", get(routes::board_members::list_members))
        .route("/:board_id/members", post(routes::board_members::add_member))
        .route(
            "/:board_id/members/:user_id",
            delete(routes::board_members::remove_member),
        )
        .route(
            "/:board_id/available-members",
            get(routes::board_members::available_members),
        );

    // List create/rename/move/delete
    let list_routes = Router::new()
        .route("/", post(routes::lists::create_list))
        .route("/:list_id", patch(routes::lists::update_list))
        .route("/:list_id", delete(routes::lists::delete_list));

    // Card create/read/update/move/delete plus label and member attachment
    let card_routes = Router::new()
        .route("/", post(routes::cards::create_card))
        .route("/:card_id", get(routes::cards::get_card))
        .route("/:card_id", patch(routes::cards::update_card))
        .route("/:card_id", delete(routes::cards::delete_card))
        .route("/:card_id/labels", post(routes::card_labels::attach_label))
        .route(
            "/:card_id/labels/:label_id",
            delete(routes::card_labels::detach_label),
        )
        .route("/:card_id/members", post(routes::card_members::attach_member))
        .route(
            "/:card_id/members/:user_id",
            delete(routes::card_members::detach_member),
        );

    // Global labels
    let label_routes = Router::new()
        .route("/", post(routes::labels::create_label))
        .route("/", get(routes::labels::list_labels));

    // Authenticated API surface
    let authenticated = Router::new()
        .nest("/workspaces", workspace_routes)
        .nest("/boards", board_routes)
        .nest("/lists", list_routes)
        .nest("/cards", card_routes)
        .nest("/labels", label_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            identity_layer,
        ));

    let v1_routes = Router::new().merge(webhook_routes).merge(authenticated);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Identity resolution middleware layer
///
/// Verifies the provider session token from the Authorization header,
/// resolves the acting user's row, and injects
/// [`corkboard_shared::auth::middleware::Identity`] into request
/// extensions.
async fn identity_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = resolve_identity(
        &state.db,
        &state.config.identity.token_secret,
        req.headers(),
    )
    .await?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
