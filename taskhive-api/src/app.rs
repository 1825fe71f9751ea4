/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskhive_api::{app::{AppState, build_router}, config::Config};
/// use taskhive_shared::{mail::LogMailer, store::MemStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemStore::new()), Arc::new(LogMailer::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use taskhive_shared::mail::Mailer;
use taskhive_shared::store::Store;

use crate::{config::Config, middleware::require_auth, routes};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Document store backend
    pub store: Arc<dyn Store>,

    /// Outbound mail transport
    pub mailer: Arc<dyn Mailer>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn Mailer>, config: Config) -> Self {
        Self {
            store,
            mailer,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for session token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                                 # Health check (public)
/// └── /api/
///     ├── /auth/                              # Account flows
///     │   ├── POST /create-account            # (public)
///     │   ├── POST /confirm-account
///     │   ├── POST /login
///     │   ├── POST /request-code
///     │   ├── POST /forgot-password
///     │   ├── POST /validate-token
///     │   ├── POST /update-password/:token
///     │   ├── GET  /user                      # (authenticated)
///     │   ├── PUT  /profile
///     │   ├── POST /profile/update-password
///     │   └── POST /check-password
///     └── /projects/                          # (all authenticated)
///         ├── POST/GET    /
///         ├── GET/PUT/DELETE /:projectId
///         ├── .../team, .../team/find, .../team/:userId
///         ├── .../tasks, .../tasks/:taskId, .../tasks/:taskId/status
///         └── .../tasks/:taskId/notes, .../notes/:noteId
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route-group, [`require_auth`])
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Account flows reachable without a session
    let public_auth_routes = Router::new()
        .route("/create-account", post(routes::auth::create_account))
        .route("/confirm-account", post(routes::auth::confirm_account))
        .route("/login", post(routes::auth::login))
        .route("/request-code", post(routes::auth::request_code))
        .route("/forgot-password", post(routes::auth::forgot_password))
        .route("/validate-token", post(routes::auth::validate_token))
        .route(
            "/update-password/:token",
            post(routes::auth::update_password_with_token),
        );

    // Profile routes (require a session)
    let private_auth_routes = Router::new()
        .route("/user", get(routes::auth::current_user))
        .route("/profile", put(routes::auth::update_profile))
        .route(
            "/profile/update-password",
            post(routes::auth::update_current_password),
        )
        .route("/check-password", post(routes::auth::check_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Project, team, task and note routes (all require a session)
    let project_routes = Router::new()
        .route(
            "/",
            post(routes::projects::create_project).get(routes::projects::list_projects),
        )
        .route(
            "/:project_id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/:project_id/team/find",
            post(routes::team::find_member_by_email),
        )
        .route(
            "/:project_id/team",
            get(routes::team::get_project_team).post(routes::team::add_team_member),
        )
        .route(
            "/:project_id/team/:user_id",
            delete(routes::team::remove_team_member),
        )
        .route(
            "/:project_id/tasks",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/:project_id/tasks/:task_id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/:project_id/tasks/:task_id/status",
            post(routes::tasks::update_task_status),
        )
        .route(
            "/:project_id/tasks/:task_id/notes",
            post(routes::notes::create_note).get(routes::notes::list_notes),
        )
        .route(
            "/:project_id/tasks/:task_id/notes/:note_id",
            delete(routes::notes::delete_note),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let api_routes = Router::new()
        .nest("/auth", public_auth_routes.merge(private_auth_routes))
        .nest("/projects", project_routes);

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
                Method::PUT,
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
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
