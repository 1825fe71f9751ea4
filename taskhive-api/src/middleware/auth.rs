/// Bearer-token authentication
///
/// Private routes sit behind [`require_auth`], which validates the session
/// JWT from the `Authorization` header, loads the account it names, and
/// inserts a [`CurrentUser`] into request extensions. Handlers receive it as
/// an extractor, so identity is an explicit argument rather than ambient
/// request state.
///
/// # Example
///
/// ```ignore
/// async fn whoami(current: CurrentUser) -> Json<serde_json::Value> {
///     Json(json!({ "id": current.id }))
/// }
/// ```
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use taskhive_shared::auth::jwt;
use taskhive_shared::models::User;

use crate::{app::AppState, error::ApiError};

/// The authenticated account behind a request.
///
/// A safe projection: no password hash, no confirmation flag. Only confirmed
/// accounts can log in, so a `CurrentUser` is always confirmed.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}

/// Authentication middleware layer
///
/// Extracts and validates the session token from the Authorization header,
/// loads the user it names, and injects [`CurrentUser`] into request
/// extensions. A token for a deleted account is rejected like any other
/// invalid token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    let user = state
        .store
        .user_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session token".to_string()))?;

    req.extensions_mut().insert(CurrentUser::from(&user));

    Ok(next.run(req).await)
}
