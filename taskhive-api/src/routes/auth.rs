/// Account endpoints
///
/// Registration with email confirmation, login, password reset, and profile
/// management. Accounts move `Unregistered -> PendingConfirmation ->
/// Confirmed`; only confirmed accounts can log in.
///
/// # Endpoints
///
/// Public:
/// - `POST /api/auth/create-account` - Register a new account
/// - `POST /api/auth/confirm-account` - Confirm with an emailed code
/// - `POST /api/auth/login` - Login and get a session token
/// - `POST /api/auth/request-code` - Re-send a confirmation code
/// - `POST /api/auth/forgot-password` - Start a password reset
/// - `POST /api/auth/validate-token` - Check a reset code without consuming it
/// - `POST /api/auth/update-password/:token` - Finish a password reset
///
/// Authenticated:
/// - `GET  /api/auth/user` - Current account profile
/// - `PUT  /api/auth/profile` - Update name/email
/// - `POST /api/auth/profile/update-password` - Change password
/// - `POST /api/auth/check-password` - Re-verify the current password
///
/// # Dual writes
///
/// Flows that pair two writes (create user + token, confirm user + delete
/// token, reset password + delete token) issue both concurrently and treat
/// them as best-effort: a partial failure is logged at `warn` and the
/// request still succeeds. The store is not transactional across documents
/// and these pairings are cleanup, not correctness.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use taskhive_shared::auth::{jwt, password};
use taskhive_shared::mail::templates;
use taskhive_shared::models::{OneTimeToken, User, UserProfile};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
};

use super::{message, MessageResponse};

/// Create account request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Password, again
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

/// Confirm account request
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmAccountRequest {
    /// The six-digit code from the confirmation email
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token (180 days)
    pub token: String,
}

/// Request carrying only an email (request-code, forgot-password)
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Validate reset token request
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateTokenRequest {
    /// The six-digit code from the reset email
    #[validate(length(min = 1, message = "Token cannot be empty"))]
    pub token: String,
}

/// New password request (reset flow, code in the path)
#[derive(Debug, Deserialize, Validate)]
pub struct NewPasswordRequest {
    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// New password, again
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

/// Update profile request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Change password request (authenticated flow)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCurrentPasswordRequest {
    /// Current password, re-verified before the change
    #[validate(length(min = 1, message = "Current password cannot be empty"))]
    pub current_password: String,

    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// New password, again
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

/// Check password request
#[derive(Debug, Deserialize, Validate)]
pub struct CheckPasswordRequest {
    /// Password to re-verify
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

/// Issues a fresh confirmation code for `user`, persists it, and sends the
/// confirmation email. Both steps are best-effort; failures are logged.
async fn reissue_confirmation(state: &AppState, user: &User) {
    let token = OneTimeToken::issue(user.id);

    if let Err(e) = state.store.insert_token(&token).await {
        warn!(user_id = %user.id, error = %e, "Failed to persist confirmation token");
    }

    let mail = templates::confirmation_mail(
        &user.email,
        &user.name,
        &token.code,
        &state.config.frontend_url,
    );
    if let Err(e) = state.mailer.send(mail).await {
        warn!(user_id = %user.id, error = %e, "Failed to dispatch confirmation email");
    }
}

/// Looks up a one-time code and enforces the expiry window, deleting stale
/// rows as it finds them. Absent and expired codes are indistinguishable to
/// the caller.
async fn live_token(state: &AppState, code: &str) -> ApiResult<OneTimeToken> {
    let token = state
        .store
        .token_by_code(code)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    if token.is_expired() {
        if let Err(e) = state.store.delete_token(token.id).await {
            warn!(token_id = %token.id, error = %e, "Failed to delete expired token");
        }
        return Err(ApiError::Unauthorized(
            "Invalid or expired token".to_string(),
        ));
    }

    Ok(token)
}

/// Register a new account
///
/// Creates an unconfirmed account plus a confirmation code and emails the
/// code. The account and the code are persisted concurrently; the email is
/// fire-and-forget.
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_account(
    State(state): State<AppState>,
    Json(mut req): Json<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    // Normalize before validating so a padded address is a duplicate, not a
    // format error.
    req.email = User::normalize_email(&req.email);
    req.validate()?;

    if state.store.user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let user = User::new(req.name.trim(), req.email.clone(), password_hash);
    let token = OneTimeToken::issue(user.id);

    let (user_saved, token_saved) = tokio::join!(
        state.store.insert_user(&user),
        state.store.insert_token(&token)
    );
    if let Err(e) = user_saved {
        warn!(user_id = %user.id, error = %e, "Failed to persist new account");
    }
    if let Err(e) = token_saved {
        warn!(user_id = %user.id, error = %e, "Failed to persist confirmation token");
    }

    let mail = templates::confirmation_mail(
        &user.email,
        &user.name,
        &token.code,
        &state.config.frontend_url,
    );
    if let Err(e) = state.mailer.send(mail).await {
        warn!(user_id = %user.id, error = %e, "Failed to dispatch confirmation email");
    }

    Ok((
        StatusCode::CREATED,
        message("Account created, check your email to confirm it"),
    ))
}

/// Confirm an account with an emailed code
///
/// Marks the owning account confirmed and consumes the code. Both writes are
/// issued concurrently, best-effort.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown or expired code
pub async fn confirm_account(
    State(state): State<AppState>,
    Json(req): Json<ConfirmAccountRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let token = live_token(&state, &req.token).await?;

    let mut user = state
        .store
        .user_by_id(token.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;
    user.confirmed = true;
    user.touch();

    let (user_saved, token_deleted) = tokio::join!(
        state.store.save_user(&user),
        state.store.delete_token(token.id)
    );
    if let Err(e) = user_saved {
        warn!(user_id = %user.id, error = %e, "Failed to persist account confirmation");
    }
    if let Err(e) = token_deleted {
        warn!(token_id = %token.id, error = %e, "Failed to consume confirmation token");
    }

    Ok(message("Account confirmed"))
}

/// Login with email and password
///
/// Logging in to an unconfirmed account fails, but first re-issues a
/// confirmation code and email so the user can finish registration.
///
/// # Errors
///
/// - `404 Not Found`: Unknown email
/// - `401 Unauthorized`: Unconfirmed account (code re-sent) or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(mut req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.email = User::normalize_email(&req.email);
    req.validate()?;

    let user = state
        .store
        .user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No account with that email".to_string()))?;

    if !user.confirmed {
        reissue_confirmation(&state, &user).await;
        return Err(ApiError::Unauthorized(
            "Account not confirmed; a new confirmation code has been sent".to_string(),
        ));
    }

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized("Incorrect password".to_string()));
    }

    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;
    Ok(Json(LoginResponse { token }))
}

/// Re-send a confirmation code
///
/// # Errors
///
/// - `404 Not Found`: Unknown email
/// - `409 Conflict`: Account is already confirmed
pub async fn request_code(
    State(state): State<AppState>,
    Json(mut req): Json<EmailRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.email = User::normalize_email(&req.email);
    req.validate()?;

    let user = state
        .store
        .user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No account with that email".to_string()))?;

    if user.confirmed {
        return Err(ApiError::Conflict(
            "Account is already confirmed".to_string(),
        ));
    }

    reissue_confirmation(&state, &user).await;
    Ok(message("A new confirmation code has been sent"))
}

/// Start a password reset
///
/// Unlike the confirmation flows, the reset token insert is awaited and a
/// failure fails the request: the token is the whole point here.
///
/// # Errors
///
/// - `404 Not Found`: Unknown email
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(mut req): Json<EmailRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.email = User::normalize_email(&req.email);
    req.validate()?;

    let user = state
        .store
        .user_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("No account with that email".to_string()))?;

    let token = OneTimeToken::issue(user.id);
    state.store.insert_token(&token).await?;

    let mail = templates::password_reset_mail(
        &user.email,
        &user.name,
        &token.code,
        &state.config.frontend_url,
    );
    if let Err(e) = state.mailer.send(mail).await {
        warn!(user_id = %user.id, error = %e, "Failed to dispatch password reset email");
    }

    Ok(message("Check your email for the reset code"))
}

/// Check a reset code without consuming it
///
/// May be called repeatedly while the code's window is open; only
/// [`update_password_with_token`] consumes it.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown or expired code
pub async fn validate_token(
    State(state): State<AppState>,
    Json(req): Json<ValidateTokenRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    live_token(&state, &req.token).await?;
    Ok(message("Token is valid, set your new password"))
}

/// Finish a password reset
///
/// Rehashes the password on the owning account and consumes the code. Both
/// writes are issued concurrently, best-effort.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown or expired code
pub async fn update_password_with_token(
    State(state): State<AppState>,
    Path(token_code): Path<String>,
    Json(req): Json<NewPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let token = live_token(&state, &token_code).await?;

    let mut user = state
        .store
        .user_by_id(token.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".to_string()))?;
    user.password_hash = password::hash_password(&req.password)?;
    user.touch();

    let (user_saved, token_deleted) = tokio::join!(
        state.store.save_user(&user),
        state.store.delete_token(token.id)
    );
    if let Err(e) = user_saved {
        warn!(user_id = %user.id, error = %e, "Failed to persist password reset");
    }
    if let Err(e) = token_deleted {
        warn!(token_id = %token.id, error = %e, "Failed to consume reset token");
    }

    Ok(message("Password updated"))
}

/// Current account profile
pub async fn current_user(current: CurrentUser) -> Json<UserProfile> {
    Json(UserProfile {
        id: current.id,
        name: current.name,
        email: current.email,
    })
}

/// Update name and email
///
/// # Errors
///
/// - `409 Conflict`: The new email belongs to a different account
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(mut req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.email = User::normalize_email(&req.email);
    req.validate()?;

    if let Some(other) = state.store.user_by_email(&req.email).await? {
        if other.id != current.id {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }
    }

    let mut user = state
        .store
        .user_by_id(current.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session token".to_string()))?;
    user.name = req.name.trim().to_string();
    user.email = req.email;
    user.touch();
    state.store.save_user(&user).await?;

    Ok(message("Profile updated"))
}

/// Change password while logged in
///
/// # Errors
///
/// - `401 Unauthorized`: Current password is wrong
pub async fn update_current_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<UpdateCurrentPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let mut user = state
        .store
        .user_by_id(current.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session token".to_string()))?;

    if !password::verify_password(&req.current_password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    user.password_hash = password::hash_password(&req.password)?;
    user.touch();
    state.store.save_user(&user).await?;

    Ok(message("Password updated"))
}

/// Re-verify the current password
///
/// Used by the frontend to gate destructive actions (e.g. project deletion)
/// behind a password prompt.
///
/// # Errors
///
/// - `401 Unauthorized`: Wrong password
pub async fn check_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CheckPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    let user = state
        .store
        .user_by_id(current.id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid session token".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized("Incorrect password".to_string()));
    }

    Ok(message("Password is correct"))
}
