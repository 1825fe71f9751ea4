/// Request middleware
///
/// - `auth`: bearer-token authentication; resolves the session to a
///   [`auth::CurrentUser`] in request extensions
pub mod auth;

pub use auth::{require_auth, CurrentUser};
