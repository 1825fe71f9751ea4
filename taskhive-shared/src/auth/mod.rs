/// Authentication and authorization utilities
///
/// This module provides the security primitives for Taskhive:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: session token generation and validation
/// - [`authorization`]: pure per-project authorization guards
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: HS256-signed JWTs valid for 180 days
/// - **Constant-time Comparison**: password verification never short-circuits
///
/// # Example
///
/// ```no_run
/// use taskhive_shared::auth::password::{hash_password, verify_password};
/// use taskhive_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Session token generation
/// let claims = Claims::new(Uuid::new_v4());
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```
pub mod authorization;
pub mod jwt;
pub mod password;

pub use authorization::GuardError;
pub use jwt::JwtError;
pub use password::PasswordError;
