/// Session token generation and validation
///
/// Logging in yields a stateless JWT signed with HS256. There is no refresh
/// flow and no server-side session record: the token is the session, valid
/// for 180 days from issuance.
///
/// # Claims
///
/// - `sub`: user ID
/// - `iss`: always "taskhive"
/// - `iat`: issued at (Unix timestamp)
/// - `exp`: expiration (Unix timestamp)
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes-long";
///
/// let token = create_token(&Claims::new(user_id), secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a session token stays valid after login.
pub const SESSION_TTL_DAYS: i64 = 180;

const ISSUER: &str = "taskhive";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// No signing secret was configured
    #[error("signing secret is not configured")]
    MissingSecret,

    /// Failed to sign a token
    #[error("failed to create token: {0}")]
    Create(String),

    /// Token signature expired
    #[error("session has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("invalid token issuer")]
    InvalidIssuer,

    /// Signature mismatch, malformed token, or missing claims
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "taskhive"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a new session with the standard 180-day lifetime.
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, Duration::days(SESSION_TTL_DAYS))
    }

    /// Creates claims with a custom lifetime. A negative duration produces an
    /// already-expired token, which the tests lean on.
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Checks whether the expiration timestamp has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a JWT using HS256.
///
/// The secret should be at least 32 bytes; the API config enforces that at
/// startup. An empty secret is refused here as well, so a misconfigured
/// caller can never issue unsigned-in-practice sessions.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::MissingSecret);
    }

    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key).map_err(|e| JwtError::Create(e.to_string()))
}

/// Validates a session token and extracts its claims.
///
/// Verifies the signature, the expiration, and that the issuer is
/// "taskhive".
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::Invalid(e.to_string()),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_carry_issuer_and_lifetime() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "taskhive");
        assert!(!claims.is_expired());

        let lifetime = claims.exp - claims.iat;
        assert_eq!(lifetime, Duration::days(SESSION_TTL_DAYS).num_seconds());
    }

    #[test]
    fn test_create_and_validate_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).expect("should create token");

        let validated = validate_token(&token, SECRET).expect("should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.iss, "taskhive");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = create_token(&Claims::new(Uuid::new_v4()), SECRET).unwrap();

        let result = validate_token(&token, "a-completely-different-secret-key");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims::with_expiration(Uuid::new_v4(), Duration::days(-1));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let mut claims = Claims::new(Uuid::new_v4());
        claims.iss = "someone-else".to_string();

        let token = create_token(&claims, SECRET).unwrap();
        let result = validate_token(&token, SECRET);
        assert!(matches!(result, Err(JwtError::InvalidIssuer)));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = create_token(&Claims::new(Uuid::new_v4()), SECRET).unwrap();

        // Flip a character in the payload segment.
        let mut tampered = token.into_bytes();
        let mid = tampered.len() / 2;
        tampered[mid] = if tampered[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_empty_secret_refuses_to_sign() {
        let result = create_token(&Claims::new(Uuid::new_v4()), "");
        assert!(matches!(result, Err(JwtError::MissingSecret)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(validate_token("not-a-jwt", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }
}
