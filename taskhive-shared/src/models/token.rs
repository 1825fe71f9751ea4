/// One-time confirmation / password-reset tokens
///
/// A token is a six-digit numeric code tied to one user. The same mechanism
/// backs account confirmation and password reset; which flow a token belongs
/// to is implied by how it is consumed.
///
/// Expiry is a convention enforced by callers: rows only carry `created_at`,
/// and every consumer checks [`OneTimeToken::is_expired`] (20 minutes) before
/// honoring a code, deleting stale rows as it finds them. There is no
/// background sweeper.
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a code stays valid after issuance, in minutes.
pub const TOKEN_TTL_MINUTES: i64 = 20;

/// A pending one-time code for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneTimeToken {
    /// Unique token ID (UUID v4)
    pub id: Uuid,

    /// Six-digit numeric code, as typed by the user
    pub code: String,

    /// The account this code belongs to
    pub user_id: Uuid,

    /// When the code was issued; the expiry window counts from here
    pub created_at: DateTime<Utc>,
}

impl OneTimeToken {
    /// Issues a fresh code for the given user.
    pub fn issue(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: generate_code(),
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Whether the 20-minute validity window has elapsed.
    pub fn is_expired(&self) -> bool {
        Utc::now() - self.created_at > Duration::minutes(TOKEN_TTL_MINUTES)
    }
}

/// Generates a random six-digit numeric code (100000..=999999).
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_is_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn test_fresh_token_is_not_expired() {
        let token = OneTimeToken::issue(Uuid::new_v4());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_token_expires_after_window() {
        let token = OneTimeToken {
            created_at: Utc::now() - Duration::minutes(TOKEN_TTL_MINUTES + 1),
            ..OneTimeToken::issue(Uuid::new_v4())
        };
        assert!(token.is_expired());
    }

    #[test]
    fn test_token_inside_window_is_valid() {
        let token = OneTimeToken {
            created_at: Utc::now() - Duration::minutes(TOKEN_TTL_MINUTES - 1),
            ..OneTimeToken::issue(Uuid::new_v4())
        };
        assert!(!token.is_expired());
    }
}
