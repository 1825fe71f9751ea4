/// User account model
///
/// A user registers with an email address, confirms the account with a
/// one-time code delivered by email, and only then may log in. Passwords are
/// stored as Argon2id hashes, never in plaintext.
///
/// # Example
///
/// ```
/// use taskhive_shared::models::user::{User, UserProfile};
///
/// let email = User::normalize_email("  Ada@Example.COM ");
/// let user = User::new("Ada Lovelace", email, "$argon2id$...".to_string());
///
/// assert_eq!(user.email, "ada@example.com");
/// assert!(!user.confirmed);
///
/// // Safe projection for API responses: no hash, no flags.
/// let profile = UserProfile::from(&user);
/// assert_eq!(profile.name, "Ada Lovelace");
/// ```
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
///
/// Emails are unique across all users and are normalized (trimmed, lowercased)
/// before any lookup or write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Normalized email address, unique across all users
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash (PHC string)
    ///
    /// Never store plaintext passwords!
    pub password_hash: String,

    /// Whether the account's email has been confirmed
    ///
    /// Unconfirmed accounts cannot log in.
    pub confirmed: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a [`User`]
///
/// This is the only user shape that leaves the API: it omits the password
/// hash and the confirmation flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl User {
    /// Creates a new, unconfirmed account document.
    ///
    /// The caller is responsible for hashing the password and normalizing the
    /// email first (see [`User::normalize_email`]).
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            password_hash,
            confirmed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Normalizes a raw email address for storage and lookup.
    ///
    /// All account flows compare emails in this form, so `Ada@Example.com`
    /// and `ada@example.com` are the same account.
    pub fn normalize_email(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Bumps the `updated_at` timestamp. Call before saving a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
