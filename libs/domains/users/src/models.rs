use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Identity provider that vouched for a session user
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Github,
    Facebook,
    /// Not authenticated
    Guest,
}

/// Resolved identity of the active session
///
/// Immutable for the lifetime of a session. The core never authenticates;
/// it only consumes what a provider already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub provider: AuthProvider,
}

impl User {
    pub const GUEST_ID: &'static str = "guest";

    /// Identity returned by a social provider. Missing profile fields get
    /// placeholder values.
    pub fn from_provider(
        provider: AuthProvider,
        uid: impl Into<String>,
        display_name: Option<String>,
        email: Option<String>,
        avatar: Option<String>,
    ) -> Self {
        Self {
            id: uid.into(),
            name: display_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "No Name".to_string()),
            email: email.unwrap_or_default(),
            avatar: avatar.filter(|a| !a.is_empty()),
            provider,
        }
    }

    /// The shared non-authenticated identity
    pub fn guest() -> Self {
        Self {
            id: Self::GUEST_ID.to_string(),
            name: "Guest User".to_string(),
            email: String::new(),
            avatar: None,
            provider: AuthProvider::Guest,
        }
    }

    pub fn is_guest(&self) -> bool {
        self.provider == AuthProvider::Guest
    }
}

/// Registered account of the remote API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create an account (password will be hashed by service layer)
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Public view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<Account> for UserResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
        }
    }
}

/// DTO for account registration
///
/// Fields are optional on the wire so a missing one is reported as
/// "All fields required" rather than a decoder error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// DTO for login
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}
