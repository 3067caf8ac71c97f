//! Account models and DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Default role for self-registered accounts
pub const DEFAULT_ROLE: &str = "User";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub fullname: String,
    pub email: String,
    /// Argon2 PHC string, never the submitted password
    pub password: String,
    pub phone: Option<String>,
    /// Calendar date formatted `yyyy-MM-dd`
    pub dob: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub created_at: String,
}

/// Public account shape. The password hash is never included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub fullname: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            role: user.role,
            phone: user.phone,
            dob: user.dob,
            address: user.address,
        }
    }
}

/// Validated account ready to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub identifier: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// How a single key of a partial account update affects its field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Key absent from the update
    #[default]
    Unchanged,
    /// Key present with a null, empty or whitespace-only value
    Clear,
    /// Key present with a non-blank value
    Set(String),
}

impl<'de> Deserialize<'de> for FieldUpdate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Null => FieldUpdate::Clear,
            serde_json::Value::String(s) if s.trim().is_empty() => FieldUpdate::Clear,
            serde_json::Value::String(s) => FieldUpdate::Set(s),
            other => FieldUpdate::Set(other.to_string()),
        })
    }
}

/// Partial account update. Keys other than these four are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    #[serde(default)]
    pub fullname: FieldUpdate,
    #[serde(default)]
    pub phone: FieldUpdate,
    #[serde(default)]
    pub dob: FieldUpdate,
    #[serde(default)]
    pub address: FieldUpdate,
}
