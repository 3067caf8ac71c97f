//! Self-contained session tokens.
//!
//! Token format: base64(percent_encode(json(claims))). The three stages are
//! applied in exactly that order and reversed in the opposite order; front-end
//! decoders depend on it.
//!
//! The token is NOT signed. Anyone holding one can read it, and anyone can mint
//! one. It identifies the logged-in account to the front end and must never be
//! trusted for authorization.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed value of the `type` claim
pub const TOKEN_TYPE: &str = "temporary";

/// Which operation issued the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenSource {
    #[serde(rename = "register_response")]
    Register,
    #[serde(rename = "login_response")]
    Login,
}

/// Identity claims carried by a session token.
///
/// Field order is the JSON key order on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimSet {
    pub user_id: i64,
    pub fullname: String,
    pub email: String,
    pub role: String,
    /// Issuance time in milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub token_type: String,
    pub source: TokenSource,
}

impl ClaimSet {
    /// Build a claim set stamped with the current time
    pub fn new(
        user_id: i64,
        fullname: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        source: TokenSource,
    ) -> Self {
        Self {
            user_id,
            fullname: fullname.into(),
            email: email.into(),
            role: role.into(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            token_type: TOKEN_TYPE.to_string(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("token payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a claim set into an opaque token string
pub fn issue_token(claims: &ClaimSet) -> Result<String, TokenError> {
    let json = serde_json::to_string(claims)?;
    let escaped = urlencoding::encode(&json);
    Ok(BASE64.encode(escaped.as_bytes()))
}

/// Decode a token produced by [`issue_token`]
pub fn decode_token(token: &str) -> Result<ClaimSet, TokenError> {
    let escaped = String::from_utf8(BASE64.decode(token.trim())?)?;
    let json = urlencoding::decode(&escaped)?;
    Ok(serde_json::from_str(&json)?)
}
