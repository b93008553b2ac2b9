/*!
 * Serialized form of the credential session file.
 */

use serde::{Deserialize, Serialize};

/// Top-level session file as written by the authorization helper
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
    /// Provider the credentials belong to
    #[serde(default)]
    pub provider: Option<String>,
    /// When the session was saved (ISO 8601)
    #[serde(default)]
    pub timestamp: Option<String>,
    /// The credentials themselves
    #[serde(default)]
    pub credentials: SessionCredentials,
    /// Expiry (ISO 8601)
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Credential block of the session file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredentials {
    /// Bearer token
    #[serde(default)]
    pub access_token: Option<String>,
    /// Refresh token, carried along but not used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Account identifier sent alongside requests
    #[serde(default)]
    pub account_id: Option<String>,
    /// Token expiry (ISO 8601)
    #[serde(default)]
    pub expires_at: Option<String>,
}
