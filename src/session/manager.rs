/*!
 * Session loading and validation.
 *
 * This module handles:
 * - Reading the session file
 * - Rejecting missing or expired tokens before a run starts
 * - Resolving the account identifier
 */

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use log::{debug, info, warn};
use std::path::Path;

use crate::errors::SessionError;

use super::models::SessionFile;

/// Claim namespace holding the account identifier inside the access token
const AUTH_CLAIM: &str = "https://api.openai.com/auth";

/// Account identifier claim name
const ACCOUNT_ID_CLAIM: &str = "chatgpt_account_id";

/// Loaded credential session
#[derive(Debug, Clone, Default)]
pub struct Session {
    data: SessionFile,
}

impl Session {
    /// Wrap already-decoded session data
    pub fn new(data: SessionFile) -> Self {
        Self { data }
    }

    /// Load a session file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SessionError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Invalid(format!("{}: {}", path.display(), e)))?;
        let session = Self::from_json(&content)?;
        debug!("Loaded session from {}", path.display());
        Ok(session)
    }

    /// Decode a session from its JSON form
    pub fn from_json(content: &str) -> Result<Self, SessionError> {
        let data: SessionFile = serde_json::from_str(content)
            .map_err(|e| SessionError::Invalid(e.to_string()))?;
        Ok(Self::new(data))
    }

    /// Raw session data
    pub fn data(&self) -> &SessionFile {
        &self.data
    }

    /// Provider name recorded in the session, if any
    pub fn provider(&self) -> Option<&str> {
        self.data.provider.as_deref()
    }

    /// Non-empty access token
    pub fn access_token(&self) -> Option<&str> {
        self.data.credentials.access_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }

    /// Raw expiry string, top-level first, then the credential block
    pub fn expires_at_raw(&self) -> Option<&str> {
        self.data.expires_at
            .as_deref()
            .or(self.data.credentials.expires_at.as_deref())
    }

    /// Parsed expiry; `None` when absent or unparseable
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at_raw().and_then(parse_expiry)
    }

    /// Account identifier, from the credential block or from the token's claims
    pub fn account_id(&self) -> Option<String> {
        if let Some(id) = self.data.credentials.account_id.as_deref().filter(|id| !id.is_empty()) {
            return Some(id.to_string());
        }

        self.access_token().and_then(account_id_from_token)
    }

    /// Check that the session can be used for a run
    ///
    /// Returns the remaining validity when the session carries a readable expiry. A token
    /// that expires within the hour only produces a warning; an expiry that cannot be read
    /// is treated as valid.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<Option<Duration>, SessionError> {
        if self.access_token().is_none() {
            return Err(SessionError::MissingToken);
        }

        let Some(raw) = self.expires_at_raw() else {
            return Ok(None);
        };

        let Some(expiry) = parse_expiry(raw) else {
            warn!("Could not parse session expiry timestamp: {}", raw);
            return Ok(None);
        };

        if expiry <= now {
            return Err(SessionError::Expired { expired_at: raw.to_string() });
        }

        let remaining = expiry - now;
        if remaining < Duration::hours(1) {
            warn!("Session token will expire in {} minutes", remaining.num_minutes());
        } else {
            info!("Token valid for {:.1} hours", remaining.num_minutes() as f64 / 60.0);
        }

        Ok(Some(remaining))
    }
}

// @parses: RFC 3339, or a naive ISO 8601 timestamp taken as UTC
fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// @decodes: JWT payload without verification
fn account_id_from_token(token: &str) -> Option<String> {
    let mut parts = token.split('.');
    let (_, payload, _) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;

    claims
        .get(AUTH_CLAIM)?
        .get(ACCOUNT_ID_CLAIM)?
        .as_str()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
