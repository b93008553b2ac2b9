/*!
 * Credential session handling.
 *
 * The interactive authorization flow lives outside this crate; it leaves behind a JSON
 * session file holding an access token, an optional account identifier and an optional
 * expiry. This module provides:
 * - Loading and decoding the session file
 * - Expiry checks run before any translation work starts
 * - Account identifier lookup, including from the token's own claims
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::Session;
pub use models::{SessionCredentials, SessionFile};
