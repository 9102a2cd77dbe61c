use serde::Deserialize;

use crate::serde_util::strictly_true;

/// Successful login payload from the authentication endpoint.
///
/// Every field except `access_token` is optional and defaulted later when
/// the session is built. `access_token` itself is mandatory: a response
/// without it fails deserialization instead of producing a token-less
/// session.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<u64>,
    #[serde(default, deserialize_with = "strictly_true")]
    pub is_superuser: bool,
}
