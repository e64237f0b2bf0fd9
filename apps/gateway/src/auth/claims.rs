//! Claims carried by access tokens the auth service issues.

use serde::{Deserialize, Deserializer, Serialize};

/// Decoded payload of a verified access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User identifier. Issuers encode it as a JSON string or an integer;
    /// it is normalized to its string form here. Absent or null decodes to
    /// an empty string, which the identity layer rejects.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued-at (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawId::Text(text)) => text,
        Some(RawId::Signed(n)) => n.to_string(),
        Some(RawId::Unsigned(n)) => n.to_string(),
        None => String::new(),
    })
}
