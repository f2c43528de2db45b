use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod client;
#[cfg(test)]
pub mod fake;

pub use client::CmsClient;

/// A versioned page or block record as exchanged with the CMS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_segment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

impl ContentItem {
    pub fn content_type_or_unknown(&self) -> &str {
        self.content_type.as_deref().unwrap_or("unknown")
    }

    pub fn display_name_or_empty(&self) -> &str {
        self.display_name.as_deref().unwrap_or("")
    }

    pub fn version_or_unknown(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Content keys are GUIDs; the API expects them without dashes.
pub fn normalize_key(key: &str) -> String {
    key.trim().replace('-', "")
}

#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("CMS base URL is not configured")]
    NotConfigured,

    #[error("content key is required")]
    MissingKey,

    #[error("invalid CMS base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("invalid key or version in request path: '{0}'")]
    InvalidPathSegment(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request failed with status {status}")]
    Http { status: u16, body: Value },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CmsError {
    pub fn not_found(key: &str) -> Self {
        CmsError::Http {
            status: 404,
            body: Value::String(format!("content not found: {key}")),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            CmsError::Http { status, .. } => Some(*status),
            CmsError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            CmsError::Http { body, .. } if !body.is_null() => Some(body.clone()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

/// Operations the tools need from a CMS backend.
pub trait CmsApi {
    /// Fetches a content item; the latest version when `version` is `None`.
    fn get_content(
        &self,
        key: &str,
        version: Option<&str>,
        locale: Option<&str>,
    ) -> Result<ContentItem, CmsError>;

    fn create_content(&self, content: &ContentItem) -> Result<ContentItem, CmsError>;

    /// Creates a new version of an existing item, e.g. a locale variant.
    fn create_content_version(&self, content: &ContentItem) -> Result<ContentItem, CmsError>;

    fn update_content(
        &self,
        key: &str,
        version: &str,
        updates: &Value,
        locale: Option<&str>,
    ) -> Result<ContentItem, CmsError>;
}
