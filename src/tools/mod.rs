use crate::cms::{CmsError, ContentItem};
use crate::input::InputError;
use crate::mcp::errors;
use serde_json::{Map, Value, json};
use tracing::error;

pub mod add_blocks;
pub mod create_article_page;
pub mod get_page;
pub mod translate_page;
pub mod update_page;

pub fn success_result(message: impl Into<String>, fields: Map<String, Value>) -> Value {
    let message = message.into();
    let mut structured = Map::new();
    structured.insert("success".to_string(), json!(true));
    structured.extend(fields);
    structured.insert("message".to_string(), json!(message));

    json!({
        "content": [{"type": "text", "text": message}],
        "structuredContent": structured,
        "isError": false
    })
}

/// `error` is the short machine-facing reason; `message` is what a person reads.
pub fn error_result(
    kind: &'static str,
    error: impl Into<String>,
    message: impl Into<String>,
    extra: Option<Map<String, Value>>,
) -> Value {
    let message = message.into();
    let mut structured = Map::new();
    structured.insert("success".to_string(), json!(false));
    structured.insert(
        "error".to_string(),
        json!({
            "kind": kind,
            "message": error.into(),
        }),
    );
    structured.insert("message".to_string(), json!(message));
    if let Some(extra) = extra {
        structured.extend(extra);
    }

    json!({
        "content": [{"type": "text", "text": format!("Error: {message}")}],
        "structuredContent": structured,
        "isError": true
    })
}

pub fn input_error_result(err: &InputError) -> Value {
    error_result(err.kind, err.message.clone(), err.display_message(), None)
}

pub fn cms_error_result(err: &CmsError, action: &str) -> Value {
    error!(error = %err, action, "CMS request failed");
    let kind = match err {
        CmsError::NotConfigured => errors::NOT_CONFIGURED,
        CmsError::InvalidPathSegment(_) => errors::INVALID_INPUT,
        _ => errors::CMS_REQUEST_FAILED,
    };
    let mut extra = Map::new();
    if let Some(status) = err.status_code() {
        extra.insert("statusCode".to_string(), json!(status));
    }
    if let Some(details) = err.details() {
        extra.insert("errorDetails".to_string(), details);
    }
    error_result(
        kind,
        err.to_string(),
        format!("Failed to {action}: {err}"),
        Some(extra),
    )
}

/// Page metadata shared by the fetch and update results.
pub fn page_fields(page: &ContentItem) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("contentKey".to_string(), json!(page.key));
    fields.insert("contentType".to_string(), json!(page.content_type));
    fields.insert("displayName".to_string(), json!(page.display_name));
    fields.insert("version".to_string(), json!(page.version));
    fields.insert("locale".to_string(), json!(page.locale));
    fields.insert("status".to_string(), json!(page.status));
    fields.insert("routeSegment".to_string(), json!(page.route_segment));
    fields.insert("container".to_string(), json!(page.container));
    fields.insert("lastModified".to_string(), json!(page.last_modified));
    fields.insert("properties".to_string(), json!(page.properties));
    fields
}
