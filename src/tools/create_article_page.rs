use crate::cms::{CmsApi, ContentItem, normalize_key};
use crate::input::{InputError, arguments, expect_object, required_json, required_str};
use crate::mcp::contracts::{ARTICLE_PAGE_TYPE, DRAFT_STATUS};
use crate::tools::{cms_error_result, input_error_result, success_result};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

const SEO_SETTINGS: &str = "SeoSettings";

pub fn call(args: &Value, api: &dyn CmsApi) -> Value {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(err) => return input_error_result(&err),
    };

    let content = ContentItem {
        content_type: Some(ARTICLE_PAGE_TYPE.to_string()),
        container: Some(normalize_key(&parsed.container)),
        display_name: Some(parsed.display_name),
        locale: Some(parsed.locale),
        status: Some(DRAFT_STATUS.to_string()),
        properties: Some(Value::Object(with_seo_settings(parsed.properties))),
        ..ContentItem::default()
    };

    info!(
        container = ?content.container,
        display_name = ?content.display_name,
        locale = ?content.locale,
        "creating article page"
    );
    debug!(payload = %json!(content), "create payload");

    let page = match api.create_content(&content) {
        Ok(page) => page,
        Err(err) => return cms_error_result(&err, "create CMS page"),
    };

    let message = format!(
        "Successfully created {} page: \"{}\" in locale {}",
        page.content_type_or_unknown(),
        page.display_name_or_empty(),
        page.locale.as_deref().unwrap_or("unknown")
    );

    let mut fields = Map::new();
    fields.insert("contentKey".to_string(), json!(page.key));
    fields.insert("displayName".to_string(), json!(page.display_name));
    fields.insert("contentType".to_string(), json!(page.content_type));
    fields.insert("status".to_string(), json!(page.status));
    fields.insert("version".to_string(), json!(page.version));
    fields.insert("locale".to_string(), json!(page.locale));
    fields.insert("container".to_string(), json!(page.container));
    fields.insert("routeSegment".to_string(), json!(page.route_segment));
    fields.insert("lastModified".to_string(), json!(page.last_modified));
    fields.insert("properties".to_string(), json!(page.properties));
    success_result(message, fields)
}

struct CreateArticleArgs {
    container: String,
    display_name: String,
    locale: String,
    properties: Map<String, Value>,
}

fn parse_args(args: &Value) -> Result<CreateArticleArgs, InputError> {
    let obj = arguments(args)?;
    let container = required_str(obj, "container")?;
    let display_name = required_str(obj, "displayName")?;
    let locale = required_str(obj, "locale")?;
    let properties = expect_object("properties", required_json(obj, "properties")?)?;
    Ok(CreateArticleArgs {
        container,
        display_name,
        locale,
        properties,
    })
}

/// Article pages need SEO settings typed as an article graph. Empty
/// placeholders (`null`, `false`, `0`, `""`) are replaced as well.
fn with_seo_settings(mut properties: Map<String, Value>) -> Map<String, Value> {
    let missing = properties.get(SEO_SETTINGS).is_none_or(is_blank);
    if missing {
        properties.insert(SEO_SETTINGS.to_string(), json!({"GraphType": "article"}));
    }
    properties
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
