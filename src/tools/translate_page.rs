use crate::cms::{CmsApi, ContentItem, normalize_key};
use crate::input::{InputError, arguments, expect_object, optional_json, optional_str, required_str};
use crate::mcp::contracts::{DRAFT_STATUS, TOOL_UPDATE_PAGE};
use crate::mcp::errors;
use crate::merge::merge;
use crate::tools::{cms_error_result, error_result, input_error_result, success_result};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

pub fn call(args: &Value, api: &dyn CmsApi) -> Value {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(err) => return input_error_result(&err),
    };

    info!(
        content_key = %parsed.content_key,
        source_locale = %parsed.source_locale,
        "fetching source page"
    );
    let source_locale = Some(parsed.source_locale.as_str());
    let source = match api.get_content(&parsed.content_key, None, source_locale) {
        Ok(source) => source,
        Err(err) => return cms_error_result(&err, "create translation"),
    };

    let target_locale = Some(parsed.target_locale.as_str());
    match api.get_content(&parsed.content_key, None, target_locale) {
        Ok(existing) => {
            warn!(
                target_locale = %parsed.target_locale,
                version = ?existing.version,
                "translation already exists"
            );
            return already_exists_result(&parsed.target_locale, &existing);
        }
        Err(err) if err.is_not_found() => {
            debug!(target_locale = %parsed.target_locale, "no existing translation");
        }
        Err(err) => {
            warn!(error = %err, "translation lookup failed; assuming none exists");
        }
    }

    let translation = build_translation(&parsed, &source);
    info!(target_locale = %parsed.target_locale, "creating translation");
    debug!(payload = %json!(translation), "translation payload");

    let translated = match api.create_content_version(&translation) {
        Ok(translated) => translated,
        Err(err) => return cms_error_result(&err, "create translation"),
    };

    let message = format!(
        "Successfully created translation of \"{}\" from '{}' to '{}'. Translation created as draft with version {}.",
        source.display_name_or_empty(),
        parsed.source_locale,
        parsed.target_locale,
        translated.version_or_unknown()
    );

    let mut fields = Map::new();
    fields.insert("sourceContentKey".to_string(), json!(source.key));
    fields.insert("sourceLocale".to_string(), json!(source.locale));
    fields.insert("sourceDisplayName".to_string(), json!(source.display_name));
    fields.insert("translationContentKey".to_string(), json!(translated.key));
    fields.insert("translationLocale".to_string(), json!(translated.locale));
    fields.insert(
        "translationDisplayName".to_string(),
        json!(translated.display_name),
    );
    fields.insert("translationVersion".to_string(), json!(translated.version));
    fields.insert("translationStatus".to_string(), json!(translated.status));
    fields.insert("contentType".to_string(), json!(translated.content_type));
    fields.insert("container".to_string(), json!(translated.container));
    fields.insert("properties".to_string(), json!(translated.properties));
    success_result(message, fields)
}

struct TranslateArgs {
    content_key: String,
    source_locale: String,
    target_locale: String,
    translated_display_name: Option<String>,
    translated_properties: Option<Value>,
}

fn parse_args(args: &Value) -> Result<TranslateArgs, InputError> {
    let obj = arguments(args)?;
    let content_key = required_str(obj, "contentKey")?;
    let source_locale = required_str(obj, "sourceLocale")?;
    let target_locale = required_str(obj, "targetLocale")?;
    let translated_display_name = optional_str(obj, "translatedDisplayName")?;
    let translated_properties = optional_json(obj, "translatedProperties")?
        .map(|value| expect_object("translatedProperties", value).map(Value::Object))
        .transpose()?;
    Ok(TranslateArgs {
        content_key,
        source_locale,
        target_locale,
        translated_display_name,
        translated_properties,
    })
}

fn build_translation(args: &TranslateArgs, source: &ContentItem) -> ContentItem {
    let base = source.properties.clone().unwrap_or(Value::Null);
    let properties = merge(&base, args.translated_properties.as_ref());

    ContentItem {
        key: Some(normalize_key(&args.content_key)),
        content_type: source.content_type.clone(),
        container: source.container.clone(),
        locale: Some(args.target_locale.clone()),
        display_name: args
            .translated_display_name
            .clone()
            .or_else(|| source.display_name.clone()),
        status: Some(DRAFT_STATUS.to_string()),
        properties: (!properties.is_null()).then_some(properties),
        route_segment: source.route_segment.clone(),
        ..ContentItem::default()
    }
}

fn already_exists_result(target_locale: &str, existing: &ContentItem) -> Value {
    let mut extra = Map::new();
    extra.insert(
        "existingVersion".to_string(),
        json!({
            "key": existing.key,
            "version": existing.version,
            "displayName": existing.display_name,
            "locale": existing.locale,
            "status": existing.status,
        }),
    );
    error_result(
        errors::ALREADY_EXISTS,
        "Translation already exists",
        format!(
            "A version of this content already exists for locale '{target_locale}'. Use {TOOL_UPDATE_PAGE} to update it instead."
        ),
        Some(extra),
    )
}
