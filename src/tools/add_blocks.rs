use crate::cms::CmsApi;
use crate::input::{InputError, arguments, optional_str, required_json, required_str};
use crate::mcp::errors;
use crate::tools::{cms_error_result, input_error_result, success_result};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value, json};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockDefinition {
    content_type: String,
    display_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    properties: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn call(args: &Value, api: &dyn CmsApi) -> Value {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(err) => return input_error_result(&err),
    };

    let page = match api.get_content(
        &parsed.page_key,
        Some(parsed.page_version.as_str()),
        parsed.locale.as_deref(),
    ) {
        Ok(page) => page,
        Err(err) => return cms_error_result(&err, "update page with blocks"),
    };

    let existing = match existing_items(page.properties.as_ref(), &parsed.content_area) {
        Ok(existing) => existing,
        Err(err) => return input_error_result(&err),
    };
    let existing_count = existing.len();
    info!(
        content_area = %parsed.content_area,
        existing = existing_count,
        new = parsed.blocks.len(),
        "appending inline blocks"
    );

    let mut items = existing;
    items.extend(parsed.blocks.iter().map(inline_block));
    let total = items.len();

    let mut area = Map::new();
    area.insert(parsed.content_area.clone(), Value::Array(items));
    let updates = json!({ "properties": area });
    debug!(payload = %updates, "content area update");

    let updated = match api.update_content(
        &parsed.page_key,
        &parsed.page_version,
        &updates,
        parsed.locale.as_deref(),
    ) {
        Ok(updated) => updated,
        Err(err) => return cms_error_result(&err, "update page with blocks"),
    };

    let created = parsed.blocks.len();
    let message = format!(
        "Successfully added {created} new inline block(s) to ContentArea '{}' on page \"{}\". Total blocks: {total} ({existing_count} existing + {created} new)",
        parsed.content_area,
        updated.display_name_or_empty()
    );

    let summaries: Vec<Value> = parsed
        .blocks
        .iter()
        .map(|block| {
            json!({
                "contentType": block.content_type,
                "displayName": block.display_name,
            })
        })
        .collect();

    let mut fields = Map::new();
    fields.insert("pageContentKey".to_string(), json!(updated.key));
    fields.insert("pageDisplayName".to_string(), json!(updated.display_name));
    fields.insert("pageVersion".to_string(), json!(updated.version));
    fields.insert("contentAreaName".to_string(), json!(parsed.content_area));
    fields.insert("blocksCreated".to_string(), json!(created));
    fields.insert("totalBlocks".to_string(), json!(total));
    fields.insert("existingBlocks".to_string(), json!(existing_count));
    fields.insert("blocks".to_string(), Value::Array(summaries));
    success_result(message, fields)
}

struct AddBlocksArgs {
    page_key: String,
    page_version: String,
    content_area: String,
    blocks: Vec<BlockDefinition>,
    locale: Option<String>,
}

fn parse_args(args: &Value) -> Result<AddBlocksArgs, InputError> {
    let obj = arguments(args)?;
    let page_key = required_str(obj, "pageContentKey")?;
    let page_version = required_str(obj, "pageVersion")?;
    let content_area = required_str(obj, "contentAreaName")?;
    let blocks = required_json(obj, "blocks")?;
    let locale = optional_str(obj, "locale")?;
    Ok(AddBlocksArgs {
        page_key,
        page_version,
        content_area,
        blocks: parse_blocks(blocks)?,
        locale,
    })
}

fn parse_blocks(value: Value) -> Result<Vec<BlockDefinition>, InputError> {
    if !value.is_array() {
        return Err(invalid_blocks("Blocks must be an array of block definitions"));
    }
    serde_json::from_value(value).map_err(|err| {
        invalid_blocks(format!(
            "Each block needs contentType, displayName and an optional properties object ({err})"
        ))
    })
}

fn invalid_blocks(hint: impl Into<String>) -> InputError {
    InputError {
        kind: errors::INVALID_INPUT,
        message: "Invalid blocks format".to_string(),
        hint: Some(hint.into()),
    }
}

/// Current items of a content area. Absent or null means empty; any other
/// non-array value is refused so the update cannot overwrite it.
fn existing_items(
    properties: Option<&Value>,
    content_area: &str,
) -> Result<Vec<Value>, InputError> {
    match properties.and_then(|properties| properties.get(content_area)) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err(InputError {
            kind: errors::INVALID_INPUT,
            message: format!("Invalid content area '{content_area}'"),
            hint: Some(format!(
                "Property '{content_area}' exists on the page but is not a content area list"
            )),
        }),
    }
}

fn inline_block(block: &BlockDefinition) -> Value {
    let mut content = Map::new();
    content.insert("Name".to_string(), json!(block.display_name));
    content.extend(block.properties.clone());
    json!({
        "key": inline_block_key(),
        "contentType": block.content_type,
        "name": block.display_name,
        "content": content,
    })
}

/// 32 lowercase hex characters: a v4 UUID without dashes.
fn inline_block_key() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::ContentItem;
    use crate::cms::fake::FakeCms;
    use std::collections::HashSet;

    fn page(area: Option<Value>) -> ContentItem {
        let mut properties = json!({"Title": "Home"});
        if let Some(area) = area {
            properties["MainContentArea"] = area;
        }
        ContentItem {
            key: Some("page1".to_string()),
            display_name: Some("Home".to_string()),
            version: Some("5".to_string()),
            locale: Some("en".to_string()),
            properties: Some(properties),
            ..ContentItem::default()
        }
    }

    fn args(blocks: &str) -> Value {
        json!({
            "pageContentKey": "page1",
            "pageVersion": "5",
            "contentAreaName": "MainContentArea",
            "blocks": blocks,
            "locale": "en"
        })
    }

    #[test]
    fn appends_inline_blocks_after_existing_items() {
        let existing = json!([{"key": "old1", "contentType": "TextBlock"}]);
        let cms = FakeCms::with_items(vec![page(Some(existing))]);
        let result = call(
            &args(
                r#"[
                    {"contentType": "HeroBlock", "displayName": "Hero", "properties": {"Heading": "Welcome"}},
                    {"contentType": "TextBlock", "displayName": "Intro"}
                ]"#,
            ),
            &cms,
        );

        assert_eq!(result["isError"], json!(false));
        let updates = cms.updates.borrow();
        let (key, version, payload, locale) = &updates[0];
        assert_eq!(key, "page1");
        assert_eq!(version, "5");
        assert_eq!(locale.as_deref(), Some("en"));

        let items = payload["properties"]["MainContentArea"]
            .as_array()
            .expect("items");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["key"], json!("old1"));
        assert_eq!(items[1]["contentType"], json!("HeroBlock"));
        assert_eq!(items[1]["name"], json!("Hero"));
        assert_eq!(
            items[1]["content"],
            json!({"Name": "Hero", "Heading": "Welcome"})
        );
        assert_eq!(items[2]["content"], json!({"Name": "Intro"}));

        let structured = &result["structuredContent"];
        assert_eq!(structured["blocksCreated"], json!(2));
        assert_eq!(structured["existingBlocks"], json!(1));
        assert_eq!(structured["totalBlocks"], json!(3));
        assert_eq!(
            structured["blocks"],
            json!([
                {"contentType": "HeroBlock", "displayName": "Hero"},
                {"contentType": "TextBlock", "displayName": "Intro"}
            ])
        );
        assert_eq!(
            structured["message"],
            json!("Successfully added 2 new inline block(s) to ContentArea 'MainContentArea' on page \"Home\". Total blocks: 3 (1 existing + 2 new)")
        );
    }

    #[test]
    fn block_properties_may_override_name() {
        let block = BlockDefinition {
            content_type: "HeroBlock".to_string(),
            display_name: "Hero".to_string(),
            properties: json!({"Name": "Custom"}).as_object().cloned().expect("map"),
        };
        assert_eq!(inline_block(&block)["content"]["Name"], json!("Custom"));
    }

    #[test]
    fn missing_content_area_starts_empty() {
        let cms = FakeCms::with_items(vec![page(None)]);
        let result = call(
            &args(r#"[{"contentType": "HeroBlock", "displayName": "Hero"}]"#),
            &cms,
        );
        assert_eq!(result["structuredContent"]["existingBlocks"], json!(0));
        assert_eq!(result["structuredContent"]["totalBlocks"], json!(1));
    }

    #[test]
    fn absent_or_null_content_area_is_empty() {
        assert!(existing_items(None, "Area").expect("items").is_empty());
        assert!(
            existing_items(Some(&json!({"Area": null})), "Area")
                .expect("items")
                .is_empty()
        );
        assert!(existing_items(Some(&json!({"Area": "text"})), "Area").is_err());
    }

    #[test]
    fn non_list_content_area_is_refused_without_update() {
        let area = json!({"items": [{"key": "keepme"}]});
        let cms = FakeCms::with_items(vec![page(Some(area))]);
        let result = call(
            &args(r#"[{"contentType": "HeroBlock", "displayName": "Hero"}]"#),
            &cms,
        );

        assert_eq!(result["isError"], json!(true));
        let structured = &result["structuredContent"];
        assert_eq!(structured["error"]["kind"], json!("invalid_input"));
        assert_eq!(
            structured["error"]["message"],
            json!("Invalid content area 'MainContentArea'")
        );
        assert!(cms.updates.borrow().is_empty());
    }

    #[test]
    fn null_block_properties_read_as_empty() {
        let cms = FakeCms::with_items(vec![page(None)]);
        let result = call(
            &args(r#"[{"contentType": "HeroBlock", "displayName": "Hero", "properties": null}]"#),
            &cms,
        );

        assert_eq!(result["isError"], json!(false));
        let updates = cms.updates.borrow();
        assert_eq!(
            updates[0].2["properties"]["MainContentArea"][0]["content"],
            json!({"Name": "Hero"})
        );
    }

    #[test]
    fn inline_block_keys_are_distinct_hex() {
        let keys: HashSet<String> = (0..50).map(|_| inline_block_key()).collect();
        assert_eq!(keys.len(), 50);
        for key in keys {
            assert_eq!(key.len(), 32);
            assert!(
                key.chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            );
        }
    }

    #[test]
    fn blocks_must_be_valid_json() {
        let cms = FakeCms::with_items(vec![page(None)]);
        let result = call(&args("[{"), &cms);
        assert_eq!(
            result["structuredContent"]["error"]["message"],
            json!("Invalid JSON format for blocks")
        );
        assert!(cms.updates.borrow().is_empty());
    }

    #[test]
    fn blocks_must_be_an_array() {
        let cms = FakeCms::with_items(vec![page(None)]);
        let result = call(&args(r#"{"contentType": "HeroBlock"}"#), &cms);
        let structured = &result["structuredContent"];
        assert_eq!(structured["error"]["message"], json!("Invalid blocks format"));
        assert_eq!(
            structured["message"],
            json!("Blocks must be an array of block definitions")
        );
    }

    #[test]
    fn malformed_block_is_rejected() {
        let cms = FakeCms::with_items(vec![page(None)]);
        let result = call(&args(r#"[{"displayName": "No type"}]"#), &cms);
        assert_eq!(
            result["structuredContent"]["error"]["kind"],
            json!("invalid_input")
        );
    }

    #[test]
    fn unknown_page_version_fails() {
        let cms = FakeCms::with_items(vec![page(None)]);
        let mut request = args("[]");
        request["pageVersion"] = json!("99");
        let result = call(&request, &cms);
        assert_eq!(result["structuredContent"]["statusCode"], json!(404));
    }
}
