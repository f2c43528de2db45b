use crate::cms::CmsApi;
use crate::input::{InputError, arguments, expect_object, optional_str, required_json, required_str};
use crate::tools::{cms_error_result, input_error_result, page_fields, success_result};
use serde_json::{Map, Value};
use tracing::{debug, info};

pub fn call(args: &Value, api: &dyn CmsApi) -> Value {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(err) => return input_error_result(&err),
    };

    let updates = Value::Object(parsed.updates);
    info!(
        content_key = %parsed.content_key,
        version = %parsed.version,
        locale = ?parsed.locale,
        "updating page"
    );
    debug!(payload = %updates, "update payload");

    let page = match api.update_content(
        &parsed.content_key,
        &parsed.version,
        &updates,
        parsed.locale.as_deref(),
    ) {
        Ok(page) => page,
        Err(err) => return cms_error_result(&err, "update CMS page"),
    };

    let message = format!(
        "Successfully updated {} page: \"{}\" (version {})",
        page.content_type_or_unknown(),
        page.display_name_or_empty(),
        page.version_or_unknown()
    );
    success_result(message, page_fields(&page))
}

struct UpdatePageArgs {
    content_key: String,
    version: String,
    updates: Map<String, Value>,
    locale: Option<String>,
}

fn parse_args(args: &Value) -> Result<UpdatePageArgs, InputError> {
    let obj = arguments(args)?;
    let content_key = required_str(obj, "contentKey")?;
    let version = required_str(obj, "version")?;
    let updates = expect_object("updates", required_json(obj, "updates")?)?;
    let locale = optional_str(obj, "locale")?;
    Ok(UpdatePageArgs {
        content_key,
        version,
        updates,
        locale,
    })
}
