use crate::cms::CmsApi;
use crate::input::{arguments, optional_str, required_str};
use crate::tools::{cms_error_result, input_error_result, page_fields, success_result};
use serde_json::Value;
use tracing::info;

pub fn call(args: &Value, api: &dyn CmsApi) -> Value {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(err) => return input_error_result(&err),
    };

    info!(
        content_key = %parsed.content_key,
        version = ?parsed.version,
        locale = ?parsed.locale,
        "fetching page"
    );

    let page = match api.get_content(
        &parsed.content_key,
        parsed.version.as_deref(),
        parsed.locale.as_deref(),
    ) {
        Ok(page) => page,
        Err(err) => return cms_error_result(&err, "fetch CMS page"),
    };

    let message = format!(
        "Successfully fetched {} page: \"{}\" (version {})",
        page.content_type_or_unknown(),
        page.display_name_or_empty(),
        page.version_or_unknown()
    );
    success_result(message, page_fields(&page))
}

struct GetPageArgs {
    content_key: String,
    version: Option<String>,
    locale: Option<String>,
}

fn parse_args(args: &Value) -> Result<GetPageArgs, crate::input::InputError> {
    let obj = arguments(args)?;
    Ok(GetPageArgs {
        content_key: required_str(obj, "contentKey")?,
        version: optional_str(obj, "version")?,
        locale: optional_str(obj, "locale")?,
    })
}
