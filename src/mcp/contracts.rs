use serde_json::json;

pub const TOOL_CREATE_ARTICLE_PAGE: &str = "cms.create_article_page";
pub const TOOL_GET_PAGE: &str = "cms.get_page";
pub const TOOL_TRANSLATE_PAGE: &str = "cms.translate_page";
pub const TOOL_ADD_BLOCKS: &str = "cms.add_blocks";
pub const TOOL_UPDATE_PAGE: &str = "cms.update_page";

pub const ARTICLE_PAGE_TYPE: &str = "ArticlePage";
pub const DRAFT_STATUS: &str = "draft";

pub fn create_article_page_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "container": {
                "type": "string",
                "description": "Container key (GUID) to create the page under. Dashes are optional."
            },
            "displayName": {
                "type": "string",
                "description": "Display name of the new article page."
            },
            "locale": {
                "type": "string",
                "description": "Locale code, e.g. 'en', 'sv', 'fr'."
            },
            "properties": {
                "type": "string",
                "description": "JSON object string with the page properties, e.g. {\"HeroHeadline\": \"My Title\"}."
            }
        },
        "required": ["container", "displayName", "locale", "properties"],
        "additionalProperties": false
    })
}

pub fn get_page_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "contentKey": {
                "type": "string",
                "description": "Content key (GUID) of the page. Dashes are optional."
            },
            "version": {
                "type": "string",
                "description": "Version to fetch. Latest when omitted."
            },
            "locale": {
                "type": "string",
                "description": "Locale code. Default locale when omitted."
            }
        },
        "required": ["contentKey"],
        "additionalProperties": false
    })
}

pub fn translate_page_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "contentKey": {
                "type": "string",
                "description": "Content key (GUID) of the page to translate. Dashes are optional."
            },
            "sourceLocale": {
                "type": "string",
                "description": "Locale to translate from, e.g. 'en'."
            },
            "targetLocale": {
                "type": "string",
                "description": "Locale to translate to. Must be enabled in the CMS."
            },
            "translatedDisplayName": {
                "type": "string",
                "description": "Translated display name. Source display name when omitted."
            },
            "translatedProperties": {
                "type": "string",
                "description": "JSON object string with translated property values, deep-merged over the source properties."
            }
        },
        "required": ["contentKey", "sourceLocale", "targetLocale"],
        "additionalProperties": false
    })
}

pub fn add_blocks_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "pageContentKey": {
                "type": "string",
                "description": "Content key (GUID) of the page to update. Dashes are optional."
            },
            "pageVersion": {
                "type": "string",
                "description": "Version of the page to update. Get it from cms.get_page first."
            },
            "contentAreaName": {
                "type": "string",
                "description": "Name of the content area property, e.g. 'MainContentArea'."
            },
            "blocks": {
                "type": "string",
                "description": "JSON array of block definitions, each with contentType, displayName and properties."
            },
            "locale": {
                "type": "string",
                "description": "Locale code. Default locale when omitted."
            }
        },
        "required": ["pageContentKey", "pageVersion", "contentAreaName", "blocks"],
        "additionalProperties": false
    })
}

pub fn update_page_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "contentKey": {
                "type": "string",
                "description": "Content key (GUID) of the page to update. Dashes are optional."
            },
            "version": {
                "type": "string",
                "description": "Version to update. Get it from cms.get_page first."
            },
            "updates": {
                "type": "string",
                "description": "JSON object string with the fields to update, e.g. {\"displayName\": \"New\", \"properties\": {\"HeroHeadline\": \"Updated\"}}."
            },
            "locale": {
                "type": "string",
                "description": "Locale code. Default locale when omitted."
            }
        },
        "required": ["contentKey", "version", "updates"],
        "additionalProperties": false
    })
}
