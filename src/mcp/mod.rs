use serde_json::json;

pub mod contracts;
pub mod errors;

pub fn tool_definitions() -> Vec<serde_json::Value> {
    vec![
        json!({
            "name": contracts::TOOL_CREATE_ARTICLE_PAGE,
            "description": "Create a new draft ArticlePage. Adds SEO settings with GraphType 'article' when missing.",
            "inputSchema": contracts::create_article_page_schema()
        }),
        json!({
            "name": contracts::TOOL_GET_PAGE,
            "description": "Fetch a page by content key, including properties and version metadata.",
            "inputSchema": contracts::get_page_schema()
        }),
        json!({
            "name": contracts::TOOL_TRANSLATE_PAGE,
            "description": "Create a draft translation of a page in another locale.",
            "inputSchema": contracts::translate_page_schema()
        }),
        json!({
            "name": contracts::TOOL_ADD_BLOCKS,
            "description": "Append inline blocks to a content area on an existing page, keeping existing blocks.",
            "inputSchema": contracts::add_blocks_schema()
        }),
        json!({
            "name": contracts::TOOL_UPDATE_PAGE,
            "description": "Update fields of an existing page version.",
            "inputSchema": contracts::update_page_schema()
        }),
    ]
}
