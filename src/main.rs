use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value, json};
use std::io::{self, BufRead, Write};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cms;
mod config;
mod input;
mod mcp;
mod merge;
mod tools;

use cms::{CmsApi, CmsClient};
use config::{CmsArgs, CmsConfig};

const PROTOCOL_VERSION: &str = "2025-11-25";
const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Parser)]
#[command(name = "mcp-saas-cms")]
#[command(
    version,
    about = "MCP tools for creating, translating and updating pages in a headless CMS"
)]
struct Cli {
    #[command(flatten)]
    cms: CmsArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output JSON structuredContent
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone)]
struct GetPageArgs {
    /// Content key (GUID) of the page
    #[arg(long)]
    content_key: String,
    /// Version to fetch (latest when omitted)
    #[arg(long)]
    version: Option<String>,
    /// Locale code
    #[arg(long)]
    locale: Option<String>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Clone)]
struct CreateArticlePageArgs {
    /// Container key (GUID) to create the page under
    #[arg(long)]
    container: String,
    /// Display name of the page
    #[arg(long)]
    display_name: String,
    /// Locale code
    #[arg(long)]
    locale: String,
    /// JSON object with page properties
    #[arg(long)]
    properties: String,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Clone)]
struct TranslatePageArgs {
    /// Content key (GUID) of the page to translate
    #[arg(long)]
    content_key: String,
    /// Locale to translate from
    #[arg(long)]
    source_locale: String,
    /// Locale to translate to
    #[arg(long)]
    target_locale: String,
    /// Translated display name
    #[arg(long)]
    translated_display_name: Option<String>,
    /// JSON object with translated properties
    #[arg(long)]
    translated_properties: Option<String>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Clone)]
struct UpdatePageArgs {
    /// Content key (GUID) of the page
    #[arg(long)]
    content_key: String,
    /// Version to update
    #[arg(long)]
    version: String,
    /// JSON object with the fields to update
    #[arg(long)]
    updates: String,
    /// Locale code
    #[arg(long)]
    locale: Option<String>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Clone)]
struct AddBlocksArgs {
    /// Content key (GUID) of the page
    #[arg(long)]
    page_content_key: String,
    /// Version of the page to update
    #[arg(long)]
    page_version: String,
    /// Name of the content area property
    #[arg(long)]
    content_area_name: String,
    /// JSON array of block definitions
    #[arg(long)]
    blocks: String,
    /// Locale code
    #[arg(long)]
    locale: Option<String>,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
    },
    /// Fetch a page
    GetPage(GetPageArgs),
    /// Create a draft article page
    CreateArticlePage(CreateArticlePageArgs),
    /// Create a draft translation of a page
    TranslatePage(TranslatePageArgs),
    /// Update fields of a page version
    UpdatePage(UpdatePageArgs),
    /// Append inline blocks to a content area
    AddBlocks(AddBlocksArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = CmsConfig::from(&cli.cms);
    debug!(?config, "loaded CMS configuration");
    let client = CmsClient::new(config).context("failed to build CMS client")?;

    match cli.command {
        Commands::Serve { stdio } => {
            if stdio {
                run_stdio_server(&client)
            } else {
                anyhow::bail!("only --stdio transport is supported")
            }
        }
        Commands::GetPage(args) => {
            let mut map = Map::new();
            map.insert("contentKey".to_string(), json!(args.content_key));
            insert_optional(&mut map, "version", args.version);
            insert_optional(&mut map, "locale", args.locale);
            run_tool(mcp::contracts::TOOL_GET_PAGE, map, &client, &args.output)
        }
        Commands::CreateArticlePage(args) => {
            let mut map = Map::new();
            map.insert("container".to_string(), json!(args.container));
            map.insert("displayName".to_string(), json!(args.display_name));
            map.insert("locale".to_string(), json!(args.locale));
            map.insert("properties".to_string(), json!(args.properties));
            run_tool(
                mcp::contracts::TOOL_CREATE_ARTICLE_PAGE,
                map,
                &client,
                &args.output,
            )
        }
        Commands::TranslatePage(args) => {
            let mut map = Map::new();
            map.insert("contentKey".to_string(), json!(args.content_key));
            map.insert("sourceLocale".to_string(), json!(args.source_locale));
            map.insert("targetLocale".to_string(), json!(args.target_locale));
            insert_optional(&mut map, "translatedDisplayName", args.translated_display_name);
            insert_optional(&mut map, "translatedProperties", args.translated_properties);
            run_tool(
                mcp::contracts::TOOL_TRANSLATE_PAGE,
                map,
                &client,
                &args.output,
            )
        }
        Commands::UpdatePage(args) => {
            let mut map = Map::new();
            map.insert("contentKey".to_string(), json!(args.content_key));
            map.insert("version".to_string(), json!(args.version));
            map.insert("updates".to_string(), json!(args.updates));
            insert_optional(&mut map, "locale", args.locale);
            run_tool(mcp::contracts::TOOL_UPDATE_PAGE, map, &client, &args.output)
        }
        Commands::AddBlocks(args) => {
            let mut map = Map::new();
            map.insert("pageContentKey".to_string(), json!(args.page_content_key));
            map.insert("pageVersion".to_string(), json!(args.page_version));
            map.insert("contentAreaName".to_string(), json!(args.content_area_name));
            map.insert("blocks".to_string(), json!(args.blocks));
            insert_optional(&mut map, "locale", args.locale);
            run_tool(mcp::contracts::TOOL_ADD_BLOCKS, map, &client, &args.output)
        }
    }
}

/// Logs go to stderr; stdout carries protocol messages and CLI output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn insert_optional(map: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), json!(value));
    }
}

fn run_tool(
    name: &str,
    args: Map<String, Value>,
    api: &dyn CmsApi,
    output: &OutputArgs,
) -> Result<()> {
    let result = dispatch(name, &Value::Object(args), api);
    print_tool_result(result, output.json)
}

fn print_tool_result(result: Value, json_output: bool) -> Result<()> {
    let is_error = result
        .get("isError")
        .and_then(|value| value.as_bool())
        .unwrap_or(false);

    if is_error {
        let message = result
            .get("structuredContent")
            .and_then(|value| value.get("message"))
            .and_then(|value| value.as_str())
            .unwrap_or("tool error");
        eprintln!("{message}");
        if json_output
            && let Some(structured) = result.get("structuredContent")
        {
            eprintln!("{}", serde_json::to_string_pretty(structured)?);
        }
        process::exit(1);
    }

    if json_output {
        let structured = result
            .get("structuredContent")
            .cloned()
            .unwrap_or_else(|| json!({}));
        let output = serde_json::to_string_pretty(&structured)?;
        println!("{output}");
        return Ok(());
    }

    let text = result
        .get("content")
        .and_then(|value| value.as_array())
        .and_then(|arr| arr.first())
        .and_then(|value| value.get("text"))
        .and_then(|value| value.as_str())
        .unwrap_or("");
    println!("{text}");
    Ok(())
}

fn run_stdio_server(api: &dyn CmsApi) -> Result<()> {
    info!("serving MCP over stdio");
    let stdin = io::stdin();
    let stdout = io::stdout();
    let reader = stdin.lock().lines();
    let mut writer = io::BufWriter::new(stdout.lock());

    for line in reader {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(err) => {
                debug!(error = %err, "ignoring unparseable line");
                continue;
            }
        };

        if let Some(response) = handle_request(&request, api) {
            let serialized =
                serde_json::to_string(&response).context("failed to serialize response")?;
            writeln!(writer, "{serialized}").context("failed to write response")?;
            writer.flush().context("failed to flush response")?;
        }
    }

    info!("stdin closed; shutting down");
    Ok(())
}

/// Returns `None` for notifications (requests without an id).
fn handle_request(request: &Value, api: &dyn CmsApi) -> Option<Value> {
    let method = request.get("method").and_then(|value| value.as_str());
    let id = request.get("id").cloned()?;

    let response = match method {
        Some("initialize") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": env!("CARGO_PKG_NAME"),
                    "version": env!("CARGO_PKG_VERSION")
                }
            }
        }),
        Some("ping") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {}
        }),
        Some("tools/list") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": {
                "tools": mcp::tool_definitions()
            }
        }),
        Some("tools/call") => json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": handle_tool_call(request, api)
        }),
        _ => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {
                "code": METHOD_NOT_FOUND,
                "message": format!("method not found: {}", method.unwrap_or(""))
            }
        }),
    };
    Some(response)
}

fn handle_tool_call(request: &Value, api: &dyn CmsApi) -> Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return invalid_call("params must be an object");
    };

    let Some(name) = params.get("name").and_then(|value| value.as_str()) else {
        return invalid_call("params.name must be a string");
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    info!(tool = name, "tool called");
    dispatch(name, &args, api)
}

fn dispatch(name: &str, args: &Value, api: &dyn CmsApi) -> Value {
    match name {
        mcp::contracts::TOOL_CREATE_ARTICLE_PAGE => tools::create_article_page::call(args, api),
        mcp::contracts::TOOL_GET_PAGE => tools::get_page::call(args, api),
        mcp::contracts::TOOL_TRANSLATE_PAGE => tools::translate_page::call(args, api),
        mcp::contracts::TOOL_ADD_BLOCKS => tools::add_blocks::call(args, api),
        mcp::contracts::TOOL_UPDATE_PAGE => tools::update_page::call(args, api),
        _ => invalid_call(&format!("tool not implemented: {name}")),
    }
}

fn invalid_call(message: &str) -> Value {
    tools::error_result(mcp::errors::INVALID_INPUT, message, message, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::fake::FakeCms;

    #[test]
    fn notifications_get_no_response() {
        let cms = FakeCms::default();
        let request = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        assert!(handle_request(&request, &cms).is_none());
    }

    #[test]
    fn unknown_method_is_reported() {
        let cms = FakeCms::default();
        let request = json!({"jsonrpc": "2.0", "id": 9, "method": "resources/list"});
        let response = handle_request(&request, &cms).expect("response");
        assert_eq!(response["error"]["code"], json!(METHOD_NOT_FOUND));
        assert_eq!(response["id"], json!(9));
    }

    #[test]
    fn tool_call_is_dispatched_by_name() {
        let cms = FakeCms::default();
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": "cms.get_page", "arguments": {"contentKey": "missing"}}
        });
        let response = handle_request(&request, &cms).expect("response");
        assert_eq!(response["result"]["isError"], json!(true));
        assert_eq!(response["result"]["structuredContent"]["statusCode"], json!(404));
    }

    #[test]
    fn unknown_tool_is_invalid_input() {
        let cms = FakeCms::default();
        let result = dispatch("cms.delete_page", &json!({}), &cms);
        assert_eq!(
            result["structuredContent"]["error"]["kind"],
            json!("invalid_input")
        );
    }

    #[test]
    fn params_must_be_object() {
        let cms = FakeCms::default();
        let result = handle_tool_call(&json!({"params": []}), &cms);
        assert_eq!(
            result["structuredContent"]["message"],
            json!("params must be an object")
        );
    }
}
