use std::process::Command;

#[test]
fn cli_get_page_without_config_fails() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(env!("CARGO_BIN_EXE_mcp-saas-cms"))
        .args(["get-page", "--content-key", "abc"])
        .env_remove("OPTIMIZELY_CMS_BASE_URL")
        .env("RUST_LOG", "off")
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Failed to fetch CMS page: CMS base URL is not configured"));
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn cli_create_article_page_rejects_bad_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(env!("CARGO_BIN_EXE_mcp-saas-cms"))
        .args([
            "create-article-page",
            "--container",
            "abc",
            "--display-name",
            "Hello",
            "--locale",
            "en",
            "--properties",
            "[oops",
        ])
        .env("RUST_LOG", "off")
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Failed to parse properties JSON"));
    Ok(())
}

#[test]
fn cli_add_blocks_requires_arguments() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(env!("CARGO_BIN_EXE_mcp-saas-cms"))
        .args(["add-blocks", "--page-content-key", "abc"])
        .env("RUST_LOG", "off")
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("--page-version"));
    Ok(())
}
