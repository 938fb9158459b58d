use anyhow::{Context, Result};
use rmcp::{model::CallToolRequestParam, service::ServiceExt, transport::TokioChildProcess};
use std::time::Duration;
use tokio::process::Command;

const CREDENTIAL_VARS: &[&str] = &[
    "API_KEY",
    "CONSUMER_KEY",
    "CONSUMER_SECRET",
    "SPLITLEDGER_API_KEY",
    "SPLITLEDGER_CONSUMER_KEY",
    "SPLITLEDGER_CONSUMER_SECRET",
];

/// Server with no credentials, run from an empty directory so no `.env` is picked up.
fn server_command(workdir: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_splitledger-mcp"));
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.current_dir(workdir);
    cmd.env("SPLITLEDGER_CONFIG", workdir.join("missing.yaml"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn first_text(result: &rmcp::model::CallToolResult) -> String {
    result
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .unwrap_or_default()
}

#[tokio::test]
async fn mcp_exposes_tools_and_reports_missing_credentials() -> Result<()> {
    let tmp = tempfile::tempdir().context("tempdir")?;

    let transport = TokioChildProcess::new(server_command(tmp.path())).context("spawn mcp server")?;
    let service = tokio::time::timeout(Duration::from_secs(10), ().serve(transport))
        .await
        .context("timeout starting MCP server")?
        .context("start MCP server")?;

    let tools = tokio::time::timeout(Duration::from_secs(10), service.list_tools(Default::default()))
        .await
        .context("timeout listing tools")??;
    let mut names: Vec<String> = tools.tools.iter().map(|t| t.name.to_string()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "create_splitwise_expense",
            "create_splitwise_group",
            "fetch_friends_data",
            "get_expenses_last_n_days",
        ]
    );

    let friends = tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: "fetch_friends_data".into(),
            arguments: None,
        }),
    )
    .await
    .context("timeout calling fetch_friends_data")?
    .context("call fetch_friends_data")?;
    assert_eq!(friends.is_error, Some(true));
    let text = first_text(&friends);
    assert!(
        text.starts_with("Unexpected error"),
        "unexpected error text: {text}"
    );
    assert!(text.contains("CONSUMER_KEY"), "error should name the credential: {text}");

    let group = tokio::time::timeout(
        Duration::from_secs(10),
        service.call_tool(CallToolRequestParam {
            name: "create_splitwise_group".into(),
            arguments: serde_json::json!({
                "group_name": "Trip to Dubai",
                "first_names": ["Alice", "Bob"],
                "last_names": ["Smith"],
                "emails": ["alice@example.com", "bob@example.com"],
            })
            .as_object()
            .cloned(),
        }),
    )
    .await
    .context("timeout calling create_splitwise_group")?
    .context("call create_splitwise_group")?;
    assert_ne!(group.is_error, Some(true));
    let creation: serde_json::Value =
        serde_json::from_str(&first_text(&group)).context("group result is JSON")?;
    assert!(creation["group"].is_null());
    assert!(creation["error"]
        .as_str()
        .is_some_and(|e| e.contains("same length")));

    service.cancel().await.context("shutdown mcp service")?;
    Ok(())
}
