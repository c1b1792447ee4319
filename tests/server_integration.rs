use doc_analyst::config::Config;
use doc_analyst::retrieval::{RemoteToolClient, RetrievalBackend};
use doc_analyst::server::{serve, AppState};
use doc_analyst::{Tool, ToolError, ToolRegistry};
use doc_analyst_core::models::{Corpus, Document};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

fn test_corpus() -> Corpus {
    Corpus::new(vec![
        Document::new(
            "a.md",
            "# Intro\nQ3 revenue grew.\n# Outlook\nQ4 plans unclear.\n",
        ),
        Document::new("ops.md", "# Uptime\n99.95% uptime in Q3.\n"),
    ])
}

// ─── Failing tools ──────────────────────────────────────────────────

struct BrokenTool;

impl Tool for BrokenTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn execute(&self, _arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        Err(ToolError::Internal("index unavailable".to_string()))
    }
}

struct PanickingTool;

impl Tool for PanickingTool {
    fn name(&self) -> &str {
        "panicky"
    }

    fn description(&self) -> &str {
        "Always panics"
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    fn execute(&self, _arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        panic!("section table corrupted");
    }
}

/// Start a server on an ephemeral port and return its base URL.
async fn start_server() -> String {
    start_with_state(AppState::new(Arc::new(test_corpus()), &Config::default())).await
}

async fn start_failing_server() -> String {
    let mut tools = ToolRegistry::new();
    tools.register(Box::new(BrokenTool));
    tools.register(Box::new(PanickingTool));
    start_with_state(AppState::with_tools(Arc::new(test_corpus()), tools)).await
}

async fn start_with_state(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        serve(listener, state).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn execute(base: &str, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/mcp/v1/tools/execute", base))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_health_reports_document_count() {
    let base = start_server().await;
    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["documents_loaded"], 2);
}

#[tokio::test]
async fn test_root_describes_server() {
    let base = start_server().await;
    let body: Value = reqwest::get(&base).await.unwrap().json().await.unwrap();
    assert_eq!(body["name"], "MCP Document Server");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_list_tools() {
    let base = start_server().await;
    let body: Value = reqwest::get(format!("{}/mcp/v1/tools", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "document_retriever");
    assert_eq!(tools[0]["inputSchema"]["type"], "object");
    assert_eq!(tools[0]["inputSchema"]["properties"]["query"]["type"], "string");
}

#[tokio::test]
async fn test_execute_returns_snippets() {
    let base = start_server().await;
    let (status, body) = execute(
        &base,
        json!({"name": "document_retriever", "arguments": {"query": "Q3 revenue"}}),
    )
    .await;
    assert_eq!(status, 200);

    let snippets = body["result"]["snippets"].as_array().unwrap();
    assert_eq!(snippets[0]["source"], "a.md");
    assert_eq!(snippets[0]["section"], "Intro");
    assert_eq!(snippets[0]["content"], "Q3 revenue grew.");
    assert!(snippets[0].get("score").is_none());
}

#[tokio::test]
async fn test_execute_no_match_is_empty_list() {
    let base = start_server().await;
    let (status, body) = execute(
        &base,
        json!({"name": "document_retriever", "arguments": {"query": "kubernetes"}}),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["result"]["snippets"], json!([]));
}

#[tokio::test]
async fn test_execute_unknown_tool_is_not_found() {
    let base = start_server().await;
    let (status, body) = execute(&base, json!({"name": "web_search", "arguments": {}})).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "not_found");
    assert_eq!(body["error"]["message"], "Tool 'web_search' not found");
}

#[tokio::test]
async fn test_execute_missing_query_is_bad_request() {
    let base = start_server().await;
    let (status, body) =
        execute(&base, json!({"name": "document_retriever", "arguments": {}})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(body["error"]["message"], "Missing required argument: query");
}

#[tokio::test]
async fn test_execute_without_arguments_is_bad_request() {
    let base = start_server().await;
    let (status, body) = execute(&base, json!({"name": "document_retriever"})).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(body["error"]["message"], "Missing required argument: query");
}

#[tokio::test]
async fn test_execute_tool_error_is_internal() {
    let base = start_failing_server().await;
    let (status, body) = execute(&base, json!({"name": "broken", "arguments": {}})).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], "internal");
    assert_eq!(body["error"]["message"], "Error executing tool: index unavailable");
}

#[tokio::test]
async fn test_execute_panicking_tool_is_internal() {
    let base = start_failing_server().await;
    let (status, body) = execute(&base, json!({"name": "panicky", "arguments": {}})).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], "internal");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Error executing tool:"));

    // the server keeps serving after a panicked call
    let health: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
}

#[tokio::test]
async fn test_execute_non_string_query_is_bad_request() {
    let base = start_server().await;
    let (status, body) = execute(
        &base,
        json!({"name": "document_retriever", "arguments": {"query": 42}}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_remote_client_round_trip() {
    let base = start_server().await;
    let client = RemoteToolClient::new(&base, 5).unwrap();

    let tools = client.list_tools().await.unwrap();
    assert_eq!(tools[0].name, "document_retriever");

    let snippets = client.retrieve("uptime").await.unwrap();
    assert_eq!(snippets.len(), 1);
    assert_eq!(snippets[0].source, "ops.md");
    assert_eq!(snippets[0].section.as_deref(), Some("Uptime"));
}
