//! Response shapes and status codes of the HTTP surface, exercised through
//! the router without binding a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use gapforge_core::{
    DataPaths, EmbedderKind, ExtractionConfig, GapConfig, GapforgeConfig, IdeaConfig, VerifierConfig,
};
use gapforge_ideas::{GenerativeService, LLMConfig, LLMProvider};
use gapforge_infer::NoopEmbedder;
use gapforge_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config(dir: &tempfile::TempDir) -> GapforgeConfig {
    GapforgeConfig {
        port: 0,
        data_paths: DataPaths::new(dir.path()).unwrap(),
        embedder: EmbedderKind::None,
        embedding_dim: 64,
        extraction: ExtractionConfig::default(),
        gaps: GapConfig::default(),
        ideas: IdeaConfig::default(),
        verifier: VerifierConfig {
            endpoint: "http://127.0.0.1:9/w/api.php".into(),
            entity_data_url: "http://127.0.0.1:9/wiki/Special:EntityData".into(),
            timeout_secs: 1,
            ..Default::default()
        },
    }
}

fn state(dir: &tempfile::TempDir, llm: LLMConfig) -> AppState {
    AppState::with_llm_config(test_config(dir), Arc::new(NoopEmbedder::new(64)), llm).unwrap()
}

fn app(dir: &tempfile::TempDir) -> Router {
    build_router(Arc::new(state(dir, LLMConfig::default())))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = request.body(body.map(Body::from).unwrap_or_else(Body::empty)).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body.to_string())).await
}

fn two_triangles() -> Value {
    let labels = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta"];
    let nodes: Vec<Value> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| json!({"id": i + 1, "label": label, "type": "ORG"}))
        .collect();
    let edges: Vec<Value> = [(1, 2), (2, 3), (1, 3), (4, 5), (5, 6), (4, 6), (3, 4)]
        .iter()
        .map(|(from, to)| json!({"from": from, "to": to}))
        .collect();
    json!({"nodes": nodes, "edges": edges})
}

#[tokio::test]
async fn test_extract_returns_graph_document() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = post(
        app(&dir),
        "/api/extract",
        json!({"text": "Alice works at Acme Corp. Acme Corp is located in Paris."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = body["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Alice", "Acme Corp", "Paris"]);
    assert_eq!(body["nodes"][2]["type"], "GPE");
    assert_eq!(body["edges"][0]["label"], "works_at");
    assert_eq!(body["edges"][0]["source"], "dependency");
    assert_eq!(body["edges"][1]["label"], "located_in");
    assert_eq!(body["metadata"]["total_entities"], 3);
    assert_eq!(body["metadata"]["total_relationships"], 2);
    assert_eq!(body["metadata"]["semantic_status"], "unavailable");
}

#[tokio::test]
async fn test_extract_validation_errors() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = post(app(&dir), "/api/extract", json!({"text": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
    assert!(body["error"].is_string());

    let (status, body) = send(app(&dir), "POST", "/api/extract", Some("{not json".into())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
}

#[tokio::test]
async fn test_extract_unknown_catalogue_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = post(
        app(&dir),
        "/api/extract",
        json!({"text": "Alice works at Acme Corp.", "config": {"pattern_catalogue_version": "v9"}}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "configuration_error");
}

#[tokio::test]
async fn test_gaps_on_small_graph_is_explained() {
    let dir = tempfile::tempdir().unwrap();
    let graph = json!({
        "nodes": [
            {"id": 1, "label": "A", "type": "ORG"},
            {"id": 2, "label": "B", "type": "ORG"},
            {"id": 3, "label": "C", "type": "ORG"},
            {"id": 4, "label": "D", "type": "ORG"}
        ],
        "edges": [{"from": 1, "to": 2}]
    });
    let (status, body) = post(app(&dir), "/api/gaps", graph).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gaps"], json!([]));
    assert_eq!(body["num_communities"], 0);
    assert!(body["message"].as_str().unwrap().contains("too small"));
}

#[tokio::test]
async fn test_gaps_between_triangles() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = post(app(&dir), "/api/gaps", two_triangles()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["num_communities"], 2);
    assert_eq!(body["num_gaps_detected"], 1);
    assert_eq!(body["gaps"][0]["bridge_nodes"], json!([3, 4]));
    assert_eq!(body["gaps"][0]["significance"], "High");
}

#[tokio::test]
async fn test_ideas_without_credentials() {
    let dir = tempfile::tempdir().unwrap();
    let gap = json!({
        "title": "Gap between 'Alpha' and 'Delta' clusters",
        "description": "",
        "significance": "High",
        "cluster_1_keywords": ["Alpha"],
        "cluster_2_keywords": ["Delta"],
        "bridge_suggestion": "",
        "gap_score": 7.1429,
        "semantic_distance": 0.6667
    });
    let (status, body) = post(app(&dir), "/api/ideas", json!({"gap": gap})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "configuration_error");
}

#[tokio::test]
async fn test_chat_client_resolved_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    assert!(state(&dir, LLMConfig::default()).chat.is_none());

    let llm = LLMConfig {
        groq_api_key: Some("gsk-test".into()),
        ..Default::default()
    };
    let state = state(&dir, llm);
    let client = state.chat.as_ref().unwrap();
    assert_eq!(client.provider(), LLMProvider::Groq);
    assert_eq!(client.name(), "groq:llama-3.3-70b-versatile");
    assert_eq!(state.llm_status.active_provider.as_deref(), Some("groq"));

    let (status, body) = send(build_router(Arc::new(state)), "GET", "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["llm"]["groqConfigured"], true);
}

#[tokio::test]
async fn test_verify_contract() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = post(app(&dir), "/api/verify", json!({"entity": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");

    let (status, body) = post(app(&dir), "/api/verify", json!({"entity": "Paris"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["type"].is_null());
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_status() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(app(&dir), "GET", "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "rule-en-1");
    assert_eq!(body["embedder"]["available"], false);
    assert_eq!(body["extraction"]["patternCatalogue"], "v1");
    assert_eq!(body["llm"]["openaiConfigured"], false);
}
