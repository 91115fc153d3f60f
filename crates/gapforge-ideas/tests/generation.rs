//! Idea generation against in-test generative services.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use gapforge_core::{Error, Gap, IdeaConfig, Result, Significance};
use gapforge_ideas::{ChatClient, CompletionRequest, GenerativeService, IdeaGenerator, LLMProvider, ResolvedProvider};
use serde_json::{json, Value};

struct Scripted {
    reply: String,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl GenerativeService for Scripted {
    fn name(&self) -> String {
        "scripted".into()
    }

    fn complete(&self, request: CompletionRequest) -> impl Future<Output = Result<String>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(request.messages[1].content.contains("exactly 5"));
        let reply = self.reply.clone();
        async move { Ok(reply) }
    }
}

struct Stalled;

impl GenerativeService for Stalled {
    fn name(&self) -> String {
        "stalled".into()
    }

    fn complete(&self, _request: CompletionRequest) -> impl Future<Output = Result<String>> + Send {
        async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(String::new())
        }
    }
}

fn gap() -> Gap {
    Gap {
        title: "Gap between 'Alpha' and 'Delta' clusters".into(),
        description: "Found 3 concepts related to Alpha and 3 concepts related to Delta, but only 11% connectivity.".into(),
        significance: Significance::High,
        cluster_1_keywords: vec!["Alpha".into(), "Beta".into()],
        cluster_2_keywords: vec!["Delta".into(), "Zeta".into()],
        bridge_suggestion: "Explore: How does Alpha relate to Delta?".into(),
        gap_score: 7.1429,
        semantic_distance: 0.6667,
        bridge_nodes: vec![3, 4],
        existing_inter_edges: 1,
        connectivity: 0.1111,
        community_1: 0,
        community_2: 1,
    }
}

fn five_ideas() -> String {
    let items: Vec<Value> = (1..=5)
        .map(|i| {
            json!({
                "bridging_question": format!("How could Alpha inform Delta, angle {i}?"),
                "novelty": "Unexplored combination",
                "methodology": "Comparative case study",
                "impact": "High",
            })
        })
        .collect();
    serde_json::to_string(&items).unwrap()
}

#[tokio::test]
async fn test_default_count_novelty_sequence() {
    let service = Scripted::new(five_ideas());
    let response = IdeaGenerator::new(IdeaConfig::default())
        .generate(&service, &gap())
        .await
        .unwrap();

    let scores: Vec<u8> = response.ideas.iter().map(|i| i.novelty_score).collect();
    assert_eq!(scores, vec![85, 80, 75, 70, 70]);
    assert!(response.ideas.iter().all(|i| i.semantic_distance == 0.6667));
    assert_eq!(response.gap_context.gap_score, 7.1429);
    assert_eq!(response.gap_context.significance, Significance::High);
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unparseable_output() {
    let service = Scripted::new("I cannot help with that.");
    let err = IdeaGenerator::new(IdeaConfig::default())
        .generate(&service, &gap())
        .await
        .unwrap_err();
    match err {
        Error::Parse { excerpt, .. } => assert_eq!(excerpt, "I cannot help with that."),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_timeout_is_surfaced() {
    let config = IdeaConfig {
        timeout_secs: 0,
        ..Default::default()
    };
    let err = IdeaGenerator::new(config).generate(&Stalled, &gap()).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { seconds: 0, .. }));
}

#[tokio::test]
async fn test_gap_without_title_is_rejected() {
    let mut bad = gap();
    bad.title = "  ".into();
    let err = IdeaGenerator::new(IdeaConfig::default())
        .generate(&Scripted::new(five_ideas()), &bad)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1/chat/completions")
}

fn groq_client(endpoint: String) -> ChatClient {
    ChatClient::new(
        ResolvedProvider {
            provider: LLMProvider::Groq,
            model: "llama-3.3-70b-versatile".into(),
            api_key: "gsk-test".into(),
        },
        Duration::from_secs(5),
    )
    .with_endpoint(endpoint)
}

#[tokio::test]
async fn test_chat_client_round_trip() {
    let ideas = five_ideas();
    let router = Router::new().route(
        "/v1/chat/completions",
        post(move |Json(body): Json<Value>| {
            let ideas = ideas.clone();
            async move {
                assert_eq!(body["model"], "llama-3.3-70b-versatile");
                Json(json!({"choices": [{"message": {"role": "assistant", "content": ideas}}]}))
            }
        }),
    );
    let client = groq_client(serve(router).await);
    let response = IdeaGenerator::new(IdeaConfig::default())
        .generate(&client, &gap())
        .await
        .unwrap();
    assert_eq!(response.ideas.len(), 5);
}

#[tokio::test]
async fn test_chat_client_quota_rejection() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": {"message": "Quota exceeded", "type": "insufficient_quota"}})),
            )
        }),
    );
    let client = groq_client(serve(router).await);
    let err = IdeaGenerator::new(IdeaConfig::default())
        .generate(&client, &gap())
        .await
        .unwrap_err();
    match err {
        Error::Quota { service, message, hint } => {
            assert_eq!(service, "groq");
            assert_eq!(message, "Quota exceeded");
            assert!(!hint.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_client_server_error() {
    let router = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
    );
    let client = groq_client(serve(router).await);
    let err = IdeaGenerator::new(IdeaConfig::default())
        .generate(&client, &gap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Upstream { status: 502, .. }));
    assert!(err.is_external());
}
