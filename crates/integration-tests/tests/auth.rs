mod harness;

use harness::config::ConfigBuilder;
use harness::mock_gemini::MockGemini;
use harness::server::TestServer;
use serde_json::{Value, json};

async fn start(mock: &MockGemini) -> TestServer {
    let config = ConfigBuilder::new()
        .with_gemini_provider("gemini", &mock.base_url())
        .with_auth(&[("extension", "ext-key"), ("web", "web-key")])
        .build();

    TestServer::start(config).await.unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let mock = MockGemini::start().await.unwrap();
    let server = start(&mock).await;

    let resp = server.client().get(server.url("/health")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn missing_key_is_unauthorized() {
    let mock = MockGemini::start().await.unwrap();
    let server = start(&mock).await;

    let resp = server
        .client()
        .post(server.url("/generate-image"))
        .json(&json!({"prompt": "x"}))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn wrong_key_is_unauthorized() {
    let mock = MockGemini::start().await.unwrap();
    let server = start(&mock).await;

    let resp = server
        .client()
        .get(server.url("/modes"))
        .bearer_auth("nope")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn any_configured_key_is_accepted() {
    let mock = MockGemini::start().await.unwrap();
    let server = start(&mock).await;

    for key in ["ext-key", "web-key"] {
        let resp = server
            .client()
            .post(server.url("/generate-image"))
            .bearer_auth(key)
            .json(&json!({"prompt": "x"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
    }

    assert_eq!(mock.request_count(), 2);
}
