//! End-to-end tests for the board routes, run in-process against a seeded
//! in-memory store.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use board_api::{build_router, config::Config, state::AppState};
use board_persist::{seed_sample_data, BoardStore, MemoryBoardStore, DELETED_TEXT};

const TEST_CONFIG: &str = r#"
    [server]
    host = "127.0.0.1"
    port = 0

    [cors]
    enabled = false
    origins = []

    [mongodb]
    database = "test"
    pool_size = 1
    timeout_ms = 1000

    [store]
    backend = "memory"

    [logging]
    level = "debug"
    format = "pretty"
"#;

struct TestApp {
    router: Router,
    store: Arc<MemoryBoardStore>,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("response body is not JSON")
    }

    fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

impl TestApp {
    async fn seeded() -> Self {
        let store = Arc::new(MemoryBoardStore::new());
        seed_sample_data(store.as_ref()).await.unwrap();

        let config: Config = toml::from_str(TEST_CONFIG).unwrap();
        let state = Arc::new(AppState::new(config, store.clone()));
        Self {
            router: build_router(state),
            store,
        }
    }

    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.request(request).await
    }

    async fn send_json(&self, method: Method, uri: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    async fn send_form(&self, method: Method, uri: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    async fn threads(&self) -> Vec<Value> {
        let response = self.get("/api/threads/random").await;
        assert_eq!(response.status, StatusCode::OK);
        response.json().as_array().cloned().unwrap()
    }
}

fn id_of(value: &Value) -> String {
    value["_id"].as_str().unwrap().to_string()
}

fn assert_projected_thread(thread: &Value) {
    for key in ["_id", "text", "created_on", "bumped_on", "replies"] {
        assert!(thread.get(key).is_some(), "thread is missing {}", key);
    }
    assert!(thread.get("delete_password").is_none());
    assert!(thread.get("reported").is_none());

    for reply in thread["replies"].as_array().unwrap() {
        assert!(reply.get("_id").is_some());
        assert!(reply.get("text").is_some());
        assert!(reply.get("created_on").is_some());
        assert!(reply.get("delete_password").is_none());
        assert!(reply.get("reported").is_none());
    }
}

async fn pause() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn test_board_session() {
    let app = TestApp::seeded().await;
    pause().await;

    // New thread on a board
    let response = app
        .send_json(
            Method::POST,
            "/api/threads/random",
            json!({ "board": "random", "text": "hello world", "delete_password": "abc123" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert!(response.location().unwrap().contains("/b/random"));

    // Missing inputs
    let response = app
        .send_json(Method::POST, "/api/threads/random", json!({ "text": "hello world" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "missing required fields");
    assert!(response.location().is_none());

    // Recent threads
    let threads = app.threads().await;
    assert_eq!(threads.len(), 4);
    assert_eq!(threads[0]["text"], "hello world");
    assert_eq!(threads[1]["replies"].as_array().unwrap().len(), 3);
    assert_projected_thread(&threads[0]);
    let thread_id = id_of(&threads[0]);
    let second_thread_id = id_of(&threads[1]);

    // Delete a thread with an invalid id, a wrong password, then for real
    let response = app
        .send_json(
            Method::DELETE,
            "/api/threads/random",
            json!({ "thread_id": 100000000000u64, "delete_password": "abc123" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "incorrect password");

    let response = app
        .send_json(
            Method::DELETE,
            "/api/threads/random",
            json!({ "thread_id": thread_id, "delete_password": "abc" }),
        )
        .await;
    assert_eq!(response.body, "incorrect password");

    let response = app
        .send_json(
            Method::DELETE,
            "/api/threads/random",
            json!({ "thread_id": thread_id, "delete_password": "abc123" }),
        )
        .await;
    assert_eq!(response.body, "success");

    // Report a thread
    let response = app
        .send_json(
            Method::PUT,
            "/api/threads/random",
            json!({ "thread_id": second_thread_id, "delete_password": "pass" }),
        )
        .await;
    assert_eq!(response.body, "success");

    let response = app
        .send_json(
            Method::PUT,
            "/api/threads/random",
            json!({ "thread_id": second_thread_id, "delete_password": "in" }),
        )
        .await;
    assert_eq!(response.body, "incorrect password");

    // Reply to a thread
    let response = app
        .send_json(
            Method::POST,
            "/api/replies/random",
            json!({
                "thread_id": second_thread_id,
                "text": "okay",
                "delete_password": "pass",
                "board": "random",
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert!(response
        .location()
        .unwrap()
        .contains(&format!("/b/random/{}", second_thread_id)));

    let response = app
        .send_json(
            Method::POST,
            "/api/replies/random",
            json!({ "text": "okay", "delete_password": "pass", "board": "random" }),
        )
        .await;
    assert_eq!(response.body, "missing required fields");

    // Replies for a thread
    let response = app
        .get(&format!("/api/replies/random?thread_id={}", second_thread_id))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let thread = response.json();
    assert_projected_thread(&thread);
    let reply_id = id_of(&thread["replies"][0]);

    // Report a reply
    let response = app
        .send_json(
            Method::PUT,
            "/api/replies/random",
            json!({ "thread_id": second_thread_id, "reply_id": reply_id, "delete_password": "no" }),
        )
        .await;
    assert_eq!(response.body, "success");

    let response = app
        .send_json(
            Method::PUT,
            "/api/replies/random",
            json!({ "thread_id": second_thread_id, "reply_id": reply_id, "delete_password": "nah" }),
        )
        .await;
    assert_eq!(response.body, "incorrect password");

    // Delete a reply
    let response = app
        .send_json(
            Method::DELETE,
            "/api/replies/random",
            json!({ "thread_id": second_thread_id, "reply_id": reply_id, "delete_password": "not right" }),
        )
        .await;
    assert_eq!(response.body, "incorrect password");

    let response = app
        .send_json(
            Method::DELETE,
            "/api/replies/random",
            json!({ "thread_id": second_thread_id, "reply_id": reply_id, "delete_password": "no" }),
        )
        .await;
    assert_eq!(response.body, "success");
}

#[tokio::test]
async fn test_listing_truncates_replies_and_hides_secrets() {
    let app = TestApp::seeded().await;
    let newest = id_of(&app.threads().await[0]);

    let response = app
        .send_json(
            Method::POST,
            "/api/replies/random",
            json!({ "thread_id": newest, "text": "fourth", "delete_password": "no", "board": "random" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);

    let threads = app.threads().await;
    assert_eq!(id_of(&threads[0]), newest);

    let replies = threads[0]["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 3);
    // The oldest three are shown, the new one is left out.
    assert!(replies.iter().all(|reply| reply["text"] != "fourth"));

    for thread in &threads {
        assert_projected_thread(thread);
    }

    let full = app.store.get_full_thread(&newest).await.unwrap().unwrap();
    assert_eq!(full.replies.len(), 4);
}

#[tokio::test]
async fn test_listing_is_capped_at_ten_threads() {
    let app = TestApp::seeded().await;
    for i in 0..12 {
        app.store
            .create_thread(&format!("extra {}", i), "pass")
            .await
            .unwrap();
    }

    assert_eq!(app.threads().await.len(), 10);
}

#[tokio::test]
async fn test_rejected_thread_actions_leave_state_unchanged() {
    let app = TestApp::seeded().await;
    let thread_id = id_of(&app.threads().await[0]);
    let unknown = "65f0c0ffee0000000000abcd";

    for method in [Method::PUT, Method::DELETE] {
        let response = app
            .send_json(
                method.clone(),
                "/api/threads/random",
                json!({ "thread_id": unknown, "delete_password": "pass" }),
            )
            .await;
        assert_eq!(response.body, "incorrect password");

        let response = app
            .send_json(
                method,
                "/api/threads/random",
                json!({ "thread_id": thread_id, "delete_password": "PASS" }),
            )
            .await;
        assert_eq!(response.body, "incorrect password");
    }

    let full = app.store.get_full_thread(&thread_id).await.unwrap().unwrap();
    assert!(!full.reported);

    let response = app
        .send_json(
            Method::DELETE,
            "/api/threads/random",
            json!({ "thread_id": thread_id, "delete_password": "pass" }),
        )
        .await;
    assert_eq!(response.body, "success");

    let response = app
        .get(&format!("/api/replies/random?thread_id={}", thread_id))
        .await;
    assert_eq!(response.body, "missing thread_id");
    assert_eq!(app.threads().await.len(), 2);
}

#[tokio::test]
async fn test_report_thread_sets_flag() {
    let app = TestApp::seeded().await;
    let thread_id = id_of(&app.threads().await[2]);

    let response = app
        .send_json(
            Method::PUT,
            "/api/threads/random",
            json!({ "thread_id": thread_id, "delete_password": "pass" }),
        )
        .await;
    assert_eq!(response.body, "success");

    let full = app.store.get_full_thread(&thread_id).await.unwrap().unwrap();
    assert!(full.reported);
}

#[tokio::test]
async fn test_reply_bumps_thread_to_the_top() {
    let app = TestApp::seeded().await;
    let threads = app.threads().await;
    let oldest = threads.last().unwrap();
    let oldest_id = id_of(oldest);
    let bumped_before = oldest["bumped_on"].as_str().unwrap().to_string();
    pause().await;

    let response = app
        .send_json(
            Method::POST,
            "/api/replies/general",
            json!({ "thread_id": oldest_id, "text": "bump", "delete_password": "x", "board": "general" }),
        )
        .await;
    assert_eq!(response.location(), Some(format!("/b/general/{}", oldest_id).as_str()));

    let threads = app.threads().await;
    assert_eq!(id_of(&threads[0]), oldest_id);
    assert_ne!(threads[0]["bumped_on"].as_str().unwrap(), bumped_before);
    assert_eq!(threads[0]["created_on"], oldest["created_on"]);

    let response = app
        .get(&format!("/api/replies/general?thread_id={}", oldest_id))
        .await;
    let thread = response.json();
    assert_projected_thread(&thread);
    let replies = thread["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["text"], "bump");
}

#[tokio::test]
async fn test_reply_to_unknown_thread_fails() {
    let app = TestApp::seeded().await;

    for thread_id in ["65f0c0ffee0000000000abcd", "not-an-id"] {
        let response = app
            .send_json(
                Method::POST,
                "/api/replies/random",
                json!({ "thread_id": thread_id, "text": "hi", "delete_password": "x", "board": "random" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "failed to create reply");
    }
}

#[tokio::test]
async fn test_reply_delete_uses_sentinel() {
    let app = TestApp::seeded().await;
    let thread = &app.threads().await[0];
    let thread_id = id_of(thread);
    let reply_id = id_of(&thread["replies"][1]);
    let original_text = thread["replies"][1]["text"].as_str().unwrap().to_string();

    let response = app
        .send_json(
            Method::DELETE,
            "/api/replies/random",
            json!({ "thread_id": thread_id, "reply_id": reply_id, "delete_password": "wrong" }),
        )
        .await;
    assert_eq!(response.body, "incorrect password");

    let full = app.store.get_full_thread(&thread_id).await.unwrap().unwrap();
    assert_eq!(full.reply(&reply_id).unwrap().text, original_text);

    let response = app
        .send_json(
            Method::DELETE,
            "/api/replies/random",
            json!({ "thread_id": thread_id, "reply_id": reply_id, "delete_password": "no" }),
        )
        .await;
    assert_eq!(response.body, "success");

    let response = app
        .get(&format!("/api/replies/random?thread_id={}", thread_id))
        .await;
    let replies = response.json()["replies"].as_array().cloned().unwrap();
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[1]["_id"], reply_id.as_str());
    assert_eq!(replies[1]["text"], DELETED_TEXT);
    assert_ne!(replies[0]["text"], DELETED_TEXT);
}

#[tokio::test]
async fn test_reply_actions_with_unknown_reply() {
    let app = TestApp::seeded().await;
    let thread_id = id_of(&app.threads().await[0]);

    for reply_id in ["65f0c0ffee0000000000abcd", "bogus"] {
        for method in [Method::PUT, Method::DELETE] {
            let response = app
                .send_json(
                    method,
                    "/api/replies/random",
                    json!({ "thread_id": thread_id, "reply_id": reply_id, "delete_password": "no" }),
                )
                .await;
            assert_eq!(response.body, "incorrect password");
        }
    }
}

#[tokio::test]
async fn test_report_reply_flags_only_that_reply() {
    let app = TestApp::seeded().await;
    let thread = &app.threads().await[0];
    let thread_id = id_of(thread);
    let reply_id = id_of(&thread["replies"][2]);

    let response = app
        .send_json(
            Method::PUT,
            "/api/replies/random",
            json!({ "thread_id": thread_id, "reply_id": reply_id, "delete_password": "no" }),
        )
        .await;
    assert_eq!(response.body, "success");

    let full = app.store.get_full_thread(&thread_id).await.unwrap().unwrap();
    assert!(full.reply(&reply_id).unwrap().reported);
    assert_eq!(full.replies.iter().filter(|r| r.reported).count(), 1);
    assert!(!full.reported);
}

#[tokio::test]
async fn test_listing_and_single_thread_share_shape() {
    let app = TestApp::seeded().await;
    let listed = app.threads().await;

    for item in &listed {
        let response = app
            .get(&format!("/api/replies/random?thread_id={}", id_of(item)))
            .await;
        assert_eq!(&response.json(), item);
    }
}

#[tokio::test]
async fn test_replies_listing_needs_thread_id() {
    let app = TestApp::seeded().await;

    for uri in [
        "/api/replies/random",
        "/api/replies/random?thread_id=",
        "/api/replies/random?thread_id=100000000000",
        "/api/replies/random?thread_id=65f0c0ffee0000000000abcd",
    ] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "missing thread_id", "for {}", uri);
    }
}

#[tokio::test]
async fn test_form_bodies_are_accepted() {
    let app = TestApp::seeded().await;

    let response = app
        .send_form(
            Method::POST,
            "/api/threads/fun",
            "text=from+a+form&delete_password=pw&board=fun",
        )
        .await;
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), Some("/b/fun"));

    let thread_id = id_of(&app.threads().await[0]);
    let response = app
        .send_form(
            Method::PUT,
            "/api/threads/fun",
            &format!("thread_id={}&delete_password=pw", thread_id),
        )
        .await;
    assert_eq!(response.body, "success");

    let response = app
        .send_form(Method::DELETE, "/api/threads/fun", "delete_password=pw")
        .await;
    assert_eq!(response.body, "missing required fields");
}

#[tokio::test]
async fn test_bodyless_mutations_are_missing_fields() {
    let app = TestApp::seeded().await;

    for (method, uri) in [
        (Method::POST, "/api/threads/random"),
        (Method::PUT, "/api/threads/random"),
        (Method::DELETE, "/api/threads/random"),
        (Method::POST, "/api/replies/random"),
        (Method::PUT, "/api/replies/random"),
        (Method::DELETE, "/api/replies/random"),
    ] {
        let request = Request::builder()
            .method(method.clone())
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.request(request).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "missing required fields", "for {}", uri);

        // Declared JSON with nothing usable in it
        for body in ["", "[]", "\"hello\""] {
            let request = Request::builder()
                .method(method.clone())
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap();
            let response = app.request(request).await;
            assert_eq!(response.status, StatusCode::OK, "for {} {:?}", uri, body);
            assert_eq!(response.body, "missing required fields", "for {} {:?}", uri, body);
        }
    }
}

#[tokio::test]
async fn test_health_reports_store() {
    let app = TestApp::seeded().await;

    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);

    let health = response.json();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["services"]["store"], "connected");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::seeded().await;

    let response = app.get("/api-docs/openapi.json").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["paths"].get("/api/threads/{board}").is_some());
}
