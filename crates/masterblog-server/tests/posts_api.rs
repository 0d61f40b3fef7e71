use assert_json_diff::assert_json_eq;
use masterblog_db_memory::create_storage;
use masterblog_server::{AppConfig, build_app};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

async fn start_server() -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_app(&AppConfig::default(), create_storage());

    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

async fn create_post(client: &reqwest::Client, base: &str, title: &str, content: &str) -> Value {
    let resp = client
        .post(format!("{base}/api/posts"))
        .json(&json!({"title": title, "content": content}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn create_then_list_roundtrip() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    // Starts empty
    let resp = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.headers().get("x-total-count").unwrap(), "0");
    let body: Value = resp.json().await.unwrap();
    assert_json_eq!(body, json!([]));

    let created = create_post(&client, &base, "First post", "Hello world").await;
    assert_json_eq!(
        created,
        json!({
            "id": 1,
            "title": "First post",
            "content": "Hello world",
            "categories": [],
            "tags": [],
        })
    );

    let resp = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers().get("x-total-count").unwrap(), "1");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 1);
    assert_eq!(body[0]["title"], "First post");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn create_accepts_categories_and_tags() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/posts"))
        .json(&json!({
            "title": "Tagged",
            "content": "body",
            "categories": ["rust"],
            "tags": ["web", "axum"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_json_eq!(body["categories"], json!(["rust"]));
    assert_json_eq!(body["tags"], json!(["web", "axum"]));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn create_reports_missing_fields() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let cases = [
        (json!({}), "Missing fields: title, content"),
        (json!({"title": "only title"}), "Missing fields: content"),
        (json!({"content": "only content"}), "Missing fields: title"),
        (Value::Null, "Missing fields: title, content"),
    ];
    for (payload, expected) in cases {
        let resp = client
            .post(format!("{base}/api/posts"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], expected);
    }

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn create_rejects_wrong_field_types() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/api/posts"))
        .json(&json!({"title": 5, "content": "x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Invalid post payload:"), "{message}");

    // Nothing was created
    let resp = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers().get("x-total-count").unwrap(), "0");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn list_sorts_by_field_and_direction() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    create_post(&client, &base, "banana", "ccc").await;
    create_post(&client, &base, "apple", "bbb").await;
    create_post(&client, &base, "cherry", "aaa").await;

    let titles = |body: &Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect()
    };

    // Unsorted keeps creation order
    let body: Value = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), ["banana", "apple", "cherry"]);

    let body: Value = client
        .get(format!("{base}/api/posts?sort=title"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), ["apple", "banana", "cherry"]);

    let body: Value = client
        .get(format!("{base}/api/posts?sort=title&direction=desc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), ["cherry", "banana", "apple"]);

    let body: Value = client
        .get(format!("{base}/api/posts?sort=content"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), ["cherry", "apple", "banana"]);

    // Direction alone is accepted and has no effect
    let body: Value = client
        .get(format!("{base}/api/posts?direction=desc"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(titles(&body), ["banana", "apple", "cherry"]);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn list_rejects_invalid_sort_parameters() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/posts?sort=author"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid sort field: author");

    let resp = client
        .get(format!("{base}/api/posts?sort=title&direction=up"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Invalid sort direction: up");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn list_pages_through_posts() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    for i in 1..=5 {
        create_post(&client, &base, &format!("post {i}"), "body").await;
    }

    let resp = client
        .get(format!("{base}/api/posts?page=1&limit=2"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers().get("x-total-count").unwrap(), "5");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["id"], 1);
    assert_eq!(body[1]["id"], 2);

    let body: Value = client
        .get(format!("{base}/api/posts?page=3&limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 5);

    // Past the end comes back empty, not an error
    let resp = client
        .get(format!("{base}/api/posts?page=9&limit=2"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.headers().get("x-total-count").unwrap(), "5");
    let body: Value = resp.json().await.unwrap();
    assert_json_eq!(body, json!([]));

    // Pagination works together with sorting
    let body: Value = client
        .get(format!("{base}/api/posts?sort=title&direction=desc&page=1&limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body[0]["title"], "post 5");
    assert_eq!(body[1]["title"], "post 4");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn list_rejects_invalid_page_parameters() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    for (query, expected) in [
        ("page=0", "Invalid page parameter"),
        ("page=abc", "Invalid page parameter"),
        ("page=-1", "Invalid page parameter"),
        ("limit=0", "Invalid limit parameter"),
        ("limit=ten", "Invalid limit parameter"),
    ] {
        let resp = client
            .get(format!("{base}/api/posts?{query}"))
            .send()
            .await
            .unwrap();
        assert_eq!(
            resp.status(),
            reqwest::StatusCode::BAD_REQUEST,
            "query: {query}"
        );
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"], expected, "query: {query}");
    }

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn update_merges_provided_fields() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    create_post(&client, &base, "Original title", "Original content").await;

    let resp = client
        .put(format!("{base}/api/posts/1"))
        .json(&json!({"title": "New title"}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "New title");
    assert_eq!(body["content"], "Original content");

    // An empty body is a no-op update
    let resp = client
        .put(format!("{base}/api/posts/1"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "New title");
    assert_eq!(body["content"], "Original content");

    let resp = client
        .put(format!("{base}/api/posts/1"))
        .json(&json!({"content": "Rewritten", "tags": ["meta"]}))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["content"], "Rewritten");
    assert_json_eq!(body["tags"], json!(["meta"]));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn update_unknown_post_is_not_found() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .put(format!("{base}/api/posts/42"))
        .json(&json!({"title": "nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Post not found");

    // A non-numeric id behaves like an unknown one
    let resp = client
        .put(format!("{base}/api/posts/abc"))
        .json(&json!({"title": "nope"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Post not found");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn update_rejects_wrong_field_types() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    create_post(&client, &base, "Original", "body").await;

    let resp = client
        .put(format!("{base}/api/posts/1"))
        .json(&json!({"title": ["not", "a", "string"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Invalid post payload:"), "{message}");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn delete_removes_post_and_reports_it() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    create_post(&client, &base, "Doomed", "body").await;

    let resp = client
        .delete(format!("{base}/api/posts/1"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_json_eq!(
        body,
        json!({"message": "Post with id 1 has been deleted successfully."})
    );

    // Gone from the listing
    let resp = client
        .get(format!("{base}/api/posts"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers().get("x-total-count").unwrap(), "0");

    // Second delete reports not found
    let resp = client
        .delete(format!("{base}/api/posts/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Post not found");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    create_post(&client, &base, "first", "a").await;
    create_post(&client, &base, "second", "b").await;

    let resp = client
        .delete(format!("{base}/api/posts/2"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let third = create_post(&client, &base, "third", "c").await;
    assert_eq!(third["id"], 3);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn search_matches_title_and_content() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    create_post(&client, &base, "Rust tips", "Borrow checker basics").await;
    create_post(&client, &base, "Cooking", "Rustic bread recipes").await;
    create_post(&client, &base, "Gardening", "Tomatoes and basil").await;

    // Case-insensitive substring match on title
    let resp = client
        .get(format!("{base}/api/posts/search?title=RUST"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.headers().get("x-total-count").unwrap(), "1");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Rust tips");

    // Content search is a substring match as well ("Rustic" contains "rust")
    let body: Value = client
        .get(format!("{base}/api/posts/search?content=rust"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Cooking");

    // Both parameters must match the same post
    let body: Value = client
        .get(format!("{base}/api/posts/search?title=rust&content=borrow"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Rust tips");

    let body: Value = client
        .get(format!("{base}/api/posts/search?title=rust&content=tomatoes"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_json_eq!(body, json!([]));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn search_without_terms_returns_nothing() {
    let (base, shutdown_tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    create_post(&client, &base, "Anything", "at all").await;

    let resp = client
        .get(format!("{base}/api/posts/search"))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    assert_eq!(resp.headers().get("x-total-count").unwrap(), "0");
    let body: Value = resp.json().await.unwrap();
    assert_json_eq!(body, json!([]));

    // Empty parameters behave like absent ones
    let body: Value = client
        .get(format!("{base}/api/posts/search?title=&content="))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_json_eq!(body, json!([]));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
