use serde_json::{json, Value};
use tempfile::TempDir;

use cs_infra::db::pool::init_db_pool;
use cs_infra::store::ClipboardStore;
use cs_server::routes;

fn test_store() -> (ClipboardStore, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("clipsync-test.db");
    let pool = init_db_pool(db_path.to_str().expect("utf-8 path")).expect("init pool");
    (ClipboardStore::new(pool), dir)
}

async fn publish(store: &ClipboardStore, device_id: &str, content: &str) -> (u16, Value) {
    let response = warp::test::request()
        .method("POST")
        .path("/clipboard")
        .json(&json!({ "content": content, "device_id": device_id }))
        .reply(&routes::all(store.clone()))
        .await;
    let body = serde_json::from_slice(response.body()).unwrap_or(Value::Null);
    (response.status().as_u16(), body)
}

#[tokio::test]
async fn publish_then_fetch_latest_round_trips() {
    let (store, _dir) = test_store();

    let (status, body) = publish(&store, "aaaa1111", "hello").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    let id = body["id"].as_i64().unwrap();

    let response = warp::test::request()
        .method("GET")
        .path("/clipboard/latest?device_id=aaaa1111")
        .reply(&routes::all(store.clone()))
        .await;
    assert_eq!(response.status(), 200);
    let record: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(record["id"].as_i64().unwrap(), id);
    assert_eq!(record["content"], "hello");
    assert_eq!(record["device_id"], "aaaa1111");
    // RFC 3339 UTC timestamp.
    assert!(record["timestamp"].as_str().unwrap().contains('T'));
}

#[tokio::test]
async fn empty_content_is_rejected() {
    let (store, _dir) = test_store();

    let (status, body) = publish(&store, "aaaa1111", "").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Missing content or device_id");
}

#[tokio::test]
async fn missing_body_field_is_rejected() {
    let (store, _dir) = test_store();

    let response = warp::test::request()
        .method("POST")
        .path("/clipboard")
        .json(&json!({ "content": "hello" }))
        .reply(&routes::all(store.clone()))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn latest_requires_a_device_id() {
    let (store, _dir) = test_store();

    let response = warp::test::request()
        .method("GET")
        .path("/clipboard/latest")
        .reply(&routes::all(store.clone()))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn latest_for_unknown_device_is_404() {
    let (store, _dir) = test_store();

    let response = warp::test::request()
        .method("GET")
        .path("/clipboard/latest?device_id=deadbeef")
        .reply(&routes::all(store.clone()))
        .await;
    assert_eq!(response.status(), 404);
    let body: Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["message"], "No data found");
}

#[tokio::test]
async fn history_is_newest_first_and_limited() {
    let (store, _dir) = test_store();
    publish(&store, "aaaa1111", "one").await;
    publish(&store, "aaaa1111", "two").await;
    publish(&store, "bbbb2222", "three").await;

    let response = warp::test::request()
        .method("GET")
        .path("/clipboard/history?limit=2")
        .reply(&routes::all(store.clone()))
        .await;
    assert_eq!(response.status(), 200);
    let records: Vec<Value> = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["content"], "three");
    assert_eq!(records[1]["content"], "two");

    let response = warp::test::request()
        .method("GET")
        .path("/clipboard/history?device_id=aaaa1111")
        .reply(&routes::all(store.clone()))
        .await;
    let records: Vec<Value> = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r["device_id"] == "aaaa1111"));
}

#[tokio::test]
async fn history_without_parameters_uses_the_default_limit() {
    let (store, _dir) = test_store();
    publish(&store, "aaaa1111", "solo").await;

    let response = warp::test::request()
        .method("GET")
        .path("/clipboard/history")
        .reply(&routes::all(store.clone()))
        .await;
    assert_eq!(response.status(), 200);
    let records: Vec<Value> = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["content"], "solo");
}

#[tokio::test]
async fn invalid_history_limit_is_rejected() {
    let (store, _dir) = test_store();

    let response = warp::test::request()
        .method("GET")
        .path("/clipboard/history?limit=plenty")
        .reply(&routes::all(store.clone()))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn index_page_renders_history() {
    let (store, _dir) = test_store();
    publish(&store, "aaaa1111", "shown on the page").await;

    let response = warp::test::request()
        .method("GET")
        .path("/")
        .reply(&routes::all(store.clone()))
        .await;
    assert_eq!(response.status(), 200);
    let html = String::from_utf8(response.body().to_vec()).unwrap();
    assert!(html.contains("shown on the page"));
    assert!(html.contains("aaaa1111"));
}
