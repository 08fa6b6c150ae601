#![allow(clippy::unwrap_used)]
use reqwest::StatusCode;
use serde_json::json;
use std::collections::HashSet;

mod common;

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let app = common::TestApp::spawn().await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = app.client.clone();
        let url = app.messages_url();
        handles.push(tokio::spawn(async move {
            let resp = client.post(url).json(&json!({ "text": format!("msg {i}") })).send().await.unwrap();
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: serde_json::Value = resp.json().await.unwrap();
            body["id"].as_i64().unwrap()
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }

    assert_eq!(ids.len(), 20);
    assert_eq!(app.list_messages().await.len(), 20);
}

#[tokio::test]
async fn test_concurrent_updates_leave_one_whole_value() {
    let app = common::TestApp::spawn().await;
    let msg = app.create_message("start").await;
    let url = app.message_url(&msg["id"]);

    let mut handles = Vec::new();
    for i in 0..10 {
        let client = app.client.clone();
        let url = url.clone();
        handles.push(tokio::spawn(async move {
            let resp = client.put(url).json(&json!({ "text": format!("edit {i}") })).send().await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let list = app.list_messages().await;
    assert_eq!(list.len(), 1);
    let text = list[0]["text"].as_str().unwrap();
    assert!((0..10).any(|i| text == format!("edit {i}")), "unexpected text {text}");
    assert_eq!(list[0]["createdAt"], msg["createdAt"]);
}

#[tokio::test]
async fn test_concurrent_deletes_succeed_once() {
    let app = common::TestApp::spawn().await;
    let msg = app.create_message("doomed").await;
    let url = app.message_url(&msg["id"]);

    let (a, b) = tokio::join!(app.client.delete(&url).send(), app.client.delete(&url).send());
    let mut statuses = vec![a.unwrap().status(), b.unwrap().status()];
    statuses.sort();

    assert_eq!(statuses, vec![StatusCode::NO_CONTENT, StatusCode::NOT_FOUND]);
}
