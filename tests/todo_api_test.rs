mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use todo_api::config::TodoOwnership;

use common::TestApp;

#[tokio::test]
async fn test_add_todo_defaults_and_owner() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, user_id) = app.register("Ada", "ada@example.com").await;

    let todo = app.add_todo(&token, "Write report").await;
    assert_eq!(todo["name"], "Write report");
    assert_eq!(todo["status"], "Pending");
    assert_eq!(todo["user"], user_id.as_str());
    assert!(todo["_id"].as_str().is_some());
    assert!(todo["createdAt"].as_str().is_some());
    assert!(todo["updatedAt"].as_str().is_some());
}

#[tokio::test]
async fn test_add_todo_with_status() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, _) = app.register("Ada", "ada@example.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/todo/add",
            Some(&token),
            Some(json!({ "name": "Write report", "status": "In Progress" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["todo"]["status"], "In Progress");
}

#[tokio::test]
async fn test_add_todo_validation() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, _) = app.register("Ada", "ada@example.com").await;

    let (status, body) = app
        .send(Method::POST, "/api/todo/add", Some(&token), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Todo name is required");

    for name in ["ab".to_string(), "x".repeat(101)] {
        let (status, body) = app
            .send(
                Method::POST,
                "/api/todo/add",
                Some(&token),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    let (status, _) = app
        .send(
            Method::POST,
            "/api/todo/add",
            Some(&token),
            Some(json!({ "name": "Valid name", "status": "Done" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app
        .send(Method::GET, "/api/todo/get-all", Some(&token), None)
        .await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_todo_routes_require_token() {
    let app = TestApp::new(TodoOwnership::Shared).await;

    let (status, _) = app
        .send(
            Method::POST,
            "/api/todo/add",
            None,
            Some(json!({ "name": "Write report" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::GET, "/api/todo/get-all", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_all_second_page() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, _) = app.register("Ada", "ada@example.com").await;
    for i in 0..12 {
        app.add_todo(&token, &format!("Todo number {i:02}")).await;
    }

    let (status, body) = app
        .send(
            Method::GET,
            "/api/todo/get-all?page=2&limit=5",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["todos"].as_array().unwrap().len(), 5);
    assert_eq!(body["total"], 12);
    assert_eq!(body["page"], 2);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["todos"][0]["name"], "Todo number 06");
}

#[tokio::test]
async fn test_get_all_defaults() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, _) = app.register("Ada", "ada@example.com").await;
    for i in 0..12 {
        app.add_todo(&token, &format!("Todo number {i:02}")).await;
    }

    let (_, body) = app
        .send(
            Method::GET,
            "/api/todo/get-all?page=abc&limit=0",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["todos"].as_array().unwrap().len(), 10);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["todos"][0]["name"], "Todo number 11");
}

#[tokio::test]
async fn test_get_all_huge_page_is_empty() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, _) = app.register("Ada", "ada@example.com").await;
    for i in 0..12 {
        app.add_todo(&token, &format!("Todo number {i:02}")).await;
    }

    let (status, body) = app
        .send(
            Method::GET,
            "/api/todo/get-all?page=4294967295&limit=3000000000",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 4294967295u64);
    assert_eq!(body["total"], 12);
    assert_eq!(body["totalPages"], 1);
    assert!(body["todos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_todo_merges_fields() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, _) = app.register("Ada", "ada@example.com").await;
    let todo = app.add_todo(&token, "Write report").await;
    let id = todo["_id"].as_str().unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/todo/update/{id}"),
            Some(&token),
            Some(json!({ "status": "Completed" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["name"], "Write report");
    assert_eq!(body["todo"]["status"], "Completed");
    assert_eq!(body["todo"]["createdAt"], todo["createdAt"]);
}

#[tokio::test]
async fn test_update_missing_todo_is_not_found() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, _) = app.register("Ada", "ada@example.com").await;
    app.add_todo(&token, "Write report").await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/todo/update/does-not-exist",
            Some(&token),
            Some(json!({ "name": "Changed name" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Todo not found");

    let (_, body) = app
        .send(Method::GET, "/api/todo/get-all", Some(&token), None)
        .await;
    assert_eq!(body["todos"][0]["name"], "Write report");
}

#[tokio::test]
async fn test_invalid_update_changes_nothing() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, _) = app.register("Ada", "ada@example.com").await;
    let todo = app.add_todo(&token, "Write report").await;
    let id = todo["_id"].as_str().unwrap();

    for body in [
        json!({ "name": "no" }),
        json!({ "name": "Fine name", "status": "Archived" }),
    ] {
        let (status, _) = app
            .send(
                Method::PUT,
                &format!("/api/todo/update/{id}"),
                Some(&token),
                Some(body),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (_, body) = app
        .send(Method::GET, "/api/todo/get-all", Some(&token), None)
        .await;
    assert_eq!(body["todos"][0]["name"], "Write report");
    assert_eq!(body["todos"][0]["status"], "Pending");
    assert_eq!(body["todos"][0]["updatedAt"], todo["updatedAt"]);
}

#[tokio::test]
async fn test_delete_removes_from_listing() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (token, _) = app.register("Ada", "ada@example.com").await;
    let keep = app.add_todo(&token, "Keep this one").await;
    let doomed = app.add_todo(&token, "Delete this one").await;
    let doomed_id = doomed["_id"].as_str().unwrap();

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/api/todo/delete/{doomed_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Todo deleted successfully");

    let (_, body) = app
        .send(Method::GET, "/api/todo/get-all", Some(&token), None)
        .await;
    assert_eq!(body["total"], 1);
    let todos = body["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0]["_id"], keep["_id"]);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/todo/delete/{doomed_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shared_ownership_exposes_all_todos() {
    let app = TestApp::new(TodoOwnership::Shared).await;
    let (ada, _) = app.register("Ada", "ada@example.com").await;
    let (bob, _) = app.register("Bob", "bob@example.com").await;
    let todo = app.add_todo(&ada, "Ada's todo").await;
    let id = todo["_id"].as_str().unwrap();

    let (_, body) = app
        .send(Method::GET, "/api/todo/get-all", Some(&bob), None)
        .await;
    assert_eq!(body["total"], 1);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/todo/update/{id}"),
            Some(&bob),
            Some(json!({ "status": "Completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_owner_ownership_isolates_users() {
    let app = TestApp::new(TodoOwnership::Owner).await;
    let (ada, _) = app.register("Ada", "ada@example.com").await;
    let (bob, _) = app.register("Bob", "bob@example.com").await;
    let todo = app.add_todo(&ada, "Ada's todo").await;
    app.add_todo(&bob, "Bob's todo").await;
    let id = todo["_id"].as_str().unwrap();

    let (_, body) = app
        .send(Method::GET, "/api/todo/get-all", Some(&bob), None)
        .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["todos"][0]["name"], "Bob's todo");

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/todo/update/{id}"),
            Some(&bob),
            Some(json!({ "status": "Completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/todo/delete/{id}"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .send(Method::GET, "/api/todo/get-all", Some(&ada), None)
        .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["todos"][0]["status"], "Pending");
}
