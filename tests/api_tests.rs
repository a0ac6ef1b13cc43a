use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use taskflow::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = taskflow::api::create_app_state_from_config(config)
        .await
        .expect("Failed to create app state");
    taskflow::api::router(state)
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", mime::APPLICATION_JSON.as_ref())
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn register(app: &Router, username: &str, email: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": email,
            "password": "password123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

async fn create_list(app: &Router, token: &str, body: Value) -> Value {
    let (status, body) = send_json(app, "POST", "/api/lists", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn create_task(app: &Router, token: &str, body: Value) -> Value {
    let (status, body) = send_json(app, "POST", "/api/tasks", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn today() -> String {
    chrono::Local::now()
        .date_naive()
        .format("%Y-%m-%d")
        .to_string()
}

fn yesterday() -> String {
    (chrono::Local::now().date_naive() - chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string()
}

// ============================================================================
// Lists
// ============================================================================

#[tokio::test]
async fn test_lists_crud_round_trip() {
    let app = spawn_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    let created = create_list(
        &app,
        &token,
        json!({ "title": "Groceries", "color": "#28a745" }),
    )
    .await;

    assert_eq!(created["id"], 1);
    assert_eq!(created["title"], "Groceries");
    assert_eq!(created["color"], "#28a745");
    assert_eq!(created["description"], Value::Null);
    assert!(created["created_at"].is_string());

    let (status, fetched) = send_json(&app, "GET", "/api/lists/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Groceries");
    assert_eq!(fetched["color"], "#28a745");

    // Full-replace update: absent description and color fall back to
    // NULL and the default color.
    let (status, updated) = send_json(
        &app,
        "PUT",
        "/api/lists/1",
        Some(&token),
        Some(json!({ "title": "Errands" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Errands");
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["color"], "#007bff");

    create_list(&app, &token, json!({ "title": "Work" })).await;

    let (status, all) = send_json(&app, "GET", "/api/lists", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 2);
    // Newest first
    assert_eq!(all[0]["title"], "Work");
    assert_eq!(all[1]["title"], "Errands");
}

#[tokio::test]
async fn test_list_title_boundaries() {
    let app = spawn_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    create_list(&app, &token, json!({ "title": "a".repeat(100) })).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/lists",
        Some(&token),
        Some(json!({ "title": "a".repeat(101) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["param"], "title");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/lists",
        Some(&token),
        Some(json!({ "description": "no title" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Title is required");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/lists",
        Some(&token),
        Some(json!({ "title": "ok", "description": "d".repeat(501) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["param"], "description");
}

#[tokio::test]
async fn test_lists_are_owner_scoped() {
    let app = spawn_app().await;
    let alice = register(&app, "alice", "alice@example.com").await;
    let bob = register(&app, "bob", "bob@example.com").await;

    create_list(&app, &alice, json!({ "title": "Groceries" })).await;

    let (status, lists) = send_json(&app, "GET", "/api/lists", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(lists.as_array().unwrap().is_empty());

    // Not-owned and absent are indistinguishable: both 404
    let (status, body) = send_json(&app, "GET", "/api/lists/1", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "List not found");

    let (status, _) = send_json(
        &app,
        "PUT",
        "/api/lists/1",
        Some(&bob),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", "/api/lists/1", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice's list is untouched by all of the above
    let (status, list) = send_json(&app, "GET", "/api/lists/1", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["title"], "Groceries");
}

// ============================================================================
// Tasks
// ============================================================================

#[tokio::test]
async fn test_task_create_defaults_and_embedded_list() {
    let app = spawn_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    create_list(
        &app,
        &token,
        json!({ "title": "Groceries", "color": "#28a745" }),
    )
    .await;

    let task = create_task(&app, &token, json!({ "title": "Buy milk", "listId": 1 })).await;

    assert_eq!(task["id"], 1);
    assert_eq!(task["title"], "Buy milk");
    assert_eq!(task["priority"], "medium");
    assert_eq!(task["completed"], false);
    assert_eq!(task["dueDate"], Value::Null);
    assert_eq!(task["list"]["id"], 1);
    assert_eq!(task["list"]["title"], "Groceries");
    assert_eq!(task["list"]["color"], "#28a745");
    // The storage column name never leaks
    assert!(task.get("due_date").is_none());
}

#[tokio::test]
async fn test_task_create_round_trip() {
    let app = spawn_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    create_list(&app, &token, json!({ "title": "Groceries" })).await;

    let due = today();
    let created = create_task(
        &app,
        &token,
        json!({
            "title": "Buy milk",
            "description": "2 liters, whole",
            "listId": 1,
            "priority": "high",
            "dueDate": due
        }),
    )
    .await;

    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/tasks/{id}");
    let (status, fetched) = send_json(&app, "GET", &uri, Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Buy milk");
    assert_eq!(fetched["description"], "2 liters, whole");
    assert_eq!(fetched["priority"], "high");
    assert_eq!(fetched["dueDate"], due);
    assert!(fetched["created_at"].is_string());
    assert_eq!(fetched["list"]["title"], "Groceries");
}

#[tokio::test]
async fn test_task_create_validation() {
    let app = spawn_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    create_list(&app, &token, json!({ "title": "Groceries" })).await;

    create_task(&app, &token, json!({ "title": "a".repeat(200), "listId": 1 })).await;

    let cases = [
        (json!({ "title": "a".repeat(201), "listId": 1 }), "title"),
        (json!({ "listId": 1 }), "title"),
        (json!({ "title": "ok" }), "listId"),
        (
            json!({ "title": "ok", "listId": 1, "priority": "urgent" }),
            "priority",
        ),
        (
            json!({ "title": "ok", "listId": 1, "dueDate": "07-08-2026" }),
            "dueDate",
        ),
        (
            json!({ "title": "ok", "listId": 1, "dueDate": yesterday() }),
            "dueDate",
        ),
        (
            json!({ "title": "ok", "listId": 1, "description": "d".repeat(1001) }),
            "description",
        ),
    ];

    for (body, param) in cases {
        let (status, response) = send_json(&app, "POST", "/api/tasks", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["errors"][0]["param"], param);
    }

    // Creating into someone else's list is a 404, never an orphan
    let bob = register(&app, "bob", "bob@example.com").await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/tasks",
        Some(&bob),
        Some(json!({ "title": "Sneaky", "listId": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "List not found");

    let (_, bobs_tasks) = send_json(&app, "GET", "/api/tasks", Some(&bob), None).await;
    assert!(bobs_tasks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_task_due_date_today_is_accepted() {
    let app = spawn_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    create_list(&app, &token, json!({ "title": "Groceries" })).await;

    let task = create_task(
        &app,
        &token,
        json!({ "title": "Buy milk", "listId": 1, "dueDate": today() }),
    )
    .await;

    assert_eq!(task["dueDate"], today());
}

#[tokio::test]
async fn test_task_partial_update() {
    let app = spawn_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    create_list(&app, &token, json!({ "title": "Groceries" })).await;

    let due = today();
    create_task(
        &app,
        &token,
        json!({
            "title": "Buy milk",
            "description": "2 liters",
            "listId": 1,
            "priority": "high",
            "dueDate": due
        }),
    )
    .await;

    // Flipping completed leaves every other field untouched
    let (status, updated) = send_json(
        &app,
        "PUT",
        "/api/tasks/1",
        Some(&token),
        Some(json!({ "completed": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Buy milk");
    assert_eq!(updated["description"], "2 liters");
    assert_eq!(updated["priority"], "high");
    assert_eq!(updated["dueDate"], due);

    // An explicit null clears the due date and nothing else
    let (status, updated) = send_json(
        &app,
        "PUT",
        "/api/tasks/1",
        Some(&token),
        Some(json!({ "dueDate": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["dueDate"], Value::Null);
    assert_eq!(updated["completed"], true);
    assert_eq!(updated["title"], "Buy milk");

    // So does the empty string
    let (_, updated) = send_json(
        &app,
        "PUT",
        "/api/tasks/1",
        Some(&token),
        Some(json!({ "dueDate": due, "title": "Buy oat milk" })),
    )
    .await;
    assert_eq!(updated["dueDate"], due);
    assert_eq!(updated["title"], "Buy oat milk");

    let (_, updated) = send_json(
        &app,
        "PUT",
        "/api/tasks/1",
        Some(&token),
        Some(json!({ "dueDate": "" })),
    )
    .await;
    assert_eq!(updated["dueDate"], Value::Null);
}

#[tokio::test]
async fn test_task_update_validation_and_scoping() {
    let app = spawn_app().await;
    let alice = register(&app, "alice", "alice@example.com").await;
    let bob = register(&app, "bob", "bob@example.com").await;

    create_list(&app, &alice, json!({ "title": "Groceries" })).await;
    create_task(&app, &alice, json!({ "title": "Buy milk", "listId": 1 })).await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/tasks/1",
        Some(&alice),
        Some(json!({ "title": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Title cannot be empty");

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/tasks/1",
        Some(&alice),
        Some(json!({ "dueDate": yesterday() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["msg"], "Due date cannot be in the past");

    // Another user's read, update, and delete all miss identically
    let (status, body) = send_json(&app, "GET", "/api/tasks/1", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/tasks/1",
        Some(&bob),
        Some(json!({ "completed": true })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");

    let (status, _) = send_json(&app, "DELETE", "/api/tasks/1", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, task) = send_json(&app, "GET", "/api/tasks/1", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["completed"], false);
}

#[tokio::test]
async fn test_tasks_for_list() {
    let app = spawn_app().await;
    let alice = register(&app, "alice", "alice@example.com").await;
    let bob = register(&app, "bob", "bob@example.com").await;

    create_list(&app, &alice, json!({ "title": "Groceries" })).await;
    create_list(&app, &alice, json!({ "title": "Work" })).await;
    create_task(&app, &alice, json!({ "title": "Buy milk", "listId": 1 })).await;
    create_task(&app, &alice, json!({ "title": "Buy eggs", "listId": 1 })).await;
    create_task(&app, &alice, json!({ "title": "Send report", "listId": 2 })).await;

    let (status, tasks) = send_json(&app, "GET", "/api/tasks/list/1", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    // Newest first, due date under its renamed key, no list embed here
    assert_eq!(tasks[0]["title"], "Buy eggs");
    assert_eq!(tasks[1]["title"], "Buy milk");
    assert!(tasks[0].get("dueDate").is_some());
    assert!(tasks[0].get("due_date").is_none());
    assert!(tasks[0].get("list").is_none());

    // The whole-account view embeds each task's list summary
    let (_, all) = send_json(&app, "GET", "/api/tasks", Some(&alice), None).await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["title"], "Send report");
    assert_eq!(all[0]["list"]["title"], "Work");

    // A foreign list looks nonexistent
    let (status, body) = send_json(&app, "GET", "/api/tasks/list/1", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "List not found");
}

#[tokio::test]
async fn test_list_delete_cascades_to_tasks() {
    let app = spawn_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    create_list(&app, &token, json!({ "title": "Groceries" })).await;
    create_list(&app, &token, json!({ "title": "Work" })).await;
    create_task(&app, &token, json!({ "title": "Buy milk", "listId": 1 })).await;
    create_task(&app, &token, json!({ "title": "Buy eggs", "listId": 1 })).await;
    create_task(&app, &token, json!({ "title": "Send report", "listId": 2 })).await;

    let (status, body) = send_json(&app, "DELETE", "/api/lists/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        "List and associated tasks deleted successfully"
    );

    for id in [1, 2] {
        let uri = format!("/api/tasks/{id}");
        let (status, _) = send_json(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // The other list and its task survive
    let (_, remaining) = send_json(&app, "GET", "/api/tasks", Some(&token), None).await;
    let remaining = remaining.as_array().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["title"], "Send report");

    let (status, _) = send_json(&app, "GET", "/api/tasks/list/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_delete() {
    let app = spawn_app().await;
    let token = register(&app, "alice", "alice@example.com").await;

    create_list(&app, &token, json!({ "title": "Groceries" })).await;
    create_task(&app, &token, json!({ "title": "Buy milk", "listId": 1 })).await;

    let (status, body) = send_json(&app, "DELETE", "/api/tasks/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted successfully");

    let (status, _) = send_json(&app, "GET", "/api/tasks/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting again is a 404, not an error
    let (status, _) = send_json(&app, "DELETE", "/api/tasks/1", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
