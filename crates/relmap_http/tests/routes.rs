use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use relmap_core::db::open_db_in_memory;
use relmap_http::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    router(Arc::new(AppState::new(open_db_in_memory().unwrap())))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn student_with_laptop_is_saved_and_linked() {
    let app = app();
    let (status, saved) = send(
        &app,
        Method::POST,
        "/student/add",
        Some(json!({ "name": "Alice", "laptop": { "name": "Dell", "price": 50000 } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let id = saved["id"].as_i64().unwrap();
    assert_ne!(id, 0);
    assert_ne!(saved["laptop"]["lapId"].as_i64().unwrap(), 0);
    assert_eq!(saved["laptop"]["name"], "Dell");
    assert_eq!(saved["laptop"]["price"], 50000);
    assert_eq!(saved["laptop"]["student"]["id"], saved["id"]);
    assert_eq!(saved["laptop"]["student"]["key"], saved["key"]);

    let (status, loaded) = send(&app, Method::GET, &format!("/student/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn missing_student_is_not_found() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/student/999", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    assert!(body.get("name").is_none());
}

#[tokio::test]
async fn all_students_lists_every_saved_student() {
    let app = app();
    for name in ["A", "B"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/student/add",
            Some(json!({ "name": name })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, Method::GET, "/student/all", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|student| student["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[tokio::test]
async fn lib_student_is_registered_on_each_library() {
    let app = app();
    let (status, saved) = send(
        &app,
        Method::POST,
        "/add",
        Some(json!({
            "name": "Gil",
            "libraries": [
                { "book": "Dune", "valid": true },
                { "book": "Emma", "valid": false }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let libraries = saved["libraries"].as_array().unwrap();
    assert_eq!(libraries.len(), 2);
    for library in libraries {
        assert_eq!(library["students"], json!([saved["key"].clone()]));

        let library_id = library["id"].as_i64().unwrap();
        let (status, stored) =
            send(&app, Method::GET, &format!("/library/{library_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored["students"], json!([saved["key"].clone()]));
    }

    let id = saved["id"].as_i64().unwrap();
    let (status, loaded) = send(&app, Method::GET, &format!("/lib-student/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn repeated_library_is_linked_once() {
    let app = app();
    let key = "6f2c7a9e-1d4b-4c8e-9a3f-2b5d7e9c1a40";
    let (status, saved) = send(
        &app,
        Method::POST,
        "/add",
        Some(json!({
            "name": "Rae",
            "libraries": [
                { "key": key, "book": "Dune", "valid": true },
                { "key": key, "book": "Dune", "valid": true }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let libraries = saved["libraries"].as_array().unwrap();
    assert_eq!(libraries.len(), 1);
    assert_eq!(libraries[0]["key"], key);

    let library_id = libraries[0]["id"].as_i64().unwrap();
    let (status, second) = send(
        &app,
        Method::POST,
        "/add",
        Some(json!({ "name": "Sol", "libraries": [{ "id": library_id }, { "id": library_id }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["libraries"].as_array().unwrap().len(), 1);

    let id = second["id"].as_i64().unwrap();
    let (_, loaded) = send(&app, Method::GET, &format!("/lib-student/{id}"), None).await;
    assert_eq!(loaded, second);
    let (_, library) = send(&app, Method::GET, &format!("/library/{library_id}"), None).await;
    assert_eq!(library["students"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_library_reference_is_not_found() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/add",
        Some(json!({ "name": "Mo", "libraries": [{ "id": 42 }] })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn person_with_passport_round_trips() {
    let app = app();
    let (status, saved) = send(
        &app,
        Method::POST,
        "/person/add",
        Some(json!({ "name": "Vera", "passport": { "name": "X-100", "valid": true } })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["passport"]["person"]["id"], saved["id"]);
    assert_eq!(saved["passport"]["person"]["key"], saved["key"]);

    let id = saved["id"].as_i64().unwrap();
    let (status, loaded) = send(&app, Method::GET, &format!("/person/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn owner_laptops_follow_tri_state_updates() {
    let app = app();
    let (status, saved) = send(
        &app,
        Method::POST,
        "/owner/add",
        Some(json!({
            "name": "Ada",
            "laptops": [
                { "lapName": "x1", "lapModel": "gen9", "brand": "Lenovo", "lapPrice": 1200 },
                { "lapName": "xps", "lapModel": "13", "brand": "Dell", "lapPrice": 1100 }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = saved["id"].as_i64().unwrap();
    for laptop in saved["laptops"].as_array().unwrap() {
        assert_eq!(laptop["owner"], json!({ "id": id, "key": saved["key"].clone() }));
    }

    let uri = format!("/owner/{id}/laptops");
    let (status, unchanged) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["laptops"], saved["laptops"]);

    let (status, replaced) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({ "laptops": [{ "lapName": "mba", "brand": "Apple" }] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let laptops = replaced["laptops"].as_array().unwrap();
    assert_eq!(laptops.len(), 1);
    assert_eq!(laptops[0]["lapName"], "mba");
    assert_eq!(laptops[0]["owner"]["id"], id);

    let (status, cleared) = send(&app, Method::PUT, &uri, Some(json!({ "laptops": [] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["laptops"], json!([]));

    let (status, _) = send(
        &app,
        Method::PUT,
        "/owner/999/laptops",
        Some(json!({ "laptops": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn persisted_root_is_conflict() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/student/add",
        Some(json!({ "id": 5, "name": "Again" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/student/add")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());

    let (status, _) = send(&app, Method::POST, "/student/add", Some(json!({ "laptop": null }))).await;
    assert!(status.is_client_error());

    let (status, _) = send(&app, Method::GET, "/student/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
