use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use models::db::{connect_with_config, DatabaseConfig};
use server::{routes, state::ServerState};

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app(per_page: u64) -> anyhow::Result<(Router, TempDir)> {
    let db = connect_with_config(&DatabaseConfig::in_memory_sqlite()).await?;
    migration::Migrator::up(&db, None).await?;
    let media = tempfile::tempdir()?;
    let state = ServerState::new(db, media.path(), per_page);
    Ok((routes::build_router(state, cors()), media))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder.header("content-type", "application/json").body(Body::from(v.to_string()))?,
        None => builder.body(Body::empty())?,
    };
    let res = app.clone().oneshot(req).await?;
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

async fn create_user(app: &Router, username: &str, location: &str) -> anyhow::Result<i64> {
    let (status, body) = send(app, "POST", "/user/create/", Some(json!({
        "username": username,
        "first_name": "Anna",
        "last_name": "Smirnova",
        "role": "member",
        "age": 28,
        "locations": location,
        "password": "pa55word"
    })))
    .await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    Ok(body["id"].as_i64().unwrap())
}

#[tokio::test]
async fn health_on_root_and_health() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    for uri in ["/", "/health"] {
        let (status, body) = send(&app, "GET", uri, None).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }
    Ok(())
}

#[tokio::test]
async fn ad_crud_flow() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    let author = create_user(&app, "anna", "Moscow").await?;
    let (status, cat) = send(&app, "POST", "/cat/create/", Some(json!({"name": "Bikes"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let cat_id = cat["id"].as_i64().unwrap();

    let (status, created) = send(&app, "POST", "/ad/create/", Some(json!({
        "name": "Road bike",
        "author": author,
        "price": 15000,
        "desc": "almost new",
        "category": cat_id,
        "is_published": false
    })))
    .await?;
    assert_eq!(status, StatusCode::OK, "{created}");
    let ad_id = created["id"].as_i64().unwrap();
    assert_eq!(created["author_id"], author);
    assert_eq!(created["category_id"], cat_id);
    assert_eq!(created["desc"], "almost new");

    let (status, detail) = send(&app, "GET", &format!("/ad/{ad_id}/"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["author"], author);
    assert_eq!(detail["category"], cat_id);
    assert_eq!(detail["image"], Value::Null);
    assert_eq!(detail["is_published"], false);

    let (status, updated) = send(&app, "PATCH", &format!("/ad/{ad_id}/update/"), Some(json!({
        "name": "Road bike XL",
        "author_id": author,
        "price": 14000,
        "desc": "used twice",
        "category_id": cat_id,
        "is_published": true
    })))
    .await?;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["name"], "Road bike XL");
    assert_eq!(updated["author"], "anna");
    assert_eq!(updated["author_id"], author);
    assert_eq!(updated["price"], 14000);
    assert_eq!(updated["is_published"], true);

    let (status, list) = send(&app, "GET", "/ad/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
    assert_eq!(list["num_pages"], 1);
    assert_eq!(list["items"][0], json!({"id": ad_id, "name": "Road bike XL", "author_id": author, "price": 14000}));

    let (status, body) = send(&app, "DELETE", &format!("/ad/{ad_id}/delete/"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&app, "GET", &format!("/ad/{ad_id}/"), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn ad_with_unknown_references_is_rejected() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    let (status, body) = send(&app, "POST", "/ad/create/", Some(json!({
        "name": "Ghost", "author": 404, "price": 1, "desc": null, "category": null
    })))
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid Reference");

    let author = create_user(&app, "ivan", "Kazan").await?;
    let (status, body) = send(&app, "POST", "/ad/create/", Some(json!({
        "name": "Ghost", "author": author, "price": 1, "category": 77
    })))
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("category"));
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_404() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    let cases = [
        ("GET", "/ad/999/", None),
        ("PATCH", "/ad/999/update/", Some(json!({"price": 1}))),
        ("DELETE", "/ad/999/delete/", None),
        ("GET", "/user/999/", None),
        ("PATCH", "/user/999/update/", Some(json!({"age": 1}))),
        ("DELETE", "/user/999/delete/", None),
        ("GET", "/cat/999/", None),
        ("DELETE", "/location/999/delete/", None),
    ];
    for (method, uri, body) in cases {
        let (status, json) = send(&app, method, uri, body).await?;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert!(json.get("message").is_some());
    }
    Ok(())
}

#[tokio::test]
async fn ad_pages_follow_page_query() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    let author = create_user(&app, "seller", "Omsk").await?;
    for i in 0..12 {
        let (status, _) = send(&app, "POST", "/ad/create/", Some(json!({
            "name": format!("item {i}"), "author": author, "price": i * 10
        })))
        .await?;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, first) = send(&app, "GET", "/ad/", None).await?;
    assert_eq!(first["total"], 12);
    assert_eq!(first["num_pages"], 2);
    assert_eq!(first["items"].as_array().unwrap().len(), 10);
    assert_eq!(first["items"][0]["price"], 110);

    let (_, second) = send(&app, "GET", "/ad/?page=2", None).await?;
    assert_eq!(second["items"].as_array().unwrap().len(), 2);
    assert_eq!(second["items"][1]["price"], 0);

    let (_, junk) = send(&app, "GET", "/ad/?page=abc", None).await?;
    assert_eq!(junk["items"][0]["price"], 110);

    let (_, past_end) = send(&app, "GET", "/ad/?page=50", None).await?;
    assert_eq!(past_end["items"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn user_flow_reuses_locations() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    let (status, loc) = send(&app, "POST", "/location/create/", Some(json!({"name": "Sochi", "lat": 43.6, "lng": 39.7}))).await?;
    assert_eq!(status, StatusCode::OK);

    let id = create_user(&app, "boris", "Sochi").await?;
    let (_, detail) = send(&app, "GET", &format!("/user/{id}/"), None).await?;
    assert_eq!(detail["locations"], "Sochi");
    assert_eq!(detail["role"], "member");
    assert!(detail.get("password").is_none());

    let (_, loc_after) = send(&app, "GET", &format!("/location/{}/", loc["id"]), None).await?;
    assert_eq!(loc_after["lat"], 43.6);

    let (status, updated) = send(&app, "PATCH", &format!("/user/{id}/update/"), Some(json!({
        "username": "boris_k",
        "first_name": "Boris",
        "last_name": "K",
        "password": "n3wpass",
        "age": 41,
        "locations": "Yalta"
    })))
    .await?;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated, json!({
        "id": id, "username": "boris_k", "first_name": "Boris", "last_name": "K", "age": 41, "locations": "Yalta"
    }));

    let (_, locations) = send(&app, "GET", "/location/", None).await?;
    assert_eq!(locations.as_array().unwrap().len(), 2);

    let (_, list) = send(&app, "GET", "/user/", None).await?;
    assert_eq!(list["total"], 1);
    assert_eq!(list["items"][0]["total_ads"], 0);
    assert_eq!(list["items"][0]["locations"], "Yalta");

    let (status, _) = send(&app, "DELETE", &format!("/user/{id}/delete/"), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = send(&app, "GET", "/user/", None).await?;
    assert_eq!(list["total"], 0);
    assert_eq!(list["num_pages"], 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_conflict() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    create_user(&app, "dup", "Perm").await?;
    let (status, body) = send(&app, "POST", "/user/create/", Some(json!({
        "username": "dup", "locations": "Perm", "password": "x"
    })))
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
    Ok(())
}

#[tokio::test]
async fn malformed_json_gets_json_error() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    let req = Request::builder()
        .method("POST")
        .uri("/cat/create/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))?;
    let res = app.clone().oneshot(req).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["error"], "Invalid Body");

    let (status, body) = send(&app, "POST", "/cat/create/", Some(json!({"title": "wrong field"}))).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid Body");
    Ok(())
}

#[tokio::test]
async fn category_and_location_crud() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    let (_, cat) = send(&app, "POST", "/cat/create/", Some(json!({"name": "Pets"}))).await?;
    let cat_id = cat["id"].as_i64().unwrap();
    let (status, renamed) = send(&app, "PATCH", &format!("/cat/{cat_id}/update/"), Some(json!({"name": "Animals"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Animals");
    let (_, cats) = send(&app, "GET", "/cat/", None).await?;
    assert_eq!(cats, json!([{"id": cat_id, "name": "Animals"}]));
    let (status, _) = send(&app, "DELETE", &format!("/cat/{cat_id}/delete/"), None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/location/create/", Some(json!({"name": "Pole", "lat": 95.0, "lng": 0.0}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Error");

    let (_, loc) = send(&app, "POST", "/location/create/", Some(json!({"name": "Tula"}))).await?;
    let loc_id = loc["id"].as_i64().unwrap();
    let (status, moved) = send(&app, "PATCH", &format!("/location/{loc_id}/update/"), Some(json!({"lat": 54.2, "lng": 37.6}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["name"], "Tula");
    assert_eq!(moved["lng"], 37.6);
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    let (status, doc) = send(&app, "GET", "/api-docs/openapi.json", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/ad/{id}/update/").is_some());
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_gets_json_error() -> anyhow::Result<()> {
    let (app, _media) = build_app(10).await?;
    for (method, uri) in [("GET", "/ad/abc/"), ("DELETE", "/user/x1/delete/"), ("GET", "/location/1.5/")] {
        let (status, body) = send(&app, method, uri, None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(body["error"], "Invalid Path");
        assert!(body["message"].is_string());
    }
    Ok(())
}
