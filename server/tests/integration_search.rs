use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use docsearch_core::SearchEngine;
use docsearch_server::{router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;
use tower::ServiceExt;

fn build_tiny_corpus(dir: &std::path::Path) {
    fs::write(dir.join("1-cats.txt"), "Cats and Dogs\nThe cat sat on the mat. The dog barked.").unwrap();
    fs::write(dir.join("2-care.txt"), "Dog Care\nDogs need water and food daily.").unwrap();
    fs::write(dir.join("3-gold.txt"), "Gold Mining\nGold is a material found in rock.").unwrap();
}

fn sample_app(admin_token: Option<&str>) -> Router {
    let mut engine = SearchEngine::new();
    engine.add_document("Cats and Dogs", "The cat sat on the mat. The dog barked.").unwrap();
    engine.add_document("Dog Care", "Dogs need water and food daily.").unwrap();
    engine.add_document("Gold Mining", "Gold is a material found in rock.").unwrap();
    router(AppState::new(engine, admin_token.map(String::from)))
}

async fn call(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    call(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

#[tokio::test]
async fn search_returns_ranked_results() {
    let dir = tempdir().unwrap();
    build_tiny_corpus(dir.path());
    let app = docsearch_server::build_app(dir.path()).unwrap();

    let (status, json) = get(app, "/search?q=dog&k=5").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["doc_id"].as_u64().unwrap(), 1);
    assert_eq!(arr[1]["doc_id"].as_u64().unwrap(), 2);
    assert!(arr[0]["score"].is_number());
    assert_eq!(arr[1]["title"], "2-care - Dog Care");
}

#[tokio::test]
async fn title_search_has_no_scores() {
    let (status, json) = get(sample_app(None), "/search?q=gold&field=title").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 1);
    let hit = &json["results"][0];
    assert_eq!(hit["doc_id"], 3);
    assert!(hit.get("score").is_none());
    assert!(hit["snippet"].as_str().unwrap().contains("<em>Gold</em>"));
}

#[tokio::test]
async fn stopword_query_is_empty_not_an_error() {
    let (status, json) = get(sample_app(None), "/search?q=the+and&method=cosine-similarity").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_hits"], 0);
}

#[tokio::test]
async fn doc_lookup_and_not_found() {
    let (status, json) = get(sample_app(None), "/doc/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Dog Care");
    let (status, _) = get(sample_app(None), "/doc/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn adding_documents_requires_the_admin_token() {
    let body = r#"[{"title": "Silver", "content": "Silver is a material."}]"#;
    let request = |token: Option<&str>| {
        let mut req = Request::post("/documents").header("content-type", "application/json");
        if let Some(t) = token {
            req = req.header("X-ADMIN-TOKEN", t);
        }
        req.body(Body::from(body)).unwrap()
    };

    let (status, _) = call(sample_app(None), request(Some("secret"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(sample_app(Some("secret")), request(Some("wrong"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let app = sample_app(Some("secret"));
    let (status, json) = call(app.clone(), request(Some("secret"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ids"], serde_json::json!([4]));
    let (_, json) = get(app, "/search?q=silver&field=title").await;
    assert_eq!(json["results"][0]["doc_id"], 4);
}
