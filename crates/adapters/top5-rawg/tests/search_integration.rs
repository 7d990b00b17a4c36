//! Search client tests against an in-process API double.

use std::collections::HashMap;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use serde_json::json;

use top5_rawg::{RawgClient, RawgError};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn search_sends_key_and_query() {
    let router = Router::new().route(
        "/api/games",
        get(|Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params.get("key").map(String::as_str), Some("k123"));
            assert_eq!(params.get("search").map(String::as_str), Some("chrono trigger"));
            assert_eq!(params.get("page_size").map(String::as_str), Some("10"));
            axum::Json(json!({
                "results": [
                    {"id": 7, "name": "Chrono Trigger", "released": "1995-03-11"},
                    {"id": 8, "name": "Chrono Cross"}
                ]
            }))
        }),
    );
    let base = serve(router).await;

    let client = RawgClient::with_base_url("k123", &base);
    let games = client.search("chrono trigger").await.unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].name, "Chrono Trigger");
    assert_eq!(games[0].release_year(), Some(1995));
    assert_eq!(games[1].year_label(), "Classic");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let router = Router::new().route(
        "/api/games",
        get(|| async { StatusCode::UNAUTHORIZED.into_response() }),
    );
    let base = serve(router).await;

    let client = RawgClient::with_base_url("bad-key", &base);
    let err = client.search("doom").await.unwrap_err();
    match err {
        RawgError::Status(status) => assert_eq!(status, StatusCode::UNAUTHORIZED),
        other => panic!("unexpected error: {other}"),
    }
}
