//! End-to-end checks through the Lambda adapters, the way the deployed
//! executables see requests.

use lambda_func::{hello, BareEvent, CorsConfig, Services};
use lambda_http::{
    http::{self, StatusCode},
    Body, Request, RequestExt, Response,
};
use serde_json::{json, Value};
use std::collections::HashMap;

fn services() -> Services {
    Services::with_config(
        hello::config()
            .cors(CorsConfig::new("https://plates.example.org").allowed_headers(["Content-Type"]))
            .caching(60),
    )
}

fn request(method: &str, query: &[(&str, &str)], body: Option<Value>) -> Request {
    let mut builder = http::Request::builder().method(method).uri("/api/hello");

    let body = match body {
        Some(v) => {
            builder = builder.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::Empty,
    };

    let query: HashMap<String, String> = query
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    builder.body(body).unwrap().with_query_string_parameters(query)
}

fn json_body(res: &Response<Body>) -> Value {
    match res.body() {
        Body::Text(t) => serde_json::from_str(t).unwrap(),
        _ => panic!("expected a text body"),
    }
}

#[tokio::test]
async fn coerced_query_reaches_handler() {
    let svcs = services();
    let res = svcs
        .dispatch_http(request("GET", &[("page", "3"), ("per_page", "2")], None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        json_body(&res),
        json!({ "page": 3, "total": 5, "items": ["Hallo"] })
    );
    assert_eq!(
        res.headers()["cache-control"],
        "max-age=0, s-maxage=60, stale-while-revalidate"
    );
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "https://plates.example.org"
    );
    assert_eq!(res.headers()["content-type"], "application/json");
}

#[tokio::test]
async fn invalid_query_is_a_bad_request() {
    let res = services()
        .dispatch_http(request("get", &[("page", "abc")], None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let doc = json_body(&res);
    assert_eq!(doc["error"], true);
    assert_eq!(doc["message"], "Invalid query parameters");
    assert_eq!(doc["data"]["path"], json!(["page"]));
}

#[tokio::test]
async fn sensitive_body_errors_hide_data() {
    let res = services()
        .dispatch_http(request("POST", &[], Some(json!({ "name": 12 }))))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(&res),
        json!({ "error": true, "message": "Invalid request body" })
    );
}

#[tokio::test]
async fn unmapped_method_is_not_found() {
    let res = services()
        .dispatch_http(request("DELETE", &[], Some(json!({ "id": 1 }))))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(&res),
        json!({ "error": false, "message": "Not found" })
    );
    assert_eq!(
        res.headers()["cache-control"],
        "max-age=0, s-maxage=60, stale-while-revalidate"
    );
}

#[tokio::test]
async fn preflight_is_answered_empty() {
    let res = services()
        .dispatch_http(request("OPTIONS", &[], None))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(matches!(res.body(), Body::Empty));
    assert_eq!(
        res.headers()["access-control-allow-origin"],
        "https://plates.example.org"
    );
    assert_eq!(res.headers()["access-control-allow-methods"], "GET, POST");
    assert_eq!(res.headers()["access-control-allow-headers"], "Content-Type");
    assert_eq!(res.headers()["access-control-allow-credentials"], "false");
}

#[tokio::test]
async fn bare_events_round_trip() {
    let svcs = Services::with_config(hello::config());

    let event: BareEvent = serde_json::from_value(json!({
        "method": "POST",
        "body": { "name": "Williamina" },
    }))
    .unwrap();
    let res = serde_json::to_value(svcs.dispatch_bare(event).await.unwrap()).unwrap();

    assert_eq!(res["statusCode"], 201);
    assert_eq!(res["body"]["message"], "Hello, Williamina!");

    let res = svcs.dispatch_bare(BareEvent::default()).await.unwrap();
    assert_eq!(res.status_code, 404);
    assert!(res.headers.is_empty());
}
