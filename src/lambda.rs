//! Adapters between the Lambda event shapes and [`FuncRequest`]/[`FuncResponse`].
//!
//! There are two ways a function gets invoked. Behind API Gateway, requests
//! arrive as "proxy events", which `lambda_http` already turns into ordinary
//! `http` requests; see [`serve_http`]. For local testing and direct Lambda
//! invocations, a plain JSON document describing the request is simpler; see
//! [`BareEvent`] and [`serve_bare`].

use lambda_http::{
    http::header::CONTENT_TYPE, Body, Error, Request, RequestExt, RequestPayloadExt, Response,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::{
    config::FunctionConfig,
    exchange::{FuncRequest, FuncResponse, SentBody},
    func::func,
};

impl From<Request> for FuncRequest {
    fn from(req: Request) -> Self {
        let mut query = Map::new();

        for (key, value) in req.query_string_parameters().iter() {
            let value = Value::String(value.to_owned());

            // Repeated keys collect into an array, as `?a=1&a=2` should.
            match query.get_mut(key) {
                None => {
                    query.insert(key.to_owned(), value);
                }
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            }
        }

        let body = match req.payload::<Value>() {
            Ok(Some(v)) => v,
            Ok(None) => raw_body(req.body()),
            Err(e) => {
                tracing::warn!("unparseable request payload, passing it through as text: {e}");
                raw_body(req.body())
            }
        };

        FuncRequest::new(req.method().as_str())
            .with_query(Value::Object(query))
            .with_body(body)
            .with_headers(req.headers().clone())
    }
}

fn raw_body(body: &Body) -> Value {
    match body {
        Body::Empty => Value::Null,
        Body::Text(t) if t.is_empty() => Value::Null,
        Body::Text(t) => Value::String(t.clone()),
        Body::Binary(b) if b.is_empty() => Value::Null,
        Body::Binary(b) => Value::String(String::from_utf8_lossy(b).into_owned()),
    }
}

impl FuncResponse {
    /// Convert into the response type that `lambda_http` sends back to API
    /// Gateway.
    pub fn into_lambda(self) -> Result<Response<Body>, Error> {
        let (status, headers, body) = self.into_parts();
        let mut builder = Response::builder().status(status);

        let body = match body {
            Some(SentBody::Json(v)) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    builder = builder.header(CONTENT_TYPE, "application/json");
                }

                Body::Text(serde_json::to_string(&v)?)
            }
            Some(SentBody::Empty) | None => Body::Empty,
        };

        if let Some(h) = builder.headers_mut() {
            h.extend(headers);
        }

        Ok(builder.body(body)?)
    }
}

/// Serve one API Gateway request.
pub async fn serve_http(req: Request, config: &FunctionConfig) -> Result<Response<Body>, Error> {
    let mut req = FuncRequest::from(req);
    let mut res = FuncResponse::new();
    func(&mut req, &mut res, config).await?;
    res.into_lambda()
}

/// A request described as plain JSON:
///
/// ```json
/// {"method": "GET", "query": {"page": "2"}, "body": null}
/// ```
///
/// Every member is optional. A missing method is routed as "not found".
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BareEvent {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub query: Value,
    #[serde(default)]
    pub body: Value,
}

impl From<BareEvent> for FuncRequest {
    fn from(event: BareEvent) -> Self {
        let req = match event.method {
            Some(m) => FuncRequest::new(m),
            None => FuncRequest::without_method(),
        };

        let query = match event.query {
            Value::Null => Value::Object(Map::new()),
            q => q,
        };

        req.with_query(query).with_body(event.body)
    }
}

/// The JSON reply to a [`BareEvent`], in the same shape API Gateway uses for
/// proxy responses.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BareResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl From<FuncResponse> for BareResponse {
    fn from(res: FuncResponse) -> Self {
        let (status, headers, body) = res.into_parts();

        let headers = headers
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();

        let body = match body {
            Some(SentBody::Json(v)) => Some(v),
            Some(SentBody::Empty) | None => None,
        };

        BareResponse {
            status_code: status.as_u16(),
            headers,
            body,
        }
    }
}

/// Serve one bare JSON invocation.
pub async fn serve_bare(event: BareEvent, config: &FunctionConfig) -> Result<BareResponse, Error> {
    let mut req = FuncRequest::from(event);
    let mut res = FuncResponse::new();
    func(&mut req, &mut res, config).await?;
    Ok(res.into())
}
