//! The request/response capabilities the dispatcher works against.
//!
//! Every hosting surface (API Gateway proxy events, bare JSON invocations,
//! the command line) gets converted into a [`FuncRequest`] on the way in and
//! a [`FuncResponse`] on the way out; see the `lambda` module for those
//! adapters. The core itself only ever talks to the [`Incoming`] and
//! [`Outgoing`] traits.

use lambda_http::http::{
    header::{HeaderName, HeaderValue},
    HeaderMap, StatusCode,
};
use serde_json::Value;

/// What the dispatcher needs to read from (and rewrite on) a request.
pub trait Incoming {
    /// The raw method string, if the host provided one.
    fn method(&self) -> Option<&str>;

    fn query(&self) -> &Value;

    fn set_query(&mut self, query: Value);

    fn body(&self) -> &Value;

    fn set_body(&mut self, body: Value);
}

/// What the dispatcher needs to be able to do to a response.
pub trait Outgoing {
    fn set_status(&mut self, status: StatusCode);

    fn set_header(&mut self, name: &str, value: &str);

    fn send_json(&mut self, body: &Value);

    fn send_empty(&mut self);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FuncRequest {
    method: Option<String>,
    query: Value,
    body: Value,
    headers: HeaderMap,
}

impl FuncRequest {
    /// Create a request with an empty query object and a `null` body.
    pub fn new<S: Into<String>>(method: S) -> Self {
        FuncRequest {
            method: Some(method.into()),
            query: Value::Object(Default::default()),
            body: Value::Null,
            headers: HeaderMap::new(),
        }
    }

    /// A request whose host did not report any method at all.
    pub fn without_method() -> Self {
        FuncRequest {
            method: None,
            ..FuncRequest::new("")
        }
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Request headers, for handlers that want them. The dispatcher ignores
    /// them.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

impl Incoming for FuncRequest {
    fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    fn query(&self) -> &Value {
        &self.query
    }

    fn set_query(&mut self, query: Value) {
        self.query = query;
    }

    fn body(&self) -> &Value {
        &self.body
    }

    fn set_body(&mut self, body: Value) {
        self.body = body;
    }
}

/// The body that was emitted on a [`FuncResponse`].
#[derive(Clone, Debug, PartialEq)]
pub enum SentBody {
    Json(Value),
    Empty,
}

/// A buffered response. Only the first body write takes effect.
#[derive(Clone, Debug)]
pub struct FuncResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<SentBody>,
}

impl Default for FuncResponse {
    fn default() -> Self {
        FuncResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl FuncResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The emitted body, or `None` if nothing has been sent yet.
    pub fn body(&self) -> Option<&SentBody> {
        self.body.as_ref()
    }

    /// The emitted JSON body, if one was sent.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            Some(SentBody::Json(v)) => Some(v),
            _ => None,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.body.is_some()
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, Option<SentBody>) {
        (self.status, self.headers, self.body)
    }

    fn send(&mut self, body: SentBody) {
        if self.body.is_some() {
            tracing::warn!("response already sent; dropping second body write");
            return;
        }

        self.body = Some(body);
    }
}

impl Outgoing for FuncResponse {
    fn set_status(&mut self, status: StatusCode) {
        if self.is_sent() {
            tracing::warn!(%status, "response already sent; ignoring status change");
            return;
        }

        self.status = status;
    }

    fn set_header(&mut self, name: &str, value: &str) {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(name, "ignoring invalid response header name");
                return;
            }
        };

        let value = match HeaderValue::from_str(value) {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(%name, "ignoring invalid response header value");
                return;
            }
        };

        self.headers.insert(name, value);
    }

    fn send_json(&mut self, body: &Value) {
        self.send(SentBody::Json(body.clone()));
    }

    fn send_empty(&mut self) {
        self.send(SentBody::Empty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_first_body_is_kept() {
        let mut res = FuncResponse::new();
        res.set_status(StatusCode::NOT_FOUND);
        res.send_json(&json!({ "first": true }));
        res.set_status(StatusCode::OK);
        res.send_empty();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.json(), Some(&json!({ "first": true })));
    }

    #[test]
    fn headers_overwrite_and_skip_invalid() {
        let mut res = FuncResponse::new();
        res.set_header("Cache-Control", "no-store");
        res.set_header("cache-control", "max-age=10");
        res.set_header("bad header", "x");
        res.set_header("x-ok", "line\nbreak");

        assert_eq!(res.header("cache-control"), Some("max-age=10"));
        assert_eq!(res.headers().len(), 1);
    }

    #[test]
    fn new_request_defaults() {
        let req = FuncRequest::new("GET");
        assert_eq!(req.method(), Some("GET"));
        assert_eq!(req.query(), &json!({}));
        assert_eq!(req.body(), &Value::Null);
        assert_eq!(FuncRequest::without_method().method(), None);
    }
}
