//! Pre-handler input validation.

use lambda_http::http::StatusCode;
use serde_json::{Map, Value};

use crate::{
    config::RouteConfig,
    exchange::{Incoming, Outgoing},
    schema::ValidationError,
};

/// Check the request's query, then its body, against the route's schemas.
///
/// On success the validated (possibly coerced) values replace the originals
/// on `req` and `true` is returned. On the first failure a 400 response is
/// sent and `false` is returned; a failing query means the body is never
/// looked at.
pub async fn validate<Req, Res>(
    req: &mut Req,
    res: &mut Res,
    route: &RouteConfig<Req, Res>,
) -> bool
where
    Req: Incoming,
    Res: Outgoing,
{
    let Some(validation) = &route.validation else {
        return true;
    };

    if let Some(schema) = &validation.query {
        match schema.validate(req.query().clone()).await {
            Ok(query) => req.set_query(query),
            Err(err) => {
                reject(res, "Invalid query parameters", &err, route.sensitive);
                return false;
            }
        }
    }

    if let Some(schema) = &validation.body {
        match schema.validate(req.body().clone()).await {
            Ok(body) => req.set_body(body),
            Err(err) => {
                reject(res, "Invalid request body", &err, route.sensitive);
                return false;
            }
        }
    }

    true
}

fn reject<Res: Outgoing>(res: &mut Res, message: &str, err: &ValidationError, sensitive: bool) {
    tracing::debug!(reason = %err, sensitive, "{message}");

    let mut doc = Map::new();
    doc.insert("error".to_owned(), Value::Bool(true));
    doc.insert("message".to_owned(), message.into());

    if !sensitive {
        if let Some(d) = err.first_detail() {
            doc.insert("data".to_owned(), d.clone());
        }
    }

    res.set_status(StatusCode::BAD_REQUEST);
    res.send_json(&Value::Object(doc));
}
