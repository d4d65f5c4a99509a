//! The sample "hello" function served by the bundled executables.
//!
//! `GET` lists greetings a page at a time; `POST` creates one. It exists to
//! show what a function definition looks like, and to have something real to
//! deploy when testing the Lambda plumbing.

use futures_util::future::BoxFuture;
use lambda_http::{http::StatusCode, Error};
use once_cell::sync::Lazy;
use serde_json::json;

use crate::{
    config::{FunctionConfig, RouteConfig, Validation},
    exchange::{FuncRequest, FuncResponse, Incoming, Outgoing},
    handler::handler_fn,
    method::Method,
    schema::{Field, ObjectSchema},
};

const GREETINGS: [&str; 5] = ["Hello", "Bonjour", "Hola", "Ciao", "Hallo"];

static LIST_QUERY: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new()
        .field("page", Field::integer().default(1))
        .field("per_page", Field::integer().default(2))
});

static CREATE_BODY: Lazy<ObjectSchema> = Lazy::new(|| {
    ObjectSchema::new()
        .field("name", Field::string().required())
        .field("shout", Field::boolean().default(false))
});

/// Build the function. Creation is marked sensitive, so schema details never
/// echo the submitted body back.
pub fn config() -> FunctionConfig {
    FunctionConfig::new()
        .route(
            Method::Get,
            RouteConfig::new(handler_fn(list))
                .validation(Validation::new().query(LIST_QUERY.clone())),
        )
        .route(
            Method::Post,
            RouteConfig::new(handler_fn(create))
                .validation(Validation::new().body(CREATE_BODY.clone()))
                .sensitive(),
        )
}

fn list<'a>(
    req: &'a mut FuncRequest,
    res: &'a mut FuncResponse,
) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        // Both are integers after validation; clamp to something sane.
        let page = req.query()["page"].as_i64().unwrap_or(1).max(1) as usize;
        let per_page = req.query()["per_page"].as_i64().unwrap_or(2).clamp(1, 10) as usize;

        let items: Vec<_> = GREETINGS
            .iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        res.send_json(&json!({
            "page": page,
            "total": GREETINGS.len(),
            "items": items,
        }));
        Ok(())
    })
}

fn create<'a>(
    req: &'a mut FuncRequest,
    res: &'a mut FuncResponse,
) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        let name = req.body()["name"].as_str().unwrap_or_default();
        let mut message = format!("{}, {}!", GREETINGS[0], name);

        if req.body()["shout"].as_bool() == Some(true) {
            message = message.to_uppercase();
        }

        res.set_status(StatusCode::CREATED);
        res.send_json(&json!({ "error": false, "message": message }));
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::func::func;

    async fn call(req: FuncRequest) -> FuncResponse {
        let mut req = req;
        let mut res = FuncResponse::new();
        func(&mut req, &mut res, &config()).await.unwrap();
        res
    }

    #[tokio::test]
    async fn lists_with_paging() {
        let res = call(FuncRequest::new("GET").with_query(json!({ "page": "2" }))).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.json(),
            Some(&json!({ "page": 2, "total": 5, "items": ["Hola", "Ciao"] }))
        );

        let res = call(FuncRequest::new("GET").with_query(json!({ "page": "x" }))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn creates_greetings() {
        let req = FuncRequest::new("POST").with_body(json!({ "name": "Annie", "shout": "true" }));
        let res = call(req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.json().unwrap()["message"], "HELLO, ANNIE!");

        let res = call(FuncRequest::new("POST").with_body(json!({}))).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(res.json().unwrap().get("data").is_none());
    }
}
