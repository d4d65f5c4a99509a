//! Method dispatch.

use lambda_http::{http::StatusCode, Error};

use crate::{
    config::FunctionConfig,
    exchange::{Incoming, Outgoing},
    handler::Handler,
    headers,
    method::{Method, MethodTable},
    notfound::not_found,
    validate::validate,
};

/// Serve one request according to `config`.
///
/// CORS headers go on first (answering preflight `OPTIONS` requests outright),
/// then the caching header, and then the route for the request method runs,
/// after its validation passes. Unmatched methods and invalid input are
/// answered here, so the only error that can come back is one raised by the
/// route handler itself.
pub async fn func<Req, Res>(
    req: &mut Req,
    res: &mut Res,
    config: &FunctionConfig<Req, Res>,
) -> Result<(), Error>
where
    Req: Incoming + Send,
    Res: Outgoing + Send,
{
    let method = Method::from_wire(req.method());

    if let Some(cors) = &config.cors {
        headers::apply_cors(res, cors, config.methods.methods());

        if method == Some(Method::Options) {
            tracing::debug!("answering CORS preflight");
            res.set_status(StatusCode::OK);
            res.send_empty();
            return Ok(());
        }
    }

    if let Some(caching) = &config.caching {
        headers::apply_caching(res, caching);
    }

    let Some(route) = method.and_then(|m| config.get_route(m)) else {
        tracing::debug!(method = req.method(), "no route for request method");
        not_found(res);
        return Ok(());
    };

    if validate(req, res, route).await {
        route.handler.call(req, res).await
    } else {
        Ok(())
    }
}

/// Dispatch by method alone, with no validation, CORS or caching.
pub async fn methods<Req, Res>(
    req: &mut Req,
    res: &mut Res,
    handlers: &MethodTable<Box<dyn Handler<Req, Res>>>,
) -> Result<(), Error>
where
    Req: Incoming + Send,
    Res: Outgoing + Send,
{
    match Method::from_wire(req.method()).and_then(|m| handlers.get(m)) {
        Some(handler) => handler.call(req, res).await,
        None => {
            not_found(res);
            Ok(())
        }
    }
}
