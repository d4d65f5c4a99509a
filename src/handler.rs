//! Route handlers.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use lambda_http::Error;

use crate::exchange::{FuncRequest, FuncResponse};

/// Produces the final response for a matched, validated request.
///
/// Errors are not turned into HTTP responses here: they go straight back to
/// the caller of the dispatcher, and from there to the Lambda runtime.
#[async_trait]
pub trait Handler<Req = FuncRequest, Res = FuncResponse>: Send + Sync {
    async fn call(&self, req: &mut Req, res: &mut Res) -> Result<(), Error>;
}

/// A [`Handler`] built from a plain function returning a boxed future. See
/// [`handler_fn`].
pub struct HandlerFn<F>(F);

/// Wrap a function into a [`Handler`]:
///
/// ```ignore
/// fn get<'a>(
///     req: &'a mut FuncRequest,
///     res: &'a mut FuncResponse,
/// ) -> BoxFuture<'a, Result<(), Error>> {
///     Box::pin(async move {
///         res.send_json(req.query());
///         Ok(())
///     })
/// }
///
/// let route = RouteConfig::new(handler_fn(get));
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F> {
    HandlerFn(f)
}

#[async_trait]
impl<F, Req, Res> Handler<Req, Res> for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut Req, &'a mut Res) -> BoxFuture<'a, Result<(), Error>> + Send + Sync,
    Req: Send,
    Res: Send,
{
    async fn call(&self, req: &mut Req, res: &mut Res) -> Result<(), Error> {
        (self.0)(req, res).await
    }
}
