//! "Proxy event" version of the function server.
//!
//! This executable expects to be invoked through AWS API Gateway's "proxy
//! event" protocol, which `lambda_http` maps onto ordinary HTTP requests and
//! responses. The "bare" version is simpler for local testing.

use lambda_func::Services;
use lambda_http::{run, service_fn, Error, Request};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init()?;
    let ref_svcs = &svcs;

    run(service_fn(|req: Request| async move {
        ref_svcs.dispatch_http(req).await
    }))
    .await?;
    Ok(())
}
