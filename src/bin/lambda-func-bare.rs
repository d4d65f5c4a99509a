//! "Bare" version of the function server.
//!
//! Each invocation payload is a JSON [`BareEvent`] describing the request,
//! and the reply is the JSON [`BareResponse`]. This is the easy one to poke
//! at locally. For the cloud deployment, use the "proxy event" version.

use lambda_func::{BareEvent, Services};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init()?;
    let ref_svcs = &svcs;

    run(service_fn(|event: LambdaEvent<BareEvent>| async move {
        let (payload, _context) = event.into_parts();
        ref_svcs.dispatch_bare(payload).await
    }))
    .await?;
    Ok(())
}
