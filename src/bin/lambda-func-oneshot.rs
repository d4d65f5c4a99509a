//! "Oneshot" version of the function server.
//!
//! This executable serves one request described on the command line and
//! prints the JSON response:
//!
//! ```text
//! lambda-func-oneshot GET '{"query": {"page": "2"}}'
//! ```

use lambda_func::{BareEvent, Services};
use lambda_runtime::Error;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut args = env::args();
    args.next(); // skip argv[0]

    let method = args.next().ok_or_else(|| -> Error {
        "first argument should be the HTTP method (GET, POST, ...)".into()
    })?;

    let mut event: BareEvent = match args.next() {
        Some(json_text) => serde_json::from_str(&json_text)?,
        None => BareEvent::default(),
    };
    event.method = Some(method);

    let svcs = Services::init()?;
    let result = svcs.dispatch_bare(event).await?;

    serde_json::to_writer(std::io::stdout().lock(), &result)?;
    Ok(())
}
