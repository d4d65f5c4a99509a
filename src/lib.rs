//! Method dispatch and input validation for Lambda-hosted HTTP functions
//!
//! A serverless HTTP "function" is one entry point answering every request
//! sent to one URL. This crate maps the request method to a handler
//! ([`func()`]), checks the query and body against schemas before the handler
//! ever sees them ([`validate()`]), and answers unmapped methods with a
//! standard 404 document ([`not_found()`]). Optionally it also takes care of
//! the CORS preflight and shared-cache headers.
//!
//! The core is written against the small [`Incoming`]/[`Outgoing`]
//! capability traits. The [`lambda`] module adapts them to the two ways the
//! function can be invoked: AWS API Gateway "proxy events" (through
//! `lambda_http`), and bare JSON-in, JSON-out invocations that are handy for
//! local testing. Those are compiled into the `lambda-func-proxyevent` and
//! `lambda-func-bare` executables respectively, plus `lambda-func-oneshot` for
//! running a single request from the command line.

use lambda_http::{Body, Error, Request, Response};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod exchange;
pub mod func;
pub mod handler;
pub mod headers;
pub mod hello;
pub mod lambda;
pub mod method;
pub mod notfound;
pub mod schema;
pub mod validate;

pub use config::{
    CachingConfig, CorsConfig, FunctionConfig, FunctionOptions, RouteConfig, Validation,
};
pub use exchange::{FuncRequest, FuncResponse, Incoming, Outgoing};
pub use func::{func, methods};
pub use handler::{handler_fn, Handler};
pub use lambda::{BareEvent, BareResponse};
pub use method::{Method, MethodTable};
pub use notfound::{not_found, not_found_compat};
pub use schema::{Field, ObjectSchema, Schema, ValidationError};
pub use validate::validate;

/// Set up logging for a Lambda process.
///
/// CloudWatch timestamps every line itself, so we don't. `RUST_LOG` overrides
/// the default `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A second initialization (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // don't print the module name
        .without_time() // don't print time (CloudWatch has it)
        .try_init();
}

pub struct Services {
    config: FunctionConfig,
}

impl Services {
    /// Create the state for the bundled executables: the sample function,
    /// with CORS and caching settings taken from the environment.
    pub fn init() -> Result<Self, Error> {
        init_logging();

        let opts = FunctionOptions::from_env()?;
        tracing::info!(
            cors = opts.cors.is_some(),
            caching = opts.caching.is_some(),
            "loaded function options"
        );

        Ok(Self::with_config(hello::config().options(opts)))
    }

    pub fn with_config(config: FunctionConfig) -> Self {
        Services { config }
    }

    pub fn config(&self) -> &FunctionConfig {
        &self.config
    }

    /// Handle an API Gateway proxy request.
    pub async fn dispatch_http(&self, req: Request) -> Result<Response<Body>, Error> {
        lambda::serve_http(req, &self.config).await
    }

    /// Handle a bare JSON invocation.
    pub async fn dispatch_bare(&self, event: BareEvent) -> Result<BareResponse, Error> {
        lambda::serve_bare(event, &self.config).await
    }
}
