//! Function configuration.
//!
//! A [`FunctionConfig`] is built once, when the Lambda process starts, and is
//! then shared read-only by every invocation. Handlers and schemas can only
//! be supplied in code, but the CORS and caching sections can also come from
//! JSON (see [`FunctionOptions`]), which is how the bundled executables pick
//! them up from the environment.

use anyhow::Context;
use serde::Deserialize;

use crate::{
    exchange::{FuncRequest, FuncResponse},
    handler::Handler,
    method::{Method, MethodTable},
    schema::Schema,
};

/// The environment variable holding [`FunctionOptions`] JSON.
pub const OPTIONS_ENV_VAR: &str = "LAMBDA_FUNC_OPTIONS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformatted function options: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid function options: {0}")]
    Invalid(String),
}

/// Schemas checked before a handler runs. Each one is optional.
#[derive(Default)]
pub struct Validation {
    pub query: Option<Box<dyn Schema>>,
    pub body: Option<Box<dyn Schema>>,
    /// Path parameters. Accepted so that configurations can declare them, but
    /// never checked by the dispatcher.
    pub params: Option<Box<dyn Schema>>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query<S: Schema + 'static>(mut self, schema: S) -> Self {
        self.query = Some(Box::new(schema));
        self
    }

    pub fn body<S: Schema + 'static>(mut self, schema: S) -> Self {
        self.body = Some(Box::new(schema));
        self
    }

    pub fn params<S: Schema + 'static>(mut self, schema: S) -> Self {
        self.params = Some(Box::new(schema));
        self
    }
}

/// One HTTP method's handler, plus how to validate its input.
pub struct RouteConfig<Req = FuncRequest, Res = FuncResponse> {
    pub handler: Box<dyn Handler<Req, Res>>,
    pub validation: Option<Validation>,
    /// Keep schema error details out of 400 responses.
    pub sensitive: bool,
}

impl<Req: Send, Res: Send> RouteConfig<Req, Res> {
    pub fn new<H: Handler<Req, Res> + 'static>(handler: H) -> Self {
        RouteConfig {
            handler: Box::new(handler),
            validation: None,
            sensitive: false,
        }
    }

    pub fn validation(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CorsConfig {
    pub allowed_origin: String,
    #[serde(default)]
    pub allowed_headers: Vec<String>,
    #[serde(default)]
    pub allow_credentials: bool,
    /// Empty means "whatever methods the function has routes for".
    #[serde(default)]
    pub allowed_methods: Vec<Method>,
}

impl CorsConfig {
    pub fn new<S: Into<String>>(allowed_origin: S) -> Self {
        CorsConfig {
            allowed_origin: allowed_origin.into(),
            allowed_headers: Vec::new(),
            allow_credentials: false,
            allowed_methods: Vec::new(),
        }
    }

    pub fn allowed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    pub fn allowed_methods<I: IntoIterator<Item = Method>>(mut self, methods: I) -> Self {
        self.allowed_methods = methods.into_iter().collect();
        self
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CachingConfig {
    /// `s-maxage` for shared caches such as a CDN.
    pub shared_cache_seconds: u32,
}

/// The JSON-configurable part of a [`FunctionConfig`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionOptions {
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub caching: Option<CachingConfig>,
}

impl FunctionOptions {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let opts: FunctionOptions = serde_json::from_str(text)?;

        if let Some(cors) = &opts.cors {
            if cors.allowed_origin.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "cors.allowedOrigin must not be empty".to_owned(),
                ));
            }

            // Browsers refuse credentialed responses for a wildcard origin.
            if cors.allow_credentials && cors.allowed_origin == "*" {
                return Err(ConfigError::Invalid(
                    "cors.allowCredentials cannot be combined with a `*` origin".to_owned(),
                ));
            }
        }

        Ok(opts)
    }

    /// Load options from [`OPTIONS_ENV_VAR`]. An unset variable means no CORS
    /// and no caching.
    pub fn from_env() -> anyhow::Result<Self> {
        match std::env::var(OPTIONS_ENV_VAR) {
            Ok(text) => Self::from_json(&text)
                .with_context(|| format!("failed to load ${OPTIONS_ENV_VAR}")),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read ${OPTIONS_ENV_VAR}")),
        }
    }
}

/// Everything needed to serve one serverless entry point.
pub struct FunctionConfig<Req = FuncRequest, Res = FuncResponse> {
    pub methods: MethodTable<RouteConfig<Req, Res>>,
    pub cors: Option<CorsConfig>,
    pub caching: Option<CachingConfig>,
}

impl<Req, Res> Default for FunctionConfig<Req, Res> {
    fn default() -> Self {
        FunctionConfig {
            methods: MethodTable::new(),
            cors: None,
            caching: None,
        }
    }
}

impl<Req: Send, Res: Send> FunctionConfig<Req, Res> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the route for `method`, replacing any earlier one.
    pub fn route(mut self, method: Method, route: RouteConfig<Req, Res>) -> Self {
        self.methods.insert(method, route);
        self
    }

    pub fn cors(mut self, cors: CorsConfig) -> Self {
        self.cors = Some(cors);
        self
    }

    pub fn caching(mut self, shared_cache_seconds: u32) -> Self {
        self.caching = Some(CachingConfig {
            shared_cache_seconds,
        });
        self
    }

    /// Overlay the sections present in `opts`.
    pub fn options(mut self, opts: FunctionOptions) -> Self {
        if opts.cors.is_some() {
            self.cors = opts.cors;
        }

        if opts.caching.is_some() {
            self.caching = opts.caching;
        }

        self
    }

    pub fn get_route(&self, method: Method) -> Option<&RouteConfig<Req, Res>> {
        self.methods.get(method)
    }
}
