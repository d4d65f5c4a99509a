//! CORS and shared-cache response headers.

use crate::{
    config::{CachingConfig, CorsConfig},
    exchange::Outgoing,
    method::Method,
};

pub const ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const CACHE_CONTROL: &str = "Cache-Control";

/// Set the CORS response headers. `routed` is used for the allowed-methods
/// list when the configuration doesn't name any.
pub fn apply_cors<R, I>(res: &mut R, cors: &CorsConfig, routed: I)
where
    R: Outgoing + ?Sized,
    I: IntoIterator<Item = Method>,
{
    res.set_header(ALLOW_ORIGIN, &cors.allowed_origin);

    if !cors.allowed_headers.is_empty() {
        res.set_header(ALLOW_HEADERS, &cors.allowed_headers.join(", "));
    }

    let methods: Vec<Method> = if cors.allowed_methods.is_empty() {
        routed.into_iter().collect()
    } else {
        cors.allowed_methods.clone()
    };

    if !methods.is_empty() {
        let list = methods
            .iter()
            .map(|m| m.as_str().to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(", ");
        res.set_header(ALLOW_METHODS, &list);
    }

    res.set_header(
        ALLOW_CREDENTIALS,
        if cors.allow_credentials { "true" } else { "false" },
    );
}

/// Let shared caches (but not browsers) hold the response for the configured
/// time, serving it stale while they revalidate.
pub fn apply_caching<R: Outgoing + ?Sized>(res: &mut R, caching: &CachingConfig) {
    res.set_header(
        CACHE_CONTROL,
        &format!(
            "max-age=0, s-maxage={}, stale-while-revalidate",
            caching.shared_cache_seconds
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::FuncResponse;

    #[test]
    fn cors_headers_from_config() {
        let cors = CorsConfig::new("https://example.org")
            .allowed_headers(["Content-Type", "Authorization"])
            .allow_credentials(true)
            .allowed_methods([Method::Get, Method::Post]);
        let mut res = FuncResponse::new();
        apply_cors(&mut res, &cors, [Method::Delete]);

        assert_eq!(res.header(ALLOW_ORIGIN), Some("https://example.org"));
        assert_eq!(res.header(ALLOW_HEADERS), Some("Content-Type, Authorization"));
        assert_eq!(res.header(ALLOW_METHODS), Some("GET, POST"));
        assert_eq!(res.header(ALLOW_CREDENTIALS), Some("true"));
    }

    #[test]
    fn cors_methods_default_to_routes() {
        let mut res = FuncResponse::new();
        apply_cors(&mut res, &CorsConfig::new("*"), [Method::Get, Method::Patch]);

        assert_eq!(res.header(ALLOW_METHODS), Some("GET, PATCH"));
        assert_eq!(res.header(ALLOW_HEADERS), None);
        assert_eq!(res.header(ALLOW_CREDENTIALS), Some("false"));
    }

    #[test]
    fn cache_control_directive() {
        let mut res = FuncResponse::new();
        apply_caching(
            &mut res,
            &CachingConfig {
                shared_cache_seconds: 60,
            },
        );

        assert_eq!(
            res.header(CACHE_CONTROL),
            Some("max-age=0, s-maxage=60, stale-while-revalidate")
        );
    }
}
