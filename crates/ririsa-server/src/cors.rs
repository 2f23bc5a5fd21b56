use http::{HeaderName, HeaderValue, Method};
use ririsa_config::{AnyOrList, CorsConfig};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer from configuration
///
/// Entries that fail to parse are skipped with a warning.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new();

    layer = match &config.origins {
        // Credentials cannot be combined with a literal `*`, so mirror the caller
        AnyOrList::Any if config.credentials => layer.allow_origin(AllowOrigin::mirror_request()),
        AnyOrList::Any => layer.allow_origin(AllowOrigin::any()),
        AnyOrList::List(origins) => layer.allow_origin(parse_all::<HeaderValue>("origin", origins)),
    };

    layer = match &config.methods {
        AnyOrList::Any if config.credentials => layer.allow_methods(AllowMethods::mirror_request()),
        AnyOrList::Any => layer.allow_methods(AllowMethods::any()),
        AnyOrList::List(methods) => layer.allow_methods(parse_all::<Method>("method", methods)),
    };

    layer = match &config.headers {
        AnyOrList::Any if config.credentials => layer.allow_headers(AllowHeaders::mirror_request()),
        AnyOrList::Any => layer.allow_headers(AllowHeaders::any()),
        AnyOrList::List(headers) => layer.allow_headers(parse_all::<HeaderName>("header", headers)),
    };

    if config.credentials {
        layer = layer.allow_credentials(true);
    }

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}

fn parse_all<T: std::str::FromStr>(kind: &str, values: &[String]) -> Vec<T> {
    values
        .iter()
        .filter_map(|value| {
            let parsed = value.parse().ok();
            if parsed.is_none() {
                tracing::warn!(kind, value, "ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}
