use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

const PREFLIGHT_MAX_AGE_SECS: u64 = 86400;

/// Builds the CORS policy from a comma-separated origin list.
pub fn create_cors_layer(origins: &str) -> CorsLayer {
    let allowed_origins = parse_allowed_origins(origins);
    let permissive = allowed_origins.is_empty();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([
            header::CONTENT_LENGTH,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(PREFLIGHT_MAX_AGE_SECS));

    // Credentials cannot be combined with a wildcard origin.
    if permissive {
        tracing::warn!(
            "CORS: No valid origins configured, using permissive settings for development"
        );
        layer.allow_origin(AllowOrigin::any())
    } else {
        tracing::info!(
            "CORS: Configured with {} allowed origin(s)",
            allowed_origins.len()
        );
        layer
            .allow_origin(AllowOrigin::list(allowed_origins))
            .allow_credentials(true)
    }
}

fn parse_allowed_origins(origins: &str) -> Vec<HeaderValue> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => {
                tracing::debug!("CORS: Allowing origin: {}", origin);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ALLOWED_ORIGINS;

    #[test]
    fn test_create_cors_layer() {
        let _layer = create_cors_layer(DEFAULT_ALLOWED_ORIGINS);
        let _permissive = create_cors_layer("");
    }

    #[test]
    fn test_default_origins_are_valid() {
        let origins = parse_allowed_origins(DEFAULT_ALLOWED_ORIGINS);
        assert_eq!(origins.len(), 2);
    }

    #[test]
    fn test_blank_entries_are_skipped() {
        let origins = parse_allowed_origins(" https://tickets.example.com , ,");
        assert_eq!(origins, vec![HeaderValue::from_static("https://tickets.example.com")]);
    }
}
