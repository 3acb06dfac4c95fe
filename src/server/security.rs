use axum::http::HeaderValue;
use axum::http::header::STRICT_TRANSPORT_SECURITY;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::bootstrap::config::Config;

/// Six months, with subdomain and preload-list semantics.
const HSTS_DIRECTIVE: &str = "max-age=15552000; includeSubDomains; preload";

/// Stamps `Strict-Transport-Security` on every routed response when the
/// public URL is https and the operator has not opted out. Returns `None`
/// on plain http deployments so no layer gets installed at all.
pub fn hsts_layer(cfg: &Config) -> Option<SetResponseHeaderLayer<HeaderValue>> {
    if !cfg.is_https() || cfg.disable_hsts {
        return None;
    }
    Some(SetResponseHeaderLayer::if_not_present(
        STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static(HSTS_DIRECTIVE),
    ))
}
