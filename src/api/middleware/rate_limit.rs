//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Requests per second replenished for each client.
const AUTH_PER_SECOND: u64 = 1;
/// Requests a client may send in a burst.
const AUTH_BURST_SIZE: u32 = 10;

/// Creates the rate limiter for login and signup.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address. The server must be started with connect info.
///
/// # Example
///
/// ```rust,ignore
/// let auth = web::routes::auth_routes().layer(rate_limit::auth_layer());
/// ```
pub fn auth_layer()
-> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(AUTH_PER_SECOND)
            .burst_size(AUTH_BURST_SIZE)
            .finish()
            .expect("rate limit settings are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}

/// Same limits as [`auth_layer`], keyed by `X-Forwarded-For`, `X-Real-IP` or
/// `Forwarded` headers with a fallback to the peer address.
///
/// Use only behind a trusted reverse proxy; clients can forge these headers.
pub fn auth_layer_behind_proxy()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .per_second(AUTH_PER_SECOND)
            .burst_size(AUTH_BURST_SIZE)
            .finish()
            .expect("rate limit settings are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
