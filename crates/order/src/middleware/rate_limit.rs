use crate::abstract_trait::rate_limit::DynRateLimitStore;
use axum::{
    Extension,
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::Response,
};
use shared::errors::HttpError;
use std::{net::SocketAddr, time::Duration};
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub max_requests: u64,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// First `x-forwarded-for` hop, then the peer address, then `"unknown"`.
pub fn client_ip(req: &Request<Body>) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rejects a client with 429 once it exceeds the policy within one window.
/// An unreachable counter store lets the request through.
pub async fn rate_limit_middleware(
    Extension(limiter): Extension<DynRateLimitStore>,
    Extension(policy): Extension<RateLimitPolicy>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    let client = client_ip(&req);

    match limiter.hit(&client, policy.window).await {
        Ok(count) if count > policy.max_requests => {
            warn!("Rate limit exceeded for IP: {client} (requests: {count})");
            return Err(HttpError::TooManyRequests(
                "Too many requests, please try again later".into(),
            ));
        }
        Ok(_) => {}
        Err(e) => warn!("⚠️ Rate limiter unavailable, letting {client} through: {e}"),
    }

    Ok(next.run(req).await)
}
