//! `ClientInfo` extractor: best-effort client address and user agent.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;

use waitlist_service::ClientMeta;

const UNKNOWN: &str = "unknown";

/// Client identity used for rate limiting and stored with a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo(pub ClientMeta);

impl ClientInfo {
    /// The rate-limit key.
    pub fn ip(&self) -> &str {
        &self.0.ip
    }

    /// Returns the inner `ClientMeta`.
    pub fn into_meta(self) -> ClientMeta {
        self.0
    }
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        let ip = client_ip(&parts.headers)
            .or(peer)
            .unwrap_or_else(|| UNKNOWN.to_string());

        let user_agent = header_str(&parts.headers, "user-agent")
            .unwrap_or(UNKNOWN)
            .to_string();

        Ok(Self(ClientMeta { ip, user_agent }))
    }
}

/// `X-Real-IP`, else the first hop of `X-Forwarded-For`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_str(headers, "x-real-ip")
        .or_else(|| {
            header_str(headers, "x-forwarded-for")
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|first| !first.is_empty())
        })
        .map(String::from)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
