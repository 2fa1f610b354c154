use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap},
    Extension, Json,
};

use common::types::ApiResponse;
use service::activity_service::{self, ActivityRequest, Analytics, RequestMeta};
use service::auth::token::Claims;

use crate::{errors::ApiError, routes::auth::ServerState};

/// Proxy headers consulted in order before falling back to the peer address.
const CLIENT_IP_HEADERS: [&str; 5] = [
    "x-forwarded-for",
    "proxy-client-ip",
    "wl-proxy-client-ip",
    "http_x_forwarded_for",
    "http_client_ip",
];

/// First usable proxy header value, reduced to its first comma-separated entry.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    for name in CLIENT_IP_HEADERS {
        let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) else { continue };
        let first = value.split(',').next().unwrap_or("").trim();
        if !first.is_empty() && !first.eq_ignore_ascii_case("unknown") {
            return Some(first.to_string());
        }
    }
    peer.map(|p| p.ip().to_string())
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

#[utoipa::path(post, path = "/activity/track", tag = "activity", request_body = crate::openapi::ActivityRequestDoc, responses((status = 200, description = "Tracked"), (status = 400, description = "Validation Error")))]
pub async fn track(
    State(state): State<ServerState>,
    claims: Option<Extension<Claims>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(input): Json<ActivityRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let meta = RequestMeta {
        ip_address: client_ip(&headers, peer.map(|ConnectInfo(addr)| addr)),
        user_agent: header_value(&headers, header::USER_AGENT),
        referrer: header_value(&headers, header::REFERER),
        user_email: claims.map(|Extension(c)| c.sub),
    };
    activity_service::track_activity(&state.db, input, meta).await?;
    Ok(Json(ApiResponse::done("Activity tracked")))
}

#[utoipa::path(get, path = "/activity/analytics", tag = "activity", responses((status = 200, description = "Visit totals")))]
pub async fn analytics(State(state): State<ServerState>) -> Result<Json<ApiResponse<Analytics>>, ApiError> {
    let stats = activity_service::get_analytics(&state.db).await?;
    Ok(Json(ApiResponse::ok("Analytics retrieved successfully", stats)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.7:55000".parse().unwrap())
    }

    #[test]
    fn forwarded_for_takes_first_entry() {
        let mut h = HeaderMap::new();
        h.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.5, 10.0.0.1"));
        assert_eq!(client_ip(&h, peer()).as_deref(), Some("203.0.113.5"));
    }

    #[test]
    fn unknown_values_are_skipped() {
        let mut h = HeaderMap::new();
        h.insert("x-forwarded-for", HeaderValue::from_static("unknown"));
        h.insert("wl-proxy-client-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_ip(&h, peer()).as_deref(), Some("198.51.100.2"));
    }

    #[test]
    fn falls_back_to_peer_address() {
        assert_eq!(client_ip(&HeaderMap::new(), peer()).as_deref(), Some("10.0.0.7"));
        assert_eq!(client_ip(&HeaderMap::new(), None), None);
    }
}
