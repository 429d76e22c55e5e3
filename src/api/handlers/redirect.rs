//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;

use crate::application::services::ClientInfo;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Reject codes that are not 7 alphanumerics (404, no lookup)
/// 2. Check cache (key: `link:<code>`)
/// 3. On cache miss, query the link store and refill the cache in the background
/// 4. Schedule the click write (fire-and-forget)
/// 5. Return 307 Temporary Redirect with the stored URL as `Location`
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let client = ClientInfo {
        ip: client_ip(&headers, Some(addr), state.behind_proxy),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };

    let target = state.redirect_service.resolve(&code, client).await?;

    Ok(Redirect::temporary(&target.url))
}
