//! Logging middleware
//!
//! Records one structured line per HTTP request with method, path, status
//! and latency, and flags slow requests.

use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Requests slower than this get an extra warning
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_millis(1000);

/// Log every request passing through the router
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed = start.elapsed();
    log_request(method.as_str(), &path, response.status(), elapsed);
    response
}

fn log_request(method: &str, path: &str, status: StatusCode, elapsed: Duration) {
    let duration_ms = elapsed.as_millis() as u64;

    if status.is_server_error() {
        warn!(
            method = method,
            path = path,
            status = status.as_u16(),
            duration_ms = duration_ms,
            "Request failed"
        );
    } else {
        info!(
            method = method,
            path = path,
            status = status.as_u16(),
            duration_ms = duration_ms,
            "Request completed"
        );
    }

    if is_slow(elapsed) {
        warn!(
            method = method,
            path = path,
            duration_ms = duration_ms,
            "Slow request detected"
        );
    }
}

fn is_slow(elapsed: Duration) -> bool {
    elapsed > SLOW_REQUEST_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_threshold() {
        assert!(!is_slow(Duration::from_millis(20)));
        assert!(!is_slow(SLOW_REQUEST_THRESHOLD));
        assert!(is_slow(Duration::from_millis(1500)));
    }
}
