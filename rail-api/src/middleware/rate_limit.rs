use std::fmt::Display;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

/// Per-IP fixed window backed by Redis. Fails open when Redis is unreachable.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let Some(redis) = state.redis.as_ref() else {
        return next.run(req).await;
    };

    let key = format!("ratelimit:{}", addr.ip());
    let check = redis
        .check_rate_limit(&key, state.rate_limit.requests_per_window, state.rate_limit.window_seconds)
        .await;

    match admit(check) {
        Ok(()) => next.run(req).await,
        Err(e) => e.into_response(),
    }
}

/// Turns a limiter answer into a verdict. A failed check lets the request through.
fn admit<E: Display>(check: Result<bool, E>) -> Result<(), AppError> {
    match check {
        Ok(true) => Ok(()),
        Ok(false) => Err(AppError::RateLimited),
        Err(e) => {
            warn!("Rate limit check failed, letting request through: {}", e);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_under_limit_is_admitted() {
        assert!(admit::<String>(Ok(true)).is_ok());
    }

    #[test]
    fn test_over_limit_is_429() {
        let err = admit::<String>(Ok(false)).unwrap_err();
        assert!(matches!(err, AppError::RateLimited));
        assert_eq!(err.into_response().status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_limiter_failure_fails_open() {
        assert!(admit(Err("connection refused".to_string())).is_ok());
    }
}
