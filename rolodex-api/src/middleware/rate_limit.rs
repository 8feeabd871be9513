/// Global rate limiting middleware
///
/// Applies a coarse request-count-per-window limit to the whole `/api`
/// surface. There is deliberately a single counter scope shared by all
/// clients; this is backstop protection against runaway traffic, not
/// per-user fairness.
///
/// # Algorithm
///
/// Fixed window: the first request opens a window, each request increments
/// one counter, and the counter resets when the window elapses. State lives
/// in-process behind a `Mutex` (the lock is never held across an await).
///
/// # Headers
///
/// Responses carry:
/// - `X-RateLimit-Limit`: requests allowed per window
/// - `X-RateLimit-Remaining`: requests left in the current window
/// - `Retry-After`: seconds to wait (429 responses only, set by the error type)

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};

/// Fixed-window request counter
///
/// All methods take the current instant from the caller's clock via
/// `Instant::now()`; the struct itself holds no timer.
#[derive(Debug)]
pub struct FixedWindow {
    /// When the current window opened
    window_started: Instant,

    /// Requests admitted in the current window
    count: u32,
}

/// Outcome of one admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Request admitted; `remaining` requests left in this window
    Allowed { remaining: u32 },

    /// Request rejected; retry after the window rolls over
    Limited { retry_after_secs: u64 },
}

impl FixedWindow {
    /// Creates a counter with a fresh window starting now
    pub fn new() -> Self {
        Self {
            window_started: Instant::now(),
            count: 0,
        }
    }

    /// Attempts to admit one request under `max` requests per `window`
    pub fn try_admit(&mut self, max: u32, window: Duration) -> Admission {
        let now = Instant::now();

        if now.duration_since(self.window_started) >= window {
            self.window_started = now;
            self.count = 0;
        }

        if self.count < max {
            self.count += 1;
            Admission::Allowed {
                remaining: max - self.count,
            }
        } else {
            let elapsed = now.duration_since(self.window_started);
            let retry_after_secs = window.saturating_sub(elapsed).as_secs().max(1);
            Admission::Limited { retry_after_secs }
        }
    }
}

impl Default for FixedWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Rate limiting middleware layer
///
/// Checks the global window before processing the request. Returns 429 with
/// a `Retry-After` header when the window is exhausted.
pub async fn rate_limit_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let max = state.config.rate_limit.max_requests;
    let window = Duration::from_secs(state.config.rate_limit.window_seconds);

    let admission = {
        let mut counter = state
            .rate_limiter
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        counter.try_admit(max, window)
    };

    let remaining = match admission {
        Admission::Allowed { remaining } => remaining,
        Admission::Limited { retry_after_secs } => {
            tracing::warn!(retry_after_secs, "Global rate limit exceeded");
            return Err(ApiError::RateLimited {
                retry_after: retry_after_secs,
            });
        }
    };

    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&max.to_string()) {
        headers.insert("X-RateLimit-Limit", value);
    }
    if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", value);
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_admits_up_to_max() {
        let mut window = FixedWindow::new();
        let limit = Duration::from_secs(60);

        for expected_remaining in (0..5).rev() {
            match window.try_admit(5, limit) {
                Admission::Allowed { remaining } => assert_eq!(remaining, expected_remaining),
                Admission::Limited { .. } => panic!("should admit under the limit"),
            }
        }

        assert!(matches!(
            window.try_admit(5, limit),
            Admission::Limited { .. }
        ));
    }

    #[test]
    fn test_limited_reports_retry_after() {
        let mut window = FixedWindow::new();
        let limit = Duration::from_secs(60);

        window.try_admit(1, limit);
        match window.try_admit(1, limit) {
            Admission::Limited { retry_after_secs } => {
                assert!(retry_after_secs >= 1 && retry_after_secs <= 60);
            }
            Admission::Allowed { .. } => panic!("should be limited"),
        }
    }

    #[test]
    fn test_window_resets_after_elapsing() {
        let mut window = FixedWindow::new();
        let limit = Duration::from_millis(10);

        window.try_admit(1, limit);
        assert!(matches!(
            window.try_admit(1, limit),
            Admission::Limited { .. }
        ));

        std::thread::sleep(Duration::from_millis(15));

        assert!(matches!(
            window.try_admit(1, limit),
            Admission::Allowed { .. }
        ));
    }

    #[test]
    fn test_single_counter_is_shared() {
        // One scope for all callers: two "clients" drain the same budget
        let mut window = FixedWindow::new();
        let limit = Duration::from_secs(60);

        window.try_admit(2, limit); // client A
        window.try_admit(2, limit); // client B

        assert!(matches!(
            window.try_admit(2, limit), // client A again
            Admission::Limited { .. }
        ));
    }
}
