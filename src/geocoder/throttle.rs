//! Minimum spacing between outgoing geocoding requests

use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

/// Enforces a minimum interval between consecutive requests.
///
/// Nominatim's public instance allows one request per second per client.
#[derive(Debug)]
pub struct RequestThrottle {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    /// Create a new throttle
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Sleep until a request is allowed, then record it
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(prev) = *last {
            let wait_time = self.min_interval.saturating_sub(prev.elapsed());
            if !wait_time.is_zero() {
                debug!("Throttling geocoder request for {:.3}s", wait_time.as_secs_f64());
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}
