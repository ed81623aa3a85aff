//! Latency-compensated offset measurement against the time source.

use std::sync::RwLock;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use staffhub_core::config::clock::ClockConfig;
use staffhub_core::error::AppError;
use staffhub_core::result::AppResult;

use super::source::ClockSource;

/// One offset measurement.
#[derive(Debug, Clone, Copy)]
pub struct ClockOffset {
    /// `server_time - local_time` at measurement, latency-compensated.
    pub offset_millis: i64,
    /// Local time when the measurement was taken.
    pub measured_at: DateTime<Utc>,
}

/// JSON fallback shape when the time source reports in the body instead of
/// the `Date` header.
#[derive(Debug, Deserialize)]
struct TimeSourceBody {
    timestamp: DateTime<Utc>,
}

/// Measures and stores the local-to-server clock offset.
///
/// `now()` never touches the network: it applies the last-known-good offset
/// to the local clock, falling back to uncorrected local time when no
/// measurement has succeeded yet. A stale measurement stays usable; the
/// background resync job (and [`ClockSource::refresh_if_stale`]) refresh it.
pub struct ClockSynchronizer {
    client: reqwest::Client,
    config: ClockConfig,
    offset: RwLock<Option<ClockOffset>>,
    last_attempt: RwLock<Option<DateTime<Utc>>>,
}

impl std::fmt::Debug for ClockSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockSynchronizer")
            .field("time_source_url", &self.config.time_source_url)
            .finish()
    }
}

impl ClockSynchronizer {
    /// Create a new synchronizer. No measurement is taken until the first
    /// `sync()`.
    pub fn new(config: ClockConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_millis(config.request_timeout_millis))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build time source client: {e}"))
            })?;

        Ok(Self {
            client,
            config,
            offset: RwLock::new(None),
            last_attempt: RwLock::new(None),
        })
    }

    /// Perform one round trip to the time source and store the measurement.
    ///
    /// Records `t0` before the request and `t1` when the response headers
    /// arrive; the one-way latency estimate is half the round trip.
    pub async fn sync(&self) -> AppResult<DateTime<Utc>> {
        let t0 = Utc::now();
        *self
            .last_attempt
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(t0);
        let response = self
            .client
            .get(&self.config.time_source_url)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("Time source unreachable: {e}")))?;
        let t1 = Utc::now();

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Time source returned {}",
                response.status()
            )));
        }

        let header_ts = response
            .headers()
            .get(reqwest::header::DATE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_http_date);

        let ts = match header_ts {
            Some(ts) => ts,
            None => {
                let body: TimeSourceBody = response.json().await.map_err(|e| {
                    AppError::external_service(format!("Time source sent no usable timestamp: {e}"))
                })?;
                body.timestamp
            }
        };

        let offset_millis = compute_offset_millis(ts, t0, t1);
        let rtt_millis = (t1 - t0).num_milliseconds();

        *self
            .offset
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(ClockOffset {
            offset_millis,
            measured_at: t1,
        });

        debug!(
            offset_millis = offset_millis,
            rtt_millis = rtt_millis,
            "Clock offset measured"
        );

        Ok(ts)
    }

    /// The last successful measurement, if any.
    pub fn current_offset(&self) -> Option<ClockOffset> {
        *self
            .offset
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Whether the last measurement is older than the resync interval (or
    /// missing entirely).
    pub fn is_stale(&self) -> bool {
        match self.current_offset() {
            None => true,
            Some(measurement) => {
                let age = Utc::now() - measurement.measured_at;
                age > Duration::seconds(self.config.resync_interval_seconds as i64)
            }
        }
    }

    /// Whether a refresh attempt is due.
    ///
    /// Throttled on the last *attempt*, not the last success, so an
    /// unreachable time source costs at most one timed-out request per
    /// interval rather than one per caller.
    fn attempt_due(&self) -> bool {
        let last = *self
            .last_attempt
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match last {
            None => true,
            Some(attempted_at) => {
                let age = Utc::now() - attempted_at;
                age > Duration::seconds(self.config.resync_interval_seconds as i64)
            }
        }
    }
}

#[async_trait]
impl ClockSource for ClockSynchronizer {
    fn now(&self) -> DateTime<Utc> {
        let local = Utc::now();
        match self.current_offset() {
            Some(measurement) => local + Duration::milliseconds(measurement.offset_millis),
            None => local,
        }
    }

    async fn refresh_if_stale(&self) {
        if !self.is_stale() || !self.attempt_due() {
            return;
        }
        if let Err(e) = self.sync().await {
            warn!(error = %e, "Clock resync failed; continuing on last-known offset");
        }
    }
}

/// `offset = ts - t0 - (t1 - t0) / 2`, i.e. the server timestamp projected
/// back to the midpoint of the round trip.
pub fn compute_offset_millis(ts: DateTime<Utc>, t0: DateTime<Utc>, t1: DateTime<Utc>) -> i64 {
    let rtt = (t1 - t0).num_milliseconds();
    (ts - t0).num_milliseconds() - rtt / 2
}

/// Parse an HTTP `Date` header (RFC 7231 / RFC 2822 format).
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_offset_compensates_for_round_trip() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let t1 = t0 + Duration::milliseconds(200);
        // Server is 5 s ahead of the local clock, observed at the midpoint.
        let ts = t0 + Duration::milliseconds(100) + Duration::seconds(5);

        let offset = compute_offset_millis(ts, t0, t1);
        assert_eq!(offset, 5000);

        // The corrected midpoint lands exactly on the server timestamp, so
        // the error is bounded by half the round trip.
        let corrected_mid = t0 + Duration::milliseconds(100) + Duration::milliseconds(offset);
        let error = (corrected_mid - ts).num_milliseconds().abs();
        assert!(error <= (t1 - t0).num_milliseconds() / 2);
    }

    #[test]
    fn test_offset_negative_when_local_is_ahead() {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap();
        let t1 = t0 + Duration::milliseconds(100);
        let ts = t0 + Duration::milliseconds(50) - Duration::seconds(3);

        assert_eq!(compute_offset_millis(ts, t0, t1), -3000);
    }

    #[test]
    fn test_parse_http_date() {
        let parsed = parse_http_date("Mon, 09 Mar 2026 12:34:56 GMT").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 9, 12, 34, 56).unwrap());
        assert!(parse_http_date("not a date").is_none());
    }

    #[tokio::test]
    async fn test_now_falls_back_to_local_without_measurement() {
        let sync = ClockSynchronizer::new(ClockConfig {
            time_source_url: "http://127.0.0.1:1/time".to_string(),
            resync_interval_seconds: 300,
            request_timeout_millis: 50,
        })
        .unwrap();

        let before = Utc::now();
        let now = sync.now();
        let after = Utc::now();
        assert!(now >= before && now <= after);
        assert!(sync.is_stale());
    }

    #[tokio::test]
    async fn test_sync_failure_is_an_error_but_now_still_works() {
        let sync = ClockSynchronizer::new(ClockConfig {
            time_source_url: "http://127.0.0.1:1/time".to_string(),
            resync_interval_seconds: 300,
            request_timeout_millis: 50,
        })
        .unwrap();

        assert!(sync.sync().await.is_err());
        assert!(sync.current_offset().is_none());

        // Degraded mode: refresh_if_stale swallows the failure.
        sync.refresh_if_stale().await;
        let _ = sync.now();
    }
}
