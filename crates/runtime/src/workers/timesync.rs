//! Internet time synchronization.
//!
//! Periodically asks well-known HTTPS endpoints for their `Date` header and
//! anchors the trusted clock to the first answer. Endpoints are tried in
//! order; one success ends the round. Failures keep the previous anchor.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::clock::{TimeAnchor, TrustedClock};
use crate::events::{ClockEvent, Event, EventBus};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response carried no Date header")]
    MissingDateHeader,

    #[error("could not parse Date header: {0}")]
    ParseDate(String),

    #[error("all {0} endpoints failed")]
    AllEndpointsFailed(usize),
}

/// Source of a single internet time reading.
///
/// Abstracted so tests can sync without network access.
#[async_trait]
pub trait DateProbe: Send + Sync {
    async fn probe(&self, endpoint: &str) -> Result<DateTime<Utc>, SyncError>;
}

/// Probes an endpoint with a HEAD request and parses its `Date` header.
pub struct HttpDateProbe {
    client: reqwest::Client,
}

impl HttpDateProbe {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DateProbe for HttpDateProbe {
    async fn probe(&self, endpoint: &str) -> Result<DateTime<Utc>, SyncError> {
        let response = self.client.head(endpoint).send().await?;
        let header = response
            .headers()
            .get(reqwest::header::DATE)
            .ok_or(SyncError::MissingDateHeader)?;
        let raw = header
            .to_str()
            .map_err(|err| SyncError::ParseDate(err.to_string()))?;
        let parsed = DateTime::parse_from_rfc2822(raw)
            .map_err(|err| SyncError::ParseDate(err.to_string()))?;
        Ok(parsed.with_timezone(&Utc))
    }
}

pub struct TimeSyncWorker<P: DateProbe> {
    probe: P,
    clock: TrustedClock,
    event_bus: EventBus,
    endpoints: Vec<String>,
    interval: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl<P: DateProbe> TimeSyncWorker<P> {
    pub fn new(
        probe: P,
        clock: TrustedClock,
        event_bus: EventBus,
        endpoints: Vec<String>,
        interval: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            probe,
            clock,
            event_bus,
            endpoints,
            interval,
            shutdown_rx,
        }
    }

    pub async fn run(mut self) {
        if self.endpoints.is_empty() {
            tracing::warn!(target: "runtime::timesync", "no sync endpoints configured, trusted clock stays on device time");
            return;
        }

        tracing::debug!(
            target: "runtime::timesync",
            endpoints = self.endpoints.len(),
            interval = ?self.interval,
            "time sync started"
        );

        // First tick fires immediately so startup gets an anchor fast.
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sync_round().await;
                }
                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!(target: "runtime::timesync", "time sync stopped");
    }

    async fn sync_round(&self) {
        for endpoint in &self.endpoints {
            match self.probe.probe(endpoint).await {
                Ok(internet_utc) => {
                    let skew_seconds = (internet_utc - Utc::now()).num_seconds();
                    self.clock.apply_anchor(TimeAnchor {
                        internet_utc,
                        synced_at: Instant::now(),
                    });
                    tracing::debug!(
                        target: "runtime::timesync",
                        endpoint = %endpoint,
                        skew_seconds,
                        "clock anchored"
                    );
                    self.event_bus.publish(Event::Clock(ClockEvent::Synced {
                        endpoint: endpoint.clone(),
                        skew_seconds,
                    }));
                    return;
                }
                Err(err) => {
                    tracing::warn!(
                        target: "runtime::timesync",
                        endpoint = %endpoint,
                        error = %err,
                        "time probe failed"
                    );
                }
            }
        }

        tracing::warn!(
            target: "runtime::timesync",
            endpoints = self.endpoints.len(),
            "sync round failed on every endpoint"
        );
        self.event_bus.publish(Event::Clock(ClockEvent::SyncFailed {
            endpoints_tried: self.endpoints.len(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProbe {
        time: DateTime<Utc>,
        fail_first: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DateProbe for FixedProbe {
        async fn probe(&self, _endpoint: &str) -> Result<DateTime<Utc>, SyncError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                Err(SyncError::MissingDateHeader)
            } else {
                Ok(self.time)
            }
        }
    }

    fn worker(probe: FixedProbe, endpoints: Vec<String>) -> (TimeSyncWorker<FixedProbe>, TrustedClock, EventBus) {
        let clock = TrustedClock::new();
        let bus = EventBus::new();
        let (_tx, rx) = watch::channel(false);
        let worker = TimeSyncWorker::new(
            probe,
            clock.clone(),
            bus.clone(),
            endpoints,
            Duration::from_secs(300),
            rx,
        );
        (worker, clock, bus)
    }

    #[tokio::test]
    async fn first_healthy_endpoint_anchors_the_clock() {
        let time = DateTime::parse_from_rfc3339("2026-08-23T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let probe = FixedProbe {
            time,
            fail_first: 0,
            calls: AtomicUsize::new(0),
        };
        let (worker, clock, bus) = worker(probe, vec!["https://a.example".into()]);
        let mut events = bus.subscribe(crate::events::Topic::Clock);

        worker.sync_round().await;

        assert!(clock.is_synced());
        match events.try_recv().unwrap() {
            Event::Clock(ClockEvent::Synced { endpoint, .. }) => {
                assert_eq!(endpoint, "https://a.example");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn falls_back_to_next_endpoint() {
        let time = DateTime::parse_from_rfc3339("2026-08-23T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let probe = FixedProbe {
            time,
            fail_first: 1,
            calls: AtomicUsize::new(0),
        };
        let (worker, clock, bus) = worker(
            probe,
            vec!["https://a.example".into(), "https://b.example".into()],
        );
        let mut events = bus.subscribe(crate::events::Topic::Clock);

        worker.sync_round().await;

        assert!(clock.is_synced());
        match events.try_recv().unwrap() {
            Event::Clock(ClockEvent::Synced { endpoint, .. }) => {
                assert_eq!(endpoint, "https://b.example");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn all_failures_keep_clock_unsynced() {
        let probe = FixedProbe {
            time: Utc::now(),
            fail_first: usize::MAX,
            calls: AtomicUsize::new(0),
        };
        let (worker, clock, bus) = worker(
            probe,
            vec!["https://a.example".into(), "https://b.example".into()],
        );
        let mut events = bus.subscribe(crate::events::Topic::Clock);

        worker.sync_round().await;

        assert!(!clock.is_synced());
        match events.try_recv().unwrap() {
            Event::Clock(ClockEvent::SyncFailed { endpoints_tried }) => {
                assert_eq!(endpoints_tried, 2);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
