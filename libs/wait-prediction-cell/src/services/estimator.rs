use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use tracing::{debug, info, instrument, warn};

use crate::models::ServiceEvent;
use crate::services::event_store::EventStore;
use crate::time::start_of_day;

/// Returned whenever history is too sparse to say anything.
pub const DEFAULT_SERVICE_MINUTES: f64 = 7.5;
pub const MIN_ESTIMATE_MINUTES: f64 = 3.0;
pub const MAX_ESTIMATE_MINUTES: f64 = 20.0;
/// Gaps outside this window are session breaks, duplicates or idle time.
pub const MIN_SAMPLE_MINUTES: f64 = 2.0;
pub const MAX_SAMPLE_MINUTES: f64 = 45.0;
pub const MAX_EVENTS: usize = 3000;

pub struct ServiceTimeEstimator {
    store: Arc<dyn EventStore>,
}

impl ServiceTimeEstimator {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Average minutes spent per patient at `service_point_id` during `hour`, using the
    /// events of the day containing `as_of` (the server's current instant). Never fails:
    /// store errors degrade to the default.
    #[instrument(skip(self))]
    pub async fn estimate(&self, service_point_id: &str, hour: u32, as_of: DateTime<Utc>) -> f64 {
        let since = start_of_day(as_of);

        let events = match self.store.events_since(service_point_id, since, MAX_EVENTS).await {
            Ok(events) => events,
            Err(e) => {
                warn!("Event store unavailable for {}: {} - using default", service_point_id, e);
                return DEFAULT_SERVICE_MINUTES;
            }
        };

        let events: Vec<ServiceEvent> = events
            .into_iter()
            .filter(|event| event.timestamp <= as_of)
            .collect();

        debug!("Estimating from {} events for {}", events.len(), service_point_id);
        estimate_from_events(&events, hour)
    }
}

/// The hour -> day -> constant ladder over a time-ordered slice of events.
pub fn estimate_from_events(events: &[ServiceEvent], hour: u32) -> f64 {
    if events.len() < 2 {
        return DEFAULT_SERVICE_MINUTES;
    }

    let samples = samples_by_hour(events);

    if let Some(hour_samples) = samples.get(&hour).filter(|s| !s.is_empty()) {
        return clamp_estimate(mean(hour_samples));
    }

    let all_samples: Vec<f64> = samples.values().flatten().copied().collect();
    if !all_samples.is_empty() {
        info!("No samples for hour {}, using day-wide average", hour);
        return clamp_estimate(mean(&all_samples));
    }

    DEFAULT_SERVICE_MINUTES
}

/// Gaps (minutes) between consecutive events sharing an hour bucket, keyed by hour.
/// Only admitted gaps are kept.
pub fn samples_by_hour(events: &[ServiceEvent]) -> BTreeMap<u32, Vec<f64>> {
    let mut samples: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    let mut previous: HashMap<u32, DateTime<Utc>> = HashMap::new();

    for event in events {
        let hour = event.timestamp.hour();

        if let Some(prev) = previous.get(&hour) {
            let gap = (event.timestamp - *prev).num_milliseconds() as f64 / 60_000.0;
            if is_admitted(gap) {
                samples.entry(hour).or_default().push(gap);
            }
        }

        previous.insert(hour, event.timestamp);
    }

    samples
}

pub fn is_admitted(gap_minutes: f64) -> bool {
    (MIN_SAMPLE_MINUTES..=MAX_SAMPLE_MINUTES).contains(&gap_minutes)
}

fn clamp_estimate(minutes: f64) -> f64 {
    minutes.clamp(MIN_ESTIMATE_MINUTES, MAX_ESTIMATE_MINUTES)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::Mutex;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    fn events(times: &[(u32, u32)]) -> Vec<ServiceEvent> {
        times.iter().map(|&(h, m)| ServiceEvent::new("A", at(h, m))).collect()
    }

    struct FixedStore {
        events: Vec<ServiceEvent>,
        calls: Mutex<Vec<(String, DateTime<Utc>, usize)>>,
    }

    #[async_trait]
    impl EventStore for FixedStore {
        async fn events_since(
            &self,
            service_point_id: &str,
            since: DateTime<Utc>,
            limit: usize,
        ) -> Result<Vec<ServiceEvent>> {
            self.calls.lock().unwrap().push((service_point_id.to_string(), since, limit));
            Ok(self.events.clone())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl EventStore for BrokenStore {
        async fn events_since(&self, _: &str, _: DateTime<Utc>, _: usize) -> Result<Vec<ServiceEvent>> {
            Err(anyhow!("connection refused"))
        }
    }

    #[test]
    fn test_sparse_history_uses_default() {
        assert_eq!(estimate_from_events(&[], 9), DEFAULT_SERVICE_MINUTES);
        assert_eq!(estimate_from_events(&events(&[(9, 0)]), 9), DEFAULT_SERVICE_MINUTES);
    }

    #[test]
    fn test_hour_specific_mean() {
        // 9h gaps: 4, 6. 10h gap: 10.
        let history = events(&[(9, 0), (9, 4), (9, 10), (10, 0), (10, 10)]);
        assert_eq!(estimate_from_events(&history, 9), 5.0);
        assert_eq!(estimate_from_events(&history, 10), 10.0);
    }

    #[test]
    fn test_day_wide_mean_when_hour_is_empty() {
        let history = events(&[(8, 0), (8, 4), (10, 0), (10, 10)]);
        assert_eq!(estimate_from_events(&history, 14), 7.0);
    }

    #[test]
    fn test_day_wide_mean_is_clamped() {
        // Gaps 30, 10 and 40. Nothing at 14h, the day-wide mean clamps to the ceiling.
        let slow = events(&[(8, 0), (8, 30), (8, 40), (10, 0), (10, 40)]);
        assert_eq!(samples_by_hour(&slow).values().flatten().count(), 3);
        assert_eq!(estimate_from_events(&slow, 14), MAX_ESTIMATE_MINUTES);

        // 2 minute gaps only, day-wide mean 2 clamps to the floor.
        let fast = events(&[(8, 0), (8, 2), (10, 0), (10, 2)]);
        assert_eq!(estimate_from_events(&fast, 14), MIN_ESTIMATE_MINUTES);
    }

    #[test]
    fn test_only_outlier_gaps_uses_default() {
        // 1 minute, 50 minutes: both outside the admitted window.
        let history = events(&[(9, 0), (9, 1), (9, 51)]);
        assert_eq!(estimate_from_events(&history, 9), DEFAULT_SERVICE_MINUTES);
    }

    #[test]
    fn test_gaps_are_bucketed_not_chained_across_hours() {
        // 9:58 -> 10:03 spans buckets and must not produce a 5 minute sample.
        let history = events(&[(9, 50), (9, 58), (10, 3), (10, 33)]);
        let samples = samples_by_hour(&history);
        assert_eq!(samples.get(&9), Some(&vec![8.0]));
        assert_eq!(samples.get(&10), Some(&vec![30.0]));
    }

    #[test]
    fn test_admission_bounds_inclusive() {
        assert!(is_admitted(2.0));
        assert!(is_admitted(45.0));
        assert!(!is_admitted(1.99));
        assert!(!is_admitted(45.01));
        assert!(!is_admitted(0.0));
    }

    #[test]
    fn test_result_is_clamped() {
        let fast = events(&[(9, 0), (9, 2), (9, 4)]);
        assert_eq!(estimate_from_events(&fast, 9), MIN_ESTIMATE_MINUTES);

        let slow = events(&[(9, 0), (9, 40)]);
        assert_eq!(estimate_from_events(&slow, 9), MAX_ESTIMATE_MINUTES);
    }

    #[test]
    fn test_estimate_is_always_in_range() {
        let base = at(0, 0);
        for step in [1i64, 2, 3, 5, 8, 13, 21, 34, 44, 45, 46, 90] {
            let history: Vec<ServiceEvent> = (0..60)
                .map(|i| ServiceEvent::new("A", base + Duration::minutes(i * step)))
                .collect();
            for hour in 0..24 {
                let estimate = estimate_from_events(&history, hour);
                assert!(
                    (MIN_ESTIMATE_MINUTES..=MAX_ESTIMATE_MINUTES).contains(&estimate)
                        || estimate == DEFAULT_SERVICE_MINUTES
                );
            }
        }
    }

    #[tokio::test]
    async fn test_estimate_queries_from_start_of_day() {
        let store = Arc::new(FixedStore {
            events: events(&[(9, 0), (9, 6), (9, 12)]),
            calls: Mutex::new(Vec::new()),
        });
        let estimator = ServiceTimeEstimator::new(store.clone());

        let estimate = estimator.estimate("A", 9, at(9, 15)).await;

        assert_eq!(estimate, 6.0);
        let calls = store.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("A".to_string(), at(0, 0), MAX_EVENTS)]);
    }

    #[tokio::test]
    async fn test_estimate_ignores_events_after_reference_instant() {
        let store = Arc::new(FixedStore {
            events: events(&[(9, 0), (9, 6), (9, 30), (9, 50)]),
            calls: Mutex::new(Vec::new()),
        });
        let estimator = ServiceTimeEstimator::new(store);

        assert_eq!(estimator.estimate("A", 9, at(9, 10)).await, 6.0);
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_default() {
        let estimator = ServiceTimeEstimator::new(Arc::new(BrokenStore));
        assert_eq!(estimator.estimate("A", 9, at(9, 15)).await, DEFAULT_SERVICE_MINUTES);
    }
}
