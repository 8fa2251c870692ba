use crate::models::{DailyMetricsSnapshot, InsightResult};

pub const NEAR_TURN_NOTIFY_MINUTES: u32 = 12;
pub const OVERFLOW_QUEUE_LENGTH: u32 = 8;
pub const OVERFLOW_SUSTAINED_MINUTES: u32 = 20;

/// Template summary built only from the metrics. Used whenever the model path is
/// unavailable; always yields exactly four actions.
pub fn fallback_insights(date: &str, metrics: &DailyMetricsSnapshot) -> InsightResult {
    let day: String = date.chars().take(10).collect();
    let trend = trend_sentence(metrics.avg_wait, metrics.yesterday_avg_wait);

    let summary = format!(
        "Operational summary for {}: {} visits with average wait {:.1} minutes. \
         Peak congestion occurred near {}, mostly at service point {}, with the highest doctor queue on {}. {}",
        day,
        metrics.total_visits,
        metrics.avg_wait,
        metrics.peak_time,
        metrics.top_overloaded_service_point,
        metrics.top_doctor_queue,
        trend,
    );

    let bullet_actions = vec![
        format!(
            "Reassign support staff to {} during {} ± 30 minutes.",
            metrics.top_overloaded_service_point, metrics.peak_time
        ),
        format!(
            "Trigger near-turn notifications earlier when predicted wait drops below {} minutes.",
            NEAR_TURN_NOTIFY_MINUTES
        ),
        format!(
            "Review queue balancing for {} and shift non-urgent follow-ups to peers at the same service point.",
            metrics.top_doctor_queue
        ),
        format!(
            "Open a temporary overflow slot if the queue exceeds {} patients for more than {} minutes.",
            OVERFLOW_QUEUE_LENGTH, OVERFLOW_SUSTAINED_MINUTES
        ),
    ];

    InsightResult {
        executive_summary: summary.trim().to_string(),
        bullet_actions,
    }
}

/// Day-over-day comparison of the average wait; empty when there is no baseline.
pub fn trend_sentence(avg_wait: f64, yesterday_avg_wait: Option<f64>) -> String {
    let Some(yesterday) = yesterday_avg_wait else {
        return String::new();
    };

    if avg_wait > yesterday {
        format!(
            "Average wait increased from {:.1} to {:.1} minutes versus yesterday.",
            yesterday, avg_wait
        )
    } else if avg_wait < yesterday {
        format!(
            "Average wait improved from {:.1} to {:.1} minutes versus yesterday.",
            yesterday, avg_wait
        )
    } else {
        format!("Average wait was unchanged at {:.1} minutes versus yesterday.", avg_wait)
    }
}
