use serde_json::json;

use crate::models::DailyMetricsSnapshot;

/// Single instruction prompt with the metrics embedded as compact JSON.
pub fn build_prompt(date: &str, metrics: &DailyMetricsSnapshot) -> String {
    let context = json!({
        "date": date,
        "total_visits": metrics.total_visits,
        "avg_wait_minutes": metrics.avg_wait,
        "peak_time": metrics.peak_time,
        "top_overloaded_service_point": metrics.top_overloaded_service_point,
        "top_doctor_queue": metrics.top_doctor_queue,
        "yesterday_avg_wait": metrics.yesterday_avg_wait,
    });

    format!(
        "You are a hospital operations analytics assistant. \
         Generate a concise daily executive summary for patient flow and queue performance. \
         Use only the provided metrics and do not invent data. \
         Provide practical recommendations for administrators and clinical operations leaders. \
         Return only strict JSON with this schema: \
         {{\"executive_summary\": string, \"bullet_actions\": string[3..6]}}. \
         The executive summary must be 1-2 short paragraphs. \
         Metrics: {}",
        context
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_metrics() {
        let metrics = DailyMetricsSnapshot {
            total_visits: 90,
            avg_wait: 14.5,
            peak_time: "11:30".to_string(),
            top_overloaded_service_point: "LAB".to_string(),
            top_doctor_queue: "Dr. Okafor".to_string(),
            yesterday_avg_wait: None,
        };

        let prompt = build_prompt("2024-02-10", &metrics);

        assert!(prompt.contains("do not invent data"));
        assert!(prompt.contains(r#"{"executive_summary": string, "bullet_actions": string[3..6]}"#));
        assert!(prompt.contains(r#""total_visits":90"#));
        assert!(prompt.contains(r#""avg_wait_minutes":14.5"#));
        assert!(prompt.contains(r#""top_overloaded_service_point":"LAB""#));
        assert!(prompt.contains(r#""yesterday_avg_wait":null"#));
    }

    #[test]
    fn test_metrics_payload_is_valid_json() {
        let prompt = build_prompt("2024-02-10", &DailyMetricsSnapshot::default());
        let payload = prompt.split("Metrics: ").nth(1).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(payload).unwrap();

        assert_eq!(parsed["date"], "2024-02-10");
        assert_eq!(parsed["peak_time"], "N/A");
    }
}
