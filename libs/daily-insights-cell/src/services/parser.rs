use serde_json::Value;

use crate::error::InsightError;
use crate::models::InsightResult;

pub const MIN_ACTIONS: usize = 3;
pub const MAX_ACTIONS: usize = 6;

/// Parses generated text as a JSON object. Text fenced in a code block is cut down to
/// the span between the first `{` and the last `}` first.
pub fn extract_json(raw_text: &str) -> Result<Value, InsightError> {
    let mut text = raw_text.trim();

    if text.starts_with("```") {
        if let (Some(first), Some(last)) = (text.find('{'), text.rfind('}')) {
            if last > first {
                text = &text[first..=last];
            }
        }
    }

    serde_json::from_str(text).map_err(|e| InsightError::MalformedOutput(e.to_string()))
}

/// Enforces the output contract: non-empty summary, 3 to 6 non-blank actions.
pub fn parse_insights(raw_text: &str) -> Result<InsightResult, InsightError> {
    let parsed = extract_json(raw_text)?;
    let object = parsed
        .as_object()
        .ok_or_else(|| InsightError::MalformedOutput("expected a JSON object".to_string()))?;

    let executive_summary = object
        .get("executive_summary")
        .and_then(as_text)
        .unwrap_or_default();

    let mut bullet_actions: Vec<String> = object
        .get("bullet_actions")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(as_text).filter(|a| !a.is_empty()).collect())
        .unwrap_or_default();

    if executive_summary.is_empty() {
        return Err(InsightError::MissingSummary);
    }
    if bullet_actions.len() < MIN_ACTIONS {
        return Err(InsightError::TooFewActions(bullet_actions.len()));
    }
    bullet_actions.truncate(MAX_ACTIONS);

    Ok(InsightResult {
        executive_summary,
        bullet_actions,
    })
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const PLAIN: &str = r#"{"executive_summary":"x","bullet_actions":["a","b","c"]}"#;

    #[test]
    fn test_fenced_and_plain_parse_identically() {
        let fenced = format!("```json\n{}\n```", PLAIN);

        assert_eq!(parse_insights(&fenced).unwrap(), parse_insights(PLAIN).unwrap());
        assert_eq!(extract_json(&fenced).unwrap(), extract_json(PLAIN).unwrap());
    }

    #[test]
    fn test_bare_fence_without_language() {
        let fenced = format!("  ```\n{}\n```  ", PLAIN);
        let result = parse_insights(&fenced).unwrap();

        assert_eq!(result.executive_summary, "x");
        assert_eq!(result.bullet_actions, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert_matches!(parse_insights("Sure! Here is your summary."), Err(InsightError::MalformedOutput(_)));
        assert_matches!(parse_insights("```\nno braces here\n```"), Err(InsightError::MalformedOutput(_)));
        assert_matches!(parse_insights(r#"["a","b","c"]"#), Err(InsightError::MalformedOutput(_)));
    }

    #[test]
    fn test_blank_summary_rejected() {
        let text = r#"{"executive_summary":"   ","bullet_actions":["a","b","c"]}"#;
        assert_matches!(parse_insights(text), Err(InsightError::MissingSummary));

        let text = r#"{"bullet_actions":["a","b","c"]}"#;
        assert_matches!(parse_insights(text), Err(InsightError::MissingSummary));
    }

    #[test]
    fn test_blank_actions_do_not_count() {
        let text = r#"{"executive_summary":"x","bullet_actions":["a"," ","",null,"b"]}"#;
        assert_matches!(parse_insights(text), Err(InsightError::TooFewActions(2)));
    }

    #[test]
    fn test_missing_actions_rejected() {
        let text = r#"{"executive_summary":"x"}"#;
        assert_matches!(parse_insights(text), Err(InsightError::TooFewActions(0)));
    }

    #[test]
    fn test_actions_are_trimmed_and_clipped() {
        let text = r#"{"executive_summary":" Busy day. ","bullet_actions":[" 1 ","2","3","4","5","6","7","8"]}"#;
        let result = parse_insights(text).unwrap();

        assert_eq!(result.executive_summary, "Busy day.");
        assert_eq!(result.bullet_actions, vec!["1", "2", "3", "4", "5", "6"]);
    }
}
