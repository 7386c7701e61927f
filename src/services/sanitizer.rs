use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::AnalysisResult;

const FENCE: &str = "```";

/// Strips one leading code fence (with an optional `json` tag) and one
/// trailing fence, then trims surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut cleaned = raw.trim();

    if let Some(rest) = cleaned.strip_prefix(FENCE) {
        cleaned = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }

    if let Some(rest) = cleaned.trim_end().strip_suffix(FENCE) {
        cleaned = rest;
    }

    cleaned.trim()
}

/// Parses a completion as JSON, then checks it against the analysis shape.
pub fn parse_completion(raw: &str) -> AppResult<AnalysisResult> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(cleaned)?;

    serde_json::from_value(value).map_err(|e| AppError::schema(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{"management_tone":"Optimistic","confidence_level":"High","key_positives":["Record revenue"],"key_concerns":[],"forward_guidance":{"revenue":"Up 10%","margin":"Not mentioned","capex":"Flat"},"capacity_utilization":"85%","new_growth_initiatives":["EV batteries"]}"#;

    #[test]
    fn test_clean_json_is_untouched() {
        assert_eq!(strip_code_fences(CLEAN), CLEAN);
        assert_eq!(strip_code_fences(strip_code_fences(CLEAN)), CLEAN);
    }

    #[test]
    fn test_json_fence_is_removed() {
        let fenced = format!("```json\n{}\n```", CLEAN);
        assert_eq!(strip_code_fences(&fenced), CLEAN);

        let result = parse_completion(&fenced).unwrap();
        assert_eq!(result.management_tone, "Optimistic");
        assert_eq!(result.forward_guidance.capex, "Flat");
    }

    #[test]
    fn test_bare_and_uppercase_fences_are_removed() {
        assert_eq!(strip_code_fences(&format!("```\n{}\n```", CLEAN)), CLEAN);
        assert_eq!(strip_code_fences(&format!("  ```JSON {} ```  ", CLEAN)), CLEAN);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = parse_completion("```json\n{\"management_tone\": \n```").unwrap_err();
        assert!(matches!(err, AppError::InvalidCompletion { .. }));
    }

    #[test]
    fn test_missing_field_is_schema_mismatch() {
        let err = parse_completion(r#"{"management_tone":"Cautious"}"#).unwrap_err();
        match err {
            AppError::SchemaMismatch { message } => assert!(message.contains("confidence_level")),
            other => panic!("Expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_not_mentioned_list_is_accepted() {
        let raw = CLEAN.replace(r#""key_concerns":[]"#, r#""key_concerns":"Not mentioned""#);
        let result = parse_completion(&raw).unwrap();
        assert_eq!(result.key_concerns, vec!["Not mentioned".to_string()]);
        assert_eq!(result.key_positives, vec!["Record revenue".to_string()]);
    }

    #[test]
    fn test_numeric_and_null_values_are_coerced() {
        let raw = CLEAN
            .replace(r#""capacity_utilization":"85%""#, r#""capacity_utilization":85"#)
            .replace(r#""margin":"Not mentioned""#, r#""margin":null"#)
            .replace(r#""new_growth_initiatives":["EV batteries"]"#, r#""new_growth_initiatives":null"#);
        let result = parse_completion(&raw).unwrap();
        assert_eq!(result.capacity_utilization, "85");
        assert_eq!(result.forward_guidance.margin, "Not mentioned");
        assert!(result.new_growth_initiatives.is_empty());
    }

    #[test]
    fn test_object_in_list_field_is_rejected() {
        let raw = CLEAN.replace(r#""key_concerns":[]"#, r#""key_concerns":{"a":1}"#);
        let err = parse_completion(&raw).unwrap_err();
        assert!(matches!(err, AppError::SchemaMismatch { .. }));
    }
}
