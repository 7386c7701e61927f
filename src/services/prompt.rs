//! Prompt construction for transcript analysis.

/// Hard cutoff applied to the transcript before it is embedded in the prompt,
/// counted in characters rather than bytes or tokens.
pub const MAX_TRANSCRIPT_CHARS: usize = 15_000;

pub const ANALYSIS_INSTRUCTIONS: &str = r#"You are a financial research assistant. Analyze the following earnings call transcript.
Return ONLY valid JSON in this exact format:
{
  "management_tone": "",
  "confidence_level": "",
  "key_positives": [],
  "key_concerns": [],
  "forward_guidance": { "revenue": "", "margin": "", "capex": "" },
  "capacity_utilization": "",
  "new_growth_initiatives": []
}
If something is not mentioned, write "Not mentioned". Do not hallucinate."#;

/// Returns at most the first `MAX_TRANSCRIPT_CHARS` characters of `text`.
pub fn truncate_transcript(text: &str) -> &str {
    match text.char_indices().nth(MAX_TRANSCRIPT_CHARS) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn build_prompt(text: &str) -> String {
    format!(
        "{}\n\nTranscript:\n{}\n",
        ANALYSIS_INSTRUCTIONS,
        truncate_transcript(text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_embedded_unmodified() {
        let text = "Revenue grew 12% year over year.\nMargins held steady.\n";
        assert_eq!(truncate_transcript(text), text);

        let prompt = build_prompt(text);
        assert!(prompt.starts_with(ANALYSIS_INSTRUCTIONS));
        assert!(prompt.ends_with(&format!("Transcript:\n{}\n", text)));
    }

    #[test]
    fn test_long_text_is_cut_at_exact_character_count() {
        let text = "a".repeat(MAX_TRANSCRIPT_CHARS + 500);
        let truncated = truncate_transcript(&text);
        assert_eq!(truncated.chars().count(), MAX_TRANSCRIPT_CHARS);
        assert_eq!(truncated, &text[..MAX_TRANSCRIPT_CHARS]);
    }

    #[test]
    fn test_text_at_limit_is_untouched() {
        let text = "b".repeat(MAX_TRANSCRIPT_CHARS);
        assert_eq!(truncate_transcript(&text), text.as_str());
    }

    #[test]
    fn test_truncation_is_idempotent() {
        let text = "x".repeat(MAX_TRANSCRIPT_CHARS * 2);
        let once = truncate_transcript(&text);
        assert_eq!(truncate_transcript(once), once);
    }

    #[test]
    fn test_truncation_never_splits_multibyte_characters() {
        let text = "€".repeat(MAX_TRANSCRIPT_CHARS + 1);
        let truncated = truncate_transcript(&text);
        assert_eq!(truncated.chars().count(), MAX_TRANSCRIPT_CHARS);
        assert!(truncated.chars().all(|c| c == '€'));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt("same input"), build_prompt("same input"));
    }

    #[test]
    fn test_instructions_forbid_hallucination() {
        assert!(ANALYSIS_INSTRUCTIONS.contains("\"Not mentioned\""));
        for key in [
            "management_tone",
            "confidence_level",
            "key_positives",
            "key_concerns",
            "forward_guidance",
            "capacity_utilization",
            "new_growth_initiatives",
        ] {
            assert!(ANALYSIS_INSTRUCTIONS.contains(key), "missing {}", key);
        }
    }
}
