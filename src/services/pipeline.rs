use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::AppResult;
use crate::models::{AnalysisResult, UploadedDocument};
use crate::services::inference::CompletionClient;
use crate::services::pdf_processor::{ExtractionError, TextExtractor};
use crate::services::{prompt, sanitizer};

/// Per-request lifecycle. Cleanup is not a stage: it runs after whichever
/// stage was last reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    FileStored,
    TextExtracted,
    PromptBuilt,
    InferenceComplete,
    ResultParsed,
    Responded,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Received => "received",
            Stage::FileStored => "file_stored",
            Stage::TextExtracted => "text_extracted",
            Stage::PromptBuilt => "prompt_built",
            Stage::InferenceComplete => "inference_complete",
            Stage::ResultParsed => "result_parsed",
            Stage::Responded => "responded",
        };
        f.write_str(name)
    }
}

pub struct AnalysisPipeline {
    extractor: Arc<dyn TextExtractor>,
    completions: Arc<dyn CompletionClient>,
}

impl AnalysisPipeline {
    pub fn new(extractor: Arc<dyn TextExtractor>, completions: Arc<dyn CompletionClient>) -> Self {
        Self {
            extractor,
            completions,
        }
    }

    pub fn inference_configured(&self) -> bool {
        self.completions.is_configured()
    }

    /// Runs extract → prompt → infer → parse over a stored upload. The caller
    /// owns the document and is responsible for cleaning it up.
    pub async fn run(&self, request_id: &str, document: &UploadedDocument) -> AppResult<AnalysisResult> {
        let start = Instant::now();
        let mut stage = Stage::FileStored;

        match self.run_stages(request_id, document, &mut stage).await {
            Ok(result) => {
                info!(
                    request_id = %request_id,
                    stage = %stage,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Analysis completed"
                );
                Ok(result)
            }
            Err(e) => {
                error!(
                    request_id = %request_id,
                    stage = %stage,
                    error_code = e.error_code(),
                    error = %e,
                    "Analysis failed"
                );
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        request_id: &str,
        document: &UploadedDocument,
        stage: &mut Stage,
    ) -> AppResult<AnalysisResult> {
        let pdf_data = tokio::fs::read(document.path()).await?;

        let extractor = Arc::clone(&self.extractor);
        let text = tokio::task::spawn_blocking(move || extractor.extract(&pdf_data))
            .await
            .map_err(|e| ExtractionError::Aborted(e.to_string()))??;
        advance(request_id, stage, Stage::TextExtracted);
        info!(
            request_id = %request_id,
            characters = text.chars().count(),
            "Successfully extracted text"
        );

        let prompt = prompt::build_prompt(&text);
        advance(request_id, stage, Stage::PromptBuilt);

        let completion = self.completions.complete(&prompt).await?;
        advance(request_id, stage, Stage::InferenceComplete);
        debug!(request_id = %request_id, completion_chars = completion.len(), "Completion received");

        let result = sanitizer::parse_completion(&completion)?;
        advance(request_id, stage, Stage::ResultParsed);

        Ok(result)
    }
}

fn advance(request_id: &str, stage: &mut Stage, next: Stage) {
    debug!(request_id = %request_id, from = %stage, to = %next, "Pipeline stage advanced");
    *stage = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::Received.to_string(), "received");
        assert_eq!(Stage::InferenceComplete.to_string(), "inference_complete");
        assert_eq!(Stage::Responded.to_string(), "responded");
    }
}
