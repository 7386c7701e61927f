use std::sync::Arc;

use crate::config::Config;
use crate::services::{AnalysisPipeline, CompletionClient, GroqClient, PdfTextExtractor, TextExtractor};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<AnalysisPipeline>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let completions = Arc::new(GroqClient::new(&config));
        Self::with_services(config, Arc::new(PdfTextExtractor::new()), completions)
    }

    pub fn with_services(
        config: Config,
        extractor: Arc<dyn TextExtractor>,
        completions: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(AnalysisPipeline::new(extractor, completions)),
        }
    }
}
