pub mod inference;
pub mod pdf_processor;
pub mod pipeline;
pub mod prompt;
pub mod sanitizer;

pub use inference::{CompletionClient, GroqClient, InferenceError};
pub use pdf_processor::{ExtractionError, PdfTextExtractor, TextExtractor};
pub use pipeline::{AnalysisPipeline, Stage};
