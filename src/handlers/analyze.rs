use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        State,
    },
    http::{HeaderMap, StatusCode},
    response::Json,
};
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::request_id;
use crate::models::{AnalysisResult, UploadedDocument};
use crate::services::Stage;
use crate::state::AppState;

pub const FILE_FIELD: &str = "file";

pub async fn analyze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<AnalysisResult>> {
    let start = Instant::now();
    let request_id = request_id(&headers);

    info!(request_id = %request_id, stage = %Stage::Received, "Starting analysis request");

    let mut multipart = multipart.map_err(|e| {
        warn!(request_id = %request_id, error = %e, "Request body is not a multipart form");
        AppError::MissingFile
    })?;

    let document = match store_upload(&mut multipart, &state.config).await {
        Ok(document) => {
            info!(
                request_id = %request_id,
                stage = %Stage::FileStored,
                file_name = %document.name,
                file_size = document.size,
                declared_pdf = document.is_declared_pdf(),
                path = %document.path().display(),
                "Upload stored"
            );
            document
        }
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "Failed to store upload");
            return Err(e);
        }
    };

    let outcome = state.pipeline.run(&request_id, &document).await;
    document.cleanup();

    let result = outcome?;

    info!(
        request_id = %request_id,
        stage = %Stage::Responded,
        total_time_ms = start.elapsed().as_millis() as u64,
        "Request completed successfully"
    );

    Ok(Json(result))
}

/// Streams the `file` field into a fresh temporary file under the upload
/// directory. Other fields are skipped.
async fn store_upload(multipart: &mut Multipart, config: &Config) -> AppResult<UploadedDocument> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, config))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());

        tokio::fs::create_dir_all(&config.upload_dir)
            .await
            .map_err(|e| AppError::storage(format!("Failed to create upload directory: {}", e)))?;

        let temp_file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".pdf")
            .tempfile_in(&config.upload_dir)
            .map_err(|e| AppError::storage(format!("Failed to create temporary file: {}", e)))?;

        // `path` removes the file when dropped, including on early return below
        let (file, path) = temp_file.into_parts();
        let mut out = tokio::fs::File::from_std(file);
        let mut size: u64 = 0;

        while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, config))? {
            out.write_all(&chunk)
                .await
                .map_err(|e| AppError::storage(format!("Failed to write upload: {}", e)))?;
            size += chunk.len() as u64;
        }
        out.flush().await?;
        drop(out);

        let mut document = UploadedDocument::new(file_name, size, path);
        if let Some(mime_type) = content_type {
            document = document.with_mime_type(mime_type);
        }

        return Ok(document);
    }

    Err(AppError::MissingFile)
}

fn multipart_error(err: MultipartError, config: &Config) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge {
            limit: config.max_file_size_mb,
        }
    } else {
        error!(error = %err, "Failed to read multipart body");
        AppError::invalid_upload(err.body_text())
    }
}
