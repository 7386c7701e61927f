//! Helpers shared by the integration test binaries.
#![allow(dead_code)]

use std::path::Path;

use earnings_analyzer::{create_router, AppState, Config};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use serde_json::json;
use tokio::net::TcpListener;

/// Builds a PDF with one page per entry. `Some(text)` draws that text,
/// `None` draws only a filled rectangle, like a scanned page with no text layer.
pub fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![
                Operation::new("re", vec![50.into(), 50.into(), 400.into(), 600.into()]),
                Operation::new("f", vec![]),
            ],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

pub fn sample_analysis() -> serde_json::Value {
    json!({
        "management_tone": "Optimistic",
        "confidence_level": "High",
        "key_positives": ["Record quarterly revenue", "Strong order book"],
        "key_concerns": ["Input cost inflation"],
        "forward_guidance": {
            "revenue": "Mid-teens growth expected",
            "margin": "Stable at 18-19%",
            "capex": "Not mentioned"
        },
        "capacity_utilization": "82%",
        "new_growth_initiatives": ["Battery storage plant"]
    })
}

/// An OpenAI-compatible chat completion envelope carrying `content`.
pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "llama-3.1-8b-instant",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
    .to_string()
}

pub fn test_config(upload_dir: &Path, api_base: &str) -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        upload_dir: upload_dir.to_path_buf(),
        groq_api_key: Some("test-key".to_string()),
        groq_api_base: api_base.to_string(),
        ..Config::default()
    }
}

/// Serves the app on an ephemeral port and returns its base URL.
pub async fn spawn_app(state: AppState) -> String {
    let app = create_router(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn pdf_form(pdf: Vec<u8>) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(pdf)
        .file_name("earnings-call.pdf")
        .mime_str("application/pdf")
        .unwrap();
    reqwest::multipart::Form::new().part("file", part)
}

pub fn remaining_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
