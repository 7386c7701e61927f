//! Earnings Call Analyzer Service
//!
//! Accepts an uploaded PDF transcript, extracts its text, asks a hosted
//! language model for a structured read of management tone and guidance,
//! and returns the parsed JSON.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
pub use state::AppState;
