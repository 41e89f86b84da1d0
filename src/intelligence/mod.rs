pub mod client;
pub mod prompts;

pub use client::{GeminiClient, MockReviewGenerator, ReviewGenerator};

use thiserror::Error;

/// Failures from the generative-language service. Callers surface these as
/// one generic fault; the variants exist for diagnostics, not branching.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Generative API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Could not parse generative API response: {0}")]
    ResponseParsing(String),

    #[error("Generative API returned no candidates")]
    EmptyResponse,
}
