use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

use super::prompts;
use super::AiError;

/// Adapter over the external generative-language service.
///
/// One request/response round trip per call: no retries, no streaming.
/// Object-safe so the API state can hold `Arc<dyn ReviewGenerator>` and
/// tests can substitute a mock.
pub trait ReviewGenerator: Send + Sync {
    /// Produce a review report for extracted document text.
    fn review<'a>(&'a self, content: &'a str) -> BoxFuture<'a, Result<String, AiError>>;

    /// Generate a legal document from a user-assembled prompt.
    fn generate_document<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AiError>>;
}

/// HTTP client for a Gemini-style generateContent endpoint.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Client configured from the environment.
    pub fn from_env() -> Self {
        Self::new(
            &crate::config::ai_base_url(),
            &crate::config::ai_api_key(),
            &crate::config::ai_model(),
        )
    }

    /// Send `history` plus the live `user_turn`, returning the first
    /// candidate's text.
    async fn generate(
        &self,
        preamble: &str,
        ack: &str,
        user_turn: &str,
    ) -> Result<String, AiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateRequest {
            contents: vec![
                TurnContent::user(preamble),
                TurnContent::model(ack),
                TurnContent::user(user_turn),
            ],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::ResponseParsing(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }
}

impl ReviewGenerator for GeminiClient {
    fn review<'a>(&'a self, content: &'a str) -> BoxFuture<'a, Result<String, AiError>> {
        async move {
            let turn = prompts::review_turn(content);
            self.generate(
                prompts::DOCUMENT_REVIEW_PREAMBLE,
                prompts::DOCUMENT_REVIEW_ACK,
                &turn,
            )
            .await
        }
        .boxed()
    }

    fn generate_document<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AiError>> {
        self.generate(
            prompts::LEGAL_DOCUMENT_PREAMBLE,
            prompts::LEGAL_DOCUMENT_ACK,
            prompt,
        )
        .boxed()
    }
}

// ── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<TurnContent>,
}

#[derive(Serialize, Deserialize)]
struct TurnContent {
    role: String,
    parts: Vec<TurnPart>,
}

impl TurnContent {
    fn user(text: &str) -> Self {
        Self {
            role: "user".into(),
            parts: vec![TurnPart { text: text.into() }],
        }
    }

    fn model(text: &str) -> Self {
        Self {
            role: "model".into(),
            parts: vec![TurnPart { text: text.into() }],
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TurnPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: TurnContent,
}

// ── Mock for tests ──────────────────────────────────────────

/// Mock generator — returns a configured response or failure and counts
/// calls, so tests can assert the adapter was (not) invoked.
pub struct MockReviewGenerator {
    response: Option<String>,
    calls: AtomicUsize,
}

impl MockReviewGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock whose every call fails, for partial-failure paths.
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of adapter invocations so far (review + generate combined).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(AiError::Http("simulated adapter failure".into())),
        }
    }
}

impl ReviewGenerator for MockReviewGenerator {
    fn review<'a>(&'a self, _content: &'a str) -> BoxFuture<'a, Result<String, AiError>> {
        async move { self.respond() }.boxed()
    }

    fn generate_document<'a>(&'a self, _prompt: &'a str) -> BoxFuture<'a, Result<String, AiError>> {
        async move { self.respond() }.boxed()
    }
}
