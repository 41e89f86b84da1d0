//! Legal document generation.
//!
//! Folds user parameters into a single prompt, sends it through the
//! generative adapter with the document-generation preamble, and persists
//! the result. Straight-line flow; failures surface as one generic fault.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::repository::document;
use crate::db::{Db, DatabaseError};
use crate::intelligence::ReviewGenerator;
use crate::models::enums::DocumentType;
use crate::models::Document;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to generate document")]
    GenerationFailed,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Parameters for a generation request.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    pub title: String,
    pub description: Option<String>,
    pub document_type: DocumentType,
    pub jurisdiction: Option<String>,
    pub effective_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct DocumentService {
    db: Db,
    generator: Arc<dyn ReviewGenerator>,
}

impl DocumentService {
    pub fn new(db: Db, generator: Arc<dyn ReviewGenerator>) -> Self {
        Self { db, generator }
    }

    pub async fn generate(
        &self,
        user_id: &Uuid,
        request: DocumentRequest,
    ) -> Result<Document, DocumentError> {
        let prompt = build_prompt(&request);

        let content = self
            .generator
            .generate_document(&prompt)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Document generation failed");
                DocumentError::GenerationFailed
            })?;

        let now = crate::db::repository::now();
        let doc = Document {
            id: Uuid::new_v4(),
            user_id: *user_id,
            title: request.title,
            description: request.description,
            content,
            document_type: request.document_type,
            jurisdiction: request.jurisdiction,
            effective_date: request.effective_date,
            created_at: now,
            updated_at: now,
        };

        {
            let conn = self
                .db
                .lock()
                .map_err(|_| DatabaseError::ConstraintViolation("lock poisoned".into()))?;
            document::insert_document(&conn, &doc)?;
        }

        tracing::info!(document_id = %doc.id, user_id = %user_id, "Generated legal document");
        Ok(doc)
    }
}

fn build_prompt(request: &DocumentRequest) -> String {
    let mut prompt = format!(
        "Generate a {} titled \"{}\".",
        request.document_type.as_str(),
        request.title
    );
    if let Some(jurisdiction) = &request.jurisdiction {
        prompt.push_str(&format!(" Governing jurisdiction: {jurisdiction}."));
    }
    if let Some(date) = &request.effective_date {
        prompt.push_str(&format!(" Effective date: {date}."));
    }
    if let Some(description) = &request.description {
        prompt.push_str(&format!("\n\nRequirements:\n{description}"));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::document::get_documents_for_user;
    use crate::intelligence::MockReviewGenerator;

    fn request() -> DocumentRequest {
        DocumentRequest {
            title: "Mutual NDA".into(),
            description: Some("Two-way confidentiality, 3-year term.".into()),
            document_type: DocumentType::Nda,
            jurisdiction: Some("Kenya".into()),
            effective_date: NaiveDate::from_ymd_opt(2026, 10, 1),
        }
    }

    #[tokio::test]
    async fn generation_persists_the_document() {
        let db = crate::db::shared(crate::db::open_in_memory().unwrap());
        let generator = Arc::new(MockReviewGenerator::new("# Mutual NDA\n1. Definitions..."));
        let service = DocumentService::new(db.clone(), generator.clone());
        let user = Uuid::new_v4();

        let doc = service.generate(&user, request()).await.unwrap();
        assert!(doc.content.starts_with("# Mutual NDA"));
        assert_eq!(generator.calls(), 1);

        let conn = db.lock().unwrap();
        let listed = get_documents_for_user(&conn, &user).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, doc.id);
    }

    #[tokio::test]
    async fn adapter_failure_persists_nothing() {
        let db = crate::db::shared(crate::db::open_in_memory().unwrap());
        let service =
            DocumentService::new(db.clone(), Arc::new(MockReviewGenerator::failing()));
        let user = Uuid::new_v4();

        let err = service.generate(&user, request()).await.unwrap_err();
        assert!(matches!(err, DocumentError::GenerationFailed));

        let conn = db.lock().unwrap();
        assert!(get_documents_for_user(&conn, &user).unwrap().is_empty());
    }

    #[test]
    fn prompt_includes_all_provided_fields() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("nda"));
        assert!(prompt.contains("Mutual NDA"));
        assert!(prompt.contains("Kenya"));
        assert!(prompt.contains("2026-10-01"));
        assert!(prompt.contains("3-year term"));
    }

    #[test]
    fn prompt_omits_absent_fields() {
        let prompt = build_prompt(&DocumentRequest {
            title: "Policy".into(),
            description: None,
            document_type: DocumentType::Policy,
            jurisdiction: None,
            effective_date: None,
        });
        assert!(!prompt.contains("jurisdiction"));
        assert!(!prompt.contains("Requirements"));
    }
}
