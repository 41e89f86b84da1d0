//! The contract review workflow.
//!
//! Drives one contract through extraction, AI review and persistence:
//! pending → in_review → completed, reverting to pending when any step after
//! the initial status write fails. Entry into in_review is a conditional
//! write, so two racing invocations cannot both run the pipeline — the loser
//! gets a definite conflict instead of producing a duplicate review.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::config::SIGNED_URL_TTL_SECS;
use crate::db::repository::{contract, review};
use crate::db::{Db, DatabaseError};
use crate::intelligence::{AiError, ReviewGenerator};
use crate::models::enums::ContractStatus;
use crate::models::{Contract, ContractReview};
use crate::pipeline::extraction;
use crate::pipeline::ExtractionError;
use crate::storage::{ObjectStore, StorageError};

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Contract not found")]
    NotFound,

    #[error("Contract is already being reviewed")]
    AlreadyInReview,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// All downstream faults (storage, extraction, AI, persistence) collapse
    /// here after the rollback; the diagnostic goes to the log, not the user.
    #[error("Failed to review document")]
    ReviewFailed,
}

/// Faults inside the in_review window. Internal: logged, then collapsed to
/// `WorkflowError::ReviewFailed`.
#[derive(Error, Debug)]
enum StepError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error("contract status changed during review")]
    StatusConflict,
}

#[derive(Clone)]
pub struct ReviewWorkflow {
    db: Db,
    store: Arc<ObjectStore>,
    generator: Arc<dyn ReviewGenerator>,
}

impl ReviewWorkflow {
    pub fn new(db: Db, store: Arc<ObjectStore>, generator: Arc<dyn ReviewGenerator>) -> Self {
        Self {
            db,
            store,
            generator,
        }
    }

    /// Review a contract, returning the report text.
    ///
    /// Re-invoking on a completed contract returns the stored review without
    /// touching the AI adapter.
    pub async fn review_contract(&self, contract_id: &Uuid) -> Result<String, WorkflowError> {
        let contract = {
            let conn = self.db.lock().map_err(|_| WorkflowError::ReviewFailed)?;
            contract::get_contract(&conn, contract_id)?
        }
        .ok_or(WorkflowError::NotFound)?;

        match contract.status {
            ContractStatus::InReview => return Err(WorkflowError::AlreadyInReview),
            ContractStatus::Completed => {
                let stored = {
                    let conn = self.db.lock().map_err(|_| WorkflowError::ReviewFailed)?;
                    review::get_review_for_contract(&conn, contract_id)?
                };
                if let Some(existing) = stored {
                    tracing::info!(contract_id = %contract_id, "Returning stored review");
                    return Ok(existing.content);
                }
                // Completed without a review row: repair by re-running below.
            }
            ContractStatus::Pending => {}
        }

        // Guarded entry: exactly one caller wins this transition.
        let entered = {
            let conn = self.db.lock().map_err(|_| WorkflowError::ReviewFailed)?;
            contract::update_status_if(&conn, contract_id, contract.status, ContractStatus::InReview)?
        };
        if !entered {
            return Err(WorkflowError::AlreadyInReview);
        }

        match self.run_steps(&contract).await {
            Ok(report) => {
                tracing::info!(contract_id = %contract_id, "Contract review completed");
                Ok(report)
            }
            Err(err) => {
                tracing::error!(contract_id = %contract_id, error = %err, "Contract review failed, reverting to pending");
                // Best-effort rollback; the original fault is what we report
                let conn = self.db.lock().map_err(|_| WorkflowError::ReviewFailed)?;
                if let Err(rollback) =
                    contract::force_status(&conn, contract_id, ContractStatus::Pending)
                {
                    tracing::warn!(contract_id = %contract_id, error = %rollback, "Status rollback failed");
                }
                Err(WorkflowError::ReviewFailed)
            }
        }
    }

    /// Steps 2–6 of the workflow, all inside the in_review window.
    async fn run_steps(&self, contract: &Contract) -> Result<String, StepError> {
        // Time-limited access to the stored file; extraction must finish
        // within the URL's validity.
        let signed = self
            .store
            .create_signed_url(&contract.file_path, SIGNED_URL_TTL_SECS)?;
        let bytes = self.store.resolve_signed(&signed.token)?;

        let text = extraction::extract(&bytes, &contract.file_type)?;
        tracing::debug!(
            contract_id = %contract.id,
            chars = text.len(),
            "Extracted contract text"
        );

        let report = self.generator.review(&text).await?;

        {
            let conn = self.db.lock().map_err(|_| {
                StepError::Database(DatabaseError::ConstraintViolation("lock poisoned".into()))
            })?;
            review::insert_review(
                &conn,
                &ContractReview {
                    id: Uuid::new_v4(),
                    contract_id: contract.id,
                    content: report.clone(),
                    created_at: crate::db::repository::now(),
                },
            )?;

            let completed = contract::update_status_if(
                &conn,
                &contract.id,
                ContractStatus::InReview,
                ContractStatus::Completed,
            )?;
            if !completed {
                return Err(StepError::StatusConflict);
            }
        }

        Ok(report)
    }
}
