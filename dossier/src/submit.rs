//! Case creation against either intake backend.

use std::sync::Arc;

use base64::Engine as _;

use crate::error::{IntakeError, Result};
use crate::http::{HttpClient, HttpRequest};
use crate::selection::SelectionStore;
use crate::wire::{self, UploadPlan};

/// Which intake backend the orchestrator talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeProtocol {
    /// File bytes travel base64-encoded inside the case-creation request;
    /// a successful response finalizes the whole case atomically.
    Embedded,
    /// Case creation returns per-document upload plans, each executed as a
    /// separate upload-then-confirm exchange.
    Staged,
}

/// Parsed result of a successful case creation.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Embedded protocol: the case is fully persisted, nothing left to send.
    Finalized { case_id: String },
    /// Staged protocol: plans to execute, positionally matched to the store.
    Planned {
        case_id: String,
        plans: Vec<UploadPlan>,
    },
}

/// Builds the case-creation payload from the selection store, in order, and
/// sends it to the backend.
pub struct SubmissionClient<H: HttpClient> {
    http: Arc<H>,
    base_url: String,
}

impl<H: HttpClient> SubmissionClient<H> {
    pub fn new(http: Arc<H>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Create a case for the current selection.
    ///
    /// No descriptor changes state here: a failure leaves the whole batch
    /// untouched, whichever protocol is in use.
    pub async fn submit(
        &self,
        protocol: IntakeProtocol,
        store: &SelectionStore,
    ) -> Result<SubmissionOutcome> {
        match protocol {
            IntakeProtocol::Embedded => self.submit_embedded(store).await,
            IntakeProtocol::Staged => self.submit_staged(store).await,
        }
    }

    async fn submit_embedded(&self, store: &SelectionStore) -> Result<SubmissionOutcome> {
        // Entries are encoded concurrently; ordering does not matter while
        // gathering, since one atomic request carries the whole batch.
        let documents =
            futures::future::try_join_all(store.files().iter().map(|file| async move {
                let document_type = file
                    .document_type
                    .ok_or_else(|| IntakeError::MissingDocumentType(file.filename.clone()))?;
                let content = base64::engine::general_purpose::STANDARD.encode(&file.content);
                Ok::<_, IntakeError>(wire::EmbeddedDocument {
                    name: file.filename.clone(),
                    document_type,
                    content,
                })
            }))
            .await?;

        let request = HttpRequest::json(
            "POST",
            format!("{}/cases", self.base_url),
            serde_json::to_value(wire::EmbeddedCaseRequest { documents })?,
        );

        let response = self.http.execute(&request).await?;
        if !response.is_success() {
            return Err(IntakeError::Submission(wire::error_message(&response)));
        }

        let parsed: wire::EmbeddedCaseResponse = serde_json::from_str(&response.body)?;
        Ok(SubmissionOutcome::Finalized {
            case_id: parsed.case_id,
        })
    }

    async fn submit_staged(&self, store: &SelectionStore) -> Result<SubmissionOutcome> {
        let mut documents = Vec::with_capacity(store.len());
        for file in store.files() {
            let document_type = file
                .document_type
                .ok_or_else(|| IntakeError::MissingDocumentType(file.filename.clone()))?;
            documents.push(wire::StagedDocument {
                filename: file.filename.clone(),
                mime_type: file.content_type.clone(),
                size_bytes: file.size(),
                document_type,
            });
        }
        let submitted = documents.len();

        let request = HttpRequest::json(
            "POST",
            format!("{}/api/cases", self.base_url),
            serde_json::to_value(wire::StagedCaseRequest { documents })?,
        );

        let response = self.http.execute(&request).await?;
        if !response.is_success() {
            return Err(IntakeError::Submission(wire::error_message(&response)));
        }

        let parsed: wire::StagedCaseResponse = serde_json::from_str(&response.body)?;

        // Transfers are driven by index correlation, so a mismatched plan
        // array is a submission failure before anything moves.
        if parsed.uploads.len() != submitted {
            return Err(IntakeError::PlanMismatch {
                expected: submitted,
                got: parsed.uploads.len(),
            });
        }

        Ok(SubmissionOutcome::Planned {
            case_id: parsed.case_id,
            plans: parsed.uploads,
        })
    }

    /// Fetch the backend's case listing (`GET /cases`).
    pub async fn list_cases(&self) -> Result<Vec<wire::CaseSummary>> {
        let request = HttpRequest::empty("GET", format!("{}/cases", self.base_url));

        let response = self.http.execute(&request).await?;
        if !response.is_success() {
            return Err(IntakeError::Submission(wire::error_message(&response)));
        }

        let parsed: wire::CaseList = serde_json::from_str(&response.body)?;
        Ok(parsed.cases)
    }
}
