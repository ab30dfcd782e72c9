//! Sequential execution of staged upload plans.

use std::sync::Arc;

use crate::error::{IntakeError, Result};
use crate::http::{HttpClient, HttpRequest};
use crate::reporter::StatusReporter;
use crate::selection::SelectionStore;
use crate::types::{FileStatus, PROGRESS_CONFIRMING, PROGRESS_DONE, PROGRESS_UPLOADING};
use crate::wire::{self, UploadPlan};

/// Executes upload plans strictly in submission order.
///
/// Plan i carries the bytes of descriptor i; index i+1 never starts before
/// index i reaches `Done` or `Errored`. The first unrecoverable failure halts
/// the remaining indices: the staged backend cannot retry a single document
/// without issuing a fresh plan, so later transfers would target a case whose
/// integrity is already in question. At the moment of any failure, everything
/// before the failing index is `Done` and everything after is still `Pending`.
pub struct TransferExecutor<H: HttpClient> {
    http: Arc<H>,
    base_url: String,
}

impl<H: HttpClient> TransferExecutor<H> {
    pub fn new(http: Arc<H>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Transfer every document of the case, one index at a time.
    #[tracing::instrument(skip(self, plans, store, reporter), fields(case_id = %case_id, count = plans.len()))]
    pub async fn run(
        &self,
        case_id: &str,
        plans: &[UploadPlan],
        store: &mut SelectionStore,
        reporter: &mut StatusReporter,
    ) -> Result<()> {
        for (index, plan) in plans.iter().enumerate() {
            self.transfer_one(case_id, index, plan, store, reporter)
                .await?;
        }
        Ok(())
    }

    async fn transfer_one(
        &self,
        case_id: &str,
        index: usize,
        plan: &UploadPlan,
        store: &mut SelectionStore,
        reporter: &mut StatusReporter,
    ) -> Result<()> {
        let (filename, content) = {
            let file = store
                .files()
                .get(index)
                .ok_or(IntakeError::IndexOutOfBounds(index))?;
            (file.filename.clone(), file.content.clone())
        };

        store.set_progress(index, FileStatus::Uploading, PROGRESS_UPLOADING)?;
        reporter.info(format!("Uploading \"{}\"...", filename));

        let mut upload = HttpRequest::bytes(plan.method(), plan.upload_url.clone(), content);
        if let Some(headers) = &plan.headers {
            for (name, value) in headers {
                upload.headers.push((name.clone(), value.clone()));
            }
        }

        let response = match self.http.execute(&upload).await {
            Ok(response) => response,
            Err(e) => return self.fail(index, &filename, e.to_string(), store, reporter),
        };
        if !response.is_success() {
            let message = wire::error_message(&response);
            return self.fail(index, &filename, message, store, reporter);
        }

        store.set_progress(index, FileStatus::Confirming, PROGRESS_CONFIRMING)?;
        reporter.info(format!("Confirming \"{}\"...", filename));

        let confirm = HttpRequest::empty(
            "POST",
            format!(
                "{}/api/cases/{}/documents/{}/complete",
                self.base_url, case_id, plan.document_id
            ),
        );

        let response = match self.http.execute(&confirm).await {
            Ok(response) => response,
            Err(e) => return self.fail(index, &filename, e.to_string(), store, reporter),
        };
        if !response.is_success() {
            let message = wire::error_message(&response);
            return self.fail(index, &filename, message, store, reporter);
        }

        let confirmed: wire::CompletedDocument = match serde_json::from_str(&response.body) {
            Ok(parsed) => parsed,
            Err(e) => {
                let message = format!("unreadable confirmation: {}", e);
                return self.fail(index, &filename, message, store, reporter);
            }
        };

        store.set_progress(index, FileStatus::Done, PROGRESS_DONE)?;
        reporter.success(format!(
            "\"{}\" validated ({})",
            filename,
            confirmed.document_type.label()
        ));
        Ok(())
    }

    /// Mark the descriptor errored, log, and propagate to halt the batch.
    fn fail(
        &self,
        index: usize,
        filename: &str,
        message: String,
        store: &mut SelectionStore,
        reporter: &mut StatusReporter,
    ) -> Result<()> {
        store.set_error(index, message.clone())?;
        reporter.error(format!("Transfer failed for \"{}\": {}", filename, message));
        Err(IntakeError::Transfer {
            filename: filename.to_string(),
            message,
        })
    }
}
