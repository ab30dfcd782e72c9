//! Top-level intake orchestration: selection, submission, transfer, status.

use std::sync::Arc;

use crate::error::{IntakeError, Result};
use crate::http::HttpClient;
use crate::policy::Candidate;
use crate::reporter::{LogEntry, StatusReporter};
use crate::selection::{AddOutcome, FileDescriptor, SelectionStore};
use crate::submit::{IntakeProtocol, SubmissionClient, SubmissionOutcome};
use crate::transfer::TransferExecutor;
use crate::types::{DocumentType, FileStatus, PROGRESS_DONE};
use crate::wire::CaseSummary;

/// Configuration for one intake session.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Backend base URL, without a trailing slash.
    pub base_url: String,
    pub protocol: IntakeProtocol,
}

/// Handed back to the caller after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub case_id: String,
}

/// Owns one case intake from file selection to confirmed documents.
///
/// Instances are independent; nothing is shared process-wide, so any number
/// of orchestrators can coexist. The selection is user-mutated until `submit`
/// seals it, after which only the transfer loop touches per-file status
/// fields.
pub struct IntakeOrchestrator<H: HttpClient> {
    http: Arc<H>,
    config: IntakeConfig,
    store: SelectionStore,
    reporter: StatusReporter,
}

impl<H: HttpClient> IntakeOrchestrator<H> {
    pub fn new(http: Arc<H>, config: IntakeConfig) -> Self {
        let mut reporter = StatusReporter::new();
        reporter.info("Select your supporting documents to get started.");
        Self {
            http,
            config,
            store: SelectionStore::new(),
            reporter,
        }
    }

    /// Default document type applied at acceptance time, if any.
    ///
    /// The embedded backend expects every entry typed, so the first allowed
    /// type is pre-assigned; the staged flow leaves the choice to the user.
    fn default_document_type(&self) -> Option<DocumentType> {
        match self.config.protocol {
            IntakeProtocol::Embedded => Some(DocumentType::ALL[0]),
            IntakeProtocol::Staged => None,
        }
    }

    /// Offer candidate files; each rejection is logged and skipped.
    pub fn add_files(&mut self, candidates: Vec<Candidate>) -> Result<AddOutcome> {
        let outcome = self.store.add(candidates, self.default_document_type())?;
        for reason in &outcome.rejections {
            self.reporter.error(reason.clone());
        }
        Ok(outcome)
    }

    /// Remove an accepted file. Only legal before submission starts.
    pub fn remove_file(&mut self, index: usize) -> Result<FileDescriptor> {
        self.store.remove(index)
    }

    /// Assign or reassign the document type of an accepted file.
    pub fn assign_document_type(
        &mut self,
        index: usize,
        document_type: DocumentType,
    ) -> Result<()> {
        self.store.set_document_type(index, document_type)
    }

    /// Accepted files, in submission order.
    pub fn files(&self) -> &[FileDescriptor] {
        self.store.files()
    }

    /// The append-only status log.
    pub fn log(&self) -> &[LogEntry] {
        self.reporter.entries()
    }

    pub fn is_ready(&self) -> bool {
        self.store.is_ready()
    }

    /// Reject submission before any network call when the selection is not
    /// ready. Validation failures are logged but recoverable: the store stays
    /// open for corrections.
    fn check_ready(&mut self) -> Result<()> {
        if self.store.is_empty() {
            self.reporter.error("Add at least one document.");
            return Err(IntakeError::EmptySelection);
        }
        if let Some(untyped) = self
            .store
            .files()
            .iter()
            .find(|f| f.document_type.is_none())
        {
            let filename = untyped.filename.clone();
            self.reporter.error("Select a type for every document.");
            return Err(IntakeError::MissingDocumentType(filename));
        }
        Ok(())
    }

    /// Submit the selection: create the case, then (staged) run the
    /// transfers.
    ///
    /// Submission-phase failures re-open the selection for retry since no
    /// descriptor changed state. Transfer-phase failures leave it sealed:
    /// earlier documents are already confirmed on the backend and the
    /// positional correlation must survive.
    #[tracing::instrument(skip(self), fields(protocol = ?self.config.protocol, files = self.store.len()))]
    pub async fn submit(&mut self) -> Result<SubmitReceipt> {
        self.check_ready()?;
        self.store.seal();
        self.reporter.info("Creating the case...");

        let client = SubmissionClient::new(self.http.clone(), self.config.base_url.clone());
        let outcome = match client.submit(self.config.protocol, &self.store).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.reporter.error(e.to_string());
                self.store.unseal();
                return Err(e);
            }
        };

        match outcome {
            SubmissionOutcome::Finalized { case_id } => {
                // The embedded backend persisted the whole batch atomically;
                // mirror that on the descriptors.
                for index in 0..self.store.len() {
                    self.store
                        .set_progress(index, FileStatus::Done, PROGRESS_DONE)?;
                }
                self.reporter.success(format!("Case {} created.", case_id));
                Ok(SubmitReceipt { case_id })
            }
            SubmissionOutcome::Planned { case_id, plans } => {
                self.reporter.success(format!("Case {} created.", case_id));
                let executor =
                    TransferExecutor::new(self.http.clone(), self.config.base_url.clone());
                executor
                    .run(&case_id, &plans, &mut self.store, &mut self.reporter)
                    .await?;
                self.reporter
                    .success("All documents transferred and validated.");
                Ok(SubmitReceipt { case_id })
            }
        }
    }

    /// Fetch the backend's case listing.
    pub async fn list_cases(&self) -> Result<Vec<CaseSummary>> {
        SubmissionClient::new(self.http.clone(), self.config.base_url.clone())
            .list_cases()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockHttpClient;
    use crate::reporter::LogLevel;
    use bytes::Bytes;

    const BASE: &str = "http://backend";

    fn pdf(filename: &str) -> Candidate {
        Candidate {
            filename: filename.to_string(),
            content_type: Some("application/pdf".to_string()),
            content: Bytes::from_static(b"%PDF-1.4 test"),
        }
    }

    fn orchestrator(
        mock: &Arc<MockHttpClient>,
        protocol: IntakeProtocol,
    ) -> IntakeOrchestrator<MockHttpClient> {
        IntakeOrchestrator::new(
            mock.clone(),
            IntakeConfig {
                base_url: BASE.to_string(),
                protocol,
            },
        )
    }

    #[tokio::test]
    async fn missing_document_type_fails_before_any_network_call() {
        let mock = Arc::new(MockHttpClient::new());
        let mut orchestrator = orchestrator(&mock, IntakeProtocol::Staged);
        orchestrator.add_files(vec![pdf("a.pdf")]).unwrap();

        let err = orchestrator.submit().await.unwrap_err();
        assert!(matches!(err, IntakeError::MissingDocumentType(_)));
        assert_eq!(mock.call_count(), 0);

        // The selection stays open for corrections
        orchestrator
            .assign_document_type(0, DocumentType::Charges)
            .unwrap();
        assert!(orchestrator.is_ready());
    }

    #[tokio::test]
    async fn empty_selection_fails_before_any_network_call() {
        let mock = Arc::new(MockHttpClient::new());
        let mut orchestrator = orchestrator(&mock, IntakeProtocol::Embedded);

        let err = orchestrator.submit().await.unwrap_err();
        assert!(matches!(err, IntakeError::EmptySelection));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn embedded_failure_leaves_descriptors_untouched() {
        let mock = Arc::new(MockHttpClient::new());
        mock.respond(
            "POST http://backend/cases",
            500,
            r#"{"message":"Erreur interne"}"#,
        );

        let mut orchestrator = orchestrator(&mock, IntakeProtocol::Embedded);
        orchestrator
            .add_files(vec![pdf("a.pdf"), pdf("b.pdf")])
            .unwrap();

        let err = orchestrator.submit().await.unwrap_err();
        assert!(matches!(err, IntakeError::Submission(_)));

        for file in orchestrator.files() {
            assert_eq!(file.status, FileStatus::Pending);
            assert_eq!(file.progress, 0);
        }

        // Exactly one error line for the failed creation
        let errors: Vec<_> = orchestrator
            .log()
            .iter()
            .filter(|e| e.level == LogLevel::Error)
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("Erreur interne"));

        // Atomic failure re-opens the selection for retry
        assert!(orchestrator.add_files(vec![pdf("c.pdf")]).is_ok());
    }

    #[tokio::test]
    async fn embedded_success_marks_every_file_done() {
        let mock = Arc::new(MockHttpClient::new());
        mock.respond("POST http://backend/cases", 201, r#"{"case_id":"case-9"}"#);

        let mut orchestrator = orchestrator(&mock, IntakeProtocol::Embedded);
        orchestrator
            .add_files(vec![pdf("a.pdf"), pdf("b.pdf")])
            .unwrap();
        // Embedded intake defaults every file to the first allowed type
        assert!(orchestrator.is_ready());

        let receipt = orchestrator.submit().await.unwrap();
        assert_eq!(receipt.case_id, "case-9");

        for file in orchestrator.files() {
            assert_eq!(file.status, FileStatus::Done);
            assert_eq!(file.progress, 100);
        }
    }

    #[tokio::test]
    async fn plan_mismatch_reopens_the_selection() {
        let mock = Arc::new(MockHttpClient::new());
        mock.respond(
            "POST http://backend/api/cases",
            201,
            r#"{"caseId":"case-1","uploads":[]}"#,
        );

        let mut orchestrator = orchestrator(&mock, IntakeProtocol::Staged);
        orchestrator.add_files(vec![pdf("a.pdf")]).unwrap();
        orchestrator
            .assign_document_type(0, DocumentType::BulletinDePaie)
            .unwrap();

        let err = orchestrator.submit().await.unwrap_err();
        assert!(matches!(err, IntakeError::PlanMismatch { .. }));
        assert_eq!(orchestrator.files()[0].status, FileStatus::Pending);
        assert!(orchestrator.remove_file(0).is_ok());
    }

    #[tokio::test]
    async fn transfer_failure_keeps_the_selection_sealed() {
        let mock = Arc::new(MockHttpClient::new());
        mock.respond(
            "POST http://backend/api/cases",
            201,
            r#"{"caseId":"case-1","uploads":[
                {"documentId":"doc-1","uploadUrl":"http://backend/storage/doc-1"}
            ]}"#,
        );
        mock.respond(
            "PUT http://backend/storage/doc-1",
            500,
            r#"{"message":"boom"}"#,
        );

        let mut orchestrator = orchestrator(&mock, IntakeProtocol::Staged);
        orchestrator.add_files(vec![pdf("a.pdf")]).unwrap();
        orchestrator
            .assign_document_type(0, DocumentType::Charges)
            .unwrap();

        let err = orchestrator.submit().await.unwrap_err();
        assert!(matches!(err, IntakeError::Transfer { .. }));
        assert_eq!(orchestrator.files()[0].status, FileStatus::Errored);
        assert!(matches!(
            orchestrator.remove_file(0),
            Err(IntakeError::Sealed(_))
        ));
    }

    #[tokio::test]
    async fn independent_orchestrators_do_not_share_state() {
        let mock = Arc::new(MockHttpClient::new());
        let mut first = orchestrator(&mock, IntakeProtocol::Staged);
        let second = orchestrator(&mock, IntakeProtocol::Staged);

        first.add_files(vec![pdf("a.pdf")]).unwrap();
        assert_eq!(first.files().len(), 1);
        assert!(second.files().is_empty());
    }
}
