//! Client-side orchestrator for multi-file document intake into a
//! case-management backend.
//!
//! This crate drives one case submission end to end:
//! - validates candidate files against format/size/count policy
//! - keeps the accepted files in submission order
//! - creates the case over one of two backend protocols (embedded bytes, or
//!   staged per-document upload plans)
//! - for the staged protocol, executes each upload-then-confirm plan in
//!   order, aborting on the first unrecoverable failure
//! - tracks per-file progress and an append-only status log
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use dossier::{
//!     Candidate, DocumentType, IntakeConfig, IntakeOrchestrator, IntakeProtocol,
//!     ReqwestHttpClient,
//! };
//!
//! let http = Arc::new(ReqwestHttpClient::new());
//! let mut orchestrator = IntakeOrchestrator::new(http, IntakeConfig {
//!     base_url: "http://localhost:8080".to_string(),
//!     protocol: IntakeProtocol::Staged,
//! });
//!
//! orchestrator.add_files(candidates)?;
//! orchestrator.assign_document_type(0, DocumentType::BulletinDePaie)?;
//! let receipt = orchestrator.submit().await?;
//! println!("case {} created", receipt.case_id);
//! ```

pub mod error;
pub mod http;
pub mod orchestrator;
pub mod policy;
pub mod reporter;
pub mod selection;
pub mod submit;
pub mod transfer;
pub mod types;
pub mod wire;

// Re-export commonly used types
pub use error::{IntakeError, Result};
pub use http::{HttpClient, HttpRequest, HttpResponse, MockHttpClient, ReqwestHttpClient, RequestBody};
pub use orchestrator::{IntakeConfig, IntakeOrchestrator, SubmitReceipt};
pub use policy::{Candidate, Verdict};
pub use reporter::{LogEntry, LogLevel, StatusReporter};
pub use selection::{AddOutcome, FileDescriptor, SelectionStore};
pub use submit::{IntakeProtocol, SubmissionClient, SubmissionOutcome};
pub use transfer::TransferExecutor;
pub use types::{
    DocumentType, FileStatus, ALLOWED_CONTENT_TYPES, MAX_FILES, MAX_FILE_SIZE,
};
pub use wire::{CaseSummary, UploadPlan};
