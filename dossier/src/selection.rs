//! Ordered store of accepted files and their per-file submission state.

use bytes::Bytes;

use crate::error::{IntakeError, Result};
use crate::policy::{self, Candidate, Verdict};
use crate::types::{DocumentType, FileStatus};

/// One accepted file and its mutable submission state.
///
/// Descriptors are never replaced or reordered once accepted: the position in
/// the store is the only correlation key with backend-returned upload plans.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub filename: String,
    /// Resolved content type (explicit or inferred at validation time).
    pub content_type: String,
    pub content: Bytes,
    pub document_type: Option<DocumentType>,
    pub status: FileStatus,
    /// 0-100.
    pub progress: u8,
    pub error: Option<String>,
}

impl FileDescriptor {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Result of offering a batch of candidates to the store.
#[derive(Debug, Default)]
pub struct AddOutcome {
    /// Store indices of the descriptors appended by this call, in order.
    pub accepted: Vec<usize>,
    /// User-facing reasons for each rejected candidate.
    pub rejections: Vec<String>,
}

/// Ordered list of accepted files.
///
/// Single-writer by construction: the user reshapes the selection until
/// submission seals it, after which only the status/progress/error fields of
/// existing descriptors may change. No locks are needed because exactly one
/// mutator exists in each phase.
#[derive(Debug, Default)]
pub struct SelectionStore {
    files: Vec<FileDescriptor>,
    sealed: bool,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer candidates in order.
    ///
    /// Accepted candidates are appended with the given default document type.
    /// The scan stops at the file cap: one "maximum reached" rejection is
    /// recorded and the rest of the batch is silently skipped.
    pub fn add(
        &mut self,
        candidates: Vec<Candidate>,
        default_type: Option<DocumentType>,
    ) -> Result<AddOutcome> {
        if self.sealed {
            return Err(IntakeError::Sealed(
                "cannot add files after submission has started",
            ));
        }

        let mut outcome = AddOutcome::default();
        for candidate in candidates {
            match policy::validate(&candidate, self.files.len()) {
                Verdict::Accepted { content_type } => {
                    self.files.push(FileDescriptor {
                        filename: candidate.filename,
                        content_type,
                        content: candidate.content,
                        document_type: default_type,
                        status: FileStatus::Pending,
                        progress: 0,
                        error: None,
                    });
                    outcome.accepted.push(self.files.len() - 1);
                }
                Verdict::Rejected { reason } => outcome.rejections.push(reason),
                Verdict::BatchFull { reason } => {
                    outcome.rejections.push(reason);
                    break;
                }
            }
        }
        Ok(outcome)
    }

    /// Remove a descriptor. Illegal once submission has started, to protect
    /// the positional correlation of indices in flight.
    pub fn remove(&mut self, index: usize) -> Result<FileDescriptor> {
        if self.sealed {
            return Err(IntakeError::Sealed(
                "cannot remove files after submission has started",
            ));
        }
        if index >= self.files.len() {
            return Err(IntakeError::IndexOutOfBounds(index));
        }
        Ok(self.files.remove(index))
    }

    /// Reassign the document type of one descriptor.
    pub fn set_document_type(&mut self, index: usize, document_type: DocumentType) -> Result<()> {
        if self.sealed {
            return Err(IntakeError::Sealed(
                "cannot reassign document types after submission has started",
            ));
        }
        let file = self
            .files
            .get_mut(index)
            .ok_or(IntakeError::IndexOutOfBounds(index))?;
        file.document_type = Some(document_type);
        Ok(())
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Submission is allowed once at least one file is accepted and every
    /// accepted file has an assigned document type.
    pub fn is_ready(&self) -> bool {
        !self.files.is_empty() && self.files.iter().all(|f| f.document_type.is_some())
    }

    /// Freeze the selection shape at the start of a submission.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Re-open the selection after an atomic submission failure, when no
    /// descriptor changed state.
    pub fn unseal(&mut self) {
        self.sealed = false;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Status-field mutation; legal in any phase, never changes list shape.
    pub(crate) fn set_progress(
        &mut self,
        index: usize,
        status: FileStatus,
        progress: u8,
    ) -> Result<()> {
        let file = self
            .files
            .get_mut(index)
            .ok_or(IntakeError::IndexOutOfBounds(index))?;
        file.status = status;
        file.progress = progress;
        Ok(())
    }

    /// Mark a descriptor as terminally errored with a user-facing message.
    pub(crate) fn set_error(&mut self, index: usize, message: String) -> Result<()> {
        let file = self
            .files
            .get_mut(index)
            .ok_or(IntakeError::IndexOutOfBounds(index))?;
        file.status = FileStatus::Errored;
        file.error = Some(message);
        Ok(())
    }
}
