//! Pre-submission policy checks for candidate files.
//!
//! Validation is a pure function over a candidate and the current accepted
//! count. Rules are evaluated in order and the first failing rule wins; a
//! rejection never raises, it surfaces a user-facing reason for the log.

use bytes::Bytes;

use crate::types::{ALLOWED_CONTENT_TYPES, MAX_FILES, MAX_FILE_SIZE};

/// One file offered by the user, before any policy check.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub filename: String,
    /// Content type as supplied by the picker, if any.
    pub content_type: Option<String>,
    pub content: Bytes,
}

impl Candidate {
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Outcome of a policy check for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Candidate may be appended, with this resolved content type.
    Accepted { content_type: String },
    /// Candidate is rejected; the batch scan continues.
    Rejected { reason: String },
    /// The file cap is already reached; the rest of the batch is skipped
    /// without individual rejections.
    BatchFull { reason: String },
}

/// Resolve a candidate's content type, inferring from the file extension when
/// the picker supplied none.
pub fn resolve_content_type(candidate: &Candidate) -> Option<String> {
    if let Some(explicit) = candidate.content_type.as_deref() {
        if !explicit.is_empty() {
            return Some(explicit.to_string());
        }
    }
    mime_guess::from_path(&candidate.filename)
        .first_raw()
        .map(|mime| mime.to_string())
}

/// Check one candidate against the intake policy.
pub fn validate(candidate: &Candidate, accepted_count: usize) -> Verdict {
    if accepted_count >= MAX_FILES {
        return Verdict::BatchFull {
            reason: format!(
                "Cannot add \"{}\": maximum of {} files reached.",
                candidate.filename, MAX_FILES
            ),
        };
    }

    if candidate.content.is_empty() {
        return Verdict::Rejected {
            reason: format!("\"{}\" is empty.", candidate.filename),
        };
    }

    if candidate.size() > MAX_FILE_SIZE {
        return Verdict::Rejected {
            reason: format!(
                "\"{}\" exceeds the maximum size of 10 MiB.",
                candidate.filename
            ),
        };
    }

    match resolve_content_type(candidate) {
        Some(content_type) if ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) => {
            Verdict::Accepted { content_type }
        }
        _ => Verdict::Rejected {
            reason: format!("\"{}\" is not in a supported format.", candidate.filename),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(filename: &str, content_type: Option<&str>, size: usize) -> Candidate {
        Candidate {
            filename: filename.to_string(),
            content_type: content_type.map(String::from),
            content: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn accepts_supported_formats_and_rejects_the_rest() {
        let a = candidate("a.pdf", Some("application/pdf"), 2 * 1024 * 1024);
        let b = candidate("b.png", Some("image/png"), 3 * 1024 * 1024);
        let c = candidate("c.exe", Some("application/octet-stream"), 1024 * 1024);

        assert!(matches!(validate(&a, 0), Verdict::Accepted { .. }));
        assert!(matches!(validate(&b, 1), Verdict::Accepted { .. }));

        match validate(&c, 2) {
            Verdict::Rejected { reason } => assert!(reason.contains("c.exe")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn infers_content_type_from_extension() {
        let photo = candidate("scan.jpg", None, 1024);
        match validate(&photo, 0) {
            Verdict::Accepted { content_type } => assert_eq!(content_type, "image/jpeg"),
            other => panic!("expected acceptance, got {:?}", other),
        }

        // An empty explicit type falls back to the extension as well
        let scan = candidate("scan.png", Some(""), 1024);
        match validate(&scan, 0) {
            Verdict::Accepted { content_type } => assert_eq!(content_type, "image/png"),
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn rejects_oversized_files() {
        let big = candidate("big.pdf", Some("application/pdf"), (MAX_FILE_SIZE + 1) as usize);
        match validate(&big, 0) {
            Verdict::Rejected { reason } => assert!(reason.contains("maximum size")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn rejects_empty_files() {
        let empty = candidate("empty.pdf", Some("application/pdf"), 0);
        match validate(&empty, 0) {
            Verdict::Rejected { reason } => assert!(reason.contains("empty")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn stops_the_batch_at_the_file_cap() {
        let extra = candidate("extra.pdf", Some("application/pdf"), 1024);
        assert!(matches!(
            validate(&extra, MAX_FILES),
            Verdict::BatchFull { .. }
        ));
    }

    #[test]
    fn count_rule_wins_over_format_rule() {
        // Even an unsupported file hits the cap rule first
        let c = candidate("c.exe", Some("application/octet-stream"), 1024);
        assert!(matches!(validate(&c, MAX_FILES), Verdict::BatchFull { .. }));
    }
}
