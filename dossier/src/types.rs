//! Core domain types and policy constants for the intake orchestrator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of files in one case submission.
pub const MAX_FILES: usize = 5;

/// Maximum size of a single file, in bytes (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Content types the backends accept.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["application/pdf", "image/png", "image/jpeg"];

/// Progress reported while a document's bytes are in flight.
pub const PROGRESS_UPLOADING: u8 = 25;

/// Progress reported while waiting for the completion confirmation.
pub const PROGRESS_CONFIRMING: u8 = 70;

/// Progress of a fully confirmed document.
pub const PROGRESS_DONE: u8 = 100;

/// Classification assigned to a document before submission.
///
/// The wire form is the snake_case vocabulary; the aliases accept the
/// uppercase vocabulary the staged backend historically returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[serde(alias = "BULLETIN_DE_PAIE")]
    BulletinDePaie,
    #[serde(alias = "AVIS_D_IMPOSITION")]
    AvisDImposition,
    #[serde(alias = "CHARGES")]
    Charges,
}

impl DocumentType {
    /// All assignable types, in the order the backends advertise them.
    pub const ALL: [DocumentType; 3] = [
        DocumentType::BulletinDePaie,
        DocumentType::AvisDImposition,
        DocumentType::Charges,
    ];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::BulletinDePaie => "bulletin_de_paie",
            DocumentType::AvisDImposition => "avis_d_imposition",
            DocumentType::Charges => "charges",
        }
    }

    /// Human-readable label, as rendered in the case UI.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::BulletinDePaie => "Bulletin de paie",
            DocumentType::AvisDImposition => "Avis d'imposition",
            DocumentType::Charges => "Charges",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bulletin_de_paie" => Ok(DocumentType::BulletinDePaie),
            "avis_d_imposition" => Ok(DocumentType::AvisDImposition),
            "charges" => Ok(DocumentType::Charges),
            other => Err(format!("unknown document type \"{}\"", other)),
        }
    }
}

/// Per-file lifecycle: `Pending -> Uploading -> Confirming -> Done`, with a
/// terminal `Errored` reachable from `Uploading` or `Confirming`.
///
/// The embedded protocol skips the middle states: descriptors jump from
/// `Pending` to `Done` when the single atomic request succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Pending,
    Uploading,
    Confirming,
    Done,
    Errored,
}

impl FileStatus {
    /// Check if this status is terminal (`Done` or `Errored`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStatus::Done | FileStatus::Errored)
    }
}
