//! Wire formats for the two intake backends.
//!
//! The embedded backend speaks snake_case (`POST /cases`, `GET /cases`); the
//! staged backend speaks camelCase (`POST /api/cases` and the upload/complete
//! exchanges). Both report failures as a JSON `{"message"}` body when they
//! can, so error extraction lives here too.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::http::HttpResponse;
use crate::types::DocumentType;

// ---------------------------------------------------------------------------
// Embedded protocol (file bytes travel inline)
// ---------------------------------------------------------------------------

/// One entry of the embedded case-creation request.
#[derive(Debug, Serialize)]
pub struct EmbeddedDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    /// Base64-encoded file content.
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct EmbeddedCaseRequest {
    pub documents: Vec<EmbeddedDocument>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedCaseResponse {
    pub case_id: String,
}

// ---------------------------------------------------------------------------
// Staged protocol (metadata first, bytes per upload plan)
// ---------------------------------------------------------------------------

/// One entry of the staged case-creation request: metadata only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedDocument {
    pub filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub document_type: DocumentType,
}

#[derive(Debug, Serialize)]
pub struct StagedCaseRequest {
    pub documents: Vec<StagedDocument>,
}

/// Backend-issued instructions for transferring one document's raw bytes.
///
/// Plans are positionally matched to the submitted documents array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPlan {
    pub document_id: String,
    pub upload_url: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

impl UploadPlan {
    /// Transfer method, defaulting to PUT when the backend omits it.
    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or("PUT")
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedCaseResponse {
    pub case_id: String,
    pub uploads: Vec<UploadPlan>,
}

/// Success body of the completion confirmation call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedDocument {
    pub document_type: DocumentType,
}

// ---------------------------------------------------------------------------
// Case listing (`GET /cases`)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CaseList {
    pub cases: Vec<CaseSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseSummary {
    pub case_id: String,
    pub documents: Vec<CaseDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaseDocument {
    pub document_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub document_type: String,
}

// ---------------------------------------------------------------------------
// Error bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extract a user-facing message from a non-success response.
///
/// Prefers a JSON `{"message"}` body, then a bare JSON string, then the
/// transport's reason phrase, then falls back to the status code.
pub fn error_message(response: &HttpResponse) -> String {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(&response.body) {
        if !body.message.is_empty() {
            return body.message;
        }
    }
    if let Ok(text) = serde_json::from_str::<String>(&response.body) {
        if !text.is_empty() {
            return text;
        }
    }
    match &response.status_text {
        Some(reason) if !reason.is_empty() => reason.clone(),
        _ => format!("HTTP {}", response.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_plan_defaults_method_to_put() {
        let plan: UploadPlan = serde_json::from_str(
            r#"{"documentId":"doc-1","uploadUrl":"http://backend/storage/doc-1"}"#,
        )
        .unwrap();

        assert_eq!(plan.document_id, "doc-1");
        assert_eq!(plan.method(), "PUT");
        assert!(plan.headers.is_none());
    }

    #[test]
    fn upload_plan_reads_method_and_headers() {
        let plan: UploadPlan = serde_json::from_str(
            r#"{"documentId":"doc-1","uploadUrl":"http://s3/doc-1","method":"POST","headers":{"x-amz-acl":"private"}}"#,
        )
        .unwrap();

        assert_eq!(plan.method(), "POST");
        assert_eq!(
            plan.headers.unwrap().get("x-amz-acl").map(String::as_str),
            Some("private")
        );
    }

    #[test]
    fn staged_request_serializes_camel_case() {
        let request = StagedCaseRequest {
            documents: vec![StagedDocument {
                filename: "payslip.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                size_bytes: 1024,
                document_type: DocumentType::BulletinDePaie,
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["documents"][0]["mimeType"], "application/pdf");
        assert_eq!(value["documents"][0]["sizeBytes"], 1024);
        assert_eq!(value["documents"][0]["documentType"], "bulletin_de_paie");
    }

    #[test]
    fn error_message_prefers_the_json_body() {
        let response = HttpResponse {
            status: 400,
            status_text: Some("Bad Request".to_string()),
            body: r#"{"message":"Un dossier ne peut pas contenir plus de 5 documents."}"#
                .to_string(),
        };
        assert_eq!(
            error_message(&response),
            "Un dossier ne peut pas contenir plus de 5 documents."
        );
    }

    #[test]
    fn error_message_accepts_a_bare_json_string() {
        let response = HttpResponse {
            status: 500,
            status_text: Some("Internal Server Error".to_string()),
            body: r#""storage offline""#.to_string(),
        };
        assert_eq!(error_message(&response), "storage offline");
    }

    #[test]
    fn error_message_falls_back_to_the_reason_phrase() {
        let response = HttpResponse {
            status: 502,
            status_text: Some("Bad Gateway".to_string()),
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert_eq!(error_message(&response), "Bad Gateway");
    }

    #[test]
    fn error_message_falls_back_to_the_status_code_last() {
        let response = HttpResponse {
            status: 502,
            status_text: None,
            body: "<html>Bad Gateway</html>".to_string(),
        };
        assert_eq!(error_message(&response), "HTTP 502");
    }
}
