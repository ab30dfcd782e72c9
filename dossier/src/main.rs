use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use dossier::{
    Candidate, DocumentType, IntakeConfig, IntakeOrchestrator, IntakeProtocol, LogLevel,
    ReqwestHttpClient,
};

#[derive(Parser)]
#[command(
    name = "dossier",
    about = "Submit supporting documents to a case-management backend"
)]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "DOSSIER_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Intake protocol the backend speaks: "embedded" or "staged".
    #[arg(long, value_parser = parse_protocol, default_value = "staged")]
    protocol: IntakeProtocol,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit files as one case. Arguments are `path` or `path:document_type`
    /// (bulletin_de_paie, avis_d_imposition, charges).
    Submit { files: Vec<String> },
    /// List the cases known to the backend.
    List,
}

fn parse_protocol(value: &str) -> Result<IntakeProtocol, String> {
    match value {
        "embedded" => Ok(IntakeProtocol::Embedded),
        "staged" => Ok(IntakeProtocol::Staged),
        other => Err(format!(
            "unknown protocol \"{}\" (expected \"embedded\" or \"staged\")",
            other
        )),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dossier=info")),
        )
        .init();

    let cli = Cli::parse();
    let http = Arc::new(ReqwestHttpClient::new());
    let config = IntakeConfig {
        base_url: cli.base_url.trim_end_matches('/').to_string(),
        protocol: cli.protocol,
    };

    match cli.command {
        Command::Submit { files } => submit(http, config, files).await,
        Command::List => list(http, config).await,
    }
}

async fn submit(
    http: Arc<ReqwestHttpClient>,
    config: IntakeConfig,
    specs: Vec<String>,
) -> anyhow::Result<()> {
    if specs.is_empty() {
        bail!("no files given");
    }

    let mut orchestrator = IntakeOrchestrator::new(http, config);

    for spec in &specs {
        let (path, document_type) = split_spec(spec);
        let content = tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();

        let outcome = orchestrator.add_files(vec![Candidate {
            filename,
            content_type: None,
            content: content.into(),
        }])?;

        if let (Some(&index), Some(document_type)) = (outcome.accepted.first(), document_type) {
            orchestrator.assign_document_type(index, document_type)?;
        }
    }

    if !orchestrator.is_ready() {
        print_log(orchestrator.log());
        bail!("selection is not ready to submit (no accepted files, or a document type is missing)");
    }

    let result = orchestrator.submit().await;
    print_log(orchestrator.log());

    let receipt = result?;
    println!("case {} created", receipt.case_id);
    Ok(())
}

async fn list(http: Arc<ReqwestHttpClient>, config: IntakeConfig) -> anyhow::Result<()> {
    let orchestrator = IntakeOrchestrator::new(http, config);
    let cases = orchestrator.list_cases().await?;

    if cases.is_empty() {
        println!("no cases available yet");
        return Ok(());
    }

    for case in cases {
        println!("case {}", case.case_id);
        for document in case.documents {
            println!(
                "  {} ({}) [{}]",
                document.name, document.document_type, document.document_id
            );
        }
    }
    Ok(())
}

/// Split a `path:document_type` argument; the type suffix is optional.
///
/// A trailing segment is only consumed when it names a known document type,
/// so paths that happen to contain colons pass through untouched.
fn split_spec(spec: &str) -> (PathBuf, Option<DocumentType>) {
    if let Some((path, type_str)) = spec.rsplit_once(':') {
        if let Ok(document_type) = type_str.parse::<DocumentType>() {
            return (PathBuf::from(path), Some(document_type));
        }
    }
    (PathBuf::from(spec), None)
}

fn print_log(entries: &[dossier::LogEntry]) {
    for entry in entries {
        let tag = match entry.level {
            LogLevel::Info => "info",
            LogLevel::Success => "ok",
            LogLevel::Error => "error",
        };
        println!("[{}] {}", tag, entry.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_spec_reads_a_trailing_document_type() {
        let (path, document_type) = split_spec("payslip.pdf:bulletin_de_paie");
        assert_eq!(path, PathBuf::from("payslip.pdf"));
        assert_eq!(document_type, Some(DocumentType::BulletinDePaie));
    }

    #[test]
    fn split_spec_keeps_colons_that_are_not_a_type() {
        let (path, document_type) = split_spec("archive:2024/payslip.pdf");
        assert_eq!(path, PathBuf::from("archive:2024/payslip.pdf"));
        assert_eq!(document_type, None);
    }

    #[test]
    fn split_spec_without_a_suffix_is_path_only() {
        let (path, document_type) = split_spec("charges.png");
        assert_eq!(path, PathBuf::from("charges.png"));
        assert_eq!(document_type, None);
    }
}
