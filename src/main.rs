use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use bench_office::{
    config::Config,
    dto::activity_dto::ActivityPayload,
    dto::candidate_dto::SearchFilters,
    middleware::auth::LoginRedirect,
    models::activity::{ActivityTally, ActivityType},
    models::document::DocumentType,
    models::file::LocalFile,
    models::page::PageQuery,
    models::upload::{TypedUpload, UploadBatch},
    utils::file_utils::{can_preview, file_category, file_icon, format_file_size, validate_file},
    utils::thumbnail::{generate_thumbnail, DEFAULT_THUMBNAIL_SIZE},
    error::Error,
    BackOffice,
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bench-office")]
#[command(about = "Bench candidate back-office client")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Overrides API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Bench candidates
    Candidates {
        #[command(subcommand)]
        command: CandidateCommand,
    },
    /// Documents attached to a candidate
    Documents {
        #[command(subcommand)]
        command: DocumentCommand,
    },
    /// Placement activities of a candidate
    Activities {
        #[command(subcommand)]
        command: ActivityCommand,
    },
    /// Validate a local file the way uploads are validated
    FileInfo { path: PathBuf },
    /// Write a JPEG thumbnail of a local image
    Thumbnail {
        path: PathBuf,
        #[arg(long, default_value_t = DEFAULT_THUMBNAIL_SIZE)]
        size: u32,
        #[arg(long)]
        out: PathBuf,
    },
    /// Backend health
    Health,
}

#[derive(Subcommand)]
enum CandidateCommand {
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    Show { id: i64 },
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        skill: Option<String>,
        #[arg(long)]
        state: Option<String>,
    },
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum DocumentCommand {
    List { candidate: i64 },
    /// Upload files given as PATH=TYPE, e.g. cv.pdf=RESUME
    Upload {
        candidate: i64,
        #[arg(required = true)]
        files: Vec<String>,
    },
    Download {
        candidate: i64,
        document: i64,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Delete {
        candidate: i64,
        #[arg(required = true)]
        documents: Vec<i64>,
    },
}

#[derive(Subcommand)]
enum ActivityCommand {
    List { candidate: i64 },
    Add {
        candidate: i64,
        #[arg(long = "type")]
        activity_type: ActivityType,
        #[arg(long)]
        client: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bench_office=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.base_url {
        Some(url) => Config {
            api_base_url: bench_office::config::parse_base_url(url)?,
            ..Config::from_env()?
        },
        None => Config::from_env()?,
    };

    let redirect = Arc::new(LoginRedirect::new());
    let office = BackOffice::connect(&config, redirect.clone())?;

    let outcome = run(&office, &config, cli.command).await;
    office.close();

    if let Some(path) = redirect.take() {
        eprintln!("Session expired. Sign in again ({}) and store a fresh token.", path);
    }
    outcome
}

/// Maps a library error to the operator-facing message for a failed write.
fn user_error(fallback: &'static str) -> impl Fn(Error) -> anyhow::Error {
    move |e| anyhow::anyhow!(e.user_message(fallback))
}

async fn run(office: &BackOffice, config: &Config, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Candidates { command } => candidates(office, command).await,
        Command::Documents { command } => documents(office, command).await,
        Command::Activities { command } => activities(office, command).await,
        Command::FileInfo { path } => {
            let file = LocalFile::from_path(&path).await?;
            let result = validate_file(&file, &[], config.max_upload_bytes);
            println!("{} {} ({})", file_icon(&file.name), file.name, file_category(&file.name));
            println!("{}", serde_json::to_string_pretty(&result)?);
            println!("previewable: {}", can_preview(&file.name));
            Ok(())
        }
        Command::Thumbnail { path, size, out } => {
            let file = LocalFile::from_path(&path).await?;
            let url = generate_thumbnail(&office.object_urls, &file, size).await?;
            let blob = url.blob().context("thumbnail was revoked before it was saved")?;
            blob.save_to(&out).await?;
            info!("Thumbnail written to {}", out.display());
            url.revoke();
            Ok(())
        }
        Command::Health => {
            let health = office.system.health().await?;
            println!("{}", serde_json::to_string_pretty(&health)?);
            Ok(())
        }
    }
}

async fn candidates(office: &BackOffice, command: CandidateCommand) -> anyhow::Result<()> {
    match command {
        CandidateCommand::List { page, size } => {
            let result = office.candidates.list(&PageQuery::page(page, size)).await?;
            for c in &result.content {
                println!(
                    "{:>6}  {:<30} {:<20} {}",
                    c.id,
                    c.display_name(),
                    c.primary_skill.as_deref().unwrap_or("-"),
                    c.effective_visa_status().unwrap_or_default()
                );
            }
            println!(
                "page {} of {} ({} total)",
                result.number + 1,
                result.total_pages.max(1),
                result.total_elements
            );
        }
        CandidateCommand::Show { id } => {
            let candidate = office.candidates.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&candidate)?);
        }
        CandidateCommand::Search { name, skill, state } => {
            let filters = SearchFilters {
                full_name: name,
                primary_skill: skill,
                state,
                ..SearchFilters::default()
            };
            let result = office.candidates.search(&filters, &PageQuery::default()).await?;
            for c in &result.content {
                println!("{:>6}  {}", c.id, c.display_name());
            }
        }
        CandidateCommand::Delete { id } => {
            office
                .candidates
                .delete(id)
                .await
                .map_err(user_error("Failed to delete bench candidate"))?;
            println!("Deleted candidate {}", id);
        }
    }
    Ok(())
}

async fn documents(office: &BackOffice, command: DocumentCommand) -> anyhow::Result<()> {
    match command {
        DocumentCommand::List { candidate } => {
            for doc in office.documents.list(candidate).await {
                println!(
                    "{:>6}  {} {:<40} {:<16} {}",
                    doc.id,
                    doc.icon(),
                    doc.original_filename,
                    doc.document_type.display_name(),
                    doc.file_size
                        .map(format_file_size)
                        .unwrap_or_default()
                );
            }
        }
        DocumentCommand::Upload { candidate, files } => {
            let mut batch = UploadBatch::new();
            for spec in files {
                let (path, kind) = match spec.rsplit_once('=') {
                    Some((path, kind)) => {
                        let kind = kind.parse::<DocumentType>().map_err(anyhow::Error::msg)?;
                        (path.to_string(), Some(kind))
                    }
                    None => (spec, None),
                };
                let file = LocalFile::from_path(&path).await?;
                match kind {
                    Some(kind) => batch.add_typed(file, kind),
                    None => batch.add(file),
                };
            }
            let uploads: Vec<TypedUpload> = batch.into_submission();
            if uploads.is_empty() {
                bail!("no file has a document type; use PATH=TYPE");
            }
            let created = if uploads.len() == 1 {
                let doc = office
                    .documents
                    .upload(candidate, &uploads[0])
                    .await
                    .map_err(user_error("Failed to upload document"))?;
                vec![doc]
            } else {
                office
                    .documents
                    .upload_many(candidate, &uploads)
                    .await
                    .map_err(user_error("Failed to upload documents"))?
            };
            println!("Uploaded {} document(s)", created.len());
        }
        DocumentCommand::Download {
            candidate,
            document,
            out,
        } => {
            let blob = office
                .documents
                .download(candidate, document)
                .await
                .map_err(user_error("Failed to download document"))?;
            let target = out
                .or_else(|| blob.filename.clone().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(format!("document-{}", document)));
            blob.save_to(&target).await?;
            println!("Saved {} bytes to {}", blob.len(), target.display());
        }
        DocumentCommand::Delete {
            candidate,
            documents,
        } => {
            let outcome = office.documents.delete_many(candidate, &documents).await;
            println!("Deleted: {:?}", outcome.deleted);
            for (id, reason) in &outcome.failed {
                println!("Failed {}: {}", id, reason);
            }
        }
    }
    Ok(())
}

async fn activities(office: &BackOffice, command: ActivityCommand) -> anyhow::Result<()> {
    match command {
        ActivityCommand::List { candidate } => {
            let items = office.activities.for_candidate(candidate).await;
            for a in &items {
                println!(
                    "{}  {:<20} {}",
                    a.activity_date.map(|d| d.to_string()).unwrap_or_default(),
                    a.activity_type.display_name(),
                    a.client_name.as_deref().unwrap_or("-")
                );
            }
            let tally = ActivityTally::from_activities(&items);
            println!(
                "{} total, {} submissions, {} interviews, {} rejections",
                tally.total, tally.submissions, tally.interviews, tally.rejections
            );
        }
        ActivityCommand::Add {
            candidate,
            activity_type,
            client,
            date,
            notes,
        } => {
            let mut payload = ActivityPayload::new(candidate, activity_type, client, date);
            payload.notes = notes;
            let saved = office
                .activities
                .create(&payload)
                .await
                .map_err(user_error("Failed to save activity"))?;
            println!("Recorded activity {}", saved.id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn write_failures_show_operator_messages() {
        let to_text = |e: Error| user_error("Failed to upload document")(e).to_string();

        assert_eq!(
            to_text(Error::Api {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: None
            }),
            "Failed to upload document"
        );
        assert_eq!(
            to_text(Error::Api {
                status: StatusCode::BAD_REQUEST,
                message: Some("Unsupported file type".into())
            }),
            "Unsupported file type"
        );
        assert_eq!(
            to_text(Error::Unauthorized),
            "Your session has expired. Please sign in again."
        );
        assert_eq!(to_text(Error::SessionClosed), "Failed to upload document");
    }
}
