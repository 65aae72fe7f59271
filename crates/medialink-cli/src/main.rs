//! Medialink CLI: push a media file to object storage and attach it to
//! a record on the records service.
//!
//! Set MEDIALINK_API_URL, MEDIALINK_API_KEY, MEDIALINK_USER_ID,
//! MEDIALINK_BUSINESS_ID, and MEDIALINK_AWS_ACCESS_KEY_ID.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use medialink_cli::init_tracing;
use medialink_client::UploadWorkflow;
use medialink_core::{ClientConfig, Environment, UploadTarget};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "medialink", about = "Upload media files and attach them to records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file, register it, and optionally attach it to a record
    Upload {
        /// Path to the media file
        file: PathBuf,
        /// Declared content type of the file
        #[arg(long, default_value = "audio/mpeg")]
        content_type: String,
        /// Target environment: staging, go, fmo, or testing
        #[arg(long)]
        environment: String,
        /// Attribution tag sent to the registration endpoint
        #[arg(long, default_value = "medialink")]
        source: String,
        /// Record type identifier to update after upload
        #[arg(long)]
        record_type: Option<String>,
        /// Record instance id to update after upload
        #[arg(long, requires = "record_type")]
        record: Option<String>,
        /// Record field receiving the object URL
        #[arg(long, default_value = "call_recording_link")]
        link_field: String,
        /// Record field receiving the registered file id
        #[arg(long, default_value = "call_recording")]
        file_field: String,
    },
    /// Probe connectivity to the records service
    Check,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context(
        "Failed to load configuration. Set MEDIALINK_API_URL, MEDIALINK_API_KEY, \
         MEDIALINK_USER_ID, and MEDIALINK_BUSINESS_ID",
    )?;
    let workflow = UploadWorkflow::new(&config)?;

    match cli.command {
        Commands::Check => {
            let reachable = workflow.records().check_connection().await;
            print_json(&serde_json::json!({ "reachable": reachable }))?;
            if !reachable {
                std::process::exit(1);
            }
        }
        Commands::Upload {
            file,
            content_type,
            environment,
            source,
            record_type,
            record,
            link_field,
            file_field,
        } => {
            let environment: Environment = environment.parse()?;

            // Advisory probe: logged, never gates the upload.
            if !workflow.records().check_connection().await {
                tracing::warn!("records service probe failed; continuing with upload");
            }

            let target = UploadTarget {
                file_path: file,
                content_type,
                environment,
                source,
            };
            let result = workflow.run(&target).await?;
            print_json(&result)?;

            if let (Some(record_type), Some(record)) = (record_type, record) {
                let updated = workflow
                    .attach_to_record(&record_type, &record, &result, &link_field, &file_field)
                    .await?;
                print_json(&updated)?;
            }
        }
    }

    Ok(())
}
