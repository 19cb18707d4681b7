//! Rico CLI: send a photo to the rich-image generation endpoint from the terminal.
//!
//! Set RICO_ENDPOINT_URL and RICO_API_KEY (Bearer token), or pass `--endpoint` / `--token`.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rico_cli::{file_name_from_url, init_tracing, media_type_for_path, ConsoleNotifier};
use rico_client::{ApiClient, Auth, ClientController, PhotoFile, DEFAULT_ENDPOINT_URL};
use rico_core::Scenario;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rico", about = "Se Eu Fosse Rico: see yourself in a high-status scenario")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available scenarios
    Scenarios,
    /// Generate a rich version of a photo
    Generate {
        /// Path to the photo (jpg, png, webp, gif, heic)
        #[arg(long)]
        photo: PathBuf,
        /// Scenario key, see `rico scenarios`
        #[arg(long, default_value = "urban-ceo")]
        scenario: String,
        /// Endpoint URL (defaults to RICO_ENDPOINT_URL)
        #[arg(long, env = "RICO_ENDPOINT_URL", default_value = DEFAULT_ENDPOINT_URL)]
        endpoint: String,
        /// Bearer token (defaults to RICO_API_KEY)
        #[arg(long, env = "RICO_API_KEY", hide_env_values = true)]
        token: Option<String>,
        /// Save the generated image to this directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ScenarioEntry {
    key: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct GenerateOutput {
    image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved_to: Option<PathBuf>,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scenarios => {
            let entries: Vec<ScenarioEntry> = Scenario::ALL
                .iter()
                .map(|s| ScenarioEntry {
                    key: s.key(),
                    label: s.label(),
                })
                .collect();
            print_json(&entries)?;
        }
        Commands::Generate {
            photo,
            scenario,
            endpoint,
            token,
            output,
        } => {
            let scenario: Scenario = scenario.parse()?;

            let bytes = tokio::fs::read(&photo)
                .await
                .with_context(|| format!("Failed to read photo {}", photo.display()))?;
            let name = photo
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let file = PhotoFile::new(name, media_type_for_path(&photo), bytes);
            tracing::debug!(photo = %photo.display(), scenario = %scenario, "Read photo");

            let auth = token
                .filter(|t| !t.trim().is_empty())
                .map(Auth::Bearer)
                .unwrap_or(Auth::Anonymous);
            let client = ApiClient::new(endpoint, auth).context("Failed to create API client")?;

            let mut controller = ClientController::new(client.clone(), ConsoleNotifier::new());
            controller.select_photo(file)?;
            controller.select_scenario(scenario);

            let image_url = controller.generate().await?;

            let saved_to = match output {
                Some(dir) => {
                    let data = client.download(&image_url).await?;
                    if data.is_empty() {
                        bail!("Downloaded image is empty");
                    }
                    tokio::fs::create_dir_all(&dir)
                        .await
                        .with_context(|| format!("Failed to create {}", dir.display()))?;
                    let path = dir.join(file_name_from_url(&image_url));
                    tokio::fs::write(&path, &data)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    Some(path)
                }
                None => None,
            };

            print_json(&GenerateOutput {
                image_url,
                saved_to,
            })?;
        }
    }

    Ok(())
}
