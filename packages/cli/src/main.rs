//! `minerva`: command-line client for the Minerva image-repository API.
//!
//! Every subcommand makes one API call and prints the decoded result as
//! pretty JSON on stdout (tiles are written to a file instead).
//!
//! Connection settings come from `MINERVA_*` environment variables (see
//! [`ClientConfig::from_env`]) or a JSON file passed with `--config`.
//! Requests are authenticated with `--token` / `MINERVA_TOKEN`, or sent as a
//! guest with `--guest`.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use minerva_client::api::{NewRepository, TileCoord};
use minerva_client::{ClientConfig, ClientError, MinervaClient, StaticCredential};
use serde::Serialize;

/// minerva: Minerva image-repository API client
#[derive(Parser)]
#[command(name = "minerva", version, about, long_about = None)]
struct Cli {
    /// JSON config file. Overrides MINERVA_* environment variables.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// API gateway URL without the stage.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Deployment stage (dev, test, prod).
    #[arg(long)]
    stage: Option<String>,

    /// ID token of the signed-in user. Ignored with --guest.
    #[arg(long, env = "MINERVA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Call the API anonymously.
    #[arg(long)]
    guest: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List repositories visible to the caller.
    Repos,

    /// Show one repository.
    Repo { uuid: String },

    /// Create a repository.
    CreateRepo {
        #[arg(long)]
        name: String,

        /// What to do with raw files after import (e.g. Destroy, Archive).
        #[arg(long)]
        raw_storage: Option<String>,

        /// Access level (e.g. Private, Public).
        #[arg(long)]
        access: Option<String>,
    },

    /// Delete a repository.
    DeleteRepo { uuid: String },

    /// List imports in a repository.
    Imports { repository: String },

    /// List the caller's incomplete imports.
    Incomplete,

    /// List images in a repository.
    Images { repository: String },

    /// List grants on a repository.
    Grants { repository: String },

    /// Grant a user Admin, Read or Write on a repository.
    Grant {
        user: String,
        repository: String,
        /// Admin | Read | Write
        grant_type: String,
    },

    /// Remove a subject's grant on a resource.
    Revoke { resource: String, subject: String },

    /// Search users by name or email.
    FindUser { query: String },

    /// Search groups by name.
    FindGroup { query: String },

    /// Download one rendered JPEG tile.
    Tile {
        image: String,

        #[arg(long)]
        level: u32,

        #[arg(short, long)]
        x: u32,

        #[arg(short, long)]
        y: u32,

        #[arg(short, long, default_value_t = 0)]
        z: u32,

        #[arg(short, long, default_value_t = 0)]
        t: u32,

        /// Output file.
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Show the API's identity-provider settings.
    CognitoDetails,

    /// Print the Authorization header the next request would send.
    Token,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minerva_client=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = build_client(&cli).unwrap_or_else(|e| fatal(&e.to_string()));

    if let Err(e) = run(&client, cli.command).await {
        fatal(&e.to_string());
    }
}

fn build_client(cli: &Cli) -> Result<MinervaClient, ClientError> {
    let mut config = match (&cli.config, &cli.base_url) {
        (Some(path), _) => {
            let json = fs::read_to_string(path)
                .unwrap_or_else(|e| fatal(&format!("failed to read {}: {e}", path.display())));
            ClientConfig::from_json(&json)?
        }
        (None, Some(base_url)) => ClientConfig::new(base_url.clone()),
        (None, None) => ClientConfig::from_env()?,
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(stage) = &cli.stage {
        config.stage = stage.clone();
    }

    let client = MinervaClient::new(&config)?;
    if cli.guest {
        client.set_guest_mode(true);
    } else if let Some(token) = &cli.token {
        client.set_identity(Arc::new(StaticCredential::new(token.clone())));
    }
    tracing::debug!(
        api_base = client.api_base(),
        guest = client.session().is_guest(),
        authenticated = client.is_authenticated(),
        "client configured"
    );
    Ok(client)
}

async fn run(client: &MinervaClient, command: Command) -> Result<(), ClientError> {
    match command {
        Command::Repos => print_json(&client.get_repositories().await?),
        Command::Repo { uuid } => print_json(&client.get_repository(&uuid).await?),
        Command::CreateRepo {
            name,
            raw_storage,
            access,
        } => {
            let data = NewRepository {
                name,
                raw_storage,
                access,
            };
            print_json(&client.create_repository(&data).await?)
        }
        Command::DeleteRepo { uuid } => {
            client.delete_repository(&uuid).await?;
            println!("deleted {uuid}");
        }
        Command::Imports { repository } => print_json(&client.get_imports(&repository).await?),
        Command::Incomplete => print_json(&client.list_incomplete_imports().await?),
        Command::Images { repository } => {
            print_json(&client.list_images_in_repository(&repository).await?)
        }
        Command::Grants { repository } => {
            print_json(&client.list_grants_for_repository(&repository).await?)
        }
        Command::Grant {
            user,
            repository,
            grant_type,
        } => {
            client
                .grant_permission_to_repository(&user, &repository, &grant_type)
                .await?;
            println!("granted {grant_type} on {repository} to {user}");
        }
        Command::Revoke { resource, subject } => {
            client.delete_grant(&resource, &subject).await?;
            println!("revoked {subject} on {resource}");
        }
        Command::FindUser { query } => print_json(&client.find_user(&query).await?),
        Command::FindGroup { query } => print_json(&client.find_group(&query).await?),
        Command::Tile {
            image,
            level,
            x,
            y,
            z,
            t,
            output,
        } => {
            let coord = TileCoord::new(level, x, y).with_plane(z, t);
            let bytes = client.get_image_tile(&image, coord).await?;
            fs::write(&output, &bytes)
                .unwrap_or_else(|e| fatal(&format!("failed to write {}: {e}", output.display())));
            println!("wrote {} bytes to {}", bytes.len(), output.display());
        }
        Command::CognitoDetails => print_json(&client.get_cognito_details().await?),
        Command::Token => println!("{}", client.token().await?),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => fatal(&format!("failed to encode output: {e}")),
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("minerva: {}", msg);
    process::exit(2);
}
