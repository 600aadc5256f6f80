mod config;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use entity_service_client::{ClientConfig, EntityServiceClient, Outcome};
use owo_colors::OwoColorize as _;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "entity-cli", about = "Entity service client", version)]
struct Cli {
    /// Path to the config file (default: ~/.config/entity-cli/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

/// Connection overrides; anything not given falls back to the config file.
#[derive(Args)]
struct ConnectionArgs {
    #[arg(long, global = true, env = "ENTITY_SERVICE_SCHEME")]
    scheme: Option<String>,
    #[arg(long, global = true, env = "ENTITY_SERVICE_HOST")]
    host: Option<String>,
    #[arg(long, global = true, env = "ENTITY_SERVICE_PORT")]
    port: Option<u16>,
    #[arg(long, global = true, env = "ENTITY_SERVICE_USER")]
    user: Option<String>,
    #[arg(long, global = true, env = "ENTITY_SERVICE_PASSWORD")]
    password: Option<String>,
}

impl ConnectionArgs {
    fn apply(&self, mut cfg: ClientConfig) -> ClientConfig {
        if let Some(v) = &self.scheme {
            cfg.scheme = v.clone();
        }
        if let Some(v) = &self.host {
            cfg.hostname = v.clone();
        }
        if let Some(v) = self.port {
            cfg.port = v;
        }
        if let Some(v) = &self.user {
            cfg.username = Some(v.clone());
        }
        if let Some(v) = &self.password {
            cfg.password = Some(v.clone());
        }
        cfg
    }
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one entity by id.
    Get {
        entity: String,
        id: String,
        #[arg(long)]
        schema: Option<String>,
    },
    /// Create an entity from a JSON document.
    Create {
        entity: String,
        /// Entity document as inline JSON.
        #[arg(long)]
        data: String,
        #[arg(long)]
        schema: Option<String>,
        /// Create the entity model first.
        #[arg(long)]
        model: bool,
    },
    /// Delete one entity by id.
    Delete {
        entity: String,
        id: String,
        #[arg(long)]
        schema: Option<String>,
    },
    /// Create an entity model from a JSON specification.
    Model {
        entity: String,
        #[arg(long)]
        data: String,
        #[arg(long)]
        schema: Option<String>,
    },
    /// Execute SQL; multiple statements run as one batch.
    Sql { statements: Vec<String> },
    /// Report the server version.
    Version,
    /// Persist the current connection settings to the config file.
    ConfigSet,
    /// Print the effective connection settings.
    ConfigShow,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(p) => p.clone(),
        None => config::default_config_path()?,
    };
    let cfg = cli.connection.apply(config::load_config(&config_path)?);

    match &cli.command {
        Command::ConfigSet => {
            config::save_config(&config_path, &cfg)?;
            println!("wrote {}", config_path.display());
            return Ok(ExitCode::SUCCESS);
        }
        Command::ConfigShow => {
            // Redacted: the password never lands on a terminal.
            let mut shown = cfg.clone();
            if shown.password.is_some() {
                shown.password = Some("********".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&shown)?);
            return Ok(ExitCode::SUCCESS);
        }
        _ => {}
    }

    let client = EntityServiceClient::new(&cfg).context("build client")?;

    let outcome = match cli.command {
        Command::Get { entity, id, schema } => {
            client.get_entity(&entity, &id, schema.as_deref()).await?
        }
        Command::Create {
            entity,
            data,
            schema,
            model,
        } => {
            let data: Value = serde_json::from_str(&data).context("parse --data as JSON")?;
            client
                .create_entity(&entity, data, schema.as_deref(), model)
                .await?
        }
        Command::Delete { entity, id, schema } => {
            client.delete_entity(&entity, &id, schema.as_deref()).await?
        }
        Command::Model {
            entity,
            data,
            schema,
        } => {
            let data: Value = serde_json::from_str(&data).context("parse --data as JSON")?;
            client
                .create_entity_model(&entity, data, schema.as_deref())
                .await?
        }
        Command::Sql { statements } => {
            anyhow::ensure!(!statements.is_empty(), "no SQL statements given");
            if statements.len() == 1 {
                client.execute_sql(&statements[0]).await?
            } else {
                client.execute_sql_batch(&statements).await?
            }
        }
        Command::Version => client.server_version().await?,
        Command::ConfigSet | Command::ConfigShow => unreachable!("handled above"),
    };

    match outcome {
        Outcome::Data(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Rejected(message) => {
            eprintln!("{}", message.red());
            Ok(ExitCode::FAILURE)
        }
    }
}
