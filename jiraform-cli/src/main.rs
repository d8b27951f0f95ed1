use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

use jiraform::remote::{EnvSecretStore, RemoteGateway, ReqwestTransport};
use jiraform::{IntegrationOptions, TopLevelSource, build_templates, form};

#[derive(Debug, Parser)]
#[command(
    name = "jiraform",
    version,
    about = "Inspect remote databases and the form templates jiraform builds from them"
)]
struct Cli {
    /// TOML file with integration options
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the selector source ("databases" or "projects")
    #[arg(long = "top-level", value_name = "SOURCE")]
    top_level: Option<TopLevelSource>,

    /// Emit compact JSON rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List visible projects
    Projects,
    /// List visible databases, optionally filtered by a free-text term
    Databases {
        #[arg(short = 'q', long = "query")]
        query: Option<String>,
    },
    /// Print the field templates built from a database schema
    Schema { database_id: String },
    /// Search pages of a database, closest titles first
    Search { database_id: String, text: String },
    /// Print the empty form shape a new form starts from
    Scratch,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = load_options(&cli)?;

    if let Command::Scratch = cli.command {
        let scratch = form::scratch_template_for(options.top_level);
        return print_json(&scratch, cli.no_pretty);
    }

    tracing::debug!(base_url = %options.base_url, top_level = ?options.top_level, "options loaded");
    let transport = ReqwestTransport::new(options.timeout)
        .map_err(|err| eyre!("failed to build transport: {err:#}"))?;
    let gateway = RemoteGateway::new(
        form::integration_id(),
        options,
        Arc::new(transport),
        Arc::new(EnvSecretStore),
    );

    match cli.command {
        Command::Projects => {
            for project in gateway.list_projects().await? {
                println!("{}\t{}", project.id, project.name);
            }
        }
        Command::Databases { query } => {
            for database in gateway.search_databases(query.as_deref()).await? {
                println!("{}\t{}", database.id, database.name);
            }
        }
        Command::Schema { database_id } => {
            let Some(properties) = gateway.fetch_database_schema(&database_id).await? else {
                tracing::error!(database = %database_id, "database not found");
                std::process::exit(2);
            };
            print_json(&build_templates(&properties), cli.no_pretty)?;
        }
        Command::Search { database_id, text } => {
            for target in gateway.search_relation_targets(&text, &database_id).await? {
                println!("{}\t{}", target.id, target.description);
            }
        }
        Command::Scratch => {}
    }

    Ok(())
}

fn load_options(cli: &Cli) -> Result<IntegrationOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            IntegrationOptions::from_toml_str(&contents).map_err(|err| eyre!("{err:#}"))?
        }
        None => IntegrationOptions::from_env().map_err(|err| eyre!("{err:#}"))?,
    };
    if let Some(source) = cli.top_level {
        options = options.with_top_level(source);
    }
    Ok(options)
}

fn print_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{rendered}");
    Ok(())
}
