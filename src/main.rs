use anyhow::Context;
use chyle::{
    config::{RuntimeConfig, Settings},
    enrichment::ExpansionService,
    models::{records_from_json, Record},
};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "chyle")]
#[command(about = "Enrich commit records with issue tracker data", long_about = None)]
#[command(version)]
struct Cli {
    /// Runtime configuration file (TOML)
    #[arg(short, long, global = true, env = "CHYLE_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a JSON array of records and print the result
    Expand {
        /// Input file, stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Pretty print output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate integration settings and list enabled expanders
    Check,
}

fn init_tracing(runtime: &RuntimeConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chyle={}", runtime.log_level)));

    // stdout carries records, logs go to stderr
    let registry = tracing_subscriber::registry().with(filter);
    if runtime.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

fn read_records(input: Option<&PathBuf>) -> anyhow::Result<Vec<Record>> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("can't read records from {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("can't read records from stdin")?;
            raw
        }
    };

    Ok(records_from_json(&raw)?)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let runtime = RuntimeConfig::load(cli.config.as_deref())?;
    init_tracing(&runtime);

    tracing::info!("Starting chyle v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::from_env()?;
    let service = ExpansionService::new(&settings, &runtime)?;

    match cli.command {
        Commands::Check => {
            for name in service.pipeline().expander_names() {
                println!("{}", name);
            }
        }
        Commands::Expand { input, pretty } => {
            let records = read_records(input.as_ref())?;

            service.authenticate().await?;
            let records = service.process(records).await?;

            let output = if pretty {
                serde_json::to_string_pretty(&records)?
            } else {
                serde_json::to_string(&records)?
            };
            println!("{}", output);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
