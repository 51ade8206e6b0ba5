mod command;
mod error;
mod util;

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use std::process::ExitCode;

use aora_data::{Aora, AoraConfig, AppwriteBackend};

use crate::command::{Command, Credentials, Output};
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "aora")]
#[command(about = "Browse and publish Aora videos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true, env = "AORA_EMAIL")]
    email: Option<String>,

    #[arg(long, global = true, env = "AORA_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    if let Err(err) = init_logging() {
        eprintln!("cannot initialize logging: {}", err);
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{:?}", err);
            eprintln!("{}", err.report());
            err.exit_code()
        }
    }
}

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy()
        .add_directive("hyper::proto=info".parse()?)
        .add_directive("hyper::client=info".parse()?)
        .add_directive("reqwest=info".parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = AoraConfig::from_env()?;
    let backend = AppwriteBackend::new(&config)?;
    let aora = Aora::with_config(backend, &config);
    tracing::debug!("Using Appwrite project {} at {}", config.client.project_id, config.client.endpoint);

    let credentials = Credentials {
        email: cli.email,
        password: cli.password,
    };
    let output = Output { json: cli.json };
    command::run(&aora, cli.command, &credentials, &output).await?;
    Ok(())
}
