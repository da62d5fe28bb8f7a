use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cwlogger_cli::put::{self, PutArgs, PutOutcome};
use cwlogger_lib::Handler;

#[derive(Parser, Debug)]
#[command(author, version, about = "Structured logging to CloudWatch Logs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one log record, creating the log group and stream on first use.
    Put(PutArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Put(args) => handle_put(&args).await,
    }
}

async fn handle_put(args: &PutArgs) -> Result<()> {
    // Reject before touching AWS configuration
    if let Err(err) = args.validate() {
        return finish(&PutOutcome::failure(err.to_string()));
    }

    let handler = Handler::from_env().await;
    let outcome = put::submit(&handler, args).await;
    finish(&outcome)
}

fn finish(outcome: &PutOutcome) -> Result<()> {
    let json = serde_json::to_string(outcome).context("failed to serialize outcome")?;
    println!("{}", json);

    if let Some(error) = &outcome.error {
        bail!("{}", error);
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
