/*!

`service-bootstrap` provisions the AWS resources the Firehose end-to-end tests need (an S3 bucket
and an IAM role Firehose can assume to write to it) and records them in `bootstrap.yaml`.

Exits with 254 if the resources could not be bootstrapped, 1 on any other failure.

!*/

mod bootstrap;
mod cleanup;
mod error;

use aws_utils::aws::aws_config;
use aws_utils::bootstrap::AwsClients;
use aws_utils::init_logger;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Bootstraps, or cleans up, the AWS resources used by the Firehose end-to-end tests.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Args {
    /// Set logging verbosity [trace|debug|info|warn|error]. If the environment variable `RUST_LOG`
    /// is present, it overrides the default logging behavior. See https://docs.rs/env_logger/latest
    #[clap(long = "log-level", default_value = "info")]
    log_level: LevelFilter,
    /// The AWS region to create resources in. Defaults to `us-west-2`.
    #[clap(long = "region")]
    region: Option<String>,
    /// The ARN of a role to assume for all AWS calls.
    #[clap(long = "assume-role")]
    assume_role: Option<String>,
    /// The directory `bootstrap.yaml` is written to and read from.
    #[clap(long = "bootstrap-dir", default_value = ".")]
    bootstrap_dir: PathBuf,
    /// Defaults to `bootstrap`.
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Parser)]
enum Command {
    /// Create the bucket and role and write `bootstrap.yaml`.
    Bootstrap,
    /// Delete the resources recorded in `bootstrap.yaml`.
    Cleanup,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logger(env!("CARGO_CRATE_NAME"), Some(args.log_level));
    if let Err(e) = run(args).await {
        eprintln!("{}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(args: Args) -> error::Result<()> {
    let config = aws_config(&args.assume_role, &args.region).await;
    let clients = AwsClients::new(&config);
    match args.command.unwrap_or(Command::Bootstrap) {
        Command::Bootstrap => bootstrap::run(&clients, &args.bootstrap_dir).await,
        Command::Cleanup => cleanup::run(&clients, &args.bootstrap_dir).await,
    }
}
