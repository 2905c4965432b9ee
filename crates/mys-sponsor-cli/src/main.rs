//! Mys sponsor CLI - sponsor and execute Mys transactions from the command line.
//!
//! A fresh, faucet-funded key pays the gas for each transaction. The sender
//! only needs to sign.

mod commands;
mod common;
mod output;

use clap::Parser;
use commands::{AddressArgs, ExecuteArgs, SponsorArgs};
use common::GlobalOpts;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Sponsor Mys transactions with throwaway gas keys.
#[derive(Parser, Debug)]
#[command(name = "mys-sponsor", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Fund an ephemeral sponsor and sign a transaction kind as gas owner
    Sponsor(SponsorArgs),

    /// Sponsor a transaction kind, sign it as the sender and submit it
    Execute(ExecuteArgs),

    /// Show the address derived from a private key
    Address(AddressArgs),
}

fn init_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let result = match cli.command {
        Command::Sponsor(args) => args.run(&cli.global).await,
        Command::Execute(args) => args.run(&cli.global).await,
        Command::Address(args) => args.run(&cli.global),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
