//! `execute`: sponsor a transaction kind, sign as the sender and submit.

use crate::common::{load_keypair, parse_kind, GlobalOpts};
use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use mys_sponsor::{EphemeralSponsor, Executor};
use tracing::info;

#[derive(Args, Debug)]
pub struct ExecuteArgs {
    /// Sender's Ed25519 private key (hex)
    #[arg(long)]
    sender_key: String,

    /// Base64-encoded transaction kind
    #[arg(long)]
    kind: String,
}

impl ExecuteArgs {
    pub async fn run(&self, global: &GlobalOpts) -> Result<()> {
        let sender = load_keypair(&self.sender_key)?;
        let kind = parse_kind(&self.kind)?;
        let clients = global.build_clients()?;

        let sponsor = EphemeralSponsor::from_config(
            clients.fullnode.clone(),
            clients.faucet,
            &clients.config,
        );
        let sponsored = sponsor
            .sponsor(sender.address(), kind)
            .await
            .context("sponsorship failed")?;
        info!(sponsor = %sponsored.sponsor, "Submitting sponsored transaction");

        let outcome = Executor::new(clients.fullnode)
            .execute_sponsored(&sponsored, &sender)
            .await
            .context("submission failed")?;

        output::print_outcome(&outcome, global.json)?;
        outcome.into_result()?;
        Ok(())
    }
}
