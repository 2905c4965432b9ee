//! `sponsor`: fund an ephemeral key and sign a transaction kind as gas owner.

use crate::common::{parse_address, parse_kind, GlobalOpts};
use crate::output;
use anyhow::{Context, Result};
use clap::Args;
use mys_sponsor::EphemeralSponsor;

#[derive(Args, Debug)]
pub struct SponsorArgs {
    /// Address of the transaction sender
    #[arg(long)]
    sender: String,

    /// Base64-encoded transaction kind
    #[arg(long)]
    kind: String,
}

impl SponsorArgs {
    pub async fn run(&self, global: &GlobalOpts) -> Result<()> {
        let sender = parse_address(&self.sender)?;
        let kind = parse_kind(&self.kind)?;
        let clients = global.build_clients()?;

        let sponsor =
            EphemeralSponsor::from_config(clients.fullnode, clients.faucet, &clients.config);
        let sponsored = sponsor
            .sponsor(sender, kind)
            .await
            .context("sponsorship failed")?;

        output::print_sponsored(&sponsored, global.json)
    }
}
