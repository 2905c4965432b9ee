//! `address`: show the address derived from a private key.

use crate::common::{load_keypair, GlobalOpts};
use crate::output;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Ed25519 private key (hex)
    #[arg(long)]
    key: String,
}

impl AddressArgs {
    pub fn run(&self, global: &GlobalOpts) -> Result<()> {
        let keypair = load_keypair(&self.key)?;
        let public_key = format!("0x{}", hex::encode(keypair.public_key_bytes()));

        if global.json {
            output::print_json(&serde_json::json!({
                "address": keypair.address().to_string(),
                "public_key": public_key,
                "key_type": "ed25519",
            }))?;
        } else {
            output::print_header("Ed25519 Key");
            output::print_kv("Address", &keypair.address().to_string());
            output::print_kv("Public Key", &public_key);
        }
        Ok(())
    }
}
