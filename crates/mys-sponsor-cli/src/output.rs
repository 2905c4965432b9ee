//! Output formatting for CLI results.

use anyhow::Result;
use mys_sponsor::{ExecutionOutcome, SponsoredTransaction};
use serde_json::json;

/// Print a value as JSON (pretty-printed).
pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a key-value pair in human-readable format.
pub fn print_kv(key: &str, value: &str) {
    println!("  {key}: {value}");
}

/// Print a section header.
pub fn print_header(title: &str) {
    println!("\n--- {title} ---");
}

/// JSON view of a sponsored transaction.
pub fn sponsored_json(sponsored: &SponsoredTransaction) -> serde_json::Value {
    let payment: Vec<_> = sponsored
        .transaction
        .gas_payment()
        .iter()
        .map(|r| {
            json!({
                "objectId": r.object_id.to_string(),
                "version": r.version,
                "digest": r.digest.as_str(),
            })
        })
        .collect();

    json!({
        "sender": sponsored.sender().map(|s| s.to_string()),
        "sponsor": sponsored.sponsor.to_string(),
        "gasPayment": payment,
        "gasPrice": sponsored.transaction.gas_price(),
        "gasBudget": sponsored.transaction.gas_budget(),
        "txBytes": sponsored.signed.bytes_base64(),
        "sponsorSignature": sponsored.signed.signature,
    })
}

/// Print a sponsored transaction.
pub fn print_sponsored(sponsored: &SponsoredTransaction, json: bool) -> Result<()> {
    if json {
        return print_json(&sponsored_json(sponsored));
    }

    print_header("Sponsored Transaction");
    if let Some(sender) = sponsored.sender() {
        print_kv("Sender", &sender.to_string());
    }
    print_kv("Sponsor", &sponsored.sponsor.to_string());
    for object_ref in sponsored.transaction.gas_payment() {
        print_kv(
            "Gas Coin",
            &format!("{} v{}", object_ref.object_id, object_ref.version),
        );
    }
    print_kv("Tx Bytes", &sponsored.signed.bytes_base64());
    print_kv("Sponsor Signature", &sponsored.signed.signature);
    Ok(())
}

/// Print the outcome of an execution.
pub fn print_outcome(outcome: &ExecutionOutcome, json: bool) -> Result<()> {
    if json {
        return print_json(&json!({
            "digest": outcome.digest,
            "success": outcome.is_success(),
            "status": outcome.reported_status(),
            "error": outcome.error,
            "objectChanges": outcome.object_changes,
        }));
    }

    print_header("Execution");
    print_kv("Digest", &outcome.digest);
    print_kv("Status", outcome.reported_status().unwrap_or("unknown"));
    if let Some(error) = &outcome.error {
        print_kv("Error", error);
    }
    if let Some(changes) = &outcome.object_changes {
        print_kv("Object Changes", &changes.len().to_string());
    }
    Ok(())
}
