// crates/hee-cli/src/cmd/sig.rs

use anyhow::Context;
use hee_core::signature::node_signature;
use hee_core::Config;

pub fn run(cfg: &Config) -> anyhow::Result<()> {
    let sig = node_signature(cfg).context("failed to compute node signature")?;
    tracing::info!(host = %sig.host, sig = %sig.short(), "node signature");
    println!("{}", sig.hex());
    Ok(())
}
