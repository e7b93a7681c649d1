// crates/hee-cli/src/cmd/mark.rs

use anyhow::Context;
use hee_core::{Config, EvidenceLog, EvidenceMark};

/// Append one mark and echo the recorded line.
pub fn run(message: String, cfg: &Config) -> anyhow::Result<()> {
    let mark = EvidenceMark::now(message)?;
    let log = EvidenceLog::new(&cfg.log_path);
    let line = log
        .append(&mark)
        .context("failed to write evidence mark")?;
    print!("{line}");
    Ok(())
}
