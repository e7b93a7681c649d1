// crates/hee-cli/src/cmd/card.rs

use std::ffi::OsString;

use hee_core::cards::CARD_USAGE;
use hee_core::{CardStore, Config, HeeError};

/// A non-UTF-8 name is kept lossily; it can never match a card, so the
/// lookup reports it as not found with the listing.
pub fn require_name(name: Option<OsString>) -> anyhow::Result<String> {
    let name = name.ok_or_else(|| HeeError::Usage {
        message: "missing card name".into(),
        usage: CARD_USAGE,
    })?;
    Ok(name.to_string_lossy().into_owned())
}

pub fn run(name: &str, cfg: &Config) -> anyhow::Result<()> {
    let store = CardStore::with_dir(&cfg.cards_dir);
    let card = store.get(name)?;
    tracing::debug!(card = %card.name, source = ?card.source, "showing card");

    print!("{}", card.body);
    if !card.body.ends_with('\n') {
        println!();
    }
    Ok(())
}
