// crates/hee-cli/src/cmd/help.rs

pub const HELP_TEXT: &str = "\
HEE — Human Execution Engine

Core:
  hee help        show this
  hee mark <msg>  write timestamped evidence mark
  hee sig         print node signature
  hee card <name> show a card

Principle:
  small, proven, compounding steps";

pub fn run() -> anyhow::Result<()> {
    println!("{HELP_TEXT}");
    Ok(())
}
