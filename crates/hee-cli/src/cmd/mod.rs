// crates/hee-cli/src/cmd/mod.rs

use std::ffi::OsString;

use hee_core::{Config, Overrides};

pub mod card;
pub mod help;
pub mod mark;
pub mod sig;

/// One parsed invocation. Closed: every variant is handled in [`dispatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandRequest {
    Help,
    /// Remaining arguments, joined into the message by the handler.
    Mark(Vec<OsString>),
    Sig,
    Card(Option<OsString>),
    /// Unrecognised command word, including one that is not UTF-8; degrades to help.
    Unknown(OsString),
}

impl CommandRequest {
    pub fn parse(args: &[OsString]) -> Self {
        let Some((first, rest)) = args.split_first() else {
            return CommandRequest::Help;
        };
        match first.to_str() {
            Some("help") => CommandRequest::Help,
            Some("mark") => CommandRequest::Mark(rest.to_vec()),
            Some("sig") => CommandRequest::Sig,
            Some("card") => CommandRequest::Card(rest.first().cloned()),
            _ => CommandRequest::Unknown(first.clone()),
        }
    }
}

/// Arguments are validated before configuration is resolved, so usage
/// errors never depend on the state directory.
pub fn dispatch(request: CommandRequest, overrides: &Overrides) -> anyhow::Result<()> {
    match request {
        CommandRequest::Help => help::run(),
        CommandRequest::Unknown(word) => {
            tracing::debug!(command = %word.to_string_lossy(), "unknown command, showing help");
            help::run()
        }
        CommandRequest::Mark(args) => {
            let message = hee_core::evidence::message_from_args(&args)?;
            mark::run(message, &resolve(overrides)?)
        }
        CommandRequest::Sig => sig::run(&resolve(overrides)?),
        CommandRequest::Card(name) => {
            let name = card::require_name(name)?;
            card::run(&name, &resolve(overrides)?)
        }
    }
}

fn resolve(overrides: &Overrides) -> anyhow::Result<Config> {
    Ok(Config::resolve(overrides.clone())?)
}
