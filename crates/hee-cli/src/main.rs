// crates/hee-cli/src/main.rs

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use hee_core::{HeeError, Overrides};

mod cmd;
mod logging;

/// Global options must come before the command word; everything from the
/// command word on goes to the router untouched.
#[derive(Parser)]
#[command(name = "hee")]
#[command(version, about = "HEE / Human Execution Engine", long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// State directory (default: ~/.hee)
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Evidence log file (default: <state-dir>/evidence/marks.log)
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// User card directory (default: <state-dir>/cards)
    #[arg(long, value_name = "DIR")]
    pub cards: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Command and its arguments. Raw OS strings: a non-UTF-8 word must reach
    /// the router, not fail in the parser.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND",
        value_parser = clap::value_parser!(OsString)
    )]
    pub args: Vec<OsString>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let overrides = Overrides {
        state_dir: cli.state_dir,
        log_path: cli.log,
        cards_dir: cli.cards,
    };
    let request = cmd::CommandRequest::parse(&cli.args);

    match cmd::dispatch(request, &overrides) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|e| e.downcast_ref::<HeeError>())
        .map_or(1, HeeError::exit_code)
}
