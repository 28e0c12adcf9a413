use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::SearchArgs;
use modscan_runtime::{PROGRAM_NAME, logging};

#[derive(Debug, Parser)]
#[command(
    name = PROGRAM_NAME,
    version,
    about = "Walk a directory tree and show which files changed recently"
)]
pub struct Cli {
    #[command(flatten)]
    pub search: SearchArgs,
}

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    commands::search::run(cli.search)
}
