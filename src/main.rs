use anyhow::Result;
use clap::Parser;

use wktlink::cli::Cli;
use wktlink::{commands, logging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose)?;
    commands::run(&cli)
}
