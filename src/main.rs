mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    postgen::logger::init_logger();

    let cli = Cli::parse();
    cli::run(cli)
}
