//! Vademecum CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use vademecum::cli::App;

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    App::parse().run()
}
