mod cli;
mod config;
mod logging;
mod runner;

use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}
