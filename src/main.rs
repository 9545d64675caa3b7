use std::process::ExitCode;

use clap::Parser;
use eigenvis::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    match eigenvis::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                log::error!("  caused by: {cause}");
                source = cause.source();
            }
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
