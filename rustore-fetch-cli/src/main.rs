//! rustore-fetch CLI
//!
//! Downloads an application package from RuStore, unwraps it if it arrives
//! inside a zip wrapper, and writes a metadata side-car next to it.

mod error;
mod logging;
mod output;
mod progress;

use std::process;

use clap::Parser;
use rustore_fetch::config::ConfigFile;
use rustore_fetch::package::PackageId;
use rustore_fetch::{FetchOutcome, PackageFetcher};

use error::CliError;
use progress::DownloadProgress;

/// Package fetched when none is given.
const DEFAULT_PACKAGE: &str = "ru.oneme.app";

#[derive(Debug, Parser)]
#[command(name = "rustore-fetch")]
#[command(version, about = "Download an application package from RuStore", long_about = None)]
struct Args {
    /// Package identifier, e.g. ru.oneme.app
    #[arg(default_value = DEFAULT_PACKAGE)]
    package: String,
}

fn main() {
    let args = Args::parse();
    logging::init();

    if let Err(e) = run(&args) {
        eprintln!("Ошибка: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let package = PackageId::parse(&args.package).map_err(CliError::InvalidPackage)?;

    let config_file = ConfigFile::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring config file");
        ConfigFile::default()
    });

    let fetcher = PackageFetcher::from_config(config_file.fetch_config())?;

    let progress = DownloadProgress::new(package.as_str());
    let callback = progress.callback();

    let outcome = match fetcher.fetch(&package, Some(&callback)) {
        Ok(outcome) => {
            progress.finish();
            outcome
        }
        Err(e) => {
            progress.abandon();
            return Err(e.into());
        }
    };

    if let FetchOutcome::NotFound { ref reason } | FetchOutcome::LinkUnavailable { ref reason } =
        outcome
    {
        tracing::info!(package = %package, reason = %reason, "nothing downloaded");
    }

    for line in output::report_lines(&outcome) {
        println!("{}", line);
    }

    Ok(())
}
