//! rustore-fetch - download application packages from the RuStore backend
//!
//! This library resolves a package identifier through the store API, streams
//! the package payload, unwraps it when it arrives inside a zip wrapper, and
//! reads basic manifest metadata from the result.
//!
//! # Example
//!
//! ```ignore
//! use rustore_fetch::config::FetchConfig;
//! use rustore_fetch::fetcher::{FetchOutcome, PackageFetcher};
//! use rustore_fetch::package::PackageId;
//!
//! let fetcher = PackageFetcher::from_config(FetchConfig::default())?;
//! let package = PackageId::parse("ru.oneme.app")?;
//!
//! match fetcher.fetch(&package, None)? {
//!     FetchOutcome::Saved(report) => println!("Сохранено: {}", report.output_path.display()),
//!     FetchOutcome::NotFound { reason } => println!("not found: {}", reason),
//!     FetchOutcome::LinkUnavailable { reason } => println!("no link: {}", reason),
//! }
//! ```

pub mod config;
pub mod download;
pub mod error;
pub mod fetcher;
pub mod package;
pub mod store;

pub use error::{FetchError, FetchResult};
pub use fetcher::{FetchOutcome, FetchReport, PackageFetcher};
