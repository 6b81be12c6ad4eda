pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::browser::WebDriverLauncher;
pub use config::{cli::LocalStorage, toml_config::CatalogConfig, RunSettings};
pub use crate::core::{dispatch::Dispatcher, etl::DownloadEngine, fetch::HttpFetcher, table::Table};
pub use domain::model::{DatasetDescriptor, Method, ScrapeMode, ScrapeOptions, SheetSelector};
pub use utils::error::{EtlError, Result};
