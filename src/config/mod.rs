pub mod cli;
pub mod toml_config;

use crate::app::browser::DEFAULT_WEBDRIVER_URL;
use crate::app::converters::dashboard::DEFAULT_SCRAPE_WAIT;
use crate::core::fetch::DEFAULT_USER_AGENT;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::SettingsConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "nyc-datasets")]
#[command(about = "Download NYC labor, rent and restaurant datasets and normalize them to CSV")]
pub struct CliConfig {
    /// TOML catalog replacing the built-in dataset list
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory the CSV files are written to [default: .]
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Directory for downloaded workbooks, archives and browser downloads [default: ./temp]
    #[arg(long)]
    pub temp_dir: Option<String>,

    /// WebDriver (geckodriver) endpoint used for dashboard scraping
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Seconds to wait for a dashboard download to finish
    #[arg(long)]
    pub scrape_wait_seconds: Option<u64>,

    /// Run the browser with a visible window
    #[arg(long)]
    pub show_browser: bool,

    /// Only process these output filenames (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// List the datasets that would be processed and exit
    #[arg(long)]
    pub dry_run: bool,
}

/// 執行時實際使用的設定：命令列 > TOML [settings] > 預設值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub output_dir: String,
    pub temp_dir: String,
    pub user_agent: String,
    pub webdriver_url: String,
    pub scrape_wait: Duration,
    pub headless: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            temp_dir: "./temp".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            scrape_wait: DEFAULT_SCRAPE_WAIT,
            headless: true,
        }
    }
}

impl RunSettings {
    pub fn from_settings(settings: &SettingsConfig) -> Self {
        let defaults = Self::default();
        Self {
            output_dir: settings.output_dir.clone().unwrap_or(defaults.output_dir),
            temp_dir: settings.temp_dir.clone().unwrap_or(defaults.temp_dir),
            user_agent: settings.user_agent.clone().unwrap_or(defaults.user_agent),
            webdriver_url: settings.webdriver_url.clone().unwrap_or(defaults.webdriver_url),
            scrape_wait: settings
                .scrape_wait_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.scrape_wait),
            headless: settings.headless.unwrap_or(defaults.headless),
        }
    }

    #[cfg(feature = "cli")]
    pub fn with_cli_overrides(mut self, cli: &CliConfig) -> Self {
        if let Some(output_dir) = &cli.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(temp_dir) = &cli.temp_dir {
            self.temp_dir = temp_dir.clone();
        }
        if let Some(webdriver_url) = &cli.webdriver_url {
            self.webdriver_url = webdriver_url.clone();
        }
        if let Some(wait) = cli.scrape_wait_seconds {
            self.scrape_wait = Duration::from_secs(wait);
        }
        if cli.show_browser {
            self.headless = false;
        }
        self
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("output_dir", &self.output_dir)?;
        validation::validate_path("temp_dir", &self.temp_dir)?;
        validation::validate_url("webdriver_url", &self.webdriver_url)?;
        validation::validate_non_empty_string("user_agent", &self.user_agent)?;
        Ok(())
    }
}
