use crate::app::converters::seated_diners::{
    filter_tracked_cities, merge_with_legacy, seated_diners_table, SeatedDiners,
    SEATED_DINERS_SCRIPT,
};
use crate::core::table::Table;
use crate::core::{BrowserLauncher, Converter, DatasetDescriptor, PageSession, Storage};
use crate::domain::model::{ScrapeMode, ScrapeOptions};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DOWNLOAD_SELECTOR: &str = "a[download]";
pub const DEFAULT_SCRAPE_WAIT: Duration = Duration::from_secs(5);

/// 下載的 CSV 中存放地區名稱的欄位
const NAME_COLUMN: &str = "Name";

/// 以瀏覽器開啟 OpenTable 儀表板並擷取 seated diners 資料
pub struct DashboardScraper<S: Storage, B: BrowserLauncher> {
    storage: S,
    launcher: B,
    download_dir: PathBuf,
    default_wait: Duration,
}

impl<S: Storage, B: BrowserLauncher> DashboardScraper<S, B> {
    pub fn new(storage: S, launcher: B, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            launcher,
            download_dir: download_dir.into(),
            default_wait: DEFAULT_SCRAPE_WAIT,
        }
    }

    pub fn with_default_wait(mut self, wait: Duration) -> Self {
        self.default_wait = wait;
        self
    }

    async fn scrape(
        &self,
        session: &dyn PageSession,
        dataset: &DatasetDescriptor,
        options: &ScrapeOptions,
    ) -> Result<Table> {
        session.goto(&dataset.url).await?;
        let title = session.title().await?;
        tracing::info!("🌐 Loaded '{}' from {}", title, dataset.url);

        match options.mode {
            ScrapeMode::PageState => {
                let state = session.evaluate(SEATED_DINERS_SCRIPT).await?;
                let seated_diners: SeatedDiners = serde_json::from_value(state)?;
                tracing::debug!(
                    "Page state has {} days, {} cities, {} states",
                    seated_diners.daily_headers.len(),
                    seated_diners.cities.len(),
                    seated_diners.states.len()
                );
                Ok(seated_diners_table(&seated_diners))
            }
            ScrapeMode::Download => {
                let selector = options
                    .download_selector
                    .as_deref()
                    .unwrap_or(DEFAULT_DOWNLOAD_SELECTOR);
                let wait = options
                    .wait_seconds
                    .map(Duration::from_secs)
                    .unwrap_or(self.default_wait);

                let existing = list_files(&self.download_dir)?;
                session.click(selector).await?;
                tracing::debug!("Clicked '{}', waiting {:?} for the download", selector, wait);
                tokio::time::sleep(wait).await;

                let downloaded = newest_download(&self.download_dir, &existing)?;
                tracing::info!("📥 Captured download {}", downloaded.display());

                let mut table = Table::from_csv(&std::fs::read(&downloaded)?)?;
                filter_tracked_cities(&mut table, NAME_COLUMN)?;
                Ok(table)
            }
        }
    }

    async fn merge_legacy(&self, dataset: &DatasetDescriptor, fresh: Table) -> Result<Table> {
        let Some(legacy_name) = dataset.legacy.as_deref() else {
            return Ok(fresh);
        };

        // 少了歷史資料就會覆寫掉 2020-2022 的資料，直接中止
        if !self.storage.exists(legacy_name).await {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "Legacy file {} not found",
                    self.storage.location(legacy_name)
                ),
            });
        }

        let legacy = Table::from_csv(&self.storage.read_file(legacy_name).await?)?;
        let merged = merge_with_legacy(&legacy, &fresh)?;
        tracing::info!(
            "🔗 Merged {} legacy rows with {} scraped rows into {} rows",
            legacy.rows.len(),
            fresh.rows.len(),
            merged.rows.len()
        );
        Ok(merged)
    }
}

#[async_trait]
impl<S: Storage, B: BrowserLauncher> Converter for DashboardScraper<S, B> {
    async fn convert(&self, dataset: &DatasetDescriptor) -> Result<String> {
        let options = dataset.scrape_options();
        std::fs::create_dir_all(&self.download_dir)?;

        let session = self.launcher.launch(&self.download_dir).await?;
        let scraped = self.scrape(session.as_ref(), dataset, &options).await;
        let closed = session.close().await;
        let table = scraped?;
        closed?;

        let table = match options.mode {
            ScrapeMode::PageState => self.merge_legacy(dataset, table).await?,
            // 下載的檔案沒有 id 欄位，無法與歷史資料對應
            ScrapeMode::Download => table,
        };

        self.storage
            .write_file(&dataset.filename, &table.to_csv()?)
            .await?;
        Ok(self.storage.location(&dataset.filename))
    }
}

fn list_files(dir: &Path) -> Result<HashSet<PathBuf>> {
    let mut files = HashSet::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.insert(path);
        }
    }
    Ok(files)
}

/// 找出點擊後新出現、最晚修改的檔案 (略過 Firefox 的 .part 暫存檔)
fn newest_download(dir: &Path, existing: &HashSet<PathBuf>) -> Result<PathBuf> {
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;

    for path in list_files(dir)? {
        if existing.contains(&path) || path.extension().is_some_and(|ext| ext == "part") {
            continue;
        }
        let modified = std::fs::metadata(&path)?.modified()?;
        if newest.as_ref().map_or(true, |(time, _)| modified > *time) {
            newest = Some((modified, path));
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| EtlError::ProcessingError {
            message: format!("No new download appeared in {}", dir.display()),
        })
}
