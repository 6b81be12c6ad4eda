use crate::app::converters::{ArchiveExtractor, DashboardScraper, SpreadsheetConverter};
use crate::core::fetch::HttpFetcher;
use crate::core::{BrowserLauncher, Converter, Storage};
use crate::domain::model::Method;
use std::time::Duration;

/// 依資料集的 method 找出對應的轉換策略
pub struct Dispatcher<S: Storage + Clone, B: BrowserLauncher> {
    spreadsheet: SpreadsheetConverter<S>,
    archive: ArchiveExtractor<S>,
    dashboard: DashboardScraper<S, B>,
}

impl<S: Storage + Clone, B: BrowserLauncher> Dispatcher<S, B> {
    pub fn new(storage: S, fetcher: HttpFetcher, launcher: B, scrape_wait: Duration) -> Self {
        let download_dir = fetcher.temp_dir().join("downloads");

        Self {
            spreadsheet: SpreadsheetConverter::new(storage.clone(), fetcher.clone()),
            archive: ArchiveExtractor::new(storage.clone(), fetcher),
            dashboard: DashboardScraper::new(storage, launcher, download_dir)
                .with_default_wait(scrape_wait),
        }
    }

    pub fn converter_for(&self, method: Method) -> &dyn Converter {
        match method {
            Method::Xls | Method::Xlsx => &self.spreadsheet,
            Method::Zip => &self.archive,
            Method::OpenTable => &self.dashboard,
        }
    }
}
