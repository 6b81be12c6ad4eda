use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 資料集的取得 / 轉換方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// 舊版 Excel 活頁簿 (.xls)
    Xls,
    /// Office Open XML 活頁簿 (.xlsx)
    Xlsx,
    /// 壓縮檔，取出其中一個檔案
    Zip,
    /// OpenTable 動態儀表板，需要瀏覽器
    OpenTable,
}

impl Method {
    /// 下載暫存檔使用的副檔名
    pub fn download_extension(&self) -> Option<&'static str> {
        match self {
            Method::Xls => Some("xls"),
            Method::Xlsx => Some("xlsx"),
            Method::Zip => Some("zip"),
            Method::OpenTable => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Xls => "xls",
            Method::Xlsx => "xlsx",
            Method::Zip => "zip",
            Method::OpenTable => "open_table",
        };
        f.write_str(name)
    }
}

/// 工作表選擇：索引 (從 0 開始) 或名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(index) => write!(f, "index {}", index),
            SheetSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeMode {
    /// 讀取頁面內嵌的初始狀態
    #[default]
    PageState,
    /// 點擊下載按鈕並擷取下載的 CSV
    Download,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOptions {
    #[serde(default)]
    pub mode: ScrapeMode,
    pub download_selector: Option<String>,
    pub wait_seconds: Option<u64>,
}

/// 單一資料集的描述：來源、輸出檔名、轉換方式與其選項
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub url: String,
    pub filename: String,
    pub method: Method,
    #[serde(default)]
    pub skip_rows: usize,
    #[serde(default)]
    pub sheet: SheetSelector,
    /// 壓縮檔內要取出的檔案，預設與 filename 相同
    pub entry: Option<String>,
    /// 要與儀表板資料合併的歷史 CSV (位於輸出目錄)
    pub legacy: Option<String>,
    pub scrape: Option<ScrapeOptions>,
}

impl DatasetDescriptor {
    pub fn new(url: impl Into<String>, filename: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
            method,
            skip_rows: 0,
            sheet: SheetSelector::default(),
            entry: None,
            legacy: None,
            scrape: None,
        }
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_sheet(mut self, sheet: SheetSelector) -> Self {
        self.sheet = sheet;
        self
    }

    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    pub fn with_legacy(mut self, legacy: impl Into<String>) -> Self {
        self.legacy = Some(legacy.into());
        self
    }

    pub fn with_scrape(mut self, scrape: ScrapeOptions) -> Self {
        self.scrape = Some(scrape);
        self
    }

    pub fn archive_entry(&self) -> &str {
        self.entry.as_deref().unwrap_or(&self.filename)
    }

    /// 下載暫存檔名，例如 nychist.csv -> nychist.xlsx
    pub fn temp_filename(&self) -> Option<String> {
        let extension = self.method.download_extension()?;
        let path = std::path::Path::new(&self.filename).with_extension(extension);
        Some(path.to_string_lossy().into_owned())
    }

    pub fn scrape_options(&self) -> ScrapeOptions {
        self.scrape.clone().unwrap_or_default()
    }
}

impl Validate for DatasetDescriptor {
    fn validate(&self) -> Result<()> {
        validation::validate_url("datasets.url", &self.url)?;
        validation::validate_filename("datasets.filename", &self.filename, &["csv"])?;

        if let Some(entry) = &self.entry {
            validation::validate_non_empty_string("datasets.entry", entry)?;
        }
        if let Some(legacy) = &self.legacy {
            validation::validate_filename("datasets.legacy", legacy, &["csv"])?;
        }
        if let Some(selector) = self.scrape.as_ref().and_then(|s| s.download_selector.as_ref()) {
            validation::validate_non_empty_string("datasets.scrape.download_selector", selector)?;
        }
        Ok(())
    }
}
