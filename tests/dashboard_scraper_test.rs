use async_trait::async_trait;
use nyc_datasets::app::converters::seated_diners::{
    merge_with_legacy, seated_diners_table, SeatedDiners,
};
use nyc_datasets::core::{BrowserLauncher, PageSession};
use nyc_datasets::{
    DatasetDescriptor, Dispatcher, DownloadEngine, EtlError, HttpFetcher, LocalStorage, Method,
    Result, ScrapeMode, ScrapeOptions, Table,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const LEGACY_CSV: &str = "Name,Type,2022/12/31,2023/01/01\n\
New York,city,-20,-99\n\
Chicago,city,-15,-98\n";

const DOWNLOADED_CSV: &str = "Name,Type,2023/01/01\n\
New York,city,-1\n\
Miami,city,2\n\
Chicago,city,3\n\
Los Angeles,city,4\n\
Boston,city,5\n";

fn page_state() -> serde_json::Value {
    serde_json::json!({
        "dailyHeaders": ["2023-01-01", "2023-01-02"],
        "cities": [
            {"name": "New York", "dailyYoY": [-10.5, 3]},
            {"name": "Miami", "dailyYoY": [1, 2]},
            {"name": "Boston", "dailyYoY": [null, 4.25]}
        ],
        "states": [
            {"name": "Florida", "dailyYoY": [0, 0]},
            {"name": "New York", "dailyYoY": [-8, -9]}
        ]
    })
}

#[derive(Default)]
struct BrowserLog {
    visited: Vec<String>,
    scripts: Vec<String>,
    clicked: Vec<String>,
    closed: bool,
}

#[derive(Clone)]
struct FakeLauncher {
    state: serde_json::Value,
    log: Arc<Mutex<BrowserLog>>,
}

impl FakeLauncher {
    fn new(state: serde_json::Value) -> Self {
        Self {
            state,
            log: Arc::new(Mutex::new(BrowserLog::default())),
        }
    }
}

struct FakeSession {
    state: serde_json::Value,
    download_dir: PathBuf,
    log: Arc<Mutex<BrowserLog>>,
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self, download_dir: &Path) -> Result<Box<dyn PageSession>> {
        Ok(Box::new(FakeSession {
            state: self.state.clone(),
            download_dir: download_dir.to_path_buf(),
            log: self.log.clone(),
        }))
    }
}

#[async_trait]
impl PageSession for FakeSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.log.lock().unwrap().visited.push(url.to_string());
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok("State of the Restaurant Industry".to_string())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        self.log.lock().unwrap().scripts.push(script.to_string());
        Ok(self.state.clone())
    }

    async fn click(&self, css_selector: &str) -> Result<()> {
        self.log.lock().unwrap().clicked.push(css_selector.to_string());
        std::fs::write(self.download_dir.join("seated_diners.csv"), DOWNLOADED_CSV)?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.log.lock().unwrap().closed = true;
        Ok(())
    }
}

fn engine(
    output: &TempDir,
    temp: &TempDir,
    launcher: FakeLauncher,
) -> DownloadEngine<LocalStorage, FakeLauncher> {
    let storage = LocalStorage::new(output.path().to_str().unwrap());
    let fetcher = HttpFetcher::new(temp.path(), "Mozilla/5.0").unwrap();
    DownloadEngine::new(Dispatcher::new(storage, fetcher, launcher, Duration::ZERO))
}

fn dashboard(filename: &str) -> DatasetDescriptor {
    DatasetDescriptor::new(
        "https://www.opentable.com/state-of-industry",
        filename,
        Method::OpenTable,
    )
}

#[test]
fn test_page_state_keeps_tracked_regions_only() {
    let state: SeatedDiners = serde_json::from_value(page_state()).unwrap();
    let table = seated_diners_table(&state);

    assert_eq!(table.headers, vec!["Name", "Type", "id", "2023/01/01", "2023/01/02"]);
    assert_eq!(
        table.rows,
        vec![
            vec!["New York", "city", "New York-city", "-10.5", "3"],
            vec!["Boston", "city", "Boston-city", "", "4.25"],
            vec!["New York", "state", "New York-state", "-8", "-9"],
        ]
    );
}

#[test]
fn test_merge_with_legacy_outer_joins_on_id() {
    let state: SeatedDiners = serde_json::from_value(page_state()).unwrap();
    let fresh = seated_diners_table(&state);
    let legacy = Table::from_csv(LEGACY_CSV.as_bytes()).unwrap();

    let merged = merge_with_legacy(&legacy, &fresh).unwrap();

    // 歷史資料的 2023 欄位被即時資料取代
    assert_eq!(
        merged.headers,
        vec!["2022/12/31", "id", "Name", "Type", "2023/01/01", "2023/01/02"]
    );
    assert_eq!(
        merged.rows,
        vec![
            vec!["", "Boston-city", "Boston", "city", "", "4.25"],
            vec!["-15", "Chicago-city", "", "", "", ""],
            vec!["-20", "New York-city", "New York", "city", "-10.5", "3"],
            vec!["", "New York-state", "New York", "state", "-8", "-9"],
        ]
    );
}

#[test]
fn test_merge_requires_name_and_type_columns() {
    let legacy = Table::from_csv(b"Region,2022/12/31\nBoston,-3\n").unwrap();
    let fresh = Table::new(vec!["Name".to_string(), "Type".to_string(), "id".to_string()]);
    assert!(matches!(
        merge_with_legacy(&legacy, &fresh),
        Err(EtlError::ProcessingError { .. })
    ));
}

#[tokio::test]
async fn test_missing_legacy_file_aborts_run() {
    let output = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    std::fs::write(output.path().join("diners.csv"), "previous run\n").unwrap();
    let launcher = FakeLauncher::new(page_state());
    let log = launcher.log.clone();

    let datasets = vec![dashboard("diners.csv").with_legacy("diners_legacy.csv")];
    let result = engine(&output, &temp, launcher).run(&datasets).await;

    match result {
        Err(EtlError::ProcessingError { message }) => {
            assert!(message.contains("diners_legacy.csv"))
        }
        other => panic!("expected ProcessingError, got {:?}", other),
    }
    // 既有輸出不會被只含即時資料的結果覆寫
    assert_eq!(
        std::fs::read_to_string(output.path().join("diners.csv")).unwrap(),
        "previous run\n"
    );
    assert!(log.lock().unwrap().closed);
}

#[tokio::test]
async fn test_page_state_scrape_without_legacy_configured() {
    let output = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    let launcher = FakeLauncher::new(page_state());
    let log = launcher.log.clone();

    let datasets = vec![dashboard("diners.csv")];
    engine(&output, &temp, launcher).run(&datasets).await.unwrap();

    let written = std::fs::read_to_string(output.path().join("diners.csv")).unwrap();
    assert_eq!(
        written,
        "Name,Type,id,2023/01/01,2023/01/02\n\
New York,city,New York-city,-10.5,3\n\
Boston,city,Boston-city,,4.25\n\
New York,state,New York-state,-8,-9\n"
    );

    let log = log.lock().unwrap();
    assert_eq!(log.visited, vec!["https://www.opentable.com/state-of-industry"]);
    assert!(log.scripts[0].contains("__INITIAL_STATE__"));
    assert!(log.clicked.is_empty());
    assert!(log.closed);
}

#[tokio::test]
async fn test_page_state_scrape_merges_legacy_file() {
    let output = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    std::fs::write(output.path().join("diners_legacy.csv"), LEGACY_CSV).unwrap();

    let datasets = vec![dashboard("diners.csv").with_legacy("diners_legacy.csv")];
    engine(&output, &temp, FakeLauncher::new(page_state()))
        .run(&datasets)
        .await
        .unwrap();

    let merged = Table::from_csv(&std::fs::read(output.path().join("diners.csv")).unwrap()).unwrap();
    let ids: Vec<&str> = merged
        .rows
        .iter()
        .map(|row| row[merged.column_index("id").unwrap()].as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["Boston-city", "Chicago-city", "New York-city", "New York-state"]
    );
    let current = merged.column_index("2023/01/01").unwrap();
    let history = merged.column_index("2022/12/31").unwrap();
    assert_eq!(merged.rows[2][current], "-10.5");
    assert_eq!(merged.rows[2][history], "-20");
}

#[tokio::test]
async fn test_unexpected_page_state_aborts_run() {
    let output = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    let launcher = FakeLauncher::new(serde_json::json!({"cities": []}));
    let log = launcher.log.clone();

    let result = engine(&output, &temp, launcher)
        .run(&[dashboard("diners.csv")])
        .await;

    assert!(matches!(result, Err(EtlError::SerializationError(_))));
    assert!(!output.path().join("diners.csv").exists());
    // 失敗時仍會關閉瀏覽器
    assert!(log.lock().unwrap().closed);
}

#[tokio::test]
async fn test_download_mode_filters_tracked_cities() {
    let output = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    let launcher = FakeLauncher::new(serde_json::Value::Null);
    let log = launcher.log.clone();

    let dataset = dashboard("diners.csv").with_scrape(ScrapeOptions {
        mode: ScrapeMode::Download,
        download_selector: Some("button#download-csv".to_string()),
        wait_seconds: Some(0),
    });

    engine(&output, &temp, launcher).run(&[dataset]).await.unwrap();

    let written = std::fs::read_to_string(output.path().join("diners.csv")).unwrap();
    assert_eq!(
        written,
        "Name,Type,2023/01/01\n\
New York,city,-1\n\
Chicago,city,3\n\
Los Angeles,city,4\n\
Boston,city,5\n"
    );

    let log = log.lock().unwrap();
    assert_eq!(log.clicked, vec!["button#download-csv"]);
    assert!(log.scripts.is_empty());

    // 下載檔存放在暫存目錄底下
    assert!(temp.path().join("downloads").join("seated_diners.csv").exists());
}
