use clap::Parser;
use nyc_datasets::utils::error::{ErrorSeverity, EtlError};
use nyc_datasets::utils::{logger, validation::Validate};
use nyc_datasets::{
    CatalogConfig, CliConfig, Dispatcher, DownloadEngine, HttpFetcher, LocalStorage, RunSettings,
    WebDriverLauncher,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.json_logs);

    tracing::info!("Starting nyc-datasets");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入資料集清單
    let catalog = match load_catalog(&cli) {
        Ok(catalog) => catalog,
        Err(e) => exit_with(e),
    };

    let settings = RunSettings::from_settings(&catalog.settings()).with_cli_overrides(&cli);
    if let Err(e) = settings.validate() {
        exit_with(e);
    }

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be downloaded");
        for dataset in &catalog.datasets {
            println!(
                "{:<50} {:<10} {}",
                dataset.filename,
                dataset.method.to_string(),
                dataset.url
            );
        }
        println!("📁 Output directory: {}", settings.output_dir);
        return Ok(());
    }

    // 暫存目錄
    std::fs::create_dir_all(&settings.temp_dir)?;

    let storage = LocalStorage::new(settings.output_dir.clone());
    let fetcher = HttpFetcher::new(&settings.temp_dir, &settings.user_agent)?;
    let launcher = WebDriverLauncher::new(settings.webdriver_url.clone(), settings.headless);
    let engine = DownloadEngine::new(Dispatcher::new(
        storage,
        fetcher,
        launcher,
        settings.scrape_wait,
    ));

    match engine.run(&catalog.datasets).await {
        Ok(outputs) => {
            for output in &outputs {
                println!("downloaded {}", output);
            }
            println!("✅ {} datasets written to {}", outputs.len(), settings.output_dir);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn load_catalog(cli: &CliConfig) -> nyc_datasets::Result<CatalogConfig> {
    let mut catalog = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading dataset catalog from: {}", path.display());
            CatalogConfig::from_file(path)?
        }
        None => CatalogConfig::builtin(),
    };

    catalog.select(&cli.only)?;
    catalog.validate()?;
    Ok(catalog)
}

fn exit_with(e: EtlError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
