use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Browser command failed: {0}")]
    BrowserError(#[from] fantoccini::error::CmdError),

    #[error("Browser session could not be started: {0}")]
    BrowserSessionError(#[from] fantoccini::error::NewSessionError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Sheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Format,
    Browser,
    Storage,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::ZipError(_)
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::SpreadsheetError(_)
            | EtlError::SheetNotFound { .. } => ErrorCategory::Format,
            EtlError::BrowserError(_) | EtlError::BrowserSessionError(_) => {
                ErrorCategory::Browser
            }
            EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    /// 決定錯誤嚴重程度，主程式據此決定退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 上游暫時不可用，重跑通常可解決
            ErrorCategory::Network | ErrorCategory::Browser => ErrorSeverity::Medium,
            ErrorCategory::Format | ErrorCategory::Data | ErrorCategory::Configuration => {
                ErrorSeverity::High
            }
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity and whether the source URL still serves the dataset"
            }
            EtlError::BrowserSessionError(_) => {
                "Start a WebDriver server (e.g. `geckodriver --port 4444`) or pass --webdriver-url"
            }
            EtlError::BrowserError(_) => {
                "The dashboard page layout may have changed; rerun with --show-browser to inspect it"
            }
            EtlError::SpreadsheetError(_) | EtlError::SheetNotFound { .. } => {
                "The upstream workbook layout may have changed; check the sheet and skip_rows settings"
            }
            EtlError::ZipError(_) => "Verify the archive URL and the configured entry name",
            EtlError::IoError(_) => "Check that the output and temp directories are writable",
            EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "The downloaded data is not in the expected format"
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the dataset catalog or command line arguments and try again"
            }
            EtlError::ProcessingError { .. } => "Inspect the downloaded file in the temp directory",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download a dataset: {}", self),
            ErrorCategory::Browser => format!("Dashboard scraping failed: {}", self),
            ErrorCategory::Format => format!("Could not read a downloaded file: {}", self),
            ErrorCategory::Storage => format!("Could not write output: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
