pub mod archive;
pub mod dashboard;
pub mod seated_diners;
pub mod spreadsheet;

pub use archive::ArchiveExtractor;
pub use dashboard::DashboardScraper;
pub use spreadsheet::SpreadsheetConverter;
