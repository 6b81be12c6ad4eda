use nyc_datasets::domain::catalog::default_datasets;
use nyc_datasets::utils::validation::Validate;
use nyc_datasets::{CatalogConfig, RunSettings, ScrapeMode};

const SAMPLE_CATALOG: &str = include_str!("../datasets.toml");

#[test]
fn test_sample_catalog_matches_builtin_list() {
    let config = CatalogConfig::from_toml_str(SAMPLE_CATALOG).unwrap();
    config.validate().unwrap();

    let builtin = default_datasets();
    assert_eq!(config.datasets.len(), builtin.len());

    for (from_file, expected) in config.datasets.iter().zip(&builtin) {
        assert_eq!(from_file.url, expected.url);
        assert_eq!(from_file.filename, expected.filename);
        assert_eq!(from_file.method, expected.method);
        assert_eq!(from_file.skip_rows, expected.skip_rows);
        assert_eq!(from_file.sheet, expected.sheet);
        assert_eq!(from_file.legacy, expected.legacy);
        assert_eq!(from_file.scrape_options().mode, ScrapeMode::PageState);
    }
}

#[test]
fn test_sample_catalog_settings_match_defaults() {
    let config = CatalogConfig::from_toml_str(SAMPLE_CATALOG).unwrap();
    let settings = RunSettings::from_settings(&config.settings());
    assert_eq!(settings, RunSettings::default());
}

#[test]
fn test_invalid_dataset_is_reported_by_field() {
    let config = CatalogConfig::from_toml_str(
        r#"
[[datasets]]
url = "https://example.com/rent.zip"
filename = "../rent.csv"
method = "zip"
"#,
    )
    .unwrap();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("datasets.filename"));
}
