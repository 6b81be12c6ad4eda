use crate::domain::catalog;
use crate::domain::model::DatasetDescriptor;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// TOML 格式的資料集清單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub settings: Option<SettingsConfig>,
    #[serde(default)]
    pub datasets: Vec<DatasetDescriptor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    pub output_dir: Option<String>,
    pub temp_dir: Option<String>,
    pub user_agent: Option<String>,
    pub webdriver_url: Option<String>,
    pub scrape_wait_seconds: Option<u64>,
    pub headless: Option<bool>,
}

impl CatalogConfig {
    /// 內建的資料集清單
    pub fn builtin() -> Self {
        Self {
            settings: None,
            datasets: catalog::default_datasets(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn settings(&self) -> SettingsConfig {
        self.settings.clone().unwrap_or_default()
    }

    /// 只保留指定檔名的資料集，保持原本順序
    pub fn select(&mut self, filenames: &[String]) -> Result<()> {
        if filenames.is_empty() {
            return Ok(());
        }

        let known: HashSet<&str> = self.datasets.iter().map(|d| d.filename.as_str()).collect();
        if let Some(unknown) = filenames.iter().find(|f| !known.contains(f.as_str())) {
            return Err(EtlError::InvalidConfigValueError {
                field: "only".to_string(),
                value: unknown.clone(),
                reason: "No dataset with this filename in the catalog".to_string(),
            });
        }

        self.datasets.retain(|d| filenames.contains(&d.filename));
        Ok(())
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        if self.datasets.is_empty() {
            return Err(EtlError::MissingConfigError {
                field: "datasets".to_string(),
            });
        }

        for dataset in &self.datasets {
            dataset.validate()?;
        }

        let settings = self.settings();
        if let Some(output_dir) = &settings.output_dir {
            validation::validate_path("settings.output_dir", output_dir)?;
        }
        if let Some(temp_dir) = &settings.temp_dir {
            validation::validate_path("settings.temp_dir", temp_dir)?;
        }
        if let Some(webdriver_url) = &settings.webdriver_url {
            validation::validate_url("settings.webdriver_url", webdriver_url)?;
        }
        if let Some(user_agent) = &settings.user_agent {
            validation::validate_non_empty_string("settings.user_agent", user_agent)?;
        }

        Ok(())
    }
}
