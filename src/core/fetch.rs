use crate::utils::error::Result;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// 將遠端檔案下載到暫存目錄
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    temp_dir: PathBuf,
}

impl HttpFetcher {
    pub fn new(temp_dir: impl Into<PathBuf>, user_agent: &str) -> Result<Self> {
        // 部分政府網站會擋掉沒有 User-Agent 的請求
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            temp_dir: temp_dir.into(),
        })
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// 下載 `url` 並存成 `temp_dir/file_name`，回傳完整路徑
    pub async fn download(&self, url: &str, file_name: &str) -> Result<PathBuf> {
        let dest_path = self.temp_dir.join(file_name);
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        tracing::debug!("⬇️  GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        tracing::debug!("Response status: {}", response.status());

        let bytes = response.bytes().await?;
        fs::write(&dest_path, &bytes).await?;

        tracing::debug!("Saved {} bytes to {}", bytes.len(), dest_path.display());
        Ok(dest_path)
    }
}
