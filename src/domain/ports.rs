use crate::domain::model::DatasetDescriptor;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    /// 回傳檔案在儲存體中的完整位置，僅供顯示
    fn location(&self, path: &str) -> String;
}

/// 一種取得 / 轉換策略；回傳寫出的 CSV 位置
#[async_trait]
pub trait Converter: Send + Sync {
    async fn convert(&self, dataset: &DatasetDescriptor) -> Result<String>;
}

/// 瀏覽器分頁的最小操作集合
#[async_trait]
pub trait PageSession: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;
    async fn title(&self) -> Result<String>;
    /// 執行 script 並回傳其 `return` 值
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;
    async fn click(&self, css_selector: &str) -> Result<()>;
    async fn close(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// 啟動瀏覽器；下載的檔案會存到 `download_dir`
    async fn launch(&self, download_dir: &Path) -> Result<Box<dyn PageSession>>;
}
