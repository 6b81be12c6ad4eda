use crate::core::{BrowserLauncher, PageSession};
use crate::utils::error::Result;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::path::Path;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// 透過 WebDriver (geckodriver) 啟動 Firefox
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    webdriver_url: String,
    headless: bool,
}

impl WebDriverLauncher {
    pub fn new(webdriver_url: impl Into<String>, headless: bool) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            headless,
        }
    }
}

/// Firefox 偏好設定：下載直接存到 `download_dir`，不跳出對話框
pub fn firefox_capabilities(download_dir: &Path, headless: bool) -> Map<String, Value> {
    let args: Vec<&str> = if headless { vec!["-headless"] } else { Vec::new() };

    let capabilities = json!({
        "browserName": "firefox",
        "moz:firefoxOptions": {
            "args": args,
            "prefs": {
                "browser.download.folderList": 2,
                "browser.download.dir": download_dir.display().to_string(),
                "browser.download.useDownloadDir": true,
                "browser.helperApps.neverAsk.saveToDisk": "text/csv,application/csv,application/octet-stream"
            }
        }
    });

    match capabilities {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self, download_dir: &Path) -> Result<Box<dyn PageSession>> {
        // Firefox 只接受絕對路徑
        let download_dir = std::fs::canonicalize(download_dir)?;

        tracing::debug!(
            "Connecting to WebDriver at {} (headless: {})",
            self.webdriver_url,
            self.headless
        );
        let mut builder = ClientBuilder::rustls()?;
        builder.capabilities(firefox_capabilities(&download_dir, self.headless));
        let client = builder.connect(&self.webdriver_url).await?;

        Ok(Box::new(WebDriverSession { client }))
    }
}

pub struct WebDriverSession {
    client: Client,
}

#[async_trait]
impl PageSession for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn title(&self) -> Result<String> {
        Ok(self.client.title().await?)
    }

    async fn evaluate(&self, script: &str) -> Result<Value> {
        Ok(self.client.execute(script, Vec::new()).await?)
    }

    async fn click(&self, css_selector: &str) -> Result<()> {
        let element = self.client.find(Locator::Css(css_selector)).await?;
        element.click().await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let session = *self;
        session.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firefox_capabilities() {
        let caps = firefox_capabilities(Path::new("/tmp/downloads"), true);
        assert_eq!(caps["browserName"], "firefox");

        let options = &caps["moz:firefoxOptions"];
        assert_eq!(options["args"], json!(["-headless"]));
        assert_eq!(options["prefs"]["browser.download.dir"], "/tmp/downloads");
        assert_eq!(options["prefs"]["browser.download.folderList"], 2);
    }

    #[test]
    fn test_headed_browser_has_no_args() {
        let caps = firefox_capabilities(Path::new("/tmp/downloads"), false);
        assert_eq!(caps["moz:firefoxOptions"]["args"], json!([]));
    }
}
