use crate::core::dispatch::Dispatcher;
use crate::core::{BrowserLauncher, DatasetDescriptor, Storage};
use crate::utils::error::Result;
use std::time::Instant;

/// 依序處理每個資料集；任何一個失敗就中止整個流程
pub struct DownloadEngine<S: Storage + Clone, B: BrowserLauncher> {
    dispatcher: Dispatcher<S, B>,
}

impl<S: Storage + Clone, B: BrowserLauncher> DownloadEngine<S, B> {
    pub fn new(dispatcher: Dispatcher<S, B>) -> Self {
        Self { dispatcher }
    }

    /// 回傳所有寫出的 CSV 位置 (與輸入順序相同)
    pub async fn run(&self, datasets: &[DatasetDescriptor]) -> Result<Vec<String>> {
        tracing::info!("🚀 Processing {} datasets", datasets.len());
        let started = Instant::now();
        let mut outputs = Vec::with_capacity(datasets.len());

        for (index, dataset) in datasets.iter().enumerate() {
            tracing::info!(
                "[{}/{}] {} ({}) <- {}",
                index + 1,
                datasets.len(),
                dataset.filename,
                dataset.method,
                dataset.url
            );
            let dataset_started = Instant::now();

            let converter = self.dispatcher.converter_for(dataset.method);
            let output = converter.convert(dataset).await?;

            tracing::info!(
                "✅ downloaded {} in {:?}",
                dataset.filename,
                dataset_started.elapsed()
            );
            outputs.push(output);
        }

        tracing::info!("📊 Finished {} datasets in {:?}", outputs.len(), started.elapsed());
        Ok(outputs)
    }
}
