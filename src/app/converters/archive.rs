use crate::core::fetch::HttpFetcher;
use crate::core::{Converter, DatasetDescriptor, Storage};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// 下載壓縮檔並取出其中一個檔案
pub struct ArchiveExtractor<S: Storage> {
    storage: S,
    fetcher: HttpFetcher,
}

impl<S: Storage> ArchiveExtractor<S> {
    pub fn new(storage: S, fetcher: HttpFetcher) -> Self {
        Self { storage, fetcher }
    }
}

#[async_trait]
impl<S: Storage> Converter for ArchiveExtractor<S> {
    async fn convert(&self, dataset: &DatasetDescriptor) -> Result<String> {
        let temp_name = dataset.temp_filename().ok_or_else(|| EtlError::ConfigError {
            message: format!("'{}' is not an archive dataset", dataset.filename),
        })?;
        let archive_path = self.fetcher.download(&dataset.url, &temp_name).await?;

        let entry = dataset.archive_entry();
        let data = {
            let file = std::fs::File::open(&archive_path)?;
            extract_entry(file, entry)?
        };
        tracing::info!("🗜️  Extracted '{}' ({} bytes) from {}", entry, data.len(), temp_name);

        self.storage.write_file(&dataset.filename, &data).await?;
        Ok(self.storage.location(&dataset.filename))
    }
}

/// 讀出壓縮檔中指定名稱的檔案內容
pub fn extract_entry<R: Read + Seek>(reader: R, entry: &str) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(reader)?;

    tracing::debug!("Archive contains {} entries", archive.len());
    let mut file = archive.by_name(entry)?;

    let mut data = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut data)?;
    Ok(data)
}
