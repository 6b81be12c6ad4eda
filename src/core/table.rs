use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, WriterBuilder};

/// 記憶體中的表格，欄位皆以字串表示
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// 加入一列，長度不足時補空字串，超過時截斷
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| EtlError::ProcessingError {
                message: format!("Column '{}' not found (columns: {})", name, self.headers.join(", ")),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// 只保留指定欄位值符合條件的列
    pub fn retain_rows<F>(&mut self, column: &str, mut keep: F) -> Result<()>
    where
        F: FnMut(&str) -> bool,
    {
        let index = self.column(column)?;
        self.rows.retain(|row| keep(&row[index]));
        Ok(())
    }

    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = Table::new(headers);

        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(
            "Parsed CSV with {} columns and {} rows",
            table.headers.len(),
            table.rows.len()
        );
        Ok(table)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());

        if !self.headers.is_empty() {
            writer.write_record(&self.headers)?;
        }
        for row in &self.rows {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| EtlError::IoError(e.into_error()))
    }
}
