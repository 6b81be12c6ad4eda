use crate::core::fetch::HttpFetcher;
use crate::core::table::Table;
use crate::core::{Converter, DatasetDescriptor, Storage};
use crate::domain::model::{Method, SheetSelector};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use calamine::{open_workbook, Data, Range, Reader, Xls, Xlsx};
use chrono::{NaiveDateTime, Timelike};
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

/// 下載 Excel 活頁簿 (xls / xlsx)，挑選工作表並另存為 CSV
pub struct SpreadsheetConverter<S: Storage> {
    storage: S,
    fetcher: HttpFetcher,
}

impl<S: Storage> SpreadsheetConverter<S> {
    pub fn new(storage: S, fetcher: HttpFetcher) -> Self {
        Self { storage, fetcher }
    }
}

#[async_trait]
impl<S: Storage> Converter for SpreadsheetConverter<S> {
    async fn convert(&self, dataset: &DatasetDescriptor) -> Result<String> {
        let temp_name = dataset.temp_filename().ok_or_else(|| EtlError::ConfigError {
            message: format!("'{}' is not a spreadsheet dataset", dataset.filename),
        })?;

        // 以正確的副檔名存檔，讀取時才不會判斷錯格式
        let workbook_path = self.fetcher.download(&dataset.url, &temp_name).await?;

        let range = read_sheet(&workbook_path, dataset.method, &dataset.sheet)?;
        let table = sheet_to_table(&range, dataset.skip_rows);
        tracing::info!(
            "📄 Sheet {} of {}: {} columns, {} rows (skipped {} rows)",
            dataset.sheet,
            temp_name,
            table.headers.len(),
            table.rows.len(),
            dataset.skip_rows
        );

        self.storage
            .write_file(&dataset.filename, &table.to_csv()?)
            .await?;
        Ok(self.storage.location(&dataset.filename))
    }
}

/// 依格式開啟活頁簿並取出指定工作表
pub fn read_sheet(path: &Path, method: Method, sheet: &SheetSelector) -> Result<Range<Data>> {
    match method {
        Method::Xls => {
            let mut workbook: Xls<_> = open_workbook(path).map_err(calamine::Error::from)?;
            select_sheet(&mut workbook, sheet)
        }
        Method::Xlsx => {
            let mut workbook: Xlsx<_> = open_workbook(path).map_err(calamine::Error::from)?;
            select_sheet(&mut workbook, sheet)
        }
        other => Err(EtlError::ConfigError {
            message: format!("Method '{}' does not produce a workbook", other),
        }),
    }
}

fn select_sheet<R, RS>(workbook: &mut R, sheet: &SheetSelector) -> Result<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    calamine::Error: From<R::Error>,
{
    let not_found = || EtlError::SheetNotFound {
        sheet: sheet.to_string(),
    };

    let range = match sheet {
        SheetSelector::Index(index) => workbook.worksheet_range_at(*index).ok_or_else(not_found)?,
        SheetSelector::Name(name) => {
            if !workbook.sheet_names().iter().any(|n| n == name) {
                return Err(not_found());
            }
            workbook.worksheet_range(name)
        }
    };

    range.map_err(|e| EtlError::SpreadsheetError(e.into()))
}

/// 將工作表轉成表格。
///
/// 列與欄都從工作表的 A1 起算 (與資料實際起始位置無關)：`skip_rows` 從第一列算起，
/// 資料左側的空白欄會保留。略過後第一個非空白列作為欄位名稱，其後的全空白列會被丟棄。
pub fn sheet_to_table(range: &Range<Data>, skip_rows: usize) -> Table {
    let (first_row, first_col) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut rows = range
        .rows()
        .enumerate()
        .filter(|(offset, _)| first_row + offset >= skip_rows)
        .map(|(_, cells)| cells)
        .filter(|cells| !cells.iter().all(is_blank));

    let Some(header_cells) = rows.next() else {
        tracing::warn!("Sheet has no rows after skipping {} rows", skip_rows);
        return Table::default();
    };

    let mut table = Table::new(header_names(&pad_to_column_a(header_cells, first_col)));
    for cells in rows {
        table.push_row(
            pad_to_column_a(cells, first_col)
                .iter()
                .map(render_cell)
                .collect(),
        );
    }
    table
}

/// 在左側補上 A 欄到資料起始欄之間的空白儲存格
fn pad_to_column_a(cells: &[Data], first_col: usize) -> Vec<Data> {
    std::iter::repeat(Data::Empty)
        .take(first_col)
        .chain(cells.iter().cloned())
        .collect()
}

/// 空白欄名改為 `Unnamed: <n>` (n 為工作表欄號，A 欄為 0)，重複欄名加上 `.1`、`.2` 後綴
fn header_names(cells: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    cells
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let name = render_cell(cell);
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", index)
            } else {
                name
            };

            match seen.get_mut(&base) {
                Some(count) => {
                    *count += 1;
                    format!("{}.{}", base, count)
                }
                None => {
                    seen.insert(base.clone(), 0);
                    base
                }
            }
        })
        .collect()
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => String::from(if *b { "True" } else { "False" }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => render_datetime(&datetime),
            None => dt.as_f64().to_string(),
        },
    }
}

fn render_datetime(datetime: &NaiveDateTime) -> String {
    if datetime.hour() == 0 && datetime.minute() == 0 && datetime.second() == 0 {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
