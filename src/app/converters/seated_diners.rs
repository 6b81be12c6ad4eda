//! OpenTable 「seated diners」資料的整理：挑出追蹤的城市、轉成寬表、合併歷史資料。

use crate::core::table::Table;
use crate::utils::error::Result;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const TRACKED_CITIES: [&str; 4] = ["New York", "Chicago", "Boston", "Los Angeles"];
pub const TRACKED_STATE: &str = "New York";

/// 在頁面中執行，取出內嵌的初始狀態
pub const SEATED_DINERS_SCRIPT: &str =
    "return window.__INITIAL_STATE__.stateOfTheIndustry.seatedDiners;";

/// 歷史資料中屬於當年度 (由即時資料提供) 的欄位標記
const CURRENT_YEAR_MARKER: &str = "2023";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatedDiners {
    pub daily_headers: Vec<String>,
    #[serde(default)]
    pub cities: Vec<RegionSeries>,
    #[serde(default)]
    pub states: Vec<RegionSeries>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionSeries {
    pub name: String,
    #[serde(rename = "dailyYoY", default)]
    pub daily_yoy: Vec<Value>,
}

pub fn is_tracked_city(name: &str) -> bool {
    TRACKED_CITIES.contains(&name)
}

/// 每個追蹤地區一列：Name, Type, id, 之後每天一欄 (日期中的 `-` 改為 `/`)
pub fn seated_diners_table(state: &SeatedDiners) -> Table {
    let mut headers = vec!["Name".to_string(), "Type".to_string(), "id".to_string()];
    headers.extend(state.daily_headers.iter().map(|d| d.replace('-', "/")));

    let mut table = Table::new(headers);

    for city in state.cities.iter().filter(|c| is_tracked_city(&c.name)) {
        table.push_row(region_row(city, "city"));
    }
    for st in state.states.iter().filter(|s| s.name == TRACKED_STATE) {
        table.push_row(region_row(st, "state"));
    }

    table
}

fn region_row(region: &RegionSeries, kind: &str) -> Vec<String> {
    let mut row = vec![
        region.name.clone(),
        kind.to_string(),
        format!("{}-{}", region.name, kind),
    ];
    row.extend(region.daily_yoy.iter().map(render_value));
    row
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 下載模式：只保留追蹤城市的列
pub fn filter_tracked_cities(table: &mut Table, name_column: &str) -> Result<()> {
    let before = table.rows.len();
    table.retain_rows(name_column, is_tracked_city)?;
    tracing::debug!("Kept {} of {} rows for tracked cities", table.rows.len(), before);
    Ok(())
}

/// 以 `id` 外部合併歷史資料與即時資料。
///
/// 歷史資料會先補上 `id` (`Name-Type`)，移除 `Name`、`Type` 與當年度欄位；
/// 兩邊都有的欄位以即時資料的非空值為準。結果依 `id` 排序，重複的歷史 `id` 各自保留一列。
pub fn merge_with_legacy(legacy: &Table, fresh: &Table) -> Result<Table> {
    let name_index = legacy.column("Name")?;
    let type_index = legacy.column("Type")?;
    let fresh_id_index = fresh.column("id")?;

    let kept: Vec<usize> = legacy
        .headers
        .iter()
        .enumerate()
        .filter(|(index, header)| {
            *index != name_index
                && *index != type_index
                && header.as_str() != "id"
                && !header.contains(CURRENT_YEAR_MARKER)
        })
        .map(|(index, _)| index)
        .collect();

    let mut headers: Vec<String> = kept.iter().map(|&i| legacy.headers[i].clone()).collect();
    headers.push("id".to_string());
    let id_position = headers.len() - 1;
    for header in &fresh.headers {
        if header != "id" && !headers.contains(header) {
            headers.push(header.clone());
        }
    }

    let width = headers.len();
    // 同一個 id 可能對應多列歷史資料，全部保留
    let mut merged: BTreeMap<String, Vec<Vec<String>>> = BTreeMap::new();

    for row in &legacy.rows {
        let id = format!("{}-{}", row[name_index], row[type_index]);
        let mut out = vec![String::new(); width];
        for (position, &index) in kept.iter().enumerate() {
            out[position] = row[index].clone();
        }
        out[id_position] = id.clone();

        let rows = merged.entry(id).or_default();
        if !rows.is_empty() {
            tracing::warn!("⚠️  Legacy data has duplicate id '{}'", out[id_position]);
        }
        rows.push(out);
    }

    let fresh_positions: Vec<Option<usize>> = fresh
        .headers
        .iter()
        .map(|h| if h == "id" { None } else { headers.iter().position(|x| x == h) })
        .collect();

    for row in &fresh.rows {
        let id = row[fresh_id_index].clone();
        let targets = merged.entry(id.clone()).or_insert_with(|| {
            let mut blank = vec![String::new(); width];
            blank[id_position] = id;
            vec![blank]
        });

        for out in targets.iter_mut() {
            for (value, position) in row.iter().zip(&fresh_positions) {
                if let Some(position) = position {
                    if !value.is_empty() {
                        out[*position] = value.clone();
                    }
                }
            }
        }
    }

    let mut table = Table::new(headers);
    table.rows = merged.into_values().flatten().collect();
    Ok(table)
}
