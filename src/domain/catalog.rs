use crate::domain::model::{DatasetDescriptor, Method, SheetSelector};

pub const DOL_EMPLOYMENT_URL: &str =
    "https://dol.ny.gov/statistics-new-york-city-employment-statistics";
pub const DOL_LABOR_FORCE_URL: &str =
    "https://dol.ny.gov/statistics-new-york-city-labor-force-data";
pub const DOL_LAUS_URL: &str = "https://dol.ny.gov/statistics-laussaxls";
pub const DOL_EARNINGS_URL: &str =
    "https://dol.ny.gov/statistics-state-and-area-employment-hours-and-earnings";
pub const STREETEASY_RENT_URL: &str =
    "https://cdn-charts.streeteasy.com/rentals/All/medianAskingRent_All.zip";
pub const OPENTABLE_URL: &str = "https://www.opentable.com/state-of-industry";

pub const SEATED_DINERS_FILENAME: &str = "2020-2022vs2019_Reopened_Seated_Diner_Data.csv";
pub const SEATED_DINERS_LEGACY_FILENAME: &str =
    "2020-2022vs2019_Reopened_Seated_Diner_Data_Legacy.csv";

/// 內建資料集清單，依序處理
pub fn default_datasets() -> Vec<DatasetDescriptor> {
    vec![
        DatasetDescriptor::new(DOL_EMPLOYMENT_URL, "nychist.csv", Method::Xlsx),
        DatasetDescriptor::new(DOL_LABOR_FORCE_URL, "nyclfsa.csv", Method::Xlsx).with_skip_rows(2),
        DatasetDescriptor::new(DOL_LAUS_URL, "laus_sa_state.csv", Method::Xls)
            .with_skip_rows(2)
            .with_sheet(SheetSelector::Index(0)),
        // 同一份活頁簿的第二張工作表
        DatasetDescriptor::new(DOL_LAUS_URL, "laus_sa_city.csv", Method::Xls)
            .with_skip_rows(2)
            .with_sheet(SheetSelector::Index(1)),
        DatasetDescriptor::new(DOL_EARNINGS_URL, "nyc-weekly-earnings.csv", Method::Xlsx)
            .with_skip_rows(12)
            .with_sheet(SheetSelector::Index(2)),
        DatasetDescriptor::new(STREETEASY_RENT_URL, "medianAskingRent_All.csv", Method::Zip),
        DatasetDescriptor::new(OPENTABLE_URL, SEATED_DINERS_FILENAME, Method::OpenTable)
            .with_legacy(SEATED_DINERS_LEGACY_FILENAME),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;

    #[test]
    fn test_default_catalog_is_valid() {
        let datasets = default_datasets();
        assert_eq!(datasets.len(), 7);
        for dataset in &datasets {
            dataset.validate().unwrap();
        }
    }

    #[test]
    fn test_default_catalog_order_and_options() {
        let datasets = default_datasets();
        let names: Vec<&str> = datasets.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "nychist.csv",
                "nyclfsa.csv",
                "laus_sa_state.csv",
                "laus_sa_city.csv",
                "nyc-weekly-earnings.csv",
                "medianAskingRent_All.csv",
                SEATED_DINERS_FILENAME,
            ]
        );

        assert_eq!(datasets[3].sheet, SheetSelector::Index(1));
        assert_eq!(datasets[4].skip_rows, 12);
        assert_eq!(datasets[5].method, Method::Zip);
        assert_eq!(datasets[6].legacy.as_deref(), Some(SEATED_DINERS_LEGACY_FILENAME));
    }
}
