use std::path::PathBuf;

/// 数据集覆盖的第一年
pub const FIRST_COVERED_YEAR: i32 = 2014;
/// 数据集覆盖的最后一年
pub const LAST_COVERED_YEAR: i32 = 2024;

pub struct Config {
    pub data_dir: String,
    pub stocks_file: String,
    pub companies_file: String,
    pub index_file: String,
    pub first_year: i32,
    pub last_year: i32,
}

impl Config {
    pub fn new() -> Self {
        Self {
            data_dir: "datasets".to_string(),
            stocks_file: "sp500_stocks.csv".to_string(),
            companies_file: "sp500_companies.csv".to_string(),
            index_file: "sp500_index.csv".to_string(),
            first_year: FIRST_COVERED_YEAR,
            last_year: LAST_COVERED_YEAR,
        }
    }

    pub fn with_data_dir(mut self, dir: &str) -> Self {
        self.data_dir = dir.to_string();
        self
    }

    pub fn with_stocks_file(mut self, name: &str) -> Self {
        self.stocks_file = name.to_string();
        self
    }

    pub fn with_companies_file(mut self, name: &str) -> Self {
        self.companies_file = name.to_string();
        self
    }

    pub fn with_index_file(mut self, name: &str) -> Self {
        self.index_file = name.to_string();
        self
    }

    pub fn with_covered_years(mut self, first_year: i32, last_year: i32) -> Self {
        self.first_year = first_year;
        self.last_year = last_year;
        self
    }

    pub fn stocks_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.stocks_file)
    }

    pub fn companies_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.companies_file)
    }

    pub fn index_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.index_file)
    }

    /// 年份是否落在数据集覆盖范围内
    pub fn covers_year(&self, year: i32) -> bool {
        (self.first_year..=self.last_year).contains(&year)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
