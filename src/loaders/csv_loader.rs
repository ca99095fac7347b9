use crate::config::Config;
use crate::errors::{Result, InsightsError};
use crate::loaders::base::DatasetLoader;
use crate::models::stock::{CompanyInfo, IndexPoint, PriceRow};
use crate::util::csv_utils;
use log::{info, warn};
use std::fs::File;
use std::path::{Path, PathBuf};

/// 从本地 CSV 文件读取数据集（公司、日线、指数三个文件）
pub struct CsvLoader {
    stocks_path: PathBuf,
    companies_path: PathBuf,
    index_path: PathBuf,
}

impl CsvLoader {
    pub fn new(config: &Config) -> Self {
        Self {
            stocks_path: config.stocks_path(),
            companies_path: config.companies_path(),
            index_path: config.index_path(),
        }
    }

    fn open(path: &Path) -> Result<File> {
        File::open(path).map_err(|e| {
            InsightsError::DataError(format!("Failed to open {}: {}", path.display(), e))
        })
    }
}

impl DatasetLoader for CsvLoader {
    fn source_name(&self) -> &'static str {
        "csv"
    }

    fn load_companies(&self) -> Result<Vec<CompanyInfo>> {
        info!("Loading companies from {}", self.companies_path.display());
        let batch = csv_utils::read_companies(Self::open(&self.companies_path)?)?;
        Ok(batch.rows)
    }

    fn load_prices(&self) -> Result<Vec<PriceRow>> {
        info!("Loading prices from {}", self.stocks_path.display());
        let batch = csv_utils::read_prices(Self::open(&self.stocks_path)?)?;
        Ok(batch.rows)
    }

    fn load_index(&self) -> Result<Vec<IndexPoint>> {
        // 指数文件可选
        if !self.index_path.exists() {
            warn!("Index file {} not found, index series will be empty", self.index_path.display());
            return Ok(Vec::new());
        }

        info!("Loading index from {}", self.index_path.display());
        let batch = csv_utils::read_index(Self::open(&self.index_path)?)?;
        Ok(batch.rows)
    }
}
