use crate::models::stock::{CompanyInfo, IndexPoint, PriceRow};
use crate::errors::Result;

/// Base trait for dataset loaders
pub trait DatasetLoader {
    /// Get a short name describing where the data comes from
    fn source_name(&self) -> &'static str;

    /// Load company metadata (symbol, names, sector)
    fn load_companies(&self) -> Result<Vec<CompanyInfo>>;

    /// Load daily price rows for all companies
    fn load_prices(&self) -> Result<Vec<PriceRow>>;

    /// Load the index level series
    /// An empty series is valid when no index data exists
    fn load_index(&self) -> Result<Vec<IndexPoint>>;
}
