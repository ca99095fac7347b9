// 公开导出的模块，供外部使用
pub mod models;
pub mod data_provider;
pub mod errors;
pub mod services;
pub mod report;

// 数据加载与配置，主程序和脚本共用
pub mod loaders;
pub mod config;
#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use models::stock::{StockRecord, CompanyInfo, IndexPoint};
pub use models::analysis::{SectorAggregate, GrowthPair, MonthlyExtremes};
pub use data_provider::StockDataset;
pub use services::query_service::QueryService;
pub use errors::{Result, InsightsError};
