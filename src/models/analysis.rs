use chrono::NaiveDate;
use serde::Serialize;

/// 板块在某一年的平均收盘价，以及同年全市场均价
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorAggregate {
    pub sector: String,
    pub year: i32,
    pub average_price: f64,
    pub index_average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub observations: usize,
}

/// 营收增长与股价增长（百分比），起始营收缺失时营收增长为 None
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthPair {
    pub company: String,
    pub name: String,
    pub sector: String,
    pub revenue_growth_pct: Option<f64>,
    pub price_growth_pct: f64,
    pub start_year: i32,
    pub end_year: i32,
    pub reported_revenue_growth_pct: Option<f64>,
}

/// 单个公司某月的价格极值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyExtremes {
    pub company: String,
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub max_price: f64,
    pub min_price: f64,
    pub highest_high: f64,
    pub lowest_low: f64,
    pub trading_days: usize,
}

/// 日线序列中的一个点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRange {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// 指数年度平均点位
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexAggregate {
    pub year: i32,
    pub average_level: f64,
}
