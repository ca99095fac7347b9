use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// 单条价格记录（已与公司信息合并）
#[derive(Debug, Clone, Serialize)]
pub struct StockRecord {
    pub company: String, // 股票代码
    pub name: String,    // 公司简称
    pub sector: String,
    pub date: NaiveDate,
    pub close_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub revenue: f64,
    pub year: i32,
    pub month: u32,
}

impl StockRecord {
    /// 由价格行与公司信息合并得到记录，year/month 从日期派生
    pub fn from_parts(row: PriceRow, company: &CompanyInfo) -> Self {
        let year = row.date.year();
        let month = row.date.month();
        Self {
            company: row.symbol,
            name: company.short_name.clone(),
            sector: company.sector.clone(),
            date: row.date,
            close_price: row.close,
            high_price: row.high.unwrap_or(row.close),
            low_price: row.low.unwrap_or(row.close),
            revenue: row.revenue.unwrap_or(0.0),
            year,
            month,
        }
    }
}

/// 公司文件中的公司信息
#[derive(Debug, Clone, Serialize)]
pub struct CompanyInfo {
    pub symbol: String,
    pub short_name: String,
    pub long_name: String,
    pub sector: String,
    pub industry: String,
    /// 公司文件中披露的营收增长率（小数形式，如 0.061）
    pub reported_revenue_growth: Option<f64>,
}

/// 价格文件中的原始行，尚未关联板块
#[derive(Debug, Clone)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub symbol: String,
    pub close: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub revenue: Option<f64>,
}

/// 指数日线点位
#[derive(Debug, Clone, Serialize)]
pub struct IndexPoint {
    pub date: NaiveDate,
    pub level: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company() -> CompanyInfo {
        CompanyInfo {
            symbol: "AAPL".to_string(),
            short_name: "Apple Inc.".to_string(),
            long_name: "Apple Inc.".to_string(),
            sector: "Technology".to_string(),
            industry: "Consumer Electronics".to_string(),
            reported_revenue_growth: Some(0.061),
        }
    }

    #[test]
    fn test_from_parts_derives_year_month() {
        let row = PriceRow {
            date: NaiveDate::from_ymd_opt(2020, 6, 15).unwrap(),
            symbol: "AAPL".to_string(),
            close: 88.4,
            high: None,
            low: Some(87.0),
            revenue: None,
        };
        let record = StockRecord::from_parts(row, &company());

        assert_eq!(record.year, 2020);
        assert_eq!(record.month, 6);
        assert_eq!(record.sector, "Technology");
        assert_eq!(record.name, "Apple Inc.");
        assert_eq!(record.high_price, 88.4);
        assert_eq!(record.low_price, 87.0);
        assert_eq!(record.revenue, 0.0);
    }
}
