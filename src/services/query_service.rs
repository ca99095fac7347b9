use crate::config::Config;
use crate::data_provider::StockDataset;
use crate::errors::{Result, InsightsError};
use crate::loaders::base::DatasetLoader;
use crate::models::analysis::{
    DailyPoint, DailyRange, GrowthPair, IndexAggregate, MonthlyExtremes, SectorAggregate,
};
use crate::models::stock::{CompanyInfo, StockRecord};
use crate::util;
use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use std::collections::BTreeMap;

/// 查询服务：对只读数据集执行板块、增长与月度分析
///
/// 每次调用都从源数据重新计算，不缓存任何派生结果。
pub struct QueryService {
    config: Config,
    dataset: StockDataset,
}

impl QueryService {
    pub fn new(config: Config, dataset: StockDataset) -> Self {
        Self { config, dataset }
    }

    /// 通过加载器读取数据集并创建服务
    pub fn load(config: Config, loader: &dyn DatasetLoader) -> Result<Self> {
        let dataset = StockDataset::load(loader)?;
        Ok(Self::new(config, dataset))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn dataset(&self) -> &StockDataset {
        &self.dataset
    }

    /// 起止年份需在覆盖范围内且 start <= end
    pub fn validate_year_range(&self, start_year: i32, end_year: i32) -> Result<()> {
        util::check_year_range(start_year, end_year, self.config.first_year, self.config.last_year)
    }

    fn validate_month(&self, year: i32, month: u32) -> Result<()> {
        if !self.config.covers_year(year) {
            return Err(InsightsError::InvalidRange(format!(
                "Years must be between {} and {}.",
                self.config.first_year, self.config.last_year
            )));
        }
        if !(1..=12).contains(&month) {
            return Err(InsightsError::InvalidRange(format!(
                "Month must be between 1 and 12, got {}.",
                month
            )));
        }
        Ok(())
    }

    fn records_in_years(&self, start_year: i32, end_year: i32) -> impl Iterator<Item = &StockRecord> {
        self.dataset
            .records()
            .iter()
            .filter(move |r| r.year >= start_year && r.year <= end_year)
    }

    /// 各板块逐年平均收盘价，并附上同年全市场平均价
    pub fn sector_performance(&self, start_year: i32, end_year: i32) -> Result<Vec<SectorAggregate>> {
        self.validate_year_range(start_year, end_year)?;

        let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        let mut by_sector_year: BTreeMap<(&str, i32), Vec<f64>> = BTreeMap::new();

        for record in self.records_in_years(start_year, end_year) {
            by_year.entry(record.year).or_default().push(record.close_price);
            by_sector_year
                .entry((record.sector.as_str(), record.year))
                .or_default()
                .push(record.close_price);
        }

        let mut aggregates = Vec::with_capacity(by_sector_year.len());
        for ((sector, year), closes) in by_sector_year {
            let min_price = closes.iter().copied().fold(f64::INFINITY, f64::min);
            let max_price = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let average = util::mean(&closes).unwrap_or(min_price);
            let index_average_price = by_year
                .get(&year)
                .and_then(|all| util::mean(all))
                .unwrap_or(average);

            aggregates.push(SectorAggregate {
                sector: sector.to_string(),
                year,
                // 浮点误差下保持在 [min, max] 内
                average_price: average.clamp(min_price, max_price),
                index_average_price,
                min_price,
                max_price,
                observations: closes.len(),
            });
        }

        info!(
            "Sector performance {}-{}: {} sector/year aggregates",
            start_year,
            end_year,
            aggregates.len()
        );
        Ok(aggregates)
    }

    /// 单个板块每日平均收盘价
    pub fn sector_daily_performance(&self, sector: &str, start_year: i32, end_year: i32) -> Result<Vec<DailyPoint>> {
        self.validate_year_range(start_year, end_year)?;
        let sector = self
            .dataset
            .resolve_sector(sector)
            .ok_or_else(|| InsightsError::UnknownSector(sector.to_string()))?;

        let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for record in self.dataset.records_for_sector(sector) {
            if record.year >= start_year && record.year <= end_year {
                by_date.entry(record.date).or_default().push(record.close_price);
            }
        }

        Ok(by_date
            .into_iter()
            .filter_map(|(date, closes)| util::mean(&closes).map(|value| DailyPoint { date, value }))
            .collect())
    }

    /// 指数逐年平均点位
    pub fn index_performance(&self, start_year: i32, end_year: i32) -> Result<Vec<IndexAggregate>> {
        self.validate_year_range(start_year, end_year)?;

        let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
        for point in self.dataset.index_points() {
            let year = point.date.year();
            if year >= start_year && year <= end_year {
                by_year.entry(year).or_default().push(point.level);
            }
        }

        Ok(by_year
            .into_iter()
            .filter_map(|(year, levels)| {
                util::mean(&levels).map(|average_level| IndexAggregate { year, average_level })
            })
            .collect())
    }

    pub fn index_daily_levels(&self, start_year: i32, end_year: i32) -> Result<Vec<DailyPoint>> {
        self.validate_year_range(start_year, end_year)?;

        Ok(self
            .dataset
            .index_points()
            .iter()
            .filter(|p| p.date.year() >= start_year && p.date.year() <= end_year)
            .map(|p| DailyPoint { date: p.date, value: p.level })
            .collect())
    }

    /// 每家公司营收增长率与股价增长率
    ///
    /// 起点取 start_year 内最早一条记录，终点取 end_year 内最晚一条记录。
    /// 缺少任一年份数据或起点收盘价为 0 的公司不计入结果；
    /// 起点营收缺失或为 0 时营收增长率为 None。
    pub fn revenue_vs_price_growth(&self, start_year: i32, end_year: i32) -> Result<Vec<GrowthPair>> {
        self.validate_year_range(start_year, end_year)?;

        let mut pairs = Vec::new();
        let mut skipped = 0usize;

        for symbol in self.dataset.symbols() {
            let records = self.dataset.records_for_company(symbol);
            let start = records.iter().find(|r| r.year == start_year);
            let end = records.iter().rev().find(|r| r.year == end_year);

            let (start, end) = match (start, end) {
                (Some(start), Some(end)) => (start, end),
                _ => {
                    debug!("{} has no data for both {} and {}", symbol, start_year, end_year);
                    skipped += 1;
                    continue;
                }
            };

            let price_growth_pct = match util::growth_pct(start.close_price, end.close_price) {
                Some(price) => price,
                None => {
                    debug!("{} has a zero start price, growth undefined", symbol);
                    skipped += 1;
                    continue;
                }
            };
            let revenue_growth_pct = util::growth_pct(start.revenue, end.revenue);

            let reported_revenue_growth_pct = self
                .dataset
                .company_info(symbol)
                .and_then(|c| c.reported_revenue_growth)
                .map(|g| g * 100.0);

            pairs.push(GrowthPair {
                company: symbol.to_string(),
                name: start.name.clone(),
                sector: start.sector.clone(),
                revenue_growth_pct,
                price_growth_pct,
                start_year,
                end_year,
                reported_revenue_growth_pct,
            });
        }

        info!(
            "Growth {}-{}: {} companies ({} skipped)",
            start_year,
            end_year,
            pairs.len(),
            skipped
        );
        Ok(pairs)
    }

    /// 某公司某月每日的高低收价格
    pub fn monthly_prices(&self, company: &str, year: i32, month: u32) -> Result<Vec<DailyRange>> {
        let (_, days) = self.month_days(company, year, month)?;
        Ok(days)
    }

    /// 某公司某月收盘价的最高与最低值
    pub fn monthly_extremes(&self, company: &str, year: i32, month: u32) -> Result<MonthlyExtremes> {
        let (symbol, days) = self.month_days(company, year, month)?;
        Ok(self.summarize_month(symbol, year, month, &days))
    }

    /// 一次扫描同时得到月度极值与每日价格
    pub fn monthly_analysis(&self, company: &str, year: i32, month: u32) -> Result<(MonthlyExtremes, Vec<DailyRange>)> {
        let (symbol, days) = self.month_days(company, year, month)?;
        let extremes = self.summarize_month(symbol, year, month, &days);
        Ok((extremes, days))
    }

    fn month_days(&self, company: &str, year: i32, month: u32) -> Result<(&str, Vec<DailyRange>)> {
        let symbol = self
            .dataset
            .resolve_company(company)
            .ok_or_else(|| InsightsError::UnknownCompany(company.to_string()))?;
        self.validate_month(year, month)?;

        let days: Vec<DailyRange> = self
            .dataset
            .records_for_company(symbol)
            .into_iter()
            .filter(|r| r.year == year && r.month == month)
            .map(|r| DailyRange {
                date: r.date,
                high: r.high_price,
                low: r.low_price,
                close: r.close_price,
            })
            .collect();

        if days.is_empty() {
            let available = self
                .dataset
                .latest_trading_date()
                .map(|d| format!("; data available only until {}", d.format("%m-%Y")))
                .unwrap_or_default();
            return Err(InsightsError::InvalidRange(format!(
                "No data for {} in {:02}/{}{}",
                symbol, month, year, available
            )));
        }

        Ok((symbol, days))
    }

    fn summarize_month(&self, symbol: &str, year: i32, month: u32, days: &[DailyRange]) -> MonthlyExtremes {
        let name = self
            .dataset
            .company_info(symbol)
            .map(|c| c.short_name.clone())
            .unwrap_or_else(|| symbol.to_string());

        MonthlyExtremes {
            company: symbol.to_string(),
            name,
            year,
            month,
            max_price: days.iter().map(|d| d.close).fold(f64::NEG_INFINITY, f64::max),
            min_price: days.iter().map(|d| d.close).fold(f64::INFINITY, f64::min),
            highest_high: days.iter().map(|d| d.high).fold(f64::NEG_INFINITY, f64::max),
            lowest_low: days.iter().map(|d| d.low).fold(f64::INFINITY, f64::min),
            trading_days: days.len(),
        }
    }

    pub fn sectors(&self) -> Vec<&str> {
        self.dataset.sectors()
    }

    /// 有价格数据的公司
    pub fn companies(&self) -> Vec<&CompanyInfo> {
        self.dataset
            .symbols()
            .into_iter()
            .filter_map(|symbol| self.dataset.company_info(symbol))
            .collect()
    }

    pub fn covered_years(&self) -> Option<(i32, i32)> {
        self.dataset.covered_years()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stock::PriceRow;

    fn company(symbol: &str, name: &str, sector: &str, growth: Option<f64>) -> CompanyInfo {
        CompanyInfo {
            symbol: symbol.to_string(),
            short_name: name.to_string(),
            long_name: name.to_string(),
            sector: sector.to_string(),
            industry: String::new(),
            reported_revenue_growth: growth,
        }
    }

    fn row(symbol: &str, date: &str, close: f64, revenue: f64) -> PriceRow {
        PriceRow {
            date: util::parse_date_str(date).unwrap(),
            symbol: symbol.to_string(),
            close,
            high: Some(close + 5.0),
            low: Some(close - 5.0),
            revenue: Some(revenue),
        }
    }

    fn service() -> QueryService {
        let companies = vec![
            company("CX", "CompanyX", "Technology", Some(0.12)),
            company("TY", "TechY", "Technology", None),
            company("EZ", "EnergyZ", "Energy", None),
            company("ZR", "ZeroRev", "Energy", None),
        ];
        let prices = vec![
            row("CX", "2020-06-01", 100.0, 1000.0),
            row("CX", "2020-06-15", 150.0, 1000.0),
            row("CX", "2020-06-30", 90.0, 1000.0),
            row("CX", "2021-12-30", 120.0, 1500.0),
            row("TY", "2020-01-02", 50.0, 200.0),
            row("TY", "2021-12-30", 75.0, 150.0),
            row("EZ", "2020-03-02", 40.0, 400.0),
            row("EZ", "2020-03-03", 60.0, 400.0),
            row("ZR", "2020-01-02", 10.0, 0.0),
            row("ZR", "2021-12-30", 12.0, 50.0),
        ];
        let dataset = StockDataset::new_with_data(companies, prices, Vec::new()).unwrap();
        QueryService::new(Config::new(), dataset)
    }

    #[test]
    fn test_sector_performance_bounds() {
        let svc = service();
        let aggregates = svc.sector_performance(2020, 2021).unwrap();

        let keys: Vec<(&str, i32)> = aggregates.iter().map(|a| (a.sector.as_str(), a.year)).collect();
        assert_eq!(keys, vec![("Energy", 2020), ("Energy", 2021), ("Technology", 2020), ("Technology", 2021)]);

        for agg in &aggregates {
            assert!(agg.average_price >= agg.min_price && agg.average_price <= agg.max_price);
        }

        let energy_2020 = &aggregates[0];
        assert_eq!(energy_2020.observations, 3);
        assert!((energy_2020.average_price - 110.0 / 3.0).abs() < 1e-9);
        // 2020 全市场：100+150+90+50+40+60+10 = 500，共 7 条
        assert!((energy_2020.index_average_price - 500.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_sector_performance_single_year() {
        let svc = service();
        let aggregates = svc.sector_performance(2021, 2021).unwrap();
        assert!(aggregates.iter().all(|a| a.year == 2021));
        assert_eq!(aggregates.len(), 2);
    }

    #[test]
    fn test_growth_pct() {
        let svc = service();
        let pairs = svc.revenue_vs_price_growth(2020, 2021).unwrap();

        // EZ 缺少 2021 数据
        let symbols: Vec<&str> = pairs.iter().map(|p| p.company.as_str()).collect();
        assert_eq!(symbols, vec!["CX", "TY", "ZR"]);

        let cx = &pairs[0];
        assert!((cx.price_growth_pct - 20.0).abs() < 1e-9);
        assert!((cx.revenue_growth_pct.unwrap() - 50.0).abs() < 1e-9);
        assert!((cx.reported_revenue_growth_pct.unwrap() - 12.0).abs() < 1e-9);

        let ty = &pairs[1];
        assert!((ty.price_growth_pct - 50.0).abs() < 1e-9);
        assert!((ty.revenue_growth_pct.unwrap() + 25.0).abs() < 1e-9);

        // 起始营收为 0 时仍保留股价增长
        let zr = &pairs[2];
        assert!((zr.price_growth_pct - 20.0).abs() < 1e-9);
        assert_eq!(zr.revenue_growth_pct, None);

        assert_eq!(svc.revenue_vs_price_growth(2020, 2021).unwrap(), pairs);
    }

    #[test]
    fn test_growth_without_revenue_column() {
        let prices = vec![
            PriceRow {
                date: util::parse_date_str("2015-01-02").unwrap(),
                symbol: "AAPL".to_string(),
                close: 100.0,
                high: None,
                low: None,
                revenue: None,
            },
            PriceRow {
                date: util::parse_date_str("2020-12-31").unwrap(),
                symbol: "AAPL".to_string(),
                close: 300.0,
                high: None,
                low: None,
                revenue: None,
            },
            PriceRow {
                date: util::parse_date_str("2015-01-02").unwrap(),
                symbol: "FREE".to_string(),
                close: 0.0,
                high: None,
                low: None,
                revenue: None,
            },
            PriceRow {
                date: util::parse_date_str("2020-12-31").unwrap(),
                symbol: "FREE".to_string(),
                close: 5.0,
                high: None,
                low: None,
                revenue: None,
            },
        ];
        let companies = vec![
            company("AAPL", "Apple Inc.", "Technology", Some(0.061)),
            company("FREE", "Zero Start", "Technology", None),
        ];
        let dataset = StockDataset::new_with_data(companies, prices, Vec::new()).unwrap();
        let svc = QueryService::new(Config::new(), dataset);

        let pairs = svc.revenue_vs_price_growth(2015, 2020).unwrap();

        // 起始收盘价为 0 的公司仍被跳过
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].company, "AAPL");
        assert!((pairs[0].price_growth_pct - 200.0).abs() < 1e-9);
        assert_eq!(pairs[0].revenue_growth_pct, None);
        assert!((pairs[0].reported_revenue_growth_pct.unwrap() - 6.1).abs() < 1e-9);
    }

    #[test]
    fn test_growth_within_year() {
        let svc = service();
        let pairs = svc.revenue_vs_price_growth(2020, 2020).unwrap();
        let ez = pairs.iter().find(|p| p.company == "EZ").unwrap();
        assert!((ez.price_growth_pct - 50.0).abs() < 1e-9);
        assert_eq!(ez.revenue_growth_pct, Some(0.0));
    }

    #[test]
    fn test_monthly_extremes() {
        let svc = service();
        let extremes = svc.monthly_extremes("CompanyX", 2020, 6).unwrap();

        assert_eq!(extremes.company, "CX");
        assert_eq!(extremes.max_price, 150.0);
        assert_eq!(extremes.min_price, 90.0);
        assert_eq!(extremes.highest_high, 155.0);
        assert_eq!(extremes.lowest_low, 85.0);
        assert_eq!(extremes.trading_days, 3);

        let by_symbol = svc.monthly_extremes("CX", 2020, 6).unwrap();
        assert_eq!(by_symbol, extremes);
    }

    #[test]
    fn test_monthly_analysis_matches_parts() {
        let svc = service();
        let (extremes, days) = svc.monthly_analysis("CompanyX", 2020, 6).unwrap();

        assert_eq!(extremes, svc.monthly_extremes("CX", 2020, 6).unwrap());
        assert_eq!(days, svc.monthly_prices("CX", 2020, 6).unwrap());
        assert_eq!(days.len(), extremes.trading_days);
        assert!(matches!(
            svc.monthly_analysis("Nobody", 2020, 6),
            Err(InsightsError::UnknownCompany(_))
        ));
    }

    #[test]
    fn test_monthly_errors() {
        let svc = service();

        assert!(matches!(
            svc.monthly_extremes("Nobody", 2020, 6),
            Err(InsightsError::UnknownCompany(_))
        ));
        assert!(matches!(
            svc.monthly_extremes("CX", 2025, 6),
            Err(InsightsError::InvalidRange(_))
        ));
        assert!(matches!(
            svc.monthly_extremes("CX", 2020, 13),
            Err(InsightsError::InvalidRange(_))
        ));
        // 覆盖年份内但该月无数据
        assert!(matches!(
            svc.monthly_extremes("CX", 2020, 7),
            Err(InsightsError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_out_of_range_years() {
        let svc = service();

        assert!(matches!(svc.sector_performance(2025, 2025), Err(InsightsError::InvalidRange(_))));
        assert!(matches!(svc.revenue_vs_price_growth(2020, 2025), Err(InsightsError::InvalidRange(_))));
        assert!(matches!(svc.sector_performance(2021, 2020), Err(InsightsError::InvalidRange(_))));
        assert!(matches!(svc.index_performance(2013, 2020), Err(InsightsError::InvalidRange(_))));
    }

    #[test]
    fn test_sector_daily_performance() {
        let svc = service();
        let series = svc.sector_daily_performance("Energy", 2020, 2020).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].value, 10.0);
        assert_eq!(series[1].value, 40.0);

        // 板块名不区分大小写
        assert_eq!(svc.sector_daily_performance("energy", 2020, 2020).unwrap(), series);

        assert!(matches!(
            svc.sector_daily_performance("Healthcare", 2020, 2020),
            Err(InsightsError::UnknownSector(_))
        ));
    }

    #[test]
    fn test_listings() {
        let svc = service();
        assert_eq!(svc.sectors(), vec!["Energy", "Technology"]);
        assert_eq!(svc.companies().len(), 4);
        assert_eq!(svc.covered_years(), Some((2020, 2021)));
        assert!(svc.index_performance(2020, 2021).unwrap().is_empty());
    }
}
