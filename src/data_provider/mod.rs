use log::{debug, info, warn};

use crate::errors::Result;
use crate::loaders::base::DatasetLoader;
use crate::models::stock::{CompanyInfo, IndexPoint, PriceRow, StockRecord};
use std::collections::{BTreeMap, HashMap};

/// 只读的内存数据集，加载一次后在进程内只被借用
pub struct StockDataset {
    records: Vec<StockRecord>,
    companies: Vec<CompanyInfo>,
    index: Vec<IndexPoint>,
    // 索引用于快速查找
    symbol_index: HashMap<String, Vec<usize>>,
    name_index: HashMap<String, String>,
    company_index: HashMap<String, usize>,
    sector_index: BTreeMap<String, Vec<usize>>,
}

impl StockDataset {
    /// 通过加载器读取并合并数据
    pub fn load(loader: &dyn DatasetLoader) -> Result<Self> {
        info!("Loading dataset from {} source", loader.source_name());

        let companies = loader.load_companies()?;
        let prices = loader.load_prices()?;
        let index = loader.load_index()?;

        let dataset = Self::new_with_data(companies, prices, index)?;

        match dataset.covered_years() {
            Some((first, last)) => info!(
                "Loaded {} records for {} companies ({}-{})",
                dataset.records.len(),
                dataset.symbol_index.len(),
                first,
                last
            ),
            None => warn!("Dataset contains no price records"),
        }

        Ok(dataset)
    }

    /// 使用提供的数据创建数据集，价格行按代码关联公司信息
    pub fn new_with_data(
        companies: Vec<CompanyInfo>,
        prices: Vec<PriceRow>,
        mut index: Vec<IndexPoint>,
    ) -> Result<Self> {
        let by_symbol: HashMap<&str, &CompanyInfo> =
            companies.iter().map(|c| (c.symbol.as_str(), c)).collect();

        let mut records = Vec::with_capacity(prices.len());
        let mut unmatched = 0usize;

        for row in prices {
            match by_symbol.get(row.symbol.as_str()) {
                Some(company) => records.push(StockRecord::from_parts(row, company)),
                None => unmatched += 1,
            }
        }

        if unmatched > 0 {
            warn!("Dropped {} price rows without company metadata", unmatched);
        }

        records.sort_by(|a, b| a.company.cmp(&b.company).then(a.date.cmp(&b.date)));
        index.sort_by(|a, b| a.date.cmp(&b.date));

        let mut dataset = Self {
            records,
            companies,
            index,
            symbol_index: HashMap::new(),
            name_index: HashMap::new(),
            company_index: HashMap::new(),
            sector_index: BTreeMap::new(),
        };

        dataset.rebuild_indices();

        Ok(dataset)
    }

    /// 获取所有记录
    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn companies(&self) -> &[CompanyInfo] {
        &self.companies
    }

    pub fn index_points(&self) -> &[IndexPoint] {
        &self.index
    }

    /// 获取指定公司的记录（按日期升序）
    pub fn records_for_company(&self, symbol: &str) -> Vec<&StockRecord> {
        self.symbol_index
            .get(symbol)
            .map(|indices| indices.iter().map(|&idx| &self.records[idx]).collect())
            .unwrap_or_default()
    }

    /// 获取指定板块的记录，板块名不区分大小写
    pub fn records_for_sector(&self, sector: &str) -> Vec<&StockRecord> {
        self.resolve_sector(sector)
            .and_then(|name| self.sector_index.get(name))
            .map(|indices| indices.iter().map(|&idx| &self.records[idx]).collect())
            .unwrap_or_default()
    }

    /// 按代码或公司简称解析为代码
    pub fn resolve_company(&self, company: &str) -> Option<&str> {
        if let Some((symbol, _)) = self.symbol_index.get_key_value(company) {
            return Some(symbol.as_str());
        }
        self.name_index.get(company).map(|s| s.as_str())
    }

    pub fn company_info(&self, symbol: &str) -> Option<&CompanyInfo> {
        self.company_index.get(symbol).map(|&idx| &self.companies[idx])
    }

    /// 有价格数据的公司代码，按代码排序
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.symbol_index.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }

    /// 有价格数据的板块，按名称排序
    pub fn sectors(&self) -> Vec<&str> {
        self.sector_index.keys().map(|s| s.as_str()).collect()
    }

    pub fn has_sector(&self, sector: &str) -> bool {
        self.resolve_sector(sector).is_some()
    }

    /// 板块名称不区分大小写，返回数据集中的原始写法
    pub fn resolve_sector(&self, sector: &str) -> Option<&str> {
        let wanted = sector.trim();
        if let Some((name, _)) = self.sector_index.get_key_value(wanted) {
            return Some(name.as_str());
        }
        self.sector_index
            .keys()
            .find(|name| name.eq_ignore_ascii_case(wanted))
            .map(|name| name.as_str())
    }

    /// 数据覆盖的最早与最晚年份
    pub fn covered_years(&self) -> Option<(i32, i32)> {
        let first = self.records.iter().map(|r| r.year).min()?;
        let last = self.records.iter().map(|r| r.year).max()?;
        Some((first, last))
    }

    /// 获取最新交易日期
    pub fn latest_trading_date(&self) -> Option<chrono::NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }

    /// 重建索引
    fn rebuild_indices(&mut self) {
        self.symbol_index.clear();
        self.name_index.clear();
        self.company_index.clear();
        self.sector_index.clear();

        for (i, record) in self.records.iter().enumerate() {
            self.symbol_index
                .entry(record.company.clone())
                .or_insert_with(Vec::new)
                .push(i);

            self.sector_index
                .entry(record.sector.clone())
                .or_insert_with(Vec::new)
                .push(i);
        }

        for (i, company) in self.companies.iter().enumerate() {
            self.company_index.entry(company.symbol.clone()).or_insert(i);
        }

        // 只为有价格数据的公司建立简称索引
        for company in &self.companies {
            if self.symbol_index.contains_key(&company.symbol) {
                if let Some(previous) = self
                    .name_index
                    .insert(company.short_name.clone(), company.symbol.clone())
                {
                    debug!("Short name {} shared by {} and {}", company.short_name, previous, company.symbol);
                }
            }
        }
    }
}
