use chrono::NaiveDate;
use crate::errors::{Result, InsightsError};

// 日期转换工具：接受 "YYYY-MM-DD"，也接受带时间部分的 "YYYY-MM-DD HH:MM:SS+00:00"
pub fn parse_date_str(date_str: &str) -> Result<NaiveDate> {
    let trimmed = date_str.trim();
    let day_part = trimmed.get(0..10).unwrap_or(trimmed);
    Ok(NaiveDate::parse_from_str(day_part, "%Y-%m-%d")?)
}

/// 空字符串或 NaN 视为缺失
pub fn parse_optional_f64(value: &str) -> Result<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let parsed = trimmed.parse::<f64>()?;
    if parsed.is_finite() {
        Ok(Some(parsed))
    } else {
        Ok(None)
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// (end - start) / start * 100，起始值为 0 时无意义
pub fn growth_pct(start: f64, end: f64) -> Option<f64> {
    if start == 0.0 || !start.is_finite() || !end.is_finite() {
        return None;
    }
    Some((end - start) / start * 100.0)
}

/// 校验用户输入的起止年份字符串
pub fn validate_years(from_year: &str, to_year: &str, first_year: i32, last_year: i32) -> Result<(i32, i32)> {
    if from_year.len() != 4 || to_year.len() != 4 {
        return Err(InsightsError::InvalidRange(
            "'From Year' and 'To Year' must be 4-digit numbers.".to_string(),
        ));
    }

    let (from, to) = match (from_year.parse::<i32>(), to_year.parse::<i32>()) {
        (Ok(from), Ok(to)) => (from, to),
        _ => {
            return Err(InsightsError::InvalidRange(
                "Please enter valid 4-digit years.".to_string(),
            ))
        }
    };

    check_year_range(from, to, first_year, last_year)?;
    Ok((from, to))
}

pub fn check_year_range(from: i32, to: i32, first_year: i32, last_year: i32) -> Result<()> {
    let covered = first_year..=last_year;
    if !covered.contains(&from) || !covered.contains(&to) {
        return Err(InsightsError::InvalidRange(format!(
            "Years must be between {} and {}.",
            first_year, last_year
        )));
    }
    if from > to {
        return Err(InsightsError::InvalidRange(
            "'From Year' should be <= 'To Year'.".to_string(),
        ));
    }
    Ok(())
}

// CSV 数据读取工具
pub mod csv_utils {
    use super::*;
    use crate::models::stock::{CompanyInfo, IndexPoint, PriceRow};
    use csv::StringRecord;
    use log::{debug, info};
    use std::collections::HashMap;
    use std::io::Read;

    /// 解析结果，附带被跳过的行数
    #[derive(Debug)]
    pub struct CsvBatch<T> {
        pub rows: Vec<T>,
        pub skipped: usize,
    }

    fn header_map(headers: &StringRecord) -> HashMap<String, usize> {
        headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
            .collect()
    }

    fn require_column(map: &HashMap<String, usize>, name: &str) -> Result<usize> {
        map.get(&name.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| InsightsError::DataError(format!("Missing required column: {}", name)))
    }

    fn field<'a>(record: &'a StringRecord, idx: usize) -> &'a str {
        record.get(idx).unwrap_or("").trim()
    }

    fn optional_field<'a>(record: &'a StringRecord, idx: Option<usize>) -> &'a str {
        idx.map(|i| field(record, i)).unwrap_or("")
    }

    // 数值无法解析时按缺失处理，并记录原始值
    fn lenient_f64(value: &str, column: &str) -> Option<f64> {
        match parse_optional_f64(value) {
            Ok(parsed) => parsed,
            Err(_) => {
                debug!("Unparseable {} value {:?}, treated as missing", column, value);
                None
            }
        }
    }

    fn reader<R: Read>(source: R) -> csv::Reader<R> {
        csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(source)
    }

    // 读取公司信息
    pub fn read_companies<R: Read>(source: R) -> Result<CsvBatch<CompanyInfo>> {
        let mut reader = reader(source);
        let columns = header_map(reader.headers()?);

        let symbol_idx = require_column(&columns, "Symbol")?;
        let sector_idx = require_column(&columns, "Sector")?;
        let short_idx = columns.get("shortname").copied();
        let long_idx = columns.get("longname").copied();
        let industry_idx = columns.get("industry").copied();
        let growth_idx = columns.get("revenuegrowth").copied();

        let mut rows = Vec::new();
        let mut skipped = 0;

        for result in reader.records() {
            let record = result?;
            let symbol = field(&record, symbol_idx);
            let sector = field(&record, sector_idx);
            if symbol.is_empty() || sector.is_empty() {
                skipped += 1;
                continue;
            }

            let short_name = match optional_field(&record, short_idx) {
                "" => symbol,
                name => name,
            };

            rows.push(CompanyInfo {
                symbol: symbol.to_string(),
                short_name: short_name.to_string(),
                long_name: optional_field(&record, long_idx).to_string(),
                sector: sector.to_string(),
                industry: optional_field(&record, industry_idx).to_string(),
                reported_revenue_growth: parse_optional_f64(optional_field(&record, growth_idx))?,
            });
        }

        info!("Read {} companies ({} skipped)", rows.len(), skipped);
        Ok(CsvBatch { rows, skipped })
    }

    // 读取日线价格，收盘价缺失或无法解析的行直接跳过
    pub fn read_prices<R: Read>(source: R) -> Result<CsvBatch<PriceRow>> {
        let mut reader = reader(source);
        let columns = header_map(reader.headers()?);

        let date_idx = require_column(&columns, "Date")?;
        let symbol_idx = require_column(&columns, "Symbol")?;
        let close_idx = require_column(&columns, "Close")?;
        let high_idx = columns.get("high").copied();
        let low_idx = columns.get("low").copied();
        let revenue_idx = columns.get("revenue").copied();

        let mut rows = Vec::new();
        let mut skipped = 0;

        for result in reader.records() {
            let record = result?;
            let close = match lenient_f64(field(&record, close_idx), "Close") {
                Some(close) => close,
                None => {
                    skipped += 1;
                    continue;
                }
            };

            rows.push(PriceRow {
                date: parse_date_str(field(&record, date_idx))?,
                symbol: field(&record, symbol_idx).to_string(),
                close,
                high: lenient_f64(optional_field(&record, high_idx), "High"),
                low: lenient_f64(optional_field(&record, low_idx), "Low"),
                revenue: lenient_f64(optional_field(&record, revenue_idx), "Revenue"),
            });
        }

        if revenue_idx.is_none() {
            debug!("No Revenue column in price data, revenue defaults to 0");
        }
        info!("Read {} price rows ({} without a usable close skipped)", rows.len(), skipped);
        Ok(CsvBatch { rows, skipped })
    }

    // 读取指数点位，第二列为指数值（如 "S&P500"）
    pub fn read_index<R: Read>(source: R) -> Result<CsvBatch<IndexPoint>> {
        let mut reader = reader(source);
        let headers = reader.headers()?.clone();
        let columns = header_map(&headers);

        let date_idx = require_column(&columns, "Date")?;
        let level_idx = (0..headers.len())
            .find(|&i| i != date_idx)
            .ok_or_else(|| InsightsError::DataError("Index file has no level column".to_string()))?;

        let mut rows = Vec::new();
        let mut skipped = 0;

        for result in reader.records() {
            let record = result?;
            match lenient_f64(field(&record, level_idx), "index level") {
                Some(level) => rows.push(IndexPoint {
                    date: parse_date_str(field(&record, date_idx))?,
                    level,
                }),
                None => skipped += 1,
            }
        }

        info!("Read {} index points ({} skipped)", rows.len(), skipped);
        Ok(CsvBatch { rows, skipped })
    }
}
