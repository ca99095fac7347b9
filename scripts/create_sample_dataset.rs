use sp500_insights::config::Config;

use anyhow::Context;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fs;
use std::path::Path;

// (代码, 简称, 全称, 板块, 行业, 基准价, 年化漂移, 基准营收)
const COMPANIES: [(&str, &str, &str, &str, &str, f64, f64, f64); 6] = [
    ("AAPL", "Apple Inc.", "Apple Inc.", "Technology", "Consumer Electronics", 20.0, 0.22, 180e9),
    ("MSFT", "Microsoft Corporation", "Microsoft Corporation", "Technology", "Software - Infrastructure", 35.0, 0.24, 86e9),
    ("XOM", "Exxon Mobil Corporation", "Exxon Mobil Corporation", "Energy", "Oil & Gas Integrated", 95.0, 0.01, 390e9),
    ("CVX", "Chevron Corporation", "Chevron Corporation", "Energy", "Oil & Gas Integrated", 120.0, 0.03, 210e9),
    ("JNJ", "Johnson & Johnson", "Johnson & Johnson", "Healthcare", "Drug Manufacturers - General", 90.0, 0.06, 74e9),
    ("PFE", "Pfizer Inc.", "Pfizer Inc.", "Healthcare", "Drug Manufacturers - General", 30.0, 0.02, 50e9),
];

fn trading_days(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = first;
    while day <= last {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}

fn main() -> anyhow::Result<()> {
    let config = Config::new();
    let data_dir = std::env::args().nth(1).unwrap_or_else(|| config.data_dir.clone());
    let config = config.with_data_dir(&data_dir);

    fs::create_dir_all(Path::new(&data_dir))
        .with_context(|| format!("Failed to create {}", data_dir))?;

    let first = NaiveDate::from_ymd_opt(config.first_year, 1, 2).context("invalid first date")?;
    // 与原始数据集一致，截止到 2024 年 2 月
    let last = NaiveDate::from_ymd_opt(config.last_year, 2, 29).context("invalid last date")?;
    let days = trading_days(first, last);

    // 公司文件
    let mut writer = csv::Writer::from_path(config.companies_path())?;
    writer.write_record(["Exchange", "Symbol", "Shortname", "Longname", "Sector", "Industry", "Revenuegrowth"])?;
    for (symbol, short, long, sector, industry, _, drift, _) in COMPANIES {
        let growth = format!("{:.3}", drift / 2.0);
        writer.write_record([
            "NMS",
            symbol,
            short,
            long,
            sector,
            industry,
            growth.as_str(),
        ])?;
    }
    writer.flush()?;

    // 日线文件，价格按确定性公式生成
    let mut writer = csv::Writer::from_path(config.stocks_path())?;
    writer.write_record(["Date", "Symbol", "Adj Close", "Close", "High", "Low", "Open", "Volume", "Revenue"])?;
    let mut rows = 0usize;
    for (i, (symbol, _, _, _, _, base, drift, revenue)) in COMPANIES.iter().enumerate() {
        for (n, day) in days.iter().enumerate() {
            let t = n as f64 / 252.0;
            let wave = 1.0 + 0.05 * ((n as f64 / 9.0) + i as f64).sin();
            let close = base * (1.0 + drift).powf(t) * wave;
            let quarter = (day.year() - config.first_year) * 4 + (day.month0() / 3) as i32;
            let rev = revenue * (1.0 + drift / 2.0).powf(quarter as f64 / 4.0);
            writer.write_record([
                day.format("%Y-%m-%d").to_string(),
                symbol.to_string(),
                format!("{:.4}", close * 0.98),
                format!("{:.4}", close),
                format!("{:.4}", close * 1.012),
                format!("{:.4}", close * 0.988),
                format!("{:.4}", close * 0.997),
                format!("{}", 1_000_000 + (n % 50) * 10_000),
                format!("{:.0}", rev),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    // 指数文件
    let mut writer = csv::Writer::from_path(config.index_path())?;
    writer.write_record(["Date", "S&P500"])?;
    for (n, day) in days.iter().enumerate() {
        let level = 1830.0 * (1.09f64).powf(n as f64 / 252.0);
        writer.write_record([day.format("%Y-%m-%d").to_string(), format!("{:.2}", level)])?;
    }
    writer.flush()?;

    println!(
        "Created sample dataset in {} ({} companies, {} price rows, {} index points)",
        data_dir,
        COMPANIES.len(),
        rows,
        days.len()
    );
    Ok(())
}
