use crate::models::analysis::{
    DailyPoint, DailyRange, GrowthPair, IndexAggregate, MonthlyExtremes, SectorAggregate,
};
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

// 按最大绝对值缩放的横向条形
fn bar(value: f64, max_abs: f64) -> String {
    if max_abs <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let len = ((value.abs() / max_abs) * BAR_WIDTH as f64).round() as usize;
    let ch = if value < 0.0 { '-' } else { '#' };
    std::iter::repeat(ch).take(len.max(1)).collect()
}

fn max_abs<I: Iterator<Item = f64>>(values: I) -> f64 {
    values.filter(|v| v.is_finite()).fold(0.0, |acc, v| acc.max(v.abs()))
}

/// 板块与全市场均价对比表
pub fn render_sector_performance(aggregates: &[SectorAggregate], index: &[IndexAggregate]) -> String {
    let mut out = String::new();
    if aggregates.is_empty() {
        out.push_str("No sector data in the selected range\n");
        return out;
    }

    let scale = max_abs(aggregates.iter().map(|a| a.average_price));

    let _ = writeln!(out, "{:<24} {:<6} {:>12} {:>12} {:>8}  {}", "Sector", "Year", "Avg Close", "Market Avg", "Obs", "");
    let _ = writeln!(out, "{:-<80}", "");
    for agg in aggregates {
        let _ = writeln!(
            out,
            "{:<24} {:<6} {:>12.2} {:>12.2} {:>8}  {}",
            agg.sector,
            agg.year,
            agg.average_price,
            agg.index_average_price,
            agg.observations,
            bar(agg.average_price, scale)
        );
    }

    if !index.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<6} {:>14}", "Year", "S&P 500 Avg");
        let _ = writeln!(out, "{:-<21}", "");
        for point in index {
            let _ = writeln!(out, "{:<6} {:>14.2}", point.year, point.average_level);
        }
    }

    out
}

/// 板块日线与指数日线
pub fn render_daily_series(title: &str, sector: &[DailyPoint], index: &[DailyPoint]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{:-<60}", "");

    let scale = max_abs(sector.iter().map(|p| p.value));
    let index_by_date: std::collections::HashMap<_, _> = index.iter().map(|p| (p.date, p.value)).collect();

    let _ = writeln!(out, "{:<12} {:>12} {:>12}  {}", "Date", "Sector Avg", "S&P 500", "");
    for point in sector {
        let index_level = index_by_date
            .get(&point.date)
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<12} {:>12.2} {:>12}  {}",
            point.date.format("%Y-%m-%d"),
            point.value,
            index_level,
            bar(point.value, scale)
        );
    }

    out
}

/// 营收增长与股价增长
pub fn render_growth(pairs: &[GrowthPair]) -> String {
    let mut out = String::new();
    let Some(first) = pairs.first() else {
        out.push_str("No companies with data for both years\n");
        return out;
    };

    let _ = writeln!(out, "Revenue Growth vs. Stock Performance ({}-{})", first.start_year, first.end_year);
    let scale = max_abs(pairs.iter().map(|p| p.price_growth_pct));

    let _ = writeln!(
        out,
        "{:<8} {:<28} {:<22} {:>10} {:>10} {:>10}  {}",
        "Symbol", "Name", "Sector", "Revenue%", "Price%", "Reported%", ""
    );
    let _ = writeln!(out, "{:-<100}", "");
    let pct = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string());
    for pair in pairs {
        let _ = writeln!(
            out,
            "{:<8} {:<28.28} {:<22.22} {:>10} {:>10.2} {:>10}  {}",
            pair.company,
            pair.name,
            pair.sector,
            pct(pair.revenue_growth_pct),
            pair.price_growth_pct,
            pct(pair.reported_revenue_growth_pct),
            bar(pair.price_growth_pct, scale)
        );
    }

    out
}

/// 月度高低价
pub fn render_monthly(extremes: &MonthlyExtremes, days: &[DailyRange]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Stock Prices for {} ({}) - {}/{}",
        extremes.name, extremes.company, extremes.month, extremes.year
    );
    let _ = writeln!(out, "{:-<60}", "");
    let _ = writeln!(out, "{:<12} {:>10} {:>10} {:>10}", "Date", "High", "Low", "Close");
    for day in days {
        let _ = writeln!(
            out,
            "{:<12} {:>10.2} {:>10.2} {:>10.2}",
            day.date.format("%Y-%m-%d"),
            day.high,
            day.low,
            day.close
        );
    }
    let _ = writeln!(out, "{:-<60}", "");
    let _ = writeln!(out, "Max close: {:.2}   Min close: {:.2}", extremes.max_price, extremes.min_price);
    let _ = writeln!(out, "Highest high: {:.2}   Lowest low: {:.2}", extremes.highest_high, extremes.lowest_low);
    let _ = writeln!(out, "Trading days: {}", extremes.trading_days);

    out
}
