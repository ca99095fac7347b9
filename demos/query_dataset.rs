use sp500_insights::config::Config;
use sp500_insights::loaders::csv_loader::CsvLoader;
use sp500_insights::QueryService;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 创建查询服务
    let config = Config::new();
    let loader = CsvLoader::new(&config);
    let service = QueryService::load(config, &loader)?;

    if let Some((first, last)) = service.covered_years() {
        println!("数据覆盖年份: {}-{}", first, last);
    }

    // 板块表现
    println!("\n2019-2021 板块平均收盘价:");
    println!("{:<24} {:<6} {:>12} {:>12}", "板块", "年份", "板块均价", "市场均价");
    println!("{:-<60}", "");
    for agg in service.sector_performance(2019, 2021)? {
        println!("{:<24} {:<6} {:>12.2} {:>12.2}", agg.sector, agg.year, agg.average_price, agg.index_average_price);
    }

    // 营收与股价增长
    println!("\n2016-2022 营收增长 vs 股价增长:");
    for pair in service.revenue_vs_price_growth(2016, 2022)?.iter().take(5) {
        let revenue = pair
            .revenue_growth_pct
            .map(|v| format!("{:.2}%", v))
            .unwrap_or_else(|| "-".to_string());
        println!("{:<6} 营收 {:>9}  股价 {:>8.2}%", pair.company, revenue, pair.price_growth_pct);
    }

    // 月度最高最低价
    let symbol = "AAPL";
    match service.monthly_extremes(symbol, 2020, 6) {
        Ok(extremes) => println!(
            "\n{} 2020-06 最高收盘 {:.2}，最低收盘 {:.2}（{} 个交易日）",
            extremes.name, extremes.max_price, extremes.min_price, extremes.trading_days
        ),
        Err(e) => println!("\n无法查询 {}: {}", symbol, e),
    }

    Ok(())
}
