use sp500_insights::config::Config;
use sp500_insights::data_provider::StockDataset;
use sp500_insights::loaders::csv_loader::CsvLoader;

use anyhow::Context;
use chrono::Datelike;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::new();
    if !config.stocks_path().exists() {
        anyhow::bail!(
            "数据文件不存在: {}，请先运行 'cargo run --bin create_sample_dataset'",
            config.stocks_path().display()
        );
    }

    let loader = CsvLoader::new(&config);
    let dataset = StockDataset::load(&loader).context("Failed to load dataset")?;

    match dataset.covered_years() {
        Some((first, last)) => {
            println!("覆盖年份: {}-{}", first, last);
            if first < config.first_year || last > config.last_year {
                println!(
                    "警告: 数据超出查询允许的范围 {}-{}",
                    config.first_year, config.last_year
                );
            }
        }
        None => println!("未找到有效的价格记录"),
    }

    println!("公司数量: {}", dataset.symbols().len());
    println!("板块数量: {}", dataset.sectors().len());
    println!("指数点位数量: {}", dataset.index_points().len());

    if let Some(date) = dataset.latest_trading_date() {
        println!("最新交易日期: {}", date);

        // 格式化为 YYYY.M.D 版本号（移除前导零）
        println!("版本号: {}.{}.{}", date.year(), date.month(), date.day());
    }

    Ok(())
}
