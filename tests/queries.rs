use sp500_insights::config::Config;
use sp500_insights::loaders::base::DatasetLoader;
use sp500_insights::loaders::csv_loader::CsvLoader;
use sp500_insights::{InsightsError, QueryService};

fn fixture_config() -> Config {
    Config::new().with_data_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/datasets"))
}

fn service() -> QueryService {
    let config = fixture_config();
    let loader = CsvLoader::new(&config);
    QueryService::load(config, &loader).expect("fixture dataset loads")
}

#[test]
fn test_loader_reads_fixture_files() {
    let loader = CsvLoader::new(&fixture_config());

    assert_eq!(loader.load_companies().unwrap().len(), 4);
    // 2014 年那一行缺少收盘价，2020-06-20 那一行收盘价无法解析
    assert_eq!(loader.load_prices().unwrap().len(), 9);
    assert_eq!(loader.load_index().unwrap().len(), 5);
}

#[test]
fn test_dataset_join() {
    let svc = service();
    let dataset = svc.dataset();

    // GHOST 没有公司信息
    assert_eq!(dataset.records().len(), 8);
    assert_eq!(dataset.symbols(), vec!["CX", "EZ", "TY"]);
    assert_eq!(svc.covered_years(), Some((2020, 2021)));
    assert_eq!(svc.sectors(), vec!["Energy", "Technology"]);
}

#[test]
fn test_sector_performance() {
    let svc = service();
    let aggregates = svc.sector_performance(2020, 2021).unwrap();

    assert_eq!(aggregates.len(), 3);
    for agg in &aggregates {
        assert!(agg.min_price <= agg.average_price && agg.average_price <= agg.max_price);
    }

    let tech_2020 = aggregates
        .iter()
        .find(|a| a.sector == "Technology" && a.year == 2020)
        .unwrap();
    assert!((tech_2020.average_price - 97.5).abs() < 1e-9);
    assert!((tech_2020.index_average_price - 490.0 / 6.0).abs() < 1e-9);

    let index = svc.index_performance(2020, 2021).unwrap();
    assert_eq!(index.len(), 2);
    assert!((index[1].average_level - 4778.73).abs() < 1e-9);
}

#[test]
fn test_revenue_vs_price_growth() {
    let svc = service();
    let first = svc.revenue_vs_price_growth(2020, 2021).unwrap();
    let second = svc.revenue_vs_price_growth(2020, 2021).unwrap();
    assert_eq!(first, second);

    assert_eq!(first.len(), 2);
    let cx = &first[0];
    assert_eq!(cx.company, "CX");
    assert!((cx.price_growth_pct - (120.0 - 100.0) / 100.0 * 100.0).abs() < 1e-9);
    assert!((cx.revenue_growth_pct.unwrap() - 50.0).abs() < 1e-9);
    assert!((cx.reported_revenue_growth_pct.unwrap() - 15.0).abs() < 1e-9);

    let ty = &first[1];
    assert_eq!(ty.company, "TY");
    // 起始年份没有营收，仍保留股价增长
    assert_eq!(ty.revenue_growth_pct, None);
    assert!((ty.price_growth_pct - 50.0).abs() < 1e-9);
    assert_eq!(ty.reported_revenue_growth_pct, None);
}

#[test]
fn test_monthly_extremes() {
    let svc = service();
    let extremes = svc.monthly_extremes("CompanyX", 2020, 6).unwrap();

    assert_eq!(extremes.max_price, 150.0);
    assert_eq!(extremes.min_price, 90.0);
    assert_eq!(extremes.highest_high, 152.0);
    assert_eq!(extremes.lowest_low, 88.5);

    let days = svc.monthly_prices("CX", 2020, 6).unwrap();
    assert_eq!(days.len(), 3);
}

#[test]
fn test_errors() {
    let svc = service();

    assert!(matches!(svc.sector_performance(2025, 2025), Err(InsightsError::InvalidRange(_))));
    assert!(matches!(svc.revenue_vs_price_growth(2025, 2025), Err(InsightsError::InvalidRange(_))));
    assert!(matches!(svc.monthly_extremes("CX", 2025, 1), Err(InsightsError::InvalidRange(_))));

    // 公司存在于公司文件中，但没有价格数据
    assert!(matches!(
        svc.monthly_extremes("Lonely Co", 2020, 6),
        Err(InsightsError::UnknownCompany(_))
    ));

    match svc.monthly_extremes("CX", 2020, 7) {
        Err(InsightsError::InvalidRange(msg)) => assert!(msg.contains("12-2021")),
        other => panic!("Expected InvalidRange, got {:?}", other),
    }
}
