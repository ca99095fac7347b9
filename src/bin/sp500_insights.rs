use sp500_insights::config::Config;
use sp500_insights::errors::InsightsError;
use sp500_insights::loaders::csv_loader::CsvLoader;
use sp500_insights::report;
use sp500_insights::services::query_service::QueryService;
use sp500_insights::util;

use anyhow::Context;
use clap::{App, Arg, ArgMatches, SubCommand};
use log::info;
use serde::Serialize;

fn year_arg(name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::with_name(name)
        .long(name)
        .value_name("YEAR")
        .help(help)
        .required(true)
        .takes_value(true)
}

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = App::new("SP500 Insights")
        .version("2024.2.1")
        .about("S&P 500 sector, growth and monthly price analysis (2014-2024)")
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Print results as JSON instead of tables")
                .global(true)
                .takes_value(false),
        )
        .subcommand(
            SubCommand::with_name("sectors")
                .about("Average close per sector and year compared with the market average")
                .arg(year_arg("from", "First year of the range (2014-2024)"))
                .arg(year_arg("to", "Last year of the range (2014-2024)")),
        )
        .subcommand(
            SubCommand::with_name("sector-trend")
                .about("Daily average close of one sector against the S&P 500 index")
                .arg(
                    Arg::with_name("sector")
                        .short('s')
                        .long("sector")
                        .value_name("SECTOR")
                        .help("Sector name, e.g. Technology")
                        .required(true)
                        .takes_value(true),
                )
                .arg(year_arg("from", "First year of the range (2014-2024)"))
                .arg(year_arg("to", "Last year of the range (2014-2024)")),
        )
        .subcommand(
            SubCommand::with_name("growth")
                .about("Revenue growth vs. stock price growth per company")
                .arg(year_arg("from", "Start year (2014-2024)"))
                .arg(year_arg("to", "End year (2014-2024)")),
        )
        .subcommand(
            SubCommand::with_name("monthly")
                .about("Daily high/low prices of one company in one month")
                .arg(
                    Arg::with_name("company")
                        .short('c')
                        .long("company")
                        .value_name("COMPANY")
                        .help("Ticker symbol or short company name")
                        .required(true)
                        .takes_value(true),
                )
                .arg(year_arg("year", "Year (2014-2024)"))
                .arg(
                    Arg::with_name("month")
                        .short('m')
                        .long("month")
                        .value_name("MONTH")
                        .help("Month (1-12)")
                        .required(true)
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("explore")
                .about("List sectors and companies in the dataset")
                .arg(
                    Arg::with_name("sector")
                        .short('s')
                        .long("sector")
                        .value_name("SECTOR")
                        .help("Only list companies of this sector")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("limit")
                        .short('l')
                        .long("limit")
                        .value_name("LIMIT")
                        .help("Limit the number of companies to display")
                        .takes_value(true)
                        .default_value("20"),
                ),
        );

    let matches = app.get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let Some((command, sub_matches)) = matches.subcommand() else {
        info!("No command specified. Use --help for usage information.");
        return Ok(());
    };
    let json = matches.is_present("json") || sub_matches.is_present("json");

    let config = Config::new();
    let (first_year, last_year) = (config.first_year, config.last_year);

    // 先校验输入，再加载数据
    let years = |m: &ArgMatches, from: &str, to: &str| -> anyhow::Result<(i32, i32)> {
        let from_year = m.value_of(from).unwrap_or_default();
        let to_year = m.value_of(to).unwrap_or_default();
        Ok(util::validate_years(from_year, to_year, first_year, last_year)?)
    };

    let loader = CsvLoader::new(&config);

    match command {
        "sectors" => {
            let (from, to) = years(sub_matches, "from", "to")?;
            let service = load_service(config, &loader)?;
            let aggregates = service.sector_performance(from, to)?;
            let index = service.index_performance(from, to)?;
            if json {
                print_json(&serde_json::json!({ "sectors": aggregates, "index": index }))?;
            } else {
                print!("{}", report::render_sector_performance(&aggregates, &index));
            }
        }
        "sector-trend" => {
            let (from, to) = years(sub_matches, "from", "to")?;
            let sector = sub_matches.value_of("sector").unwrap_or_default();
            let service = load_service(config, &loader)?;
            let series = service.sector_daily_performance(sector, from, to)?;
            let index = service.index_daily_levels(from, to)?;
            if json {
                print_json(&serde_json::json!({ "sector": series, "index": index }))?;
            } else {
                let title = format!("Sector Performance Analysis: {} ({}-{})", sector, from, to);
                print!("{}", report::render_daily_series(&title, &series, &index));
            }
        }
        "growth" => {
            let (from, to) = years(sub_matches, "from", "to")?;
            let service = load_service(config, &loader)?;
            let pairs = service.revenue_vs_price_growth(from, to)?;
            if json {
                print_json(&pairs)?;
            } else {
                print!("{}", report::render_growth(&pairs));
            }
        }
        "monthly" => {
            let (year, _) = years(sub_matches, "year", "year")?;
            let month_str = sub_matches.value_of("month").unwrap_or_default();
            let month = month_str.parse::<u32>().map_err(|_| {
                InsightsError::InvalidRange(format!("Month must be a number between 1 and 12, got '{}'.", month_str))
            })?;
            let company = sub_matches.value_of("company").unwrap_or_default();

            let service = load_service(config, &loader)?;
            let (extremes, days) = service.monthly_analysis(company, year, month)?;
            if json {
                print_json(&serde_json::json!({ "extremes": extremes, "days": days }))?;
            } else {
                print!("{}", report::render_monthly(&extremes, &days));
            }
        }
        "explore" => {
            let sector_filter = sub_matches.value_of("sector");
            let limit = sub_matches
                .value_of("limit")
                .unwrap_or("20")
                .parse::<usize>()
                .unwrap_or(20);

            let service = load_service(config, &loader)?;
            explore(&service, sector_filter, limit, json)?;
        }
        other => {
            info!("Unknown command: {}", other);
        }
    }

    Ok(())
}

fn load_service(config: Config, loader: &CsvLoader) -> anyhow::Result<QueryService> {
    let data_dir = config.data_dir.clone();
    QueryService::load(config, loader)
        .with_context(|| format!("Failed to load dataset from '{}'", data_dir))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn explore(service: &QueryService, sector_filter: Option<&str>, limit: usize, json: bool) -> anyhow::Result<()> {
    let sector = match sector_filter {
        Some(wanted) => Some(
            service
                .dataset()
                .resolve_sector(wanted)
                .ok_or_else(|| InsightsError::UnknownSector(wanted.to_string()))?,
        ),
        None => None,
    };
    let companies: Vec<_> = service
        .companies()
        .into_iter()
        .filter(|c| sector.map_or(true, |s| c.sector == s))
        .collect();

    if json {
        return print_json(&serde_json::json!({
            "covered_years": service.covered_years(),
            "sectors": service.sectors(),
            "companies": companies,
        }));
    }

    if let Some((first, last)) = service.covered_years() {
        println!("Covered years: {}-{}", first, last);
    }
    if let Some(date) = service.dataset().latest_trading_date() {
        println!("Latest trading date: {}", date);
    }

    println!("\nSectors:");
    for sector in service.sectors() {
        let count = service.companies().iter().filter(|c| c.sector == sector).count();
        println!("  {:<28} {:>4} companies", sector, count);
    }

    println!("\n{:<8} {:<32} {:<24}", "Symbol", "Name", "Sector");
    println!("{:-<66}", "");
    for company in companies.iter().take(limit) {
        println!("{:<8} {:<32.32} {:<24}", company.symbol, company.short_name, company.sector);
    }
    if companies.len() > limit {
        println!("... and {} more companies", companies.len() - limit);
    }

    Ok(())
}
