use std::env;
use std::path::Path;

fn main() {
    // 获取项目根目录
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());

    // 检查数据集目录
    let data_dir = Path::new(&manifest_dir).join("datasets");
    let required = ["sp500_stocks.csv", "sp500_companies.csv"];

    for name in required {
        if !data_dir.join(name).exists() {
            println!("cargo:warning=datasets/{} not found. Queries will fail until the dataset is present.", name);
            println!("cargo:warning=Run 'cargo run --bin create_sample_dataset' to generate a small sample dataset.");
        }
    }

    println!("cargo:rerun-if-changed=datasets");
}
