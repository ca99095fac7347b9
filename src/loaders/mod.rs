pub mod base;
pub mod csv_loader;
