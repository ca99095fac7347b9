pub mod stock;
pub mod analysis;
