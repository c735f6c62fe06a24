pub mod bar;
pub mod source;

// Re-export for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use bar::PriceSeries;
pub use source::{DateWindow, JsonDirectorySource};
