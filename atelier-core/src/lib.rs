pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod store;
pub mod trades;
pub mod validation;

pub use config::AtelierConfig;
pub use error::{AtelierError, FieldErrors};
pub use trades::{Trade, TradeCatalog};
