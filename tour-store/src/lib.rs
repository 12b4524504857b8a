pub mod app_config;
pub mod supplier_client;

pub use app_config::Config;
pub use supplier_client::HttpTourSupplier;
