use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub supplier: SupplierConfig,
    pub booking: BookingConfig,
    pub sessions: SessionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SupplierConfig {
    pub base_url: String,
    #[serde(default = "default_tour_options_path")]
    pub tour_options_path: String,
    #[serde(default = "default_availability_path")]
    pub availability_path: String,
    /// Unset means requests wait as long as the transport allows
    #[serde(default)]
    pub request_timeout_seconds: Option<u64>,
}

fn default_tour_options_path() -> String { "/api/Tour/touroption".to_string() }
fn default_availability_path() -> String { "/api/Tour/availability".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    pub form_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub idle_ttl_seconds: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

fn default_sweep_interval() -> u64 { 60 }

impl SessionConfig {
    pub fn idle_ttl(&self) -> Result<chrono::Duration, config::ConfigError> {
        i64::try_from(self.idle_ttl_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                config::ConfigError::Message(format!(
                    "sessions.idle_ttl_seconds out of range: {}",
                    self.idle_ttl_seconds
                ))
            })
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local, uncommitted overrides
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `TOUR__SUPPLIER__BASE_URL=http://api` sets `supplier.base_url`
            .add_source(config::Environment::with_prefix("TOUR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn test_config_defaults() {
        let raw = r#"
            [server]
            port = 9000

            [supplier]
            base_url = "http://supplier.local"

            [booking]
            form_path = "/booking-form"

            [sessions]
            idle_ttl_seconds = 300
        "#;
        let cfg: Config = config::Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.supplier.tour_options_path, "/api/Tour/touroption");
        assert_eq!(cfg.supplier.availability_path, "/api/Tour/availability");
        assert!(cfg.supplier.request_timeout_seconds.is_none());
        assert_eq!(cfg.sessions.sweep_interval_seconds, 60);
        assert_eq!(cfg.sessions.idle_ttl().unwrap(), chrono::Duration::minutes(5));
    }

    #[test]
    fn test_idle_ttl_out_of_range_is_an_error() {
        let sessions = SessionConfig {
            idle_ttl_seconds: u64::MAX,
            sweep_interval_seconds: 60,
        };
        assert!(sessions.idle_ttl().is_err());

        let sessions = SessionConfig {
            idle_ttl_seconds: i64::MAX as u64,
            sweep_interval_seconds: 60,
        };
        assert!(sessions.idle_ttl().is_err());
    }
}
