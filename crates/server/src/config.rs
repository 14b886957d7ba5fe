use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Address the HTTP API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Page size used when a list request does not ask for one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Upper bound applied to requested page sizes.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".into()
}

fn default_page_size() -> u64 {
    10
}

fn default_max_page_size() -> u64 {
    100
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database_url must not be empty".into(),
            ));
        }
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(ConfigError::Validation("page sizes must be > 0".into()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Validation(
                "default_page_size must not exceed max_page_size".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the page size for a list request.
    pub fn page_size(&self, requested: Option<u64>) -> u64 {
        match requested {
            Some(0) | None => self.default_page_size,
            Some(n) => n.min(self.max_page_size),
        }
    }
}

/// Load application configuration from an optional `config.yaml` plus
/// environment overrides.
///
/// Any variable matching the key path separated by double underscores
/// (e.g. `DATABASE_URL`, `MAX_PAGE_SIZE`) overrides the file value. A `.env`
/// file in the working directory is read first when present.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    dotenvy::dotenv().ok();

    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml").required(false))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(default_page_size: u64, max_page_size: u64) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            listen_addr: default_listen_addr(),
            default_page_size,
            max_page_size,
        }
    }

    #[test]
    fn page_size_falls_back_to_default() {
        let cfg = config(10, 100);
        assert_eq!(cfg.page_size(None), 10);
        assert_eq!(cfg.page_size(Some(0)), 10);
    }

    #[test]
    fn page_size_is_capped() {
        let cfg = config(10, 100);
        assert_eq!(cfg.page_size(Some(25)), 25);
        assert_eq!(cfg.page_size(Some(5000)), 100);
    }

    #[test]
    fn default_larger_than_max_is_rejected() {
        assert!(config(50, 20).validate().is_err());
        assert!(config(0, 20).validate().is_err());
        assert!(config(10, 100).validate().is_ok());
    }
}
