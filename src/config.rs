use anyhow::Result;
use config::Config;
use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;

use crate::models::Range;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_logger_level")]
    pub logger_level: String,
    pub range_service_url: Option<String>,
    #[serde(default = "default_analyzer_addr")]
    pub analyzer_addr: String,
    #[serde(default = "default_provider_addr")]
    pub provider_addr: String,
    pub abnormal_store_path: Option<String>,
    pub max_concurrent_records: Option<usize>,
    pub ranges: Option<HashMap<String, Range>>,
}

fn default_logger_level() -> String {
    crate::logging::DEFAULT_LOGGER_LEVEL.to_string()
}

fn default_analyzer_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_provider_addr() -> String {
    "0.0.0.0:3001".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            logger_level: default_logger_level(),
            range_service_url: None,
            analyzer_addr: default_analyzer_addr(),
            provider_addr: default_provider_addr(),
            abnormal_store_path: None,
            max_concurrent_records: None,
            ranges: None,
        }
    }
}

impl AppConfig {
    /// Валидация конфигурации
    pub fn validate(&self) -> Result<()> {
        if let Some(max_concurrent) = self.max_concurrent_records {
            if max_concurrent == 0 || max_concurrent > 50 {
                return Err(anyhow::anyhow!("max_concurrent_records must be between 1 and 50"));
            }
        }

        self.analyzer_addr
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("analyzer_addr is not a socket address: {}", e))?;
        self.provider_addr
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("provider_addr is not a socket address: {}", e))?;

        Ok(())
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent_records.unwrap_or(10)
    }
}

pub fn load_config() -> Result<AppConfig> {
    // Загружаем .env файл
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("PULSE"))
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // Имена переменных, которые использует развёртывание без префикса
    if config.range_service_url.is_none() {
        config.range_service_url = env::var("API_GATEWAY_URL").ok();
    }
    if env::var("PULSE_LOGGER_LEVEL").is_err() {
        if let Ok(level) = env::var("LOGGER_LEVEL") {
            config.logger_level = level;
        }
    }

    config.validate()?;

    Ok(config)
}
