use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub web: WebConfig,
    pub fetch: FetchConfig,
    pub popular: PopularConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Timeout applied to every outbound request, landing page and icon
    /// download alike. A hung upstream holds one worker for at most this
    /// long.
    pub timeout_seconds: u64,
    /// User-Agent sent on outbound requests. Some sites serve different
    /// (or no) favicon markup to non-browser agents.
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularConfig {
    /// JSON file mapping domain names to base64-encoded 32x32 PNGs.
    pub dataset_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web: WebConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            fetch: FetchConfig {
                timeout_seconds: 3,
                user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.14; rv:65.0) \
                             Gecko/20100101 Firefox/65.0"
                    .to_string(),
            },
            popular: PopularConfig {
                dataset_path: PathBuf::from("./data/popular_icons.json"),
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(&config_file)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::create_dir_all("./data")?;
            std::fs::write(&config_file, contents)?;
            Ok(default_config)
        }
    }
}
