use core_types::ChartType;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its `Default`, so an absent `bizpulse.toml`
/// still yields a runnable setup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub dashboard: DashboardConfig,
    pub providers: ProvidersConfig,
    pub logging: LoggingConfig,
}

/// Where the data proxy listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// The local key-value store holding the business records.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the SQLite file. Created on first use.
    pub database_path: PathBuf,
    /// The single key the serialized record array lives under.
    pub storage_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("bizpulse.db"),
            storage_key: "businessData".to_string(),
        }
    }
}

/// The longest trailing window, in days, the dashboard will build.
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Client-side behaviour of the dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_window_days: i64,
    pub chart_type: ChartType,
    /// Base URL of the data proxy the dashboard talks to.
    pub api_base_url: String,
    /// Quiet period after the last keystroke before a product lookup is issued.
    pub lookup_debounce_ms: u64,
    /// Product names shorter than this never trigger a lookup.
    pub min_lookup_chars: usize,
    /// How many headlines are handed to the advice prompt.
    pub advice_article_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_window_days: 30,
            chart_type: ChartType::Bar,
            api_base_url: "http://localhost:3000".to_string(),
            lookup_debounce_ms: 500,
            min_lookup_chars: 3,
            advice_article_limit: 5,
        }
    }
}

/// Upstream provider endpoints and fixed query parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub newsdata_url: String,
    pub news_query: String,
    pub finnhub_url: String,
    pub data_gov_url: String,
    pub mandi_resource_id: String,
    pub mandi_state: String,
    pub metals_url: String,
    pub metals_currency: String,
    pub gemini_url: String,
    pub gemini_model: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            newsdata_url: "https://newsdata.io/api/1".to_string(),
            news_query: "(Karnataka OR Maharashtra) AND (finance OR tax OR economy OR budget OR business)"
                .to_string(),
            finnhub_url: "https://finnhub.io/api/v1".to_string(),
            data_gov_url: "https://api.data.gov.in".to_string(),
            mandi_resource_id: "9ef84268-d588-465a-a308-a864a43d0070".to_string(),
            mandi_state: "Maharashtra".to_string(),
            metals_url: "https://api.metals.dev/v1".to_string(),
            metals_currency: "INR".to_string(),
            gemini_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model: "gemini-pro".to_string(),
        }
    }
}

/// Log filtering and the optional rolling log file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,sqlx=warn".to_string(),
            directory: None,
            file_prefix: "bizpulse.log".to_string(),
        }
    }
}

/// Provider API keys. Read from the environment only, never from the config file.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub newsdata: Option<String>,
    pub finnhub: Option<String>,
    pub data_gov: Option<String>,
    pub metals: Option<String>,
    pub gemini: Option<String>,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        Self {
            newsdata: env_key("NEWSDATA_API_KEY"),
            finnhub: env_key("FINNHUB_API_KEY"),
            data_gov: env_key("DATA_GOV_API_KEY"),
            metals: env_key("METALS_API_KEY"),
            gemini: env_key("GEMINI_API_KEY"),
        }
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct ConfigOverrides {
    /// Path to the TOML configuration file.
    #[cfg_attr(feature = "clap", arg(long, global = true, default_value = "bizpulse.toml"))]
    pub config: PathBuf,

    /// Override the SQLite file holding the records.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub database: Option<PathBuf>,

    /// Override the base URL of the data proxy.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub api_base_url: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.storage.database_path = database.clone();
        }
        if let Some(url) = &self.api_base_url {
            config.dashboard.api_base_url = url.clone();
        }
    }
}
