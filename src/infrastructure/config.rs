use serde::Deserialize;

const CONFIG_FILE: &str = "config/dashboard";
const ENV_PREFIX: &str = "CARLOS";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub api: ApiSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub error_reporting: ErrorReportingSettings,
    #[serde(default)]
    pub charts: ChartSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    /// Bearer token attached to every request.
    #[serde(default)]
    pub token: Option<String>,
}

/// Identity provider settings, passed through to the browser.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub domain: String,
    pub client_id: String,
    #[serde(default)]
    pub audience: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ErrorReportingSettings {
    #[serde(default)]
    pub dsn: Option<String>,
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ErrorReportingSettings {
    fn default() -> Self {
        Self {
            dsn: None,
            environment: default_environment(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    #[serde(default = "default_hours")]
    pub default_hours: i64,
    #[serde(default = "default_width")]
    pub default_width: f64,
    #[serde(default = "default_height")]
    pub default_height: f64,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            default_hours: default_hours(),
            default_width: default_width(),
            default_height: default_height(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_hours() -> i64 {
    24
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    300.0
}

/// Loads `config/dashboard.*` (optional) overlaid with `CARLOS__SECTION__KEY`
/// environment variables.
pub fn load_config() -> anyhow::Result<DashboardConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"));

    finish(builder)
}

pub fn parse_config(toml: &str) -> anyhow::Result<DashboardConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml));

    finish(builder)
}

fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> anyhow::Result<DashboardConfig> {
    let mut settings: DashboardConfig = builder.build()?.try_deserialize()?;
    settings.api.base_url = normalize_url(&settings.api.base_url);
    Ok(settings)
}

/// Strips a single trailing slash so paths can be appended verbatim.
pub fn normalize_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_string()
}
