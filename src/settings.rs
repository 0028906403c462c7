use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use url::Url;
use std::{env, fmt, str::FromStr, time::Duration};
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_trust_proxy_headers")]
    pub trust_proxy_headers: bool,

    #[serde(default, deserialize_with = "deserialize_secret")]
    pub resend_api_key: Option<Zeroizing<String>>,

    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,

    #[serde(default = "default_email_from")]
    pub email_from: String,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    #[serde(default = "default_brand_name")]
    pub brand_name: String,

    #[serde(default = "default_support_phone")]
    pub support_phone: String,

    #[serde(default = "default_support_email")]
    pub support_email: String,

    #[serde(default = "default_business_hours")]
    pub business_hours: String,

    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u32,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_rate_limit_sweep_secs")]
    pub rate_limit_sweep_secs: u64,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Consultation-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
pub fn default_cors_origins() -> Vec<String> {
    vec![
        "https://northstone-materials.co.uk".to_string(),
        "https://www.northstone-materials.co.uk".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}
fn default_trust_proxy_headers() -> bool {
    true
}
pub fn default_resend_base_url() -> String {
    "https://api.resend.com".to_string()
}
pub fn default_email_from() -> String {
    "Northstone Consultations <consultations@northstone-materials.co.uk>".to_string()
}
pub fn default_admin_email() -> String {
    "sales@northstone-materials.co.uk".to_string()
}
pub fn default_brand_name() -> String {
    "Northstone Building Materials".to_string()
}
pub fn default_support_phone() -> String {
    "+44 20 7946 0958".to_string()
}
pub fn default_support_email() -> String {
    "info@northstone-materials.co.uk".to_string()
}
pub fn default_business_hours() -> String {
    "Monday to Friday, 8:00am - 6:00pm".to_string()
}
fn default_rate_limit_max_requests() -> u32 {
    2
}
fn default_rate_limit_window_secs() -> u64 {
    60
}
fn default_rate_limit_sweep_secs() -> u64 {
    300
}
fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<Zeroizing<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(Zeroizing::new))
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins"),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // The provider SDK convention is an unprefixed variable
        if config.resend_api_key.is_none() {
            config.resend_api_key = env::var("RESEND_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
                .map(Zeroizing::new);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production".to_string());
        }
        if self.rate_limit_max_requests == 0 {
            errors.push("RATE_LIMIT_MAX_REQUESTS must be greater than zero".to_string());
        }
        if self.rate_limit_window_secs == 0 {
            errors.push("RATE_LIMIT_WINDOW_SECS must be greater than zero".to_string());
        }
        if let Err(e) = Url::parse(&self.resend_base_url) {
            errors.push(format!("RESEND_BASE_URL is invalid: {e}"));
        }
        if self.admin_email.trim().is_empty() {
            errors.push("ADMIN_EMAIL cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn rate_limit_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.rate_limit_sweep_secs.max(1))
    }

    pub fn contact_details(&self) -> ContactDetails {
        ContactDetails {
            brand_name: self.brand_name.clone(),
            phone: self.support_phone.clone(),
            email: self.support_email.clone(),
            hours: self.business_hours.clone(),
        }
    }
}

/// Human contact channels quoted in responses and emails.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactDetails {
    pub brand_name: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            cors_allowed_origins: default_cors_origins(),
            trust_proxy_headers: default_trust_proxy_headers(),
            resend_api_key: None,
            resend_base_url: default_resend_base_url(),
            email_from: default_email_from(),
            admin_email: default_admin_email(),
            brand_name: default_brand_name(),
            support_phone: default_support_phone(),
            support_email: default_support_email(),
            business_hours: default_business_hours(),
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_window_secs: default_rate_limit_window_secs(),
            rate_limit_sweep_secs: default_rate_limit_sweep_secs(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for Option<Zeroizing<String>> {
    fn redact(&self) -> &str {
        match self {
            None => "[MISSING]",
            Some(_) => "[REDACTED]",
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .field("resend_api_key", &self.resend_api_key.redact())
            .field("resend_base_url", &self.resend_base_url)
            .field("email_from", &self.email_from)
            .field("admin_email", &self.admin_email)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("rate_limit_sweep_secs", &self.rate_limit_sweep_secs)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}
