use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub collaboration: CollaborationConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Token signing and one-time passcode lifetimes.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default = "default_otp_ttl_minutes")]
    pub otp_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
            otp_ttl_minutes: default_otp_ttl_minutes(),
        }
    }
}

fn default_token_ttl_hours() -> i64 { 12 }
fn default_otp_ttl_minutes() -> i64 { 10 }

/// Outgoing mail. Without an `endpoint` mails are written to the log only.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    #[serde(default = "default_mail_from")]
    pub from: String,
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self { from: default_mail_from(), endpoint: None }
    }
}

fn default_mail_from() -> String { "noreply@startupocean.in".to_string() }

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CollaborationConfig {
    /// Only the target company may accept/reject, and only while PENDING.
    #[serde(default)]
    pub strict_transitions: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    /// Empty list keeps CORS fully permissive.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Defaults plus environment variables, used when no config file exists.
    pub fn from_env() -> Self {
        let mut cfg = AppConfig::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            cfg.server.port = port;
        }
        cfg.server.worker_threads = std::env::var("TOKIO_WORKER_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .or(cfg.server.worker_threads);
        if let Ok(endpoint) = std::env::var("MAIL_ENDPOINT") {
            cfg.mail.endpoint = Some(endpoint);
        }
        cfg
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // 归一化 server
        self.server.normalize()?;
        // 归一化 database（支持从环境变量填充 URL）
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.mail.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port 必须在 1..=65535 范围内"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // 若 TOML 中未提供 URL，则尝试从环境变量填充
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn is_sqlite(&self) -> bool {
        self.url.to_lowercase().starts_with("sqlite:")
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url 为空；请在 config.toml 或环境变量 DATABASE_URL 中提供"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || self.is_sqlite()) {
            return Err(anyhow!("database.url 必须以 postgresql://、postgres:// 或 sqlite: 开头"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections 必须 >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections 必须 >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database 超时配置必须为正整数秒"));
        }
        Ok(())
    }
}

impl AuthConfig {
    /// `JWT_SECRET` wins over the file; an empty secret falls back to the dev default.
    pub fn normalize_from_env(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            if !secret.trim().is_empty() {
                self.jwt_secret = secret;
            }
        }
        if self.jwt_secret.trim().is_empty() {
            self.jwt_secret = DEV_JWT_SECRET.to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours 必须为正数"));
        }
        if self.otp_ttl_minutes <= 0 {
            return Err(anyhow!("auth.otp_ttl_minutes 必须为正数"));
        }
        Ok(())
    }
}

impl MailConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.from.contains('@') {
            return Err(anyhow!("mail.from 必须是合法的邮箱地址"));
        }
        if let Some(endpoint) = &self.endpoint {
            let lower = endpoint.to_lowercase();
            if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                return Err(anyhow!("mail.endpoint 必须以 http:// 或 https:// 开头"));
            }
        }
        Ok(())
    }
}
