// bakery_server/src/config.rs

use crate::errors::{AppError, Result};
use bakery_core::SmtpSettings;
use dotenvy::dotenv;
use sqlx::postgres::PgSslMode;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Deployment flavour. Production switches logs to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
  Development,
  Production,
}

impl FromStr for AppEnv {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "development" | "dev" | "local" => Ok(AppEnv::Development),
      "production" | "prod" => Ok(AppEnv::Production),
      other => Err(AppError::Config(format!("Invalid APP_ENV '{}'", other))),
    }
  }
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub app_env: AppEnv,

  pub database_url: String,
  pub database_ssl_mode: PgSslMode,
  pub database_max_connections: u32,
  pub run_migrations: bool,

  pub smtp: SmtpSettings,

  pub strict_totals: bool,
  pub shutdown_grace: Duration,
}

// Keeps the connection string and SMTP password out of logs.
impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("app_env", &self.app_env)
      .field("database_url", &"[REDACTED]")
      .field("database_ssl_mode", &self.database_ssl_mode)
      .field("database_max_connections", &self.database_max_connections)
      .field("run_migrations", &self.run_migrations)
      .field("smtp", &self.smtp)
      .field("strict_totals", &self.strict_totals)
      .field("shutdown_grace", &self.shutdown_grace)
      .finish()
  }
}

fn parse_var<T>(var_name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e)))
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };
    let get_or = |var_name: &str, default: &str| env::var(var_name).unwrap_or_else(|_| default.to_string());

    let server_host = get_or("SERVER_HOST", "0.0.0.0");
    let server_port = parse_var("PORT", &get_or("PORT", "3000"))?;
    let app_env = get_or("APP_ENV", "development").parse::<AppEnv>()?;

    let database_url = get_env("DATABASE_URL")?;
    let database_ssl_mode = parse_var("DATABASE_SSL_MODE", &get_or("DATABASE_SSL_MODE", "require"))?;
    let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &get_or("DATABASE_MAX_CONNECTIONS", "10"))?;
    let run_migrations = parse_var("RUN_MIGRATIONS", &get_or("RUN_MIGRATIONS", "false"))?;

    let smtp = SmtpSettings {
      host: get_or("SMTP_HOST", "smtp.gmail.com"),
      username: get_env("EMAIL_USER")?,
      password: get_env("EMAIL_PASS")?,
      owner_address: get_env("OWNER_EMAIL")?,
    };

    let strict_totals = parse_var("STRICT_TOTALS", &get_or("STRICT_TOTALS", "false"))?;
    let shutdown_grace = Duration::from_secs(parse_var("SHUTDOWN_GRACE_SECS", &get_or("SHUTDOWN_GRACE_SECS", "10"))?);

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      app_env,
      database_url,
      database_ssl_mode,
      database_max_connections,
      run_migrations,
      smtp,
      strict_totals,
      shutdown_grace,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
