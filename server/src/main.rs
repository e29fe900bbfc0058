// bakery_server/src/main.rs

// Declare modules for the application
mod config;
mod errors;
mod state;
mod web;

use crate::config::{AppConfig, AppEnv};
use crate::errors::AppError;
use crate::state::AppState;

use actix_cors::Cors;
use actix_web::{web as actix_data, App, HttpServer};
use bakery_core::{IntakeOptions, NotificationDispatcher, OrderIntake, PgOrderStore, SmtpNotifier, MIGRATOR};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing
use tracing_subscriber::EnvFilter;

fn init_tracing(app_env: AppEnv) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")); // Allow RUST_LOG override
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE); // Log when spans close, showing duration

  match app_env {
    AppEnv::Production => builder.json().init(),
    AppEnv::Development => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // APP_ENV picks the log format, so it is read before the rest of the configuration.
  dotenvy::dotenv().ok();
  let app_env = std::env::var("APP_ENV")
    .ok()
    .and_then(|raw| raw.parse::<AppEnv>().ok())
    .unwrap_or(AppEnv::Development);
  init_tracing(app_env);

  tracing::info!("Starting bakery order service...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(e.into());
    }
  };
  tracing::debug!(config = ?app_config, "Loaded config details");

  // Initialize Database Pool
  let connect_options = PgConnectOptions::from_str(&app_config.database_url)
    .map_err(AppError::from)?
    .ssl_mode(app_config.database_ssl_mode);
  let db_pool = match PgPoolOptions::new()
    .max_connections(app_config.database_max_connections)
    .connect_with(connect_options)
    .await
  {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      return Err(AppError::from(e).into());
    }
  };

  if app_config.run_migrations {
    MIGRATOR.run(&db_pool).await.map_err(AppError::from)?;
    tracing::info!("Database migrations applied.");
  }

  // Owner notification runs beside the HTTP workers and is drained after them.
  let notifier = Arc::new(SmtpNotifier::new(&app_config.smtp).map_err(AppError::from)?);
  let (dispatcher, notification_worker) = NotificationDispatcher::spawn(notifier);

  let intake = OrderIntake::new(
    Arc::new(PgOrderStore::new(db_pool.clone())),
    dispatcher,
    IntakeOptions {
      strict_totals: app_config.strict_totals,
    },
  )
  .map_err(AppError::from)?;

  let app_data = actix_data::Data::new(AppState {
    intake: Arc::new(intake),
  });

  // Configure and Start Actix Web Server
  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(app_data.clone()) // Share AppState with handlers
      .wrap(Cors::permissive())
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
  })
  .shutdown_timeout(app_config.shutdown_grace.as_secs())
  .bind(&server_address)
  .map_err(AppError::from)?
  .run()
  .await
  .map_err(AppError::from)?;

  tracing::info!("HTTP server stopped; draining owner notifications.");
  notification_worker.shutdown(app_config.shutdown_grace).await;
  db_pool.close().await;
  tracing::info!("Shutdown complete.");
  Ok(())
}
