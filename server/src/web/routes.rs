// bakery_server/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::errors::AppError;

pub const LIVENESS_MESSAGE: &str = "Bakery Order Service is Running!";

// Liveness only; it does not touch the database.
async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(LIVENESS_MESSAGE)
}

/// Body errors (bad JSON, missing or mistyped fields) get the same uniform failure as
/// every other order error instead of actix's default 400.
fn order_json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| AppError::Payload(err.to_string()).into())
}

// This function will be called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.route("/", web::get().to(health_check_handler)).service(
    web::scope("/api")
      .app_data(order_json_config())
      .route(
        "/orders",
        web::post().to(crate::web::handlers::order_handlers::create_order_handler),
      ),
  );
}
