// bakery_server/src/web/handlers/mod.rs

// Declare handler modules
pub mod order_handlers;
