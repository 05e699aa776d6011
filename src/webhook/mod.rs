//! Inbound webhook handling: payload classification and HTTP routes.

pub mod classify;
pub mod routes;

pub use classify::{classify, classify_body};
pub use routes::{webhook_routes, WebhookResponse, WebhookState};
