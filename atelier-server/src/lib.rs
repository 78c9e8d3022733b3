pub mod auth;
pub mod handlers;
pub mod http;
pub mod router;
