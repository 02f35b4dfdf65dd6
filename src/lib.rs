pub mod auth;
pub mod config;
pub mod core;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod utils;

use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}
