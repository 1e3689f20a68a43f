pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod services;
pub mod utils;
pub mod validation;

use crate::cache::TokenBlacklist;
use crate::config::{Config, LoggingConfig};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::middleware::auth::AuthService;
use crate::utils::AvatarService;
use std::sync::Arc;
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub avatars: AvatarService,
    pub token_blacklist: TokenBlacklist,
}

impl AppState {
    pub fn new(db: DbPool, redis: redis::Client, config: Config) -> AppResult<Self> {
        let auth_service = AuthService::new(config.auth());
        let avatars = AvatarService::new(&config.avatars())?;
        let token_blacklist = TokenBlacklist::new(redis);
        Ok(Self {
            db,
            config: Arc::new(config),
            auth_service,
            avatars,
            token_blacklist,
        })
    }
}

pub fn log_level(level: &str) -> Level {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn init_tracing(logging: &LoggingConfig) {
    let level = log_level(&logging.level);

    match logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_max_level(level)
                .with_current_span(false)
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_max_level(level).init();
        }
    }
}
