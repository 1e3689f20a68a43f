use axum::{
    Router, Server,
    http::{HeaderValue, Method, header},
    middleware::from_fn,
};
use lab_backend::{AppState, config::Config, db, init_tracing, middleware::logger::logger, routes};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging());

    if let Err(e) = run(config).await {
        tracing::error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let pool = db::build_pool(&config.database())?;
    let redis = redis::Client::open(config.redis_url.as_str())?;

    let server = config.server();
    let addr: SocketAddr = config.server_address().parse()?;
    let cors = cors_layer(&server.cors_origins);

    let state = Arc::new(AppState::new(pool, redis, config)?);

    let app = Router::new()
        .merge(routes::create_router(state))
        .layer(cors)
        .layer(from_fn(logger));

    tracing::info!(address = %addr, "Server running");
    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
