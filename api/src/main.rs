// Developer profile API server entry point

mod config;
mod db;
mod entity;
mod error;
mod eth;
mod handlers;
mod models;
mod services;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::ApiConfig;
use db::DbPool;
use handlers::AppContext;
use services::contract_service::EthContractService;
use services::ipfs_service::PinataIpfsService;

fn load_env() {
    dotenv::dotenv().ok();
}

#[tokio::main]
async fn main() {
    load_env();
    // Configure logging with tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load API configuration from environment
    let config = ApiConfig::from_env().expect("Invalid configuration");
    tracing::info!("Configuration loaded");
    if config.support_contract.is_none() {
        tracing::warn!("SUPPORT_CONTRACT_ADDRESS not set; on-chain support reads will fail");
    }
    if config.sender_address.is_none() {
        tracing::warn!("SENDER_ADDRESS not set; server-sent tips and NFT mints are disabled");
    }

    // Establish database connection pool
    let db_pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    // HTTP client for the IPFS pinning API
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to build HTTP client");

    let contract = EthContractService::new(&config).expect("Invalid ETH_RPC_URL");
    let ipfs = PinataIpfsService::new(http_client, &config);

    let app_state = Arc::new(AppContext {
        repositories: db_pool.repositories(),
        contract: Arc::new(contract),
        ipfs: Arc::new(ipfs),
        config: Arc::new(config.clone()),
    });

    let app = handlers::router(app_state);

    // Parse server address from config
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");

    // Start HTTP server
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
