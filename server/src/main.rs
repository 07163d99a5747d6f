use vinimai_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment first: config and the JWT secret both read from it
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    tracing::info!("Vinimai marketplace server starting...");

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let server = Server::new(config).await?;

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
