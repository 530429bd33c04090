use dotenvy::dotenv;

use technexus_server::config::Config;
use technexus_server::{init_logging, serve};

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        database = %config.redacted_database_url(),
        chat_enabled = config.chat_enabled(),
        "Configuration loaded"
    );

    if let Err(e) = serve(config).await {
        tracing::error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
