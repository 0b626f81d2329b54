use optdispatch::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Address, deadlines and provider tuning come from the environment (or .env)
    let config = ServerConfig::from_env()?;
    start_server(config).await?;

    Ok(())
}
