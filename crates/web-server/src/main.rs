use anyhow::Context;
use configuration::{ApiKeys, init_tracing, load_config};
use std::path::Path;

// Entry point for `cargo run -p web-server`: the proxy alone, configured from
// `bizpulse.toml`, `BIZPULSE_*` variables and `.env`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = load_config(Path::new("bizpulse.toml")).context("Failed to load configuration")?;
    let _guard = init_tracing(&config.logging)?;
    web_server::run_server(&config, ApiKeys::from_env()).await
}
