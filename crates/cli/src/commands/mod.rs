pub mod config_cmd;
pub mod emit;
pub mod wrap;

use std::path::Path;

use openlineage_client::Client;
use openlineage_config::ClientConfig;

/// Load configuration from `path` (or the default location) with env overrides.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => ClientConfig::load_with_env(path),
        None => ClientConfig::load(),
    }
    .map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(config)
}

/// Build the process-wide client.
pub fn build_client(path: Option<&Path>) -> Result<Client, Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let client = Client::new(&config).map_err(|e| format!("Failed to create client: {e}"))?;
    Ok(client)
}
