//! `openlineage config`: Configuration inspection commands.

use std::path::Path;

use openlineage_config::ClientConfig;

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let mut toml_str = toml::to_string_pretty(&config)?;

    // The api key never goes to the terminal
    if let Some(ref api_key) = config.transport.http.api_key {
        toml_str = toml_str.replace(api_key.as_str(), "[REDACTED]");
    }

    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = ClientConfig::config_dir().join("config.toml");
    println!("{}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn config_path_is_valid() {
        let path = openlineage_config::ClientConfig::config_dir().join("config.toml");
        assert!(path.to_str().unwrap().contains(".openlineage"));
        assert!(path.to_str().unwrap().ends_with("config.toml"));
    }
}
