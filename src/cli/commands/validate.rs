//! Validate configuration command.

use anyhow::Result;
use capital_config::{load_credentials, AppConfig};
use std::path::Path;

pub async fn run(config_path: &Path, config: &AppConfig) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("REST API: {}", config.api.rest_url);
    println!("Stream: {}", config.api.stream_url);
    println!("Categories: {}", config.scanner.categories.len());
    println!(
        "Filter: spread < {}, bid > {}",
        config.scanner.max_spread, config.scanner.min_bid
    );
    println!(
        "Prices: {} x {}",
        config.scanner.max_results, config.scanner.resolution
    );
    println!("Watch-list: {}", config.stream.epics.join(", "));
    println!("Displayed: {}", config.stream.display_epics().join(", "));

    match load_credentials(&config.api) {
        Ok(_) => println!("Credentials: present"),
        Err(e) => println!("Credentials: {}", e),
    }

    println!();
    println!("Effective configuration:");
    print!("{}", config.to_toml_string()?);

    Ok(())
}
