//! Configuration management.

mod credentials;
mod settings;

pub use credentials::{load_credentials, load_credentials_with};
pub use settings::{
    ApiSettings, AppConfig, AppSettings, LoggingConfig, ScannerSettings, SettingsError,
    StreamSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// A missing file falls back to the built-in defaults; `CAPITAL__*`
/// variables override either.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("CAPITAL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
