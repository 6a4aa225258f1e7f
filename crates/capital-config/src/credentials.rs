//! Credential loading from the environment.

use capital_core::types::Credentials;

use crate::settings::{ApiSettings, SettingsError};

/// Read the API key, identifier and password from the variables named in `api`.
///
/// Unset or empty variables are an error, so a run stops before any request
/// is made.
pub fn load_credentials(api: &ApiSettings) -> Result<Credentials, SettingsError> {
    load_credentials_with(api, |name| std::env::var(name).ok())
}

/// Like [`load_credentials`], with a custom variable lookup.
pub fn load_credentials_with<F>(api: &ApiSettings, lookup: F) -> Result<Credentials, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| {
        lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| SettingsError::MissingCredential(name.to_string()))
    };

    Ok(Credentials::new(
        read(&api.api_key_env)?,
        read(&api.identifier_env)?,
        read(&api.password_env)?,
    ))
}
