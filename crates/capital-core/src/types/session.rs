//! Authentication types.

use rust_decimal::Decimal;
use std::fmt;

use crate::error::ApiError;

/// Login credentials for the session endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    /// Create credentials from plaintext values.
    pub fn new(
        api_key: impl Into<String>,
        identifier: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("identifier", &self.identifier)
            .field("password", &"***")
            .finish()
    }
}

/// An authenticated API session.
///
/// Both tokens are guaranteed non-empty. A session is never refreshed; a new
/// run creates a new one.
#[derive(Clone, PartialEq)]
pub struct Session {
    balance: Option<Decimal>,
    cst: String,
    security_token: String,
}

impl Session {
    /// Create a session, rejecting empty tokens.
    pub fn new(
        balance: Option<Decimal>,
        cst: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let cst = cst.into();
        let security_token = security_token.into();

        if cst.is_empty() {
            return Err(ApiError::AuthFailure("missing CST token".into()));
        }
        if security_token.is_empty() {
            return Err(ApiError::AuthFailure("missing X-SECURITY-TOKEN".into()));
        }

        Ok(Self {
            balance,
            cst,
            security_token,
        })
    }

    /// Account balance reported at login, if the response carried one.
    pub fn balance(&self) -> Option<Decimal> {
        self.balance
    }

    /// The `CST` client session token.
    pub fn cst(&self) -> &str {
        &self.cst
    }

    /// The `X-SECURITY-TOKEN` account token.
    pub fn security_token(&self) -> &str {
        &self.security_token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("balance", &self.balance)
            .field("cst", &"***")
            .field("security_token", &"***")
            .finish()
    }
}
