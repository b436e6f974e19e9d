//! Client options.

use serde::{Deserialize, Serialize};

/// Environment variable read by [`Options::from_env`].
pub const DEBUG_ENV: &str = "HTTPCLIENT_DEBUG";

/// Behaviour switches for a [`crate::Client`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Dump raw requests and responses to the client's debug sink.
    pub debug: bool,
}

impl Options {
    pub fn from_env() -> Self {
        let debug = std::env::var(DEBUG_ENV)
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Self { debug }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
