//! Process configuration read from the environment.

use dominoes_room::RoomConfig;
use serde::{Deserialize, Serialize};

use crate::DominoesError;

/// Listening port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Listening host when `DOMINOES_HOST` is unset.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Settings for the `dominoes-server` binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Fixed shuffle seed, for reproducing a reported deal.
    pub deal_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            deal_seed: None,
        }
    }
}

impl ServerConfig {
    /// Reads `PORT`, `DOMINOES_HOST` and `DOMINOES_DEAL_SEED`.
    ///
    /// # Errors
    /// [`DominoesError::Config`] if `PORT` or `DOMINOES_DEAL_SEED` is set
    /// but does not parse.
    pub fn from_env() -> Result<Self, DominoesError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DominoesError> {
        let host = lookup("DOMINOES_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| DominoesError::Config(format!("PORT={raw}")))?,
            None => DEFAULT_PORT,
        };

        let deal_seed = match lookup("DOMINOES_DEAL_SEED") {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| DominoesError::Config(format!("DOMINOES_DEAL_SEED={raw}")))?,
            ),
            None => None,
        };

        Ok(Self {
            host,
            port,
            deal_seed,
        })
    }

    /// `host:port`, ready for [`DominoesServerBuilder::bind`](crate::DominoesServerBuilder::bind).
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn room_config(&self) -> RoomConfig {
        RoomConfig {
            deal_seed: self.deal_seed,
        }
    }
}
