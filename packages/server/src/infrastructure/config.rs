//! Room catalog configuration.
//!
//! The catalog is a JSON array read at startup:
//!
//! ```json
//! [
//!   { "name": "Room 1" },
//!   { "name": "Admin Room", "password": "aqua" }
//! ]
//! ```
//!
//! When no file is given the built-in catalog (`Room 1`, `Room 2`, `Admin Room`) is used.

use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{AccessPolicy, RegistryError, Room, RoomName, RoomRegistry};

/// Default secret for the built-in `Admin Room`.
pub const DEFAULT_ADMIN_PASSWORD: &str = "aqua";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read room catalog '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse room catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("room name must not be empty")]
    EmptyRoomName,

    #[error("password for room '{0}' must not be empty")]
    EmptyPassword(String),

    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomConfig {
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl RoomConfig {
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: None,
        }
    }

    pub fn protected(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: Some(password.into()),
        }
    }

    fn into_room(self) -> Result<Room, ConfigError> {
        let name = RoomName::new(self.name).map_err(|_| ConfigError::EmptyRoomName)?;
        let policy = match self.password {
            None => AccessPolicy::Open,
            Some(password) if password.is_empty() => {
                return Err(ConfigError::EmptyPassword(name.into_string()));
            }
            Some(password) => AccessPolicy::plain_secret(password),
        };
        Ok(Room { name, policy })
    }
}

/// Built-in catalog.
pub fn default_catalog(admin_password: &str) -> Vec<RoomConfig> {
    vec![
        RoomConfig::open("Room 1"),
        RoomConfig::open("Room 2"),
        RoomConfig::protected("Admin Room", admin_password),
    ]
}

pub fn parse_catalog(json: &str) -> Result<Vec<RoomConfig>, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_catalog(path: &Path) -> Result<Vec<RoomConfig>, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&json)
}

/// Validate the catalog and build the registry.
pub fn build_registry(catalog: Vec<RoomConfig>) -> Result<RoomRegistry, ConfigError> {
    let rooms = catalog
        .into_iter()
        .map(RoomConfig::into_room)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RoomRegistry::new(rooms)?)
}

pub fn history_capacity(value: usize) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::new(value).ok_or(ConfigError::ZeroHistoryCapacity)
}
