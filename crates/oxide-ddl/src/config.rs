//! Adapter configuration.
//!
//! An [`AdapterConfig`] names the target [`Dialect`] and carries the few
//! knobs an adapter honors. It is built once at startup, either in code,
//! from command-line flags, or from a JSON file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DdlError, Result};

/// Target database products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Apache Derby.
    Derby,
    /// MySQL.
    Mysql,
    /// Oracle Database.
    Oracle,
    /// PostgreSQL.
    Postgres,
}

impl Dialect {
    /// Returns the dialect identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Derby => "derby",
            Self::Mysql => "mysql",
            Self::Oracle => "oracle",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = DdlError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "derby" => Ok(Self::Derby),
            "mysql" => Ok(Self::Mysql),
            "oracle" => Ok(Self::Oracle),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(DdlError::InvalidConfiguration(format!(
                "unknown dialect '{other}'"
            ))),
        }
    }
}

const fn default_render_no_action() -> bool {
    true
}

/// Configuration for one database adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Target dialect.
    pub dialect: Dialect,
    /// Schema used to qualify names when a call supplies none.
    #[serde(default)]
    pub default_schema: Option<String>,
    /// Whether `ON DELETE NO ACTION` is emitted explicitly.
    ///
    /// When false the clause is rendered empty, which leaves the server's
    /// implicit behavior in place.
    #[serde(default = "default_render_no_action")]
    pub render_no_action: bool,
}

impl AdapterConfig {
    /// Creates a configuration for the given dialect with defaults.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            default_schema: None,
            render_no_action: true,
        }
    }

    /// Sets the default schema.
    #[must_use]
    pub fn default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    /// Sets whether `NO ACTION` is rendered explicitly.
    #[must_use]
    pub const fn render_no_action(mut self, render: bool) -> Self {
        self.render_no_action = render;
        self
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Serialization`] on malformed JSON and
    /// [`DdlError::InvalidConfiguration`] on an empty schema name.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::Io`] if the file cannot be read, otherwise fails
    /// as [`AdapterConfig::from_json`].
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading adapter configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Returns the dialect-independent part of the configuration.
    #[must_use]
    pub fn settings(&self) -> AdapterSettings {
        AdapterSettings {
            default_schema: self.default_schema.clone(),
            render_no_action: self.render_no_action,
        }
    }

    /// Checks invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::InvalidConfiguration`] on an empty schema name.
    pub fn validate(&self) -> Result<()> {
        if matches!(self.default_schema, Some(ref schema) if schema.trim().is_empty()) {
            return Err(DdlError::InvalidConfiguration(
                "default_schema must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings every adapter holds, whatever its dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterSettings {
    /// Schema used to qualify names when a call supplies none.
    pub default_schema: Option<String>,
    /// Whether `NO ACTION` foreign key actions are emitted explicitly.
    pub render_no_action: bool,
}

impl AdapterSettings {
    /// Settings with the given default schema.
    #[must_use]
    pub fn with_schema(schema: impl Into<String>) -> Self {
        Self {
            default_schema: Some(schema.into()),
            ..Self::default()
        }
    }
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            default_schema: None,
            render_no_action: default_render_no_action(),
        }
    }
}
