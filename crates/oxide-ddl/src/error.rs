//! Error types for DDL generation.

use crate::schema::{ForeignKeyAction, SqlType};

/// Errors raised when a requested operation has no valid DDL in the target dialect.
///
/// Every variant is a usage or configuration error: none of them is transient,
/// and retrying the same request against the same adapter fails the same way.
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    /// The dialect has no representation for the abstract column type.
    #[error("{dialect} does not support the {sql_type} column type")]
    UnsupportedColumnType {
        /// Dialect name.
        dialect: &'static str,
        /// The rejected type.
        sql_type: SqlType,
    },

    /// The column type requires a length or precision and none was given.
    #[error("the {sql_type} column type requires a limit")]
    MissingRequiredLimit {
        /// Rendered base type, e.g. `RAW`.
        sql_type: String,
    },

    /// A limit was given to a column type that cannot take one.
    #[error("the {sql_type} column type does not accept a limit")]
    LimitNotSupported {
        /// Rendered base type.
        sql_type: String,
    },

    /// A limit of the wrong kind, or an out-of-range value, for the column type.
    #[error("invalid limit for the {sql_type} column type: {reason}")]
    InvalidLimit {
        /// Rendered base type.
        sql_type: String,
        /// What is wrong with the limit.
        reason: &'static str,
    },

    /// A default value was given to a column type that cannot take one.
    #[error("the {sql_type} column type does not accept a default value")]
    DefaultNotSupported {
        /// Rendered base type.
        sql_type: String,
    },

    /// A privilege was restricted to columns in a dialect that grants per table.
    #[error("{dialect} does not support granting {privilege} on individual columns")]
    UnsupportedGrantGranularity {
        /// Dialect name.
        dialect: &'static str,
        /// Privilege keyword, e.g. `SELECT`.
        privilege: &'static str,
    },

    /// The dialect refuses an explicit foreign key action clause.
    #[error("{dialect} does not support ON {clause} {action}")]
    UnsupportedForeignKeyAction {
        /// Dialect name.
        dialect: &'static str,
        /// `DELETE` or `UPDATE`.
        clause: &'static str,
        /// The rejected action.
        action: ForeignKeyAction,
    },

    /// The dialect does not enforce the requested constraint kind.
    #[error("{dialect} does not support {constraint} constraints")]
    UnsupportedConstraint {
        /// Dialect name.
        dialect: &'static str,
        /// Constraint keyword, e.g. `CHECK`.
        constraint: &'static str,
    },

    /// The adapter or request is misconfigured.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// IO error (reading configuration files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for DDL generation.
pub type Result<T> = std::result::Result<T, DdlError>;
