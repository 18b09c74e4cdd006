//! Abstract schema vocabulary.
//!
//! These types describe what a migration asks for, independent of any
//! database product. Adapters translate them into dialect-specific DDL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DdlError;

/// Abstract column types a migration can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    /// Signed 64-bit integer.
    Bigint,
    /// Binary large object.
    Blob,
    /// True/false.
    Boolean,
    /// Fixed-length character string.
    Char,
    /// Fixed-point decimal.
    Decimal,
    /// Signed 32-bit integer.
    Integer,
    /// Signed 16-bit integer.
    Smallint,
    /// Date and time.
    Timestamp,
    /// Variable-length binary data.
    Varbinary,
    /// Variable-length character string.
    Varchar,
}

impl SqlType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Bigint,
        Self::Blob,
        Self::Boolean,
        Self::Char,
        Self::Decimal,
        Self::Integer,
        Self::Smallint,
        Self::Timestamp,
        Self::Varbinary,
        Self::Varchar,
    ];

    /// Returns the lowercase identifier used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bigint => "bigint",
            Self::Blob => "blob",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
            Self::Smallint => "smallint",
            Self::Timestamp => "timestamp",
            Self::Varbinary => "varbinary",
            Self::Varchar => "varchar",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlType {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| DdlError::InvalidConfiguration(format!("unknown column type '{s}'")))
    }
}

/// A requested text encoding for a character column.
///
/// "No preference" is expressed as `None` wherever an `Option<&CharacterSet>`
/// is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterSet {
    /// The generic Unicode character set.
    Unicode,
    /// A dialect-specific character set name, e.g. `latin1`.
    Named(String),
}

impl CharacterSet {
    /// Creates a named character set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode => f.write_str("Unicode"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for CharacterSet {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(DdlError::InvalidConfiguration(
                "character set name must not be empty".to_string(),
            )),
            name if name.eq_ignore_ascii_case("unicode") => Ok(Self::Unicode),
            name => Ok(Self::named(name)),
        }
    }
}

/// Length or precision/scale attached to a column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Limit {
    /// Character or byte length, rendered as `(n)`.
    Length(u32),
    /// Numeric precision with optional scale, rendered as `(p)` or `(p, s)`.
    Precision {
        /// Total number of digits.
        precision: u32,
        /// Digits right of the decimal point.
        scale: Option<u32>,
    },
}

impl Limit {
    /// Returns the parenthesized SQL suffix.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Length(n) => format!("({n})"),
            Self::Precision {
                precision,
                scale: Some(s),
            } => format!("({precision}, {s})"),
            Self::Precision {
                precision,
                scale: None,
            } => format!("({precision})"),
        }
    }
}

/// Foreign key action (ON DELETE, ON UPDATE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyAction {
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Refuse the delete/update while referencing rows exist, checked immediately.
    Restrict,
    /// Set the foreign key column to NULL.
    SetNull,
    /// Refuse the delete/update while referencing rows exist, checked at statement end.
    NoAction,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of this action.
    #[must_use]
    pub const fn to_sql(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for ForeignKeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_sql())
    }
}

impl FromStr for ForeignKeyAction {
    type Err = DdlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "cascade" => Ok(Self::Cascade),
            "restrict" => Ok(Self::Restrict),
            "set_null" => Ok(Self::SetNull),
            "no_action" => Ok(Self::NoAction),
            _ => Err(DdlError::InvalidConfiguration(format!(
                "unknown foreign key action '{s}'"
            ))),
        }
    }
}

/// A foreign key constraint to add to an existing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Schema of the referencing table; the adapter default applies when absent.
    pub schema: Option<String>,
    /// Referencing table.
    pub table: String,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Schema of the referenced table; falls back to `schema`.
    pub references_schema: Option<String>,
    /// Referenced table.
    pub references_table: String,
    /// Referenced columns.
    pub references_columns: Vec<String>,
    /// Action on delete of the referenced row.
    pub on_delete: Option<ForeignKeyAction>,
    /// Action on update of the referenced key.
    pub on_update: Option<ForeignKeyAction>,
}

impl ForeignKey {
    /// Creates a foreign key from `table.columns` to `references_table.references_columns`.
    #[must_use]
    pub fn new<C, R>(
        name: impl Into<String>,
        table: impl Into<String>,
        columns: C,
        references_table: impl Into<String>,
        references_columns: R,
    ) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            name: name.into(),
            schema: None,
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            references_schema: None,
            references_table: references_table.into(),
            references_columns: references_columns.into_iter().map(Into::into).collect(),
            on_delete: None,
            on_update: None,
        }
    }

    /// Sets the schema.
    #[must_use]
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Sets the schema of the referenced table.
    #[must_use]
    pub fn references_schema(mut self, schema: impl Into<String>) -> Self {
        self.references_schema = Some(schema.into());
        self
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub const fn on_delete(mut self, action: ForeignKeyAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub const fn on_update(mut self, action: ForeignKeyAction) -> Self {
        self.on_update = Some(action);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_type_parse() {
        for t in SqlType::ALL {
            assert_eq!(t.as_str().parse::<SqlType>().unwrap(), t);
        }
        assert_eq!("VARCHAR".parse::<SqlType>().unwrap(), SqlType::Varchar);
        assert!(matches!(
            "text".parse::<SqlType>(),
            Err(DdlError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_character_set_parse() {
        assert_eq!(
            "unicode".parse::<CharacterSet>().unwrap(),
            CharacterSet::Unicode
        );
        assert_eq!(
            "latin1".parse::<CharacterSet>().unwrap(),
            CharacterSet::named("latin1")
        );
        assert!("  ".parse::<CharacterSet>().is_err());
    }

    #[test]
    fn test_limit_sql() {
        assert_eq!(Limit::Length(16).to_sql(), "(16)");
        assert_eq!(
            Limit::Precision {
                precision: 10,
                scale: Some(2)
            }
            .to_sql(),
            "(10, 2)"
        );
        assert_eq!(
            Limit::Precision {
                precision: 8,
                scale: None
            }
            .to_sql(),
            "(8)"
        );
    }

    #[test]
    fn test_foreign_key_action() {
        assert_eq!(ForeignKeyAction::SetNull.to_sql(), "SET NULL");
        assert_eq!(
            "no-action".parse::<ForeignKeyAction>().unwrap(),
            ForeignKeyAction::NoAction
        );
        assert_eq!(
            "SET NULL".parse::<ForeignKeyAction>().unwrap(),
            ForeignKeyAction::SetNull
        );
        assert!("set default".parse::<ForeignKeyAction>().is_err());
    }
}
