//! Privileges for GRANT and REVOKE statements.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DdlError;

/// A privilege that can be granted on, or revoked from, a table.
///
/// The column-scoped kinds carry a column list; an empty list means the
/// whole table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "columns", rename_all = "snake_case")]
pub enum GrantPrivilegeType {
    /// ALL PRIVILEGES.
    All,
    /// ALTER.
    Alter,
    /// DELETE.
    Delete,
    /// INDEX.
    Index,
    /// TRIGGER.
    Trigger,
    /// USAGE.
    Usage,
    /// INSERT, optionally limited to columns.
    Insert(Vec<String>),
    /// REFERENCES, optionally limited to columns.
    References(Vec<String>),
    /// SELECT, optionally limited to columns.
    Select(Vec<String>),
    /// UPDATE, optionally limited to columns.
    Update(Vec<String>),
}

impl GrantPrivilegeType {
    /// SELECT on the whole table.
    #[must_use]
    pub const fn select() -> Self {
        Self::Select(Vec::new())
    }

    /// SELECT restricted to the given columns.
    #[must_use]
    pub fn select_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Select(columns.into_iter().map(Into::into).collect())
    }

    /// Returns the SQL keyword for this privilege.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::All => "ALL PRIVILEGES",
            Self::Alter => "ALTER",
            Self::Delete => "DELETE",
            Self::Index => "INDEX",
            Self::Trigger => "TRIGGER",
            Self::Usage => "USAGE",
            Self::Insert(_) => "INSERT",
            Self::References(_) => "REFERENCES",
            Self::Select(_) => "SELECT",
            Self::Update(_) => "UPDATE",
        }
    }

    /// Returns the column list; empty for table-wide kinds.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        match self {
            Self::All | Self::Alter | Self::Delete | Self::Index | Self::Trigger | Self::Usage => {
                &[]
            }
            Self::Insert(columns)
            | Self::References(columns)
            | Self::Select(columns)
            | Self::Update(columns) => columns,
        }
    }

    /// Returns whether the privilege is restricted to a subset of columns.
    #[must_use]
    pub fn is_column_scoped(&self) -> bool {
        !self.columns().is_empty()
    }
}

impl FromStr for GrantPrivilegeType {
    type Err = DdlError;

    /// Parses `select`, `update(a, b)`, `all`, and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, columns) = match s.split_once('(') {
            Some((kind, rest)) => {
                let list = rest.strip_suffix(')').ok_or_else(|| {
                    DdlError::InvalidConfiguration(format!("unterminated column list in '{s}'"))
                })?;
                let columns: Vec<String> = list
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect();
                (kind.trim(), columns)
            }
            None => (s, Vec::new()),
        };

        let privilege = match kind.to_ascii_lowercase().as_str() {
            "all" | "all privileges" => Self::All,
            "alter" => Self::Alter,
            "delete" => Self::Delete,
            "index" => Self::Index,
            "trigger" => Self::Trigger,
            "usage" => Self::Usage,
            "insert" => return Ok(Self::Insert(columns)),
            "references" => return Ok(Self::References(columns)),
            "select" => return Ok(Self::Select(columns)),
            "update" => return Ok(Self::Update(columns)),
            _ => {
                return Err(DdlError::InvalidConfiguration(format!(
                    "unknown privilege '{kind}'"
                )));
            }
        };

        if columns.is_empty() {
            Ok(privilege)
        } else {
            Err(DdlError::InvalidConfiguration(format!(
                "{} cannot be restricted to columns",
                privilege.keyword()
            )))
        }
    }
}
