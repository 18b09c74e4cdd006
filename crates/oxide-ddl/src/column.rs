//! Column definitions and their capabilities.
//!
//! A [`ColumnDefinition`] is what an adapter hands back for one abstract
//! column type. Whether the concrete type accepts a default value, or a
//! length/precision limit, is carried as a [`Capabilities`] value so that
//! dialects can combine them freely per type.

use crate::error::{DdlError, Result};
use crate::schema::Limit;

/// How a column type treats a length or precision limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitSupport {
    /// The type never takes a limit.
    Unsupported,
    /// The type renders bare when no limit is given.
    Optional,
    /// The dialect rejects the type without a limit.
    Required,
}

/// Which form of limit a column type takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitKind {
    /// A length, e.g. `VARCHAR2(64)`.
    Length,
    /// A precision and optional scale, e.g. `NUMBER(12, 2)`.
    Precision,
}

/// The optional behaviors a concrete column type claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    default: bool,
    limit: LimitSupport,
    limit_kind: LimitKind,
}

impl Capabilities {
    /// No optional behavior at all.
    pub const NONE: Self = Self {
        default: false,
        limit: LimitSupport::Unsupported,
        limit_kind: LimitKind::Length,
    };

    /// Accepts a default value, no limit. Most scalar types look like this.
    pub const DEFAULT: Self = Self::NONE.with_default();

    /// Adds the default-value capability.
    #[must_use]
    pub const fn with_default(self) -> Self {
        Self {
            default: true,
            ..self
        }
    }

    /// Sets how a length limit is treated.
    #[must_use]
    pub const fn with_limit(self, limit: LimitSupport) -> Self {
        Self {
            limit,
            limit_kind: LimitKind::Length,
            ..self
        }
    }

    /// Sets how a precision/scale limit is treated.
    #[must_use]
    pub const fn with_precision(self, limit: LimitSupport) -> Self {
        Self {
            limit,
            limit_kind: LimitKind::Precision,
            ..self
        }
    }

    /// Returns whether a default value is accepted.
    #[must_use]
    pub const fn supports_default(&self) -> bool {
        self.default
    }

    /// Returns how a limit is treated.
    #[must_use]
    pub const fn limit(&self) -> LimitSupport {
        self.limit
    }

    /// Returns which form of limit is accepted.
    #[must_use]
    pub const fn limit_kind(&self) -> LimitKind {
        self.limit_kind
    }
}

/// The rendered form of one column, prior to naming it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    sql_type: String,
    suffix: Option<String>,
    capabilities: Capabilities,
    limit: Option<Limit>,
    default: Option<String>,
    not_null: bool,
    primary_key: bool,
    unique: bool,
    check: Option<String>,
}

impl ColumnDefinition {
    /// Creates a column definition for a base SQL type fragment.
    #[must_use]
    pub fn new(sql_type: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            sql_type: sql_type.into(),
            suffix: None,
            capabilities,
            limit: None,
            default: None,
            not_null: false,
            primary_key: false,
            unique: false,
            check: None,
        }
    }

    /// Appends a fragment rendered after the limit (e.g. `FOR BIT DATA`).
    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Sets the length or precision/scale.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::LimitNotSupported`] if the type does not claim the
    /// limit capability, and [`DdlError::InvalidLimit`] if the limit is of
    /// the other kind, zero, or has a scale larger than its precision.
    pub fn with_limit(mut self, limit: Limit) -> Result<Self> {
        if self.capabilities.limit() == LimitSupport::Unsupported {
            return Err(DdlError::LimitNotSupported {
                sql_type: self.sql_type,
            });
        }
        let invalid = match (self.capabilities.limit_kind(), limit) {
            (LimitKind::Length, Limit::Precision { .. }) => {
                Some("expected a length, not a precision")
            }
            (LimitKind::Precision, Limit::Length(_)) => {
                Some("expected a precision, not a length")
            }
            (_, Limit::Length(0) | Limit::Precision { precision: 0, .. }) => {
                Some("must be greater than zero")
            }
            (
                _,
                Limit::Precision {
                    precision,
                    scale: Some(scale),
                },
            ) if scale > precision => Some("scale exceeds precision"),
            _ => None,
        };
        if let Some(reason) = invalid {
            return Err(DdlError::InvalidLimit {
                sql_type: self.sql_type,
                reason,
            });
        }
        self.limit = Some(limit);
        Ok(self)
    }

    /// Sets the default value expression, rendered verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::DefaultNotSupported`] if the type does not claim
    /// the default capability.
    pub fn with_default(mut self, expr: impl Into<String>) -> Result<Self> {
        if !self.capabilities.supports_default() {
            return Err(DdlError::DefaultNotSupported {
                sql_type: self.sql_type,
            });
        }
        self.default = Some(expr.into());
        Ok(self)
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Adds a UNIQUE constraint.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Adds a CHECK constraint expression.
    #[must_use]
    pub fn check(mut self, expr: impl Into<String>) -> Self {
        self.check = Some(expr.into());
        self
    }

    /// Returns the base type fragment, without limit or suffix.
    #[must_use]
    pub fn base_type(&self) -> &str {
        &self.sql_type
    }

    /// Returns the limit, if one was set.
    #[must_use]
    pub const fn limit(&self) -> Option<Limit> {
        self.limit
    }

    /// Returns the default value expression, if one was set.
    #[must_use]
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Returns whether the column is NOT NULL.
    #[must_use]
    pub const fn is_not_null(&self) -> bool {
        self.not_null
    }

    /// Returns whether the column is the primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Returns whether the column carries its own UNIQUE constraint.
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique && !self.primary_key
    }

    /// Returns the CHECK expression, if one was set.
    #[must_use]
    pub fn check_expression(&self) -> Option<&str> {
        self.check.as_deref()
    }

    /// Renders the type fragment, e.g. `NVARCHAR2(64)`.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::MissingRequiredLimit`] if the type requires a
    /// limit and none was set.
    pub fn sql_type(&self) -> Result<String> {
        let mut sql = self.sql_type.clone();
        match (self.limit, self.capabilities.limit()) {
            (Some(limit), _) => sql.push_str(&limit.to_sql()),
            (None, LimitSupport::Required) => {
                return Err(DdlError::MissingRequiredLimit {
                    sql_type: self.sql_type.clone(),
                });
            }
            (None, _) => {}
        }
        if let Some(ref suffix) = self.suffix {
            sql.push(' ');
            sql.push_str(suffix);
        }
        Ok(sql)
    }

    /// Renders the full column fragment under the given (already quoted) name.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`ColumnDefinition::sql_type`].
    pub fn to_sql(&self, name: &str) -> Result<String> {
        let mut parts = vec![name.to_string(), self.sql_type()?];

        if let Some(ref default) = self.default {
            parts.push(format!("DEFAULT {default}"));
        }
        if self.not_null {
            parts.push("NOT NULL".to_string());
        }
        if self.primary_key {
            parts.push("PRIMARY KEY".to_string());
        }
        if self.unique && !self.primary_key {
            parts.push("UNIQUE".to_string());
        }
        if let Some(ref check) = self.check {
            parts.push(format!("CHECK ({check})"));
        }

        Ok(parts.join(" "))
    }
}
