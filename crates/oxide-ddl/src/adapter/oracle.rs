//! Oracle adapter.
//!
//! Oracle has no integer types of its own, so the integer family maps onto
//! `NUMBER` with the smallest precision that holds the full signed range.
//! It has no boolean type and no `ON UPDATE` clause, refuses an explicit
//! `ON DELETE RESTRICT` even though that is its implicit behavior, and
//! cannot grant SELECT on individual columns.

use super::{action_clause, DatabaseAdapter, TextEncoding};
use crate::column::{Capabilities, ColumnDefinition, LimitSupport};
use crate::config::AdapterSettings;
use crate::error::{DdlError, Result};
use crate::privilege::GrantPrivilegeType;
use crate::schema::{ForeignKeyAction, SqlType};

/// Oracle Database adapter.
#[derive(Debug, Clone, Default)]
pub struct OracleAdapter {
    settings: AdapterSettings,
}

impl OracleAdapter {
    /// Creates a new Oracle adapter.
    #[must_use]
    pub const fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }
}

impl DatabaseAdapter for OracleAdapter {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    fn column_type(&self, sql_type: SqlType, encoding: &TextEncoding) -> Result<ColumnDefinition> {
        let national = matches!(encoding, TextEncoding::National);
        let sized = Capabilities::DEFAULT.with_limit(LimitSupport::Optional);

        let definition = match sql_type {
            // NUMBER(19, 0) is the narrowest NUMBER holding i64::MIN..=i64::MAX.
            SqlType::Bigint => ColumnDefinition::new("NUMBER(19, 0)", Capabilities::DEFAULT),
            SqlType::Integer => ColumnDefinition::new("NUMBER(10, 0)", Capabilities::DEFAULT),
            SqlType::Smallint => ColumnDefinition::new("NUMBER(5, 0)", Capabilities::DEFAULT),
            SqlType::Decimal => ColumnDefinition::new(
                "NUMBER",
                Capabilities::DEFAULT.with_precision(LimitSupport::Optional),
            ),
            SqlType::Char => ColumnDefinition::new(if national { "NCHAR" } else { "CHAR" }, sized),
            SqlType::Varchar => {
                ColumnDefinition::new(if national { "NVARCHAR2" } else { "VARCHAR2" }, sized)
            }
            SqlType::Varbinary => ColumnDefinition::new(
                "RAW",
                Capabilities::DEFAULT.with_limit(LimitSupport::Required),
            ),
            // Oracle takes DEFAULT EMPTY_BLOB().
            SqlType::Blob => ColumnDefinition::new("BLOB", Capabilities::DEFAULT),
            SqlType::Timestamp => self.timestamp_column(),
            SqlType::Boolean => {
                return Err(DdlError::UnsupportedColumnType {
                    dialect: self.name(),
                    sql_type,
                });
            }
        };
        Ok(definition)
    }

    fn unquoted_name(&self, name: &str) -> String {
        name.to_uppercase()
    }

    fn system_timestamp_function(&self) -> &'static str {
        "SYSTIMESTAMP"
    }

    fn supports_column_privilege(&self, privilege: &GrantPrivilegeType) -> bool {
        !matches!(privilege, GrantPrivilegeType::Select(_))
    }

    fn add_column_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        definition: &ColumnDefinition,
    ) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ADD {}",
            self.quote_table_name(schema, table),
            self.column_sql(column, definition)?
        ))
    }

    fn alter_column_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        definition: &ColumnDefinition,
    ) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} MODIFY ({})",
            self.quote_table_name(schema, table),
            self.column_sql(column, definition)?
        ))
    }

    fn on_delete_sql(&self, action: Option<ForeignKeyAction>) -> String {
        match action {
            Some(ForeignKeyAction::Restrict) => String::new(),
            // NO ACTION passes through unless render_no_action is off.
            other => action_clause(self, "DELETE", other),
        }
    }

    fn on_update_sql(&self, action: Option<ForeignKeyAction>) -> Result<String> {
        match action {
            None | Some(ForeignKeyAction::Restrict) => Ok(String::new()),
            Some(action) => Err(DdlError::UnsupportedForeignKeyAction {
                dialect: self.name(),
                clause: "UPDATE",
                action,
            }),
        }
    }
}
