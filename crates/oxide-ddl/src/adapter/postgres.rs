//! PostgreSQL adapter.

use tracing::{debug, warn};

use super::{column_constraint_actions, DatabaseAdapter, TextEncoding};
use crate::column::{Capabilities, ColumnDefinition, LimitSupport};
use crate::config::AdapterSettings;
use crate::error::Result;
use crate::schema::{CharacterSet, SqlType};

/// PostgreSQL adapter.
#[derive(Debug, Clone, Default)]
pub struct PostgresAdapter {
    settings: AdapterSettings,
}

impl PostgresAdapter {
    /// Creates a new PostgreSQL adapter.
    #[must_use]
    pub const fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }
}

impl DatabaseAdapter for PostgresAdapter {
    fn name(&self) -> &'static str {
        "postgresql"
    }

    fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    fn column_type(&self, sql_type: SqlType, _encoding: &TextEncoding) -> Result<ColumnDefinition> {
        let sized = Capabilities::DEFAULT.with_limit(LimitSupport::Optional);

        Ok(match sql_type {
            SqlType::Bigint => ColumnDefinition::new("BIGINT", Capabilities::DEFAULT),
            SqlType::Integer => ColumnDefinition::new("INTEGER", Capabilities::DEFAULT),
            SqlType::Smallint => ColumnDefinition::new("SMALLINT", Capabilities::DEFAULT),
            SqlType::Decimal => ColumnDefinition::new(
                "DECIMAL",
                Capabilities::DEFAULT.with_precision(LimitSupport::Optional),
            ),
            SqlType::Char => ColumnDefinition::new("CHAR", sized),
            SqlType::Varchar => ColumnDefinition::new("VARCHAR", sized),
            // PostgreSQL uses BYTEA for all binary data, without a length.
            SqlType::Varbinary | SqlType::Blob => {
                ColumnDefinition::new("BYTEA", Capabilities::DEFAULT)
            }
            SqlType::Timestamp => self.timestamp_column(),
            SqlType::Boolean => ColumnDefinition::new("BOOLEAN", Capabilities::DEFAULT),
        })
    }

    fn text_encoding(&self, character_set: Option<&CharacterSet>) -> TextEncoding {
        // The encoding is fixed per database; there is no per-column clause.
        match character_set {
            None => {}
            Some(CharacterSet::Unicode) => {
                debug!("postgresql: Unicode columns use the database encoding");
            }
            Some(CharacterSet::Named(name)) => {
                warn!(
                    "Ignoring character set '{name}': postgresql columns use the database encoding"
                );
            }
        }
        TextEncoding::DatabaseDefault
    }

    fn unquoted_name(&self, name: &str) -> String {
        name.to_lowercase()
    }

    fn qualifies_created_index(&self) -> bool {
        // The index always lives in its table's schema.
        false
    }

    fn alter_column_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        definition: &ColumnDefinition,
    ) -> Result<String> {
        let constraints = column_constraint_actions(self, column, definition)?;
        let column = self.quote_identifier(column);
        let mut actions = vec![format!(
            "ALTER COLUMN {} TYPE {}",
            column,
            definition.sql_type()?
        )];

        if definition.is_not_null() {
            actions.push(format!("ALTER COLUMN {column} SET NOT NULL"));
        } else {
            actions.push(format!("ALTER COLUMN {column} DROP NOT NULL"));
        }

        actions.push(definition.default_value().map_or_else(
            || format!("ALTER COLUMN {column} DROP DEFAULT"),
            |default| format!("ALTER COLUMN {column} SET DEFAULT {default}"),
        ));
        actions.extend(constraints);

        Ok(format!(
            "ALTER TABLE {} {}",
            self.quote_table_name(schema, table),
            actions.join(", ")
        ))
    }
}
