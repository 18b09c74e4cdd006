//! Apache Derby adapter.

use tracing::warn;

use super::{action_clause, column_constraint_actions, DatabaseAdapter, TextEncoding};
use crate::column::{Capabilities, ColumnDefinition, LimitSupport};
use crate::config::AdapterSettings;
use crate::error::{DdlError, Result};
use crate::schema::{CharacterSet, ForeignKeyAction, SqlType};

/// Apache Derby adapter.
#[derive(Debug, Clone, Default)]
pub struct DerbyAdapter {
    settings: AdapterSettings,
}

impl DerbyAdapter {
    /// Creates a new Derby adapter.
    #[must_use]
    pub const fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }
}

impl DatabaseAdapter for DerbyAdapter {
    fn name(&self) -> &'static str {
        "derby"
    }

    fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    fn column_type(&self, sql_type: SqlType, _encoding: &TextEncoding) -> Result<ColumnDefinition> {
        let optional = Capabilities::DEFAULT.with_limit(LimitSupport::Optional);
        let required = Capabilities::DEFAULT.with_limit(LimitSupport::Required);

        Ok(match sql_type {
            SqlType::Bigint => ColumnDefinition::new("BIGINT", Capabilities::DEFAULT),
            SqlType::Integer => ColumnDefinition::new("INTEGER", Capabilities::DEFAULT),
            SqlType::Smallint => ColumnDefinition::new("SMALLINT", Capabilities::DEFAULT),
            SqlType::Decimal => ColumnDefinition::new(
                "DECIMAL",
                Capabilities::DEFAULT.with_precision(LimitSupport::Optional),
            ),
            SqlType::Char => ColumnDefinition::new("CHAR", optional),
            SqlType::Varchar => ColumnDefinition::new("VARCHAR", required),
            SqlType::Varbinary => {
                ColumnDefinition::new("VARCHAR", required).with_suffix("FOR BIT DATA")
            }
            SqlType::Blob => self.blob_column(),
            SqlType::Timestamp => self.timestamp_column(),
            SqlType::Boolean => ColumnDefinition::new("BOOLEAN", Capabilities::DEFAULT),
        })
    }

    fn text_encoding(&self, character_set: Option<&CharacterSet>) -> TextEncoding {
        // Derby stores all character data as Unicode.
        if let Some(CharacterSet::Named(name)) = character_set {
            warn!("Ignoring character set '{name}': derby stores all character data as Unicode");
        }
        TextEncoding::DatabaseDefault
    }

    fn unquoted_name(&self, name: &str) -> String {
        name.to_uppercase()
    }

    fn alter_column_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        definition: &ColumnDefinition,
    ) -> Result<String> {
        let constraints = column_constraint_actions(self, column, definition)?;
        let table = self.quote_table_name(schema, table);
        let column = self.quote_identifier(column);

        // Derby takes one change per ALTER TABLE.
        let nullability = if definition.is_not_null() {
            "NOT NULL".to_string()
        } else {
            "NULL".to_string()
        };
        let default = definition
            .default_value()
            .map_or_else(|| "DROP DEFAULT".to_string(), |d| format!("DEFAULT {d}"));
        let changes = [
            format!("SET DATA TYPE {}", definition.sql_type()?),
            nullability,
            default,
        ];

        let statements: Vec<String> = changes
            .into_iter()
            .map(|change| format!("ALTER TABLE {table} ALTER COLUMN {column} {change}"))
            .chain(
                constraints
                    .into_iter()
                    .map(|action| format!("ALTER TABLE {table} {action}")),
            )
            .collect();
        Ok(statements.join(";\n"))
    }

    fn on_update_sql(&self, action: Option<ForeignKeyAction>) -> Result<String> {
        match action {
            Some(action @ (ForeignKeyAction::Cascade | ForeignKeyAction::SetNull)) => {
                Err(DdlError::UnsupportedForeignKeyAction {
                    dialect: self.name(),
                    clause: "UPDATE",
                    action,
                })
            }
            other => Ok(action_clause(self, "UPDATE", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::schema::{ForeignKey, Limit};

    fn adapter() -> DerbyAdapter {
        DerbyAdapter::default()
    }

    #[test]
    fn test_varbinary_is_bit_data() {
        let col = adapter()
            .column_definition(SqlType::Varbinary, None)
            .unwrap();
        assert!(col.sql_type().is_err());
        assert_eq!(
            col.with_limit(Limit::Length(16)).unwrap().sql_type().unwrap(),
            "VARCHAR(16) FOR BIT DATA"
        );
    }

    #[test]
    #[traced_test]
    fn test_named_character_set_warns() {
        let col = adapter()
            .column_definition(SqlType::Char, Some(&CharacterSet::named("cp1252")))
            .unwrap();
        assert_eq!(col.sql_type().unwrap(), "CHAR");
        assert!(logs_contain("Ignoring character set 'cp1252'"));
    }

    #[test]
    fn test_on_update() {
        let a = adapter();
        assert_eq!(
            a.on_update_sql(Some(ForeignKeyAction::Restrict)).unwrap(),
            "ON UPDATE RESTRICT"
        );
        assert_eq!(
            a.on_update_sql(Some(ForeignKeyAction::NoAction)).unwrap(),
            "ON UPDATE NO ACTION"
        );
        assert!(a.on_update_sql(Some(ForeignKeyAction::SetNull)).is_err());
    }

    #[test]
    fn test_on_delete_restrict_rendered() {
        assert_eq!(
            adapter().on_delete_sql(Some(ForeignKeyAction::Restrict)),
            "ON DELETE RESTRICT"
        );
    }

    #[test]
    fn test_foreign_key_with_schema() {
        let fk = ForeignKey::new("fk_lines_order", "order_lines", ["order_id"], "orders", ["id"])
            .schema("app")
            .on_delete(ForeignKeyAction::Cascade);
        assert_eq!(
            adapter().add_foreign_key_sql(&fk).unwrap(),
            "ALTER TABLE \"APP\".\"ORDER_LINES\" ADD CONSTRAINT \"FK_LINES_ORDER\" \
             FOREIGN KEY (\"ORDER_ID\") REFERENCES \"APP\".\"ORDERS\" (\"ID\") ON DELETE CASCADE"
        );
    }

    #[test]
    fn test_alter_column() {
        let a = adapter();
        let col = a
            .column_definition(SqlType::Varchar, None)
            .unwrap()
            .with_limit(Limit::Length(512))
            .unwrap();
        assert_eq!(
            a.alter_column_sql(None, "notes", "body", &col).unwrap(),
            "ALTER TABLE \"NOTES\" ALTER COLUMN \"BODY\" SET DATA TYPE VARCHAR(512);\n\
             ALTER TABLE \"NOTES\" ALTER COLUMN \"BODY\" NULL;\n\
             ALTER TABLE \"NOTES\" ALTER COLUMN \"BODY\" DROP DEFAULT"
        );
    }

    #[test]
    fn test_alter_column_applies_every_part() {
        let a = adapter();
        let col = a
            .column_definition(SqlType::Integer, None)
            .unwrap()
            .with_default("0")
            .unwrap()
            .not_null()
            .check("x > 0");
        let sql = a.alter_column_sql(None, "t", "x", &col).unwrap();
        let statements: Vec<&str> = sql.split(";\n").collect();
        assert_eq!(
            statements,
            [
                "ALTER TABLE \"T\" ALTER COLUMN \"X\" SET DATA TYPE INTEGER",
                "ALTER TABLE \"T\" ALTER COLUMN \"X\" NOT NULL",
                "ALTER TABLE \"T\" ALTER COLUMN \"X\" DEFAULT 0",
                "ALTER TABLE \"T\" ADD CHECK (x > 0)",
            ]
        );
    }

    #[test]
    fn test_alter_column_adds_keys() {
        let a = adapter();
        let col = a
            .column_definition(SqlType::Bigint, None)
            .unwrap()
            .not_null()
            .primary_key();
        let sql = a.alter_column_sql(Some("app"), "orders", "id", &col).unwrap();
        assert!(sql.ends_with(";\nALTER TABLE \"APP\".\"ORDERS\" ADD PRIMARY KEY (\"ID\")"));
        assert!(!sql.contains("UNIQUE"));
    }
}
