//! MySQL adapter.
//!
//! MySQL scopes index names to their table, takes a character set per
//! column, and does not enforce CHECK constraints.

use super::{DatabaseAdapter, TextEncoding};
use crate::column::{Capabilities, ColumnDefinition, LimitSupport};
use crate::config::AdapterSettings;
use crate::error::{DdlError, Result};
use crate::schema::{CharacterSet, SqlType};

/// Character set MySQL uses for full Unicode.
const UNICODE_CHARSET: &str = "utf8mb4";

/// Returns the unquoted text of one half of a `user@host` account, if it
/// is either quoted or a bare name.
fn account_part(part: &str) -> Option<&str> {
    for quote in ['\'', '`', '"'] {
        if let Some(inner) = part
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return (!inner.contains(quote)).then_some(inner);
        }
    }
    let bare = !part.is_empty()
        && part.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '-' | '%' | ':' | '/')
        });
    bare.then_some(part)
}

/// Renders a MySQL string literal.
fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

/// MySQL adapter.
#[derive(Debug, Clone, Default)]
pub struct MysqlAdapter {
    settings: AdapterSettings,
}

impl MysqlAdapter {
    /// Creates a new MySQL adapter.
    #[must_use]
    pub const fn new(settings: AdapterSettings) -> Self {
        Self { settings }
    }
}

impl DatabaseAdapter for MysqlAdapter {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn settings(&self) -> &AdapterSettings {
        &self.settings
    }

    fn column_type(&self, sql_type: SqlType, encoding: &TextEncoding) -> Result<ColumnDefinition> {
        let optional = Capabilities::DEFAULT.with_limit(LimitSupport::Optional);
        let required = Capabilities::DEFAULT.with_limit(LimitSupport::Required);

        let text = |name: &str, capabilities| -> Result<ColumnDefinition> {
            let definition = ColumnDefinition::new(name, capabilities);
            match encoding {
                TextEncoding::Explicit(charset) => {
                    if charset.is_empty()
                        || !charset.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                    {
                        return Err(DdlError::InvalidConfiguration(format!(
                            "'{charset}' is not a character set name"
                        )));
                    }
                    Ok(definition.with_suffix(format!("CHARACTER SET {charset}")))
                }
                TextEncoding::DatabaseDefault | TextEncoding::National => Ok(definition),
            }
        };

        Ok(match sql_type {
            SqlType::Bigint => ColumnDefinition::new("BIGINT", Capabilities::DEFAULT),
            SqlType::Integer => ColumnDefinition::new("INTEGER", Capabilities::DEFAULT),
            SqlType::Smallint => ColumnDefinition::new("SMALLINT", Capabilities::DEFAULT),
            SqlType::Decimal => ColumnDefinition::new(
                "DECIMAL",
                Capabilities::DEFAULT.with_precision(LimitSupport::Optional),
            ),
            SqlType::Char => text("CHAR", optional)?,
            SqlType::Varchar => text("VARCHAR", required)?,
            SqlType::Varbinary => ColumnDefinition::new("VARBINARY", required),
            SqlType::Blob => self.blob_column(),
            SqlType::Timestamp => self.timestamp_column(),
            SqlType::Boolean => ColumnDefinition::new("BOOLEAN", Capabilities::DEFAULT),
        })
    }

    fn text_encoding(&self, character_set: Option<&CharacterSet>) -> TextEncoding {
        match character_set {
            None => TextEncoding::DatabaseDefault,
            Some(CharacterSet::Unicode) => TextEncoding::Explicit(UNICODE_CHARSET.to_string()),
            Some(CharacterSet::Named(name)) => TextEncoding::Explicit(name.clone()),
        }
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn quote_index_name(&self, _schema: Option<&str>, index: &str) -> String {
        self.quote_identifier(index)
    }

    fn quote_grantee(&self, grantee: &str) -> Result<String> {
        // Accounts are 'user'@'host'; a bare name means any host.
        let malformed =
            || DdlError::InvalidConfiguration(format!("'{grantee}' is not a MySQL account"));
        match grantee.rsplit_once('@') {
            Some((user, host)) => {
                let user = account_part(user).ok_or_else(malformed)?;
                let host = account_part(host).ok_or_else(malformed)?;
                Ok(format!("{}@{}", string_literal(user), string_literal(host)))
            }
            None => Ok(string_literal(account_part(grantee).ok_or_else(malformed)?)),
        }
    }

    fn supports_check_constraints(&self) -> bool {
        false
    }

    fn alter_column_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        definition: &ColumnDefinition,
    ) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} MODIFY COLUMN {}",
            self.quote_table_name(schema, table),
            self.column_sql(column, definition)?
        ))
    }

    fn drop_index_sql(&self, schema: Option<&str>, table: &str, index: &str) -> String {
        format!(
            "DROP INDEX {} ON {}",
            self.quote_index_name(schema, index),
            self.quote_table_name(schema, table)
        )
    }

    fn drop_foreign_key_sql(&self, schema: Option<&str>, table: &str, name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP FOREIGN KEY {}",
            self.quote_table_name(schema, table),
            self.quote_identifier(name)
        )
    }

    fn lock_table_sql(&self, schema: Option<&str>, table: &str) -> String {
        format!("LOCK TABLES {} WRITE", self.quote_table_name(schema, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privilege::GrantPrivilegeType;
    use crate::schema::Limit;

    fn adapter() -> MysqlAdapter {
        MysqlAdapter::default()
    }

    fn varchar(charset: Option<&CharacterSet>) -> ColumnDefinition {
        adapter()
            .column_definition(SqlType::Varchar, charset)
            .unwrap()
            .with_limit(Limit::Length(64))
            .unwrap()
    }

    #[test]
    fn test_varchar_requires_length() {
        let col = adapter().column_definition(SqlType::Varchar, None).unwrap();
        assert!(matches!(
            col.sql_type(),
            Err(DdlError::MissingRequiredLimit { .. })
        ));
        assert_eq!(varchar(None).sql_type().unwrap(), "VARCHAR(64)");
    }

    #[test]
    fn test_character_sets_are_explicit() {
        assert_eq!(
            varchar(Some(&CharacterSet::Unicode)).sql_type().unwrap(),
            "VARCHAR(64) CHARACTER SET utf8mb4"
        );
        assert_eq!(
            varchar(Some(&CharacterSet::named("latin1")))
                .sql_type()
                .unwrap(),
            "VARCHAR(64) CHARACTER SET latin1"
        );
    }

    #[test]
    fn test_character_set_only_on_text() {
        let col = adapter()
            .column_definition(SqlType::Integer, Some(&CharacterSet::Unicode))
            .unwrap();
        assert_eq!(col.sql_type().unwrap(), "INTEGER");
    }

    #[test]
    fn test_blob_rejects_default() {
        let col = adapter().column_definition(SqlType::Blob, None).unwrap();
        assert!(matches!(
            col.with_default("''"),
            Err(DdlError::DefaultNotSupported { .. })
        ));
    }

    #[test]
    fn test_drop_index_qualified_by_table() {
        assert_eq!(
            adapter().drop_index_sql(Some("shop"), "users", "idx_users_email"),
            "DROP INDEX `idx_users_email` ON `shop`.`users`"
        );
    }

    #[test]
    fn test_create_index_unqualified() {
        assert_eq!(
            adapter()
                .create_index_sql(Some("shop"), "users", "idx_name", &["last", "first"], false)
                .unwrap(),
            "CREATE INDEX `idx_name` ON `shop`.`users` (`last`, `first`)"
        );
    }

    #[test]
    fn test_check_constraint_refused() {
        let col = adapter()
            .column_definition(SqlType::Integer, None)
            .unwrap()
            .check("qty >= 0");
        assert!(matches!(
            adapter().column_sql("qty", &col),
            Err(DdlError::UnsupportedConstraint {
                constraint: "CHECK",
                ..
            })
        ));
    }

    #[test]
    fn test_grant_to_accounts() {
        let sql = adapter()
            .grant_sql(
                None,
                "users",
                &["reporter", "'app'@'localhost'"],
                &[
                    GrantPrivilegeType::select_columns(["email"]),
                    GrantPrivilegeType::Insert(vec![]),
                ],
            )
            .unwrap();
        assert_eq!(
            sql,
            "GRANT SELECT (`email`), INSERT ON `users` TO 'reporter', 'app'@'localhost'"
        );
    }

    #[test]
    fn test_grantee_forms() {
        let a = adapter();
        assert_eq!(a.quote_grantee("app@localhost").unwrap(), "'app'@'localhost'");
        assert_eq!(a.quote_grantee("`app`@`10.0.%`").unwrap(), "'app'@'10.0.%'");
        assert_eq!(a.quote_grantee("\"o'neil\"@'%'").unwrap(), "'o''neil'@'%'");
    }

    #[test]
    fn test_malformed_grantee_refused() {
        let err = adapter()
            .grant_sql(
                None,
                "users",
                &["a@b TO x; DROP TABLE users; --"],
                &[GrantPrivilegeType::select()],
            )
            .unwrap_err();
        assert!(matches!(err, DdlError::InvalidConfiguration(_)));

        for grantee in ["", "app@", "'app'x@host", "rep orter"] {
            assert!(adapter().quote_grantee(grantee).is_err(), "{grantee}");
        }
    }

    #[test]
    fn test_character_set_name_checked() {
        let err = adapter()
            .column_definition(
                SqlType::Varchar,
                Some(&CharacterSet::named("latin1 COLLATE x; --")),
            )
            .unwrap_err();
        assert!(matches!(err, DdlError::InvalidConfiguration(_)));

        let col = adapter()
            .column_definition(SqlType::Integer, Some(&CharacterSet::named("latin1 --")))
            .unwrap();
        assert_eq!(col.sql_type().unwrap(), "INTEGER");
    }

    #[test]
    fn test_drop_foreign_key() {
        assert_eq!(
            adapter().drop_foreign_key_sql(None, "orders", "fk_orders_user"),
            "ALTER TABLE `orders` DROP FOREIGN KEY `fk_orders_user`"
        );
    }

    #[test]
    fn test_alter_column_and_lock() {
        let a = adapter();
        let col = varchar(Some(&CharacterSet::Unicode)).not_null();
        assert_eq!(
            a.alter_column_sql(None, "users", "nick", &col).unwrap(),
            "ALTER TABLE `users` MODIFY COLUMN `nick` VARCHAR(64) CHARACTER SET utf8mb4 NOT NULL"
        );
        assert_eq!(a.lock_table_sql(None, "users"), "LOCK TABLES `users` WRITE");
    }
}
