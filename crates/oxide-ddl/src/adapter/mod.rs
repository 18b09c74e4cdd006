//! Database adapters.
//!
//! [`DatabaseAdapter`] carries the common DDL policy in its provided
//! methods. Each dialect is a small struct that implements the required
//! methods and overrides only where its database disagrees with the
//! common default. [`adapter_for`] selects the implementation from an
//! [`AdapterConfig`].

mod derby;
mod mysql;
mod oracle;
mod postgres;

pub use derby::DerbyAdapter;
pub use mysql::MysqlAdapter;
pub use oracle::OracleAdapter;
pub use postgres::PostgresAdapter;

use std::fmt;

use tracing::{debug, warn};

use crate::column::{Capabilities, ColumnDefinition};
use crate::config::{AdapterConfig, AdapterSettings, Dialect};
use crate::error::{DdlError, Result};
use crate::privilege::GrantPrivilegeType;
use crate::schema::{CharacterSet, ForeignKey, ForeignKeyAction, SqlType};

/// How text columns should be encoded, after the dialect has interpreted a
/// [`CharacterSet`] request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEncoding {
    /// The database's default character set.
    DatabaseDefault,
    /// The dialect's national (Unicode) character types.
    National,
    /// An explicit per-column character set clause.
    Explicit(String),
}

/// Creates the adapter for the configured dialect.
#[must_use]
pub fn adapter_for(config: &AdapterConfig) -> Box<dyn DatabaseAdapter> {
    let settings = config.settings();
    match config.dialect {
        Dialect::Derby => Box::new(DerbyAdapter::new(settings)),
        Dialect::Mysql => Box::new(MysqlAdapter::new(settings)),
        Dialect::Oracle => Box::new(OracleAdapter::new(settings)),
        Dialect::Postgres => Box::new(PostgresAdapter::new(settings)),
    }
}

/// Renders `ON <clause> <action>` under the common policy.
///
/// `NO ACTION` is rendered empty when the adapter is configured not to
/// emit it; the server's implicit behavior is the same.
pub(crate) fn action_clause<A>(
    adapter: &A,
    clause: &str,
    action: Option<ForeignKeyAction>,
) -> String
where
    A: DatabaseAdapter + ?Sized,
{
    match action {
        None => String::new(),
        Some(ForeignKeyAction::NoAction) if !adapter.settings().render_no_action => String::new(),
        Some(action) => format!("ON {clause} {action}"),
    }
}

/// Renders `ADD ...` table actions for the constraints a column definition
/// carries, for dialects whose ALTER COLUMN cannot take them inline.
pub(crate) fn column_constraint_actions<A>(
    adapter: &A,
    column: &str,
    definition: &ColumnDefinition,
) -> Result<Vec<String>>
where
    A: DatabaseAdapter + ?Sized,
{
    let column = adapter.quote_identifier(column);
    let mut actions = Vec::new();
    if definition.is_primary_key() {
        actions.push(format!("ADD PRIMARY KEY ({column})"));
    }
    if definition.is_unique() {
        actions.push(format!("ADD UNIQUE ({column})"));
    }
    if let Some(check) = definition.check_expression() {
        if !adapter.supports_check_constraints() {
            return Err(DdlError::UnsupportedConstraint {
                dialect: adapter.name(),
                constraint: "CHECK",
            });
        }
        actions.push(format!("ADD CHECK ({check})"));
    }
    Ok(actions)
}

/// DDL generation for one database product.
///
/// Implementations hold configuration only and are safe to share across
/// threads.
pub trait DatabaseAdapter: fmt::Debug + Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the adapter settings.
    fn settings(&self) -> &AdapterSettings;

    /// Maps an abstract type to the dialect's column definition.
    ///
    /// The match over [`SqlType`] must be exhaustive in every dialect.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnsupportedColumnType`] when the dialect has no
    /// representation for the type.
    fn column_type(&self, sql_type: SqlType, encoding: &TextEncoding) -> Result<ColumnDefinition>;

    /// Generates SQL that changes an existing column to a new definition.
    ///
    /// Every part of the definition is applied: type, nullability, default
    /// and constraints. Dialects that allow one change per statement return
    /// several statements separated by `;\n`.
    ///
    /// # Errors
    ///
    /// Fails when any part of the definition cannot be rendered.
    fn alter_column_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        definition: &ColumnDefinition,
    ) -> Result<String>;

    /// Returns the schema used when a call supplies none.
    fn default_schema(&self) -> Option<&str> {
        self.settings().default_schema.as_deref()
    }

    /// Resolves a column definition for an abstract type and charset request.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnsupportedColumnType`] when the dialect has no
    /// representation for the type.
    fn column_definition(
        &self,
        sql_type: SqlType,
        character_set: Option<&CharacterSet>,
    ) -> Result<ColumnDefinition> {
        let encoding = self.text_encoding(character_set);
        let definition = self.column_type(sql_type, &encoding)?;
        debug!(
            "{}: resolved {} as {}",
            self.name(),
            sql_type,
            definition.base_type()
        );
        Ok(definition)
    }

    /// Interprets a character set request.
    ///
    /// The common policy knows only the database default and Unicode. A
    /// named character set is downgraded to the database default with a
    /// warning.
    fn text_encoding(&self, character_set: Option<&CharacterSet>) -> TextEncoding {
        match character_set {
            None => TextEncoding::DatabaseDefault,
            Some(CharacterSet::Unicode) => TextEncoding::National,
            Some(CharacterSet::Named(name)) => {
                warn!(
                    "Ignoring character set '{}': {} only supports the database default or Unicode",
                    name,
                    self.name()
                );
                TextEncoding::DatabaseDefault
            }
        }
    }

    /// Column definition for [`SqlType::Blob`].
    fn blob_column(&self) -> ColumnDefinition {
        ColumnDefinition::new("BLOB", Capabilities::NONE)
    }

    /// Column definition for [`SqlType::Timestamp`].
    fn timestamp_column(&self) -> ColumnDefinition {
        ColumnDefinition::new("TIMESTAMP", Capabilities::DEFAULT)
    }

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Converts an unquoted name to the case the database stores it in.
    fn unquoted_name(&self, name: &str) -> String {
        name.to_string()
    }

    /// Quotes an identifier (table name, column name, etc.).
    fn quote_identifier(&self, name: &str) -> String {
        let q = self.quote_char();
        let escaped = self
            .unquoted_name(name)
            .replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Quotes a table name, qualified by the given or default schema.
    fn quote_table_name(&self, schema: Option<&str>, table: &str) -> String {
        match schema.or_else(|| self.default_schema()) {
            Some(schema) => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(table)
            ),
            None => self.quote_identifier(table),
        }
    }

    /// Quotes an index name, qualified by the given or default schema.
    fn quote_index_name(&self, schema: Option<&str>, index: &str) -> String {
        self.quote_table_name(schema, index)
    }

    /// Quotes a grantee.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::InvalidConfiguration`] when the dialect cannot
    /// parse the grantee.
    fn quote_grantee(&self, grantee: &str) -> Result<String> {
        Ok(self.quote_identifier(grantee))
    }

    /// Returns whether CREATE INDEX may schema-qualify the index name.
    fn qualifies_created_index(&self) -> bool {
        true
    }

    /// Returns whether CHECK constraints are enforced.
    fn supports_check_constraints(&self) -> bool {
        true
    }

    /// Returns whether the privilege may be restricted to a subset of columns.
    fn supports_column_privilege(&self, _privilege: &GrantPrivilegeType) -> bool {
        true
    }

    /// Returns the function yielding the current timestamp.
    fn system_timestamp_function(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// Renders one column fragment, e.g. for CREATE TABLE.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnsupportedConstraint`] for a CHECK the dialect
    /// does not enforce, and fails when the type requires a missing limit.
    fn column_sql(&self, column: &str, definition: &ColumnDefinition) -> Result<String> {
        if definition.check_expression().is_some() && !self.supports_check_constraints() {
            return Err(DdlError::UnsupportedConstraint {
                dialect: self.name(),
                constraint: "CHECK",
            });
        }
        definition.to_sql(&self.quote_identifier(column))
    }

    /// Generates SQL for ADD COLUMN.
    ///
    /// # Errors
    ///
    /// Fails as [`DatabaseAdapter::column_sql`].
    fn add_column_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        definition: &ColumnDefinition,
    ) -> Result<String> {
        Ok(format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.quote_table_name(schema, table),
            self.column_sql(column, definition)?
        ))
    }

    /// Generates SQL for DROP COLUMN.
    fn remove_column_sql(&self, schema: Option<&str>, table: &str, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {}",
            self.quote_table_name(schema, table),
            self.quote_identifier(column)
        )
    }

    /// Generates SQL for CREATE INDEX.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::InvalidConfiguration`] when no columns are given.
    fn create_index_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        index: &str,
        columns: &[&str],
        unique: bool,
    ) -> Result<String> {
        if columns.is_empty() {
            return Err(DdlError::InvalidConfiguration(format!(
                "index '{index}' has no columns"
            )));
        }

        let mut sql = String::from("CREATE ");
        if unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str("INDEX ");
        if self.qualifies_created_index() {
            sql.push_str(&self.quote_index_name(schema, index));
        } else {
            sql.push_str(&self.quote_identifier(index));
        }
        sql.push_str(" ON ");
        sql.push_str(&self.quote_table_name(schema, table));
        sql.push_str(" (");
        sql.push_str(&self.quote_list(columns));
        sql.push(')');
        Ok(sql)
    }

    /// Generates SQL for DROP INDEX.
    fn drop_index_sql(&self, schema: Option<&str>, _table: &str, index: &str) -> String {
        format!("DROP INDEX {}", self.quote_index_name(schema, index))
    }

    /// Renders the ON DELETE clause, or empty text when none applies.
    fn on_delete_sql(&self, action: Option<ForeignKeyAction>) -> String {
        action_clause(self, "DELETE", action)
    }

    /// Renders the ON UPDATE clause, or empty text when none applies.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnsupportedForeignKeyAction`] in dialects that
    /// refuse the requested action.
    fn on_update_sql(&self, action: Option<ForeignKeyAction>) -> Result<String> {
        Ok(action_clause(self, "UPDATE", action))
    }

    /// Generates SQL for ADD CONSTRAINT ... FOREIGN KEY.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::InvalidConfiguration`] on empty or mismatched
    /// column lists, and fails as [`DatabaseAdapter::on_update_sql`].
    fn add_foreign_key_sql(&self, foreign_key: &ForeignKey) -> Result<String> {
        if foreign_key.columns.is_empty()
            || foreign_key.columns.len() != foreign_key.references_columns.len()
        {
            return Err(DdlError::InvalidConfiguration(format!(
                "foreign key '{}' must reference as many columns as it has",
                foreign_key.name
            )));
        }
        let on_update = self.on_update_sql(foreign_key.on_update)?;
        let on_delete = self.on_delete_sql(foreign_key.on_delete);

        let schema = foreign_key.schema.as_deref();
        let references_schema = foreign_key.references_schema.as_deref().or(schema);
        let columns: Vec<&str> = foreign_key.columns.iter().map(String::as_str).collect();
        let references: Vec<&str> = foreign_key
            .references_columns
            .iter()
            .map(String::as_str)
            .collect();

        let mut sql = format!(
            "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
            self.quote_table_name(schema, &foreign_key.table),
            self.quote_identifier(&foreign_key.name),
            self.quote_list(&columns),
            self.quote_table_name(references_schema, &foreign_key.references_table),
            self.quote_list(&references)
        );
        for clause in [on_delete, on_update] {
            if !clause.is_empty() {
                sql.push(' ');
                sql.push_str(&clause);
            }
        }
        Ok(sql)
    }

    /// Generates SQL for dropping a foreign key constraint.
    fn drop_foreign_key_sql(&self, schema: Option<&str>, table: &str, name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            self.quote_table_name(schema, table),
            self.quote_identifier(name)
        )
    }

    /// Generates SQL for GRANT.
    ///
    /// # Errors
    ///
    /// Returns [`DdlError::UnsupportedGrantGranularity`] when a privilege is
    /// restricted to columns the dialect cannot grant per column, and
    /// [`DdlError::InvalidConfiguration`] on empty grantee or privilege lists
    /// or a grantee the dialect cannot parse.
    fn grant_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        grantees: &[&str],
        privileges: &[GrantPrivilegeType],
    ) -> Result<String> {
        self.check_privileges(grantees, privileges)?;
        let grantees = self.grantees_sql(grantees)?;
        let sql = format!(
            "GRANT {} ON {} TO {}",
            self.privileges_sql(privileges),
            self.quote_table_name(schema, table),
            grantees
        );
        debug!("{}: {}", self.name(), sql);
        Ok(sql)
    }

    /// Generates SQL for REVOKE.
    ///
    /// # Errors
    ///
    /// Fails as [`DatabaseAdapter::grant_sql`].
    fn revoke_sql(
        &self,
        schema: Option<&str>,
        table: &str,
        grantees: &[&str],
        privileges: &[GrantPrivilegeType],
    ) -> Result<String> {
        self.check_privileges(grantees, privileges)?;
        let grantees = self.grantees_sql(grantees)?;
        let sql = format!(
            "REVOKE {} ON {} FROM {}",
            self.privileges_sql(privileges),
            self.quote_table_name(schema, table),
            grantees
        );
        debug!("{}: {}", self.name(), sql);
        Ok(sql)
    }

    /// Validates a GRANT/REVOKE request before anything is rendered.
    ///
    /// # Errors
    ///
    /// See [`DatabaseAdapter::grant_sql`].
    fn check_privileges(&self, grantees: &[&str], privileges: &[GrantPrivilegeType]) -> Result<()> {
        if grantees.is_empty() {
            return Err(DdlError::InvalidConfiguration(
                "at least one grantee is required".to_string(),
            ));
        }
        if privileges.is_empty() {
            return Err(DdlError::InvalidConfiguration(
                "at least one privilege is required".to_string(),
            ));
        }
        if let Some(privilege) = privileges
            .iter()
            .find(|p| p.is_column_scoped() && !self.supports_column_privilege(p))
        {
            return Err(DdlError::UnsupportedGrantGranularity {
                dialect: self.name(),
                privilege: privilege.keyword(),
            });
        }
        Ok(())
    }

    /// Renders a privilege list, e.g. `SELECT, UPDATE ("A", "B")`.
    fn privileges_sql(&self, privileges: &[GrantPrivilegeType]) -> String {
        privileges
            .iter()
            .map(|p| {
                let columns = p.columns();
                if columns.is_empty() {
                    p.keyword().to_string()
                } else {
                    let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
                    format!("{} ({})", p.keyword(), self.quote_list(&columns))
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Renders a grantee list.
    ///
    /// # Errors
    ///
    /// Fails as [`DatabaseAdapter::quote_grantee`].
    fn grantees_sql(&self, grantees: &[&str]) -> Result<String> {
        Ok(grantees
            .iter()
            .map(|g| self.quote_grantee(g))
            .collect::<Result<Vec<_>>>()?
            .join(", "))
    }

    /// Quotes and comma-joins identifiers.
    fn quote_list(&self, names: &[&str]) -> String {
        names
            .iter()
            .map(|n| self.quote_identifier(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Generates SQL that locks a table against concurrent writes.
    fn lock_table_sql(&self, schema: Option<&str>, table: &str) -> String {
        format!(
            "LOCK TABLE {} IN EXCLUSIVE MODE",
            self.quote_table_name(schema, table)
        )
    }
}
