//! Dialect adapters for portable schema migrations.
//!
//! `oxide-ddl` turns a database-agnostic description of schema changes
//! (column types, indexes, grants, foreign key actions) into DDL text for
//! one concrete database. Each database's quirks live in its adapter as
//! explicit policy:
//! - Column types resolve to a [`ColumnDefinition`](column::ColumnDefinition)
//!   whose capabilities decide whether it takes a default or a limit
//! - Requests with no valid expression in the dialect fail with a
//!   [`DdlError`](error::DdlError) before any text is produced
//! - Adapters hold configuration only and can be shared across threads
//!
//! Executing the DDL, tracking applied migrations and connection handling
//! belong to the caller.
//!
//! # Example
//!
//! ```rust
//! use oxide_ddl::prelude::*;
//!
//! let adapter = adapter_for(&AdapterConfig::new(Dialect::Oracle).default_schema("app"));
//!
//! let id = adapter.column_definition(SqlType::Bigint, None)?.primary_key();
//! assert_eq!(adapter.column_sql("id", &id)?, "\"ID\" NUMBER(19, 0) PRIMARY KEY");
//!
//! let name = adapter
//!     .column_definition(SqlType::Varchar, Some(&CharacterSet::Unicode))?
//!     .with_limit(Limit::Length(100))?;
//! assert_eq!(name.sql_type()?, "NVARCHAR2(100)");
//!
//! let grant = adapter.grant_sql(None, "users", &["reporter"], &[GrantPrivilegeType::select()])?;
//! assert_eq!(grant, "GRANT SELECT ON \"APP\".\"USERS\" TO \"REPORTER\"");
//!
//! assert_eq!(adapter.on_delete_sql(Some(ForeignKeyAction::Restrict)), "");
//! # Ok::<(), oxide_ddl::error::DdlError>(())
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Render a column type
//! oxide-ddl --dialect oracle column --type varchar --charset unicode --limit 64 title
//!
//! # Render a grant
//! oxide-ddl --dialect oracle grant users --grantee reporter --privilege select
//!
//! # Read the adapter configuration from a file
//! oxide-ddl --config adapter.json drop-index users idx_users_email
//! ```

pub mod adapter;
pub mod column;
pub mod config;
pub mod error;
pub mod privilege;
pub mod schema;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::adapter::{
        adapter_for, DatabaseAdapter, DerbyAdapter, MysqlAdapter, OracleAdapter,
        PostgresAdapter, TextEncoding,
    };
    pub use crate::column::{Capabilities, ColumnDefinition, LimitKind, LimitSupport};
    pub use crate::config::{AdapterConfig, AdapterSettings, Dialect};
    pub use crate::error::{DdlError, Result};
    pub use crate::privilege::GrantPrivilegeType;
    pub use crate::schema::{CharacterSet, ForeignKey, ForeignKeyAction, Limit, SqlType};
}
