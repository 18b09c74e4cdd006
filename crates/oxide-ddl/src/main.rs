//! oxide-ddl CLI
//!
//! Renders dialect-specific DDL fragments from the command line.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::prelude::*;

/// Render DDL for one database dialect.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Adapter configuration file (JSON).
    #[arg(short, long, env = "OXIDE_DDL_CONFIG")]
    config: Option<PathBuf>,

    /// Target dialect (derby, mysql, oracle, postgres); overrides the config file.
    #[arg(short, long, env = "OXIDE_DDL_DIALECT")]
    dialect: Option<Dialect>,

    /// Default schema; overrides the config file.
    #[arg(short, long, env = "OXIDE_DDL_SCHEMA")]
    schema: Option<String>,

    /// Render NO ACTION foreign key actions as empty text.
    #[arg(long)]
    omit_no_action: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a column definition.
    Column {
        /// Column name.
        name: String,

        /// Abstract column type.
        #[arg(short = 't', long = "type")]
        sql_type: SqlType,

        /// Character set (`unicode` or a dialect-specific name).
        #[arg(long)]
        charset: Option<CharacterSet>,

        /// Length limit.
        #[arg(short, long, conflicts_with = "precision")]
        limit: Option<u32>,

        /// Numeric precision.
        #[arg(short, long)]
        precision: Option<u32>,

        /// Numeric scale (requires --precision).
        #[arg(long, requires = "precision")]
        scale: Option<u32>,

        /// Default value expression.
        #[arg(long)]
        default: Option<String>,

        /// Add NOT NULL.
        #[arg(long)]
        not_null: bool,
    },

    /// Render DROP INDEX.
    DropIndex {
        /// Table owning the index.
        table: String,
        /// Index name.
        index: String,
    },

    /// Render GRANT.
    Grant {
        /// Table name.
        table: String,
        /// Grantee (repeatable).
        #[arg(short, long = "grantee", required = true)]
        grantees: Vec<String>,
        /// Privilege, e.g. `select` or `update(a,b)` (repeatable).
        #[arg(short, long = "privilege", required = true)]
        privileges: Vec<GrantPrivilegeType>,
    },

    /// Render REVOKE.
    Revoke {
        /// Table name.
        table: String,
        /// Grantee (repeatable).
        #[arg(short, long = "grantee", required = true)]
        grantees: Vec<String>,
        /// Privilege, e.g. `select` or `update(a,b)` (repeatable).
        #[arg(short, long = "privilege", required = true)]
        privileges: Vec<GrantPrivilegeType>,
    },

    /// Render the ON DELETE clause for a foreign key action.
    OnDelete {
        /// cascade, restrict, set-null or no-action; omitted means none.
        action: Option<ForeignKeyAction>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<AdapterConfig> {
    let mut config = match (&cli.config, cli.dialect) {
        (Some(path), dialect) => {
            let mut config = AdapterConfig::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            if let Some(dialect) = dialect {
                config.dialect = dialect;
            }
            config
        }
        (None, Some(dialect)) => AdapterConfig::new(dialect),
        (None, None) => bail!("either --config or --dialect is required"),
    };

    if let Some(ref schema) = cli.schema {
        config.default_schema = Some(schema.clone());
    }
    if cli.omit_no_action {
        config.render_no_action = false;
    }
    config.validate()?;
    Ok(config)
}

fn render(adapter: &dyn DatabaseAdapter, command: Commands) -> oxide_ddl::error::Result<String> {
    match command {
        Commands::Column {
            name,
            sql_type,
            charset,
            limit,
            precision,
            scale,
            default,
            not_null,
        } => {
            let mut definition = adapter.column_definition(sql_type, charset.as_ref())?;
            if let Some(n) = limit {
                definition = definition.with_limit(Limit::Length(n))?;
            }
            if let Some(precision) = precision {
                definition = definition.with_limit(Limit::Precision { precision, scale })?;
            }
            if let Some(expr) = default {
                definition = definition.with_default(expr)?;
            }
            if not_null {
                definition = definition.not_null();
            }
            adapter.column_sql(&name, &definition)
        }

        Commands::DropIndex { table, index } => Ok(adapter.drop_index_sql(None, &table, &index)),

        Commands::Grant {
            table,
            grantees,
            privileges,
        } => {
            let grantees: Vec<&str> = grantees.iter().map(String::as_str).collect();
            adapter.grant_sql(None, &table, &grantees, &privileges)
        }

        Commands::Revoke {
            table,
            grantees,
            privileges,
        } => {
            let grantees: Vec<&str> = grantees.iter().map(String::as_str).collect();
            adapter.revoke_sql(None, &table, &grantees, &privileges)
        }

        Commands::OnDelete { action } => Ok(adapter.on_delete_sql(action)),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout carries the DDL.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;
    debug!("Using {} adapter", config.dialect);
    let adapter = adapter_for(&config);

    let sql = render(adapter.as_ref(), cli.command)?;
    println!("{sql}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("oxide-ddl").chain(args.iter().copied())).unwrap()
    }

    fn run(args: &[&str]) -> anyhow::Result<String> {
        let cli = cli(args);
        let config = load_config(&cli)?;
        let adapter = adapter_for(&config);
        Ok(render(adapter.as_ref(), cli.command)?)
    }

    #[test]
    fn test_column() {
        assert_eq!(
            run(&[
                "--dialect", "oracle", "column", "--type", "varchar", "--charset", "unicode",
                "--limit", "64", "--not-null", "title",
            ])
            .unwrap(),
            "\"TITLE\" NVARCHAR2(64) NOT NULL"
        );
        assert_eq!(
            run(&[
                "--dialect", "postgres", "column", "-t", "decimal", "-p", "12", "--scale", "2",
                "--default", "0", "amount",
            ])
            .unwrap(),
            "\"amount\" DECIMAL(12, 2) DEFAULT 0"
        );
    }

    #[test]
    fn test_column_errors() {
        assert!(run(&["--dialect", "oracle", "column", "-t", "boolean", "flag"]).is_err());
        assert!(run(&["--dialect", "oracle", "column", "-t", "varbinary", "digest"]).is_err());
        assert!(run(&["--dialect", "oracle", "column", "-t", "decimal", "-l", "5", "n"]).is_err());
        assert!(Cli::try_parse_from([
            "oxide-ddl", "-d", "oracle", "column", "-t", "char", "-l", "2", "-p", "3", "c",
        ])
        .is_err());
    }

    #[test]
    fn test_drop_index() {
        assert_eq!(
            run(&["--dialect", "mysql", "--schema", "shop", "drop-index", "users", "idx_email"])
                .unwrap(),
            "DROP INDEX `idx_email` ON `shop`.`users`"
        );
    }

    #[test]
    fn test_grant_and_revoke() {
        assert_eq!(
            run(&[
                "--dialect", "oracle", "grant", "users", "-g", "reporter", "-p", "select", "-p",
                "update(email)",
            ])
            .unwrap(),
            "GRANT SELECT, UPDATE (\"EMAIL\") ON \"USERS\" TO \"REPORTER\""
        );
        assert!(run(&[
            "--dialect", "oracle", "grant", "users", "-g", "reporter", "-p", "select(email)",
        ])
        .is_err());
        assert_eq!(
            run(&["--dialect", "postgres", "revoke", "users", "-g", "reporter", "-p", "delete"])
                .unwrap(),
            "REVOKE DELETE ON \"users\" FROM \"reporter\""
        );
    }

    #[test]
    fn test_on_delete() {
        assert_eq!(run(&["--dialect", "oracle", "on-delete", "restrict"]).unwrap(), "");
        assert_eq!(
            run(&["--dialect", "postgres", "on-delete", "no-action"]).unwrap(),
            "ON DELETE NO ACTION"
        );
        assert_eq!(
            run(&["--dialect", "postgres", "--omit-no-action", "on-delete", "no-action"]).unwrap(),
            ""
        );
        assert_eq!(run(&["--dialect", "derby", "on-delete"]).unwrap(), "");
    }

    #[test]
    fn test_load_config_requires_a_dialect() {
        assert!(load_config(&cli(&["drop-index", "users", "idx"])).is_err());
        let blank_schema = cli(&["--dialect", "oracle", "--schema", " ", "drop-index", "t", "i"]);
        assert!(load_config(&blank_schema).is_err());
    }

    #[test]
    fn test_load_config_file_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"dialect": "mysql", "default_schema": "shop"}}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let config = load_config(&cli(&["--config", path, "on-delete"])).unwrap();
        assert_eq!(config, AdapterConfig::new(Dialect::Mysql).default_schema("shop"));

        let config = load_config(&cli(&[
            "--config", path, "--dialect", "oracle", "--omit-no-action", "on-delete",
        ]))
        .unwrap();
        assert_eq!(config.dialect, Dialect::Oracle);
        assert_eq!(config.default_schema.as_deref(), Some("shop"));
        assert!(!config.render_no_action);
    }

    #[test]
    fn test_load_config_missing_file() {
        let missing = cli(&["--config", "/nonexistent/adapter.json", "on-delete"]);
        assert!(load_config(&missing).is_err());
    }
}
