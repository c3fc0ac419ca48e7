//! oxide-sqlite3 CLI
//!
//! Command-line access to a SQLite database through the connector.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rusqlite::types::Value;
use serde_json::{Map, Value as Json};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_sql_core::builder::{InsertQuery, InsertRow, Limit, Param, SelectQuery};
use oxide_sql_core::dialect::Dialect;
use oxide_sql_sqlite3::config::{DEFAULT_DATABASE, KEY_ENV, PATH_ENV};
use oxide_sql_sqlite3::provision::prepare_db_dir;
use oxide_sql_sqlite3::{
    engine_version, require_supported_version, ConnectionConfig, QueryResult, Severity,
    SqliteConnector, SqliteDialect, MINIMUM_VERSION,
};

/// SQLite3 database access with typed parameter binding.
#[derive(Parser)]
#[command(name = "oxide-sqlite3")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON connection settings; replaces `--path`, `--database` and `--key`.
    ///
    /// The path and key environment variables still override the file.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the database file.
    #[arg(short, long, env = PATH_ENV, default_value = ".")]
    path: PathBuf,

    /// Database filename inside the directory.
    #[arg(short, long, default_value = DEFAULT_DATABASE)]
    database: String,

    /// Encryption key passed to the engine on connect.
    #[arg(long, env = KEY_ENV, hide_env_values = true)]
    key: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the engine version, prepare the directory and create the database.
    Init,

    /// Show the linked SQLite library version.
    Version,

    /// Run a statement and print its rows.
    Query {
        /// SQL text, with `?` placeholders.
        sql: String,

        /// Parameters as a JSON array, bound in order.
        #[arg(long)]
        params: Option<String>,
    },

    /// Insert rows given as a JSON object or an array of objects.
    Insert {
        /// Target table.
        table: String,

        /// Rows, e.g. `[{"a": 1, "b": "x"}, {"a": 2}]`.
        rows: String,
    },

    /// Select rows from a table.
    Select {
        /// Source table.
        table: String,

        /// Columns to select (all if not specified).
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,

        /// Maximum number of rows.
        #[arg(short, long)]
        limit: Option<u64>,

        /// Number of rows to skip.
        #[arg(short, long)]
        offset: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&cli)?;

    if let Commands::Version = cli.command {
        println!("{}", engine_version());
        return Ok(());
    }
    if let Commands::Init = cli.command {
        info!(minimum = MINIMUM_VERSION, "Checking SQLite library version...");
        require_supported_version(engine_version())?;
        prepare_db_dir(config.path())?;
    }

    let mut db = SqliteConnector::open(&config)
        .with_context(|| format!("cannot open {}", config.file_path().display()))?;

    match cli.command {
        Commands::Init => {
            info!("Database {} is ready.", config.file_path().display());
        }

        Commands::Version => {}

        Commands::Query { sql, params } => {
            let result = match params {
                Some(json) => {
                    let params = parse_params(&json)?;
                    db.prepared_query(&sql, &params, Severity::Error)?
                }
                None => db.query(&sql, Severity::Error)?,
            };
            print_result(&result)?;
            if result.columns().is_empty() {
                info!("{} row(s) affected.", db.affected_rows()?);
            }
        }

        Commands::Insert { table, rows } => {
            let query = parse_rows(db.dialect(), &table, &rows)?;
            let inserted = db.insert(&query, Severity::Error)?;
            info!("Inserted {inserted} row(s), last id {}.", db.generated_id()?);
        }

        Commands::Select {
            table,
            columns,
            limit,
            offset,
        } => {
            let dialect = *db.dialect();
            let quoted: Vec<String> = columns
                .iter()
                .map(|c| dialect.quote_identifier(c))
                .collect();
            let selected: Vec<&str> = if quoted.is_empty() {
                vec!["*"]
            } else {
                quoted.iter().map(String::as_str).collect()
            };

            let mut query =
                SelectQuery::from_table(&dialect.quote_identifier(&table)).columns(&selected);
            if limit.is_some() || offset.is_some() {
                query = query.limit(Limit::range(limit, offset));
            }
            let result = db.select(&query, Severity::Error)?;
            print_result(&result)?;
        }
    }

    db.unload_database()?;
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<ConnectionConfig> {
    if let Some(file) = &cli.config {
        let json = fs::read_to_string(file)
            .with_context(|| format!("cannot read {}", file.display()))?;
        return Ok(ConnectionConfig::from_json(&json)?.apply_env_overrides());
    }
    let mut config = ConnectionConfig::new(&cli.path, &cli.database)?;
    if let Some(key) = &cli.key {
        config = config.with_key(key);
    }
    Ok(config)
}

fn parse_params(json: &str) -> anyhow::Result<Vec<Param>> {
    match serde_json::from_str::<Json>(json).context("--params must be valid JSON")? {
        Json::Array(items) => Ok(items.into_iter().map(Param::from).collect()),
        other => bail!("--params must be a JSON array, got {other}"),
    }
}

fn parse_rows(dialect: &SqliteDialect, table: &str, json: &str) -> anyhow::Result<InsertQuery> {
    let objects = match serde_json::from_str::<Json>(json).context("rows must be valid JSON")? {
        Json::Object(row) => vec![row],
        Json::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Json::Object(row) => Ok(row),
                other => bail!("each row must be a JSON object, got {other}"),
            })
            .collect::<anyhow::Result<Vec<Map<String, Json>>>>()?,
        other => bail!("rows must be a JSON object or array, got {other}"),
    };

    let mut query = InsertQuery::into_table(&dialect.quote_identifier(table));
    for object in objects {
        let row = object.into_iter().fold(InsertRow::new(), |row, (column, value)| {
            row.set(&dialect.quote_identifier(&column), Param::from(value))
        });
        query.push_row(row);
    }
    Ok(query)
}

fn to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Integer(i) => Json::from(*i),
        Value::Real(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
        Value::Text(s) => Json::from(s.as_str()),
        Value::Blob(b) => Json::from(b.iter().fold(String::new(), |mut hex, byte| {
            let _ = write!(hex, "{byte:02x}");
            hex
        })),
    }
}

fn print_result(result: &QueryResult) -> anyhow::Result<()> {
    for record in result.records() {
        let object: Map<String, Json> = record
            .iter()
            .map(|(column, value)| (column.to_owned(), to_json(value)))
            .collect();
        println!("{}", serde_json::to_string(&object)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rows_quotes_columns() {
        let dialect = SqliteDialect::compact();
        let query = parse_rows(&dialect, "log", r#"[{"order": 1}, {"a)b": "x"}]"#).unwrap();

        let (sql, params) = dialect.build_insert(&query).unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "log" ("order", "a)b") SELECT ?, ? UNION ALL SELECT ?, ?"#
        );
        assert_eq!(params.len(), 4);
        assert!(params[1].is_null());
    }

    #[test]
    fn test_parse_rows_rejects_scalars() {
        let dialect = SqliteDialect::new();
        assert!(parse_rows(&dialect, "t", "[1, 2]").is_err());
        assert!(parse_rows(&dialect, "t", "\"row\"").is_err());
    }

    #[test]
    fn test_blob_renders_as_hex() {
        assert_eq!(to_json(&Value::Blob(vec![0x00, 0xab, 0x10])), Json::from("00ab10"));
    }

    #[test]
    fn test_config_file_replaces_flags() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("db.json");
        fs::write(&file, r#"{"path": "/srv/data", "database": "site.sqlite"}"#).unwrap();

        let cli = Cli::try_parse_from([
            "oxide-sqlite3",
            "--database",
            "ignored.sqlite",
            "--config",
            file.to_str().unwrap(),
            "version",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.database(), "site.sqlite");
    }
}
