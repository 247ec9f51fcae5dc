use clap::{Parser, Subcommand};
use colored::Colorize;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use querycheck_core::{Config, Report, Severity};
use querycheck_sql::{format_execution_failure, KnownSchema, QueryChecker};
use querycheck_catalog::{DatabaseAdapter, SqliteAdapter};
use querycheck_engine::{QueryGuide, QueryOutcome, QueryTool, SchemaInspector, StatementBatch};

/// Default config file, looked up in the working directory
const CONFIG_FILE: &str = "querycheck.toml";

/// QueryCheck - pre-flight checks and error hints for SQL against the paint catalog
#[derive(Parser)]
#[command(name = "querycheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: querycheck.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Known tables, comma-separated (skips the store's table listing)
    #[arg(long, global = true, value_delimiter = ',')]
    tables: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check statements for unknown tables and synonyms without running them
    Check {
        /// Statement to check
        #[arg(conflicts_with = "file", required_unless_present = "file")]
        sql: Option<String>,

        /// SQL file with one or more `;`-separated statements
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output file for report.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Explain a store error message with remediation hints
    Explain {
        /// Error message returned by the store
        #[arg(short, long)]
        error: String,

        /// Statement that produced the error
        #[arg(short, long, default_value = "")]
        query: String,

        /// Output file for report.json
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check and run a statement against the configured store
    Query {
        /// Statement to run
        sql: String,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the structure of a table, or list all tables
    Inspect {
        /// Table to describe
        table: Option<String>,
    },

    /// Print the paint table query guide
    Guide,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(load_environment(None))
        .init();

    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new(CONFIG_FILE).exists() {
        Config::from_file(Path::new(CONFIG_FILE))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };
    config.apply_env_overrides();

    let checker = QueryChecker::from_config(&config.checker, &config.aliases);

    if cli.verbose {
        eprintln!(
            "{} {} aliases, similarity threshold {}",
            "Using".cyan(),
            checker.aliases().len(),
            config.checker.similarity_threshold
        );
    }

    match cli.command {
        Commands::Check { sql, file, output } => {
            check_command(&config, &checker, &cli.tables, sql, file.as_deref(), output.as_deref(), cli.verbose).await
        }
        Commands::Explain { error, query, output } => {
            explain_command(&config, &checker, &cli.tables, &error, &query, output.as_deref(), cli.verbose).await
        }
        Commands::Query { sql, json } => {
            query_command(&config, &checker, &sql, json, cli.verbose).await
        }
        Commands::Inspect { table } => {
            inspect_command(&config, table.as_deref(), cli.verbose).await
        }
        Commands::Guide => {
            println!("{}", QueryGuide::render());
            Ok(())
        }
    }
}

/// Load `.env` (RUST_LOG and DB_URL may live there), then build the log filter
fn load_environment(env_file: Option<&Path>) -> EnvFilter {
    // A missing .env is fine
    match env_file {
        Some(path) => dotenvy::from_path(path).ok(),
        None => dotenvy::dotenv().ok().map(|_| ()),
    };

    EnvFilter::from_default_env()
}

/// Check command - pre-flight check without touching the store's data
async fn check_command(
    config: &Config,
    checker: &QueryChecker,
    tables: &[String],
    sql: Option<String>,
    file: Option<&Path>,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let (sql_text, source) = match (sql, file) {
        (Some(sql), _) => (sql, "<inline>".to_string()),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
            (text, path.display().to_string())
        }
        (None, None) => return Err(anyhow::anyhow!("Provide a statement or --file")),
    };

    let known = known_tables(config, tables, verbose).await?;

    if verbose {
        eprintln!(
            "{} {} against {} known tables",
            "Checking".cyan(),
            source,
            known.len()
        );
    }

    let report = StatementBatch::new(checker, source).check(&sql_text, &known);

    if let Some(output) = output {
        report.save_to_file(output)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), output.display());
        }
    }

    print_report_summary(&report);

    // Exit with error code if there are errors
    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Explain command - classify a store error after the fact
async fn explain_command(
    config: &Config,
    checker: &QueryChecker,
    tables: &[String],
    error: &str,
    query: &str,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    // The table hint needs a table list; without one the hints still work
    let known = match known_tables(config, tables, verbose).await {
        Ok(known) => Some(known),
        Err(e) => {
            tracing::warn!(error = %e, "no table list available");
            None
        }
    };

    let report = explain_report(checker, error, query, known.as_ref());

    for diag in &report.diagnostics {
        if verbose {
            eprintln!("{} {}", "Classified as:".cyan(), diag.code);
        }
        println!("{}", format_execution_failure(error, &diag.suggestions));
    }

    if let Some(output) = output {
        report.save_to_file(output)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), output.display());
        }
    }

    Ok(())
}

/// One-diagnostic report for a store error
fn explain_report(checker: &QueryChecker, error: &str, query: &str, known: Option<&KnownSchema>) -> Report {
    let diagnostic = checker.execution_diagnostic(error, query, known);
    Report::from_diagnostics(vec![diagnostic])
}

/// Query command - the `db_query` tool
async fn query_command(config: &Config, checker: &QueryChecker, sql: &str, json: bool, verbose: bool) -> Result<()> {
    let adapter = open_store(config, verbose).await?;
    let outcome = QueryTool::new(checker, adapter.as_ref()).run(sql).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        match &outcome {
            QueryOutcome::Rejected { .. } => println!("{}", outcome.render().yellow()),
            QueryOutcome::Failed { .. } => println!("{}", outcome.render().red()),
            _ => println!("{}", outcome.render()),
        }
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

/// Inspect command - the `db_schema_inspector` tool
async fn inspect_command(config: &Config, table: Option<&str>, verbose: bool) -> Result<()> {
    let adapter = open_store(config, verbose).await?;
    let text = SchemaInspector::new(adapter.as_ref())
        .inspect(table)
        .await
        .map_err(|e| anyhow::anyhow!("Error inspecting database: {}", e))?;

    println!("{}", text);
    Ok(())
}

/// Table names from `--tables`, or from the store when none are given
async fn known_tables(config: &Config, tables: &[String], verbose: bool) -> Result<KnownSchema> {
    if !tables.is_empty() {
        return Ok(parse_table_list(tables));
    }

    let adapter = open_store(config, verbose).await?;
    let listed = adapter
        .list_tables()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list tables: {}", e))?;

    Ok(KnownSchema::new(listed))
}

fn parse_table_list(tables: &[String]) -> KnownSchema {
    tables
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Open the configured store and make sure it answers
async fn open_store(config: &Config, verbose: bool) -> Result<Box<dyn DatabaseAdapter>> {
    let database = config.database.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
            "No database configured. Set DB_URL or add a [database] section with a url to {}.",
            CONFIG_FILE
        )
    })?;

    if verbose {
        eprintln!("{} {}...", "Connecting to".cyan(), database.url);
    }

    let adapter = SqliteAdapter::open(&database.url, database.read_only)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;

    adapter
        .test_connection()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to store: {}", e))?;

    if verbose {
        eprintln!("{}", "✓ Connection successful".green());
    }

    Ok(Box::new(adapter))
}

fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Query Check Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Statements checked: {}", report.summary.statements_checked);
    println!("  Total diagnostics:  {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
        return;
    }

    println!("{}", "Diagnostics:".bold());
    for diag in &report.diagnostics {
        let severity_str = match diag.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warn => "WARN".yellow().bold(),
            Severity::Info => "INFO".cyan(),
        };

        println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

        if let Some(loc) = &diag.location {
            println!("    at {}", loc);
        }

        for suggestion in &diag.suggestions {
            println!("    {} {}", "→".cyan(), suggestion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use querycheck_core::DiagnosticCode;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tables_flag_splits_on_commas() {
        let cli = Cli::parse_from(["querycheck", "--tables", "paint,user", "check", "SELECT 1"]);
        assert_eq!(cli.tables, vec!["paint", "user"]);

        let known = parse_table_list(&cli.tables);
        assert!(known.contains("paint"));
        assert!(known.contains("user"));
    }

    #[test]
    fn test_blank_table_names_are_dropped() {
        let known = parse_table_list(&[" paint ".to_string(), "".to_string()]);
        assert_eq!(known.len(), 1);
        assert!(known.contains("paint"));
    }

    #[test]
    fn test_check_needs_a_statement_or_file() {
        assert!(Cli::try_parse_from(["querycheck", "check"]).is_err());
        assert!(Cli::try_parse_from(["querycheck", "check", "SELECT 1", "--file", "x.sql"]).is_err());
        assert!(Cli::try_parse_from(["querycheck", "check", "--file", "x.sql"]).is_ok());
    }

    #[test]
    fn test_log_filter_sees_rust_log_from_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join(".env");
        std::fs::write(&env_file, "RUST_LOG=querycheck_sql=debug\n").unwrap();
        std::env::remove_var("RUST_LOG");

        let filter = load_environment(Some(&env_file));
        assert_eq!(filter.to_string().to_lowercase(), "querycheck_sql=debug");
    }

    #[test]
    fn test_explain_report_uses_execution_codes() {
        let checker = QueryChecker::new();
        let known = KnownSchema::new(["paint", "user"]);

        let report = explain_report(&checker, "no such table: tintas", "SELECT * FROM tintas", Some(&known));
        assert_eq!(report.summary.errors, 1);
        let diag = &report.diagnostics[0];
        assert_eq!(diag.code, DiagnosticCode::ExecMissingTable);
        assert_eq!(diag.severity, Severity::Error);
        assert!(!diag.suggestions.is_empty());

        let report = explain_report(&checker, "near \"SELEC\": syntax error", "SELEC 1", None);
        assert_eq!(report.diagnostics[0].code, DiagnosticCode::ExecSyntaxError);
    }

    #[test]
    fn test_explain_accepts_output() {
        let cli = Cli::try_parse_from(["querycheck", "explain", "-e", "no such table: x", "-o", "report.json"]).unwrap();
        match cli.command {
            Commands::Explain { output, query, .. } => {
                assert_eq!(output, Some(PathBuf::from("report.json")));
                assert_eq!(query, "");
            }
            _ => panic!("expected explain"),
        }
    }

    #[tokio::test]
    async fn test_store_is_required_without_tables() {
        let err = known_tables(&Config::default(), &[], false).await.unwrap_err();
        assert!(err.to_string().contains("No database configured"));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_known_tables_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let adapter = SqliteAdapter::open(path.to_str().unwrap(), false).unwrap();
        adapter
            .execute("CREATE TABLE paint (id INTEGER PRIMARY KEY)")
            .await
            .unwrap();

        let config = Config {
            database: Some(querycheck_core::DatabaseConfig::new(path.display().to_string())),
            ..Config::default()
        };
        let known = known_tables(&config, &[], false).await.unwrap();
        assert_eq!(known, KnownSchema::new(["paint"]));
    }
}
