// Main entry point for the CLI application

use clap::Parser;
use csvload::args::{Cli, Commands};
use csvload::config::{AppConfig, DbConfig};
use csvload::db::Connection;
use csvload::dataset::{Dataset, Value};
use csvload::etl::Loader;
use csvload::DbResult;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load or create configuration
    let config = if cli.config.exists() {
        AppConfig::load_from_file(&cli.config)?
    } else {
        if cli.verbose {
            println!("⚠️  Configuration file not found, using defaults");
        }
        AppConfig::default()
    };

    match cli.command {
        Commands::Load {
            file,
            table,
            database_url,
            delimiter,
            no_headers,
        } => {
            run_load_command(&config, file, table, database_url, delimiter, no_headers);
        }

        Commands::Read {
            table,
            database_url,
            format,
        } => {
            run_read_command(&config, table, database_url, format);
        }

        Commands::InitConfig { output } => {
            let default_config = AppConfig::default();
            default_config.save_to_file(&output)?;
            println!("✅ Created default configuration at: {}", output.display());
        }
    }

    Ok(())
}

// Resolution order for the database URL: command-line flag, then the config
// file, then the MYSQL_* environment.
fn resolve_database_url(flag: Option<String>, config: &AppConfig) -> DbResult<String> {
    if let Some(url) = flag {
        return Ok(url);
    }
    if let Some(url) = &config.database_url {
        return Ok(url.clone());
    }
    Ok(DbConfig::from_env()?.url())
}

fn run_load_command(
    config: &AppConfig,
    file: PathBuf,
    table: String,
    database_url: Option<String>,
    delimiter: Option<u8>,
    no_headers: bool,
) {
    let url = match resolve_database_url(database_url, config) {
        Ok(url) => url,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // The flag is validated by its clap parser; the config file value is
    // checked here.
    let delimiter = match delimiter.map(Ok).unwrap_or_else(|| config.etl.delimiter_byte()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    println!("📂 Loading {} into table '{}'", file.display(), table);

    let loader = Loader::new()
        .with_delimiter(delimiter)
        .with_headers(!no_headers && config.etl.has_headers);

    let start = Instant::now();
    match loader.load_file(&file, &table, &url) {
        Ok(report) => {
            let duration = start.elapsed();
            println!(
                "✅ Inserted {} rows into '{}' in {:.2}s",
                report.rows_inserted,
                report.table,
                duration.as_secs_f64()
            );
            println!(
                "📊 Rate: {:.2} rows/second",
                report.rows_inserted as f64 / duration.as_secs_f64()
            );
        }
        Err(e) => {
            eprintln!("❌ Failed to load {}: {}", file.display(), e);
            std::process::exit(1);
        }
    }
}

fn run_read_command(
    config: &AppConfig,
    table: String,
    database_url: Option<String>,
    format: String,
) {
    let result = resolve_database_url(database_url, config)
        .and_then(|url| Connection::open(&url))
        .and_then(|mut conn| conn.read_table(&table));

    let dataset = match result {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("❌ Failed to read table '{}': {}", table, e);
            std::process::exit(1);
        }
    };

    match format.as_str() {
        "table" => print_table(&dataset),
        "json" => match serde_json::to_string_pretty(&dataset.to_json()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("❌ Failed to render JSON: {}", e);
                std::process::exit(1);
            }
        },
        "csv" => {
            if let Err(e) = print_csv(&dataset) {
                eprintln!("❌ Failed to render CSV: {}", e);
                std::process::exit(1);
            }
        }
        other => {
            eprintln!("❌ Unknown format: {}. Available: table, json, csv", other);
            std::process::exit(1);
        }
    }
}

fn print_table(dataset: &Dataset) {
    let mut widths: Vec<usize> = dataset.columns().iter().map(|c| c.len()).collect();
    let rendered: Vec<Vec<String>> = dataset
        .rows()
        .iter()
        .map(|row| row.iter().map(|v| v.to_string()).collect())
        .collect();
    for row in &rendered {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.len());
        }
    }

    let header: Vec<String> = dataset
        .columns()
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<1$}", c, w))
        .collect();
    println!("{}", header.join(" | "));
    let dashes: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    println!("{}", dashes.join("-+-"));

    for row in &rendered {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<1$}", c, w))
            .collect();
        println!("{}", line.join(" | "));
    }
    println!();
    println!("{} rows", dataset.len());
}

fn print_csv(dataset: &Dataset) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        let record: Vec<String> = row
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
