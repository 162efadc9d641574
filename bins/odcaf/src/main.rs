//! odcaf: look up cultural and art facilities in an ingested ODCAF table.

use clap::{Parser, Subcommand};
use odcaf_cli::output::{self, Status, format_count, format_duration};
use odcaf_core::config::Config;
use odcaf_core::error::{Error, exit_codes};
use odcaf_search::{FacilityQuery, Limit, Lookup, QueryEngine};
use odcaf_store::SqliteStore;
use odcaf_telemetry::{LogFormat, TelemetryConfig, timed_span};
use serde_json::json;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "odcaf")]
#[command(about = "Search the Open Database of Cultural and Art Facilities")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./odcaf.toml when present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// SQLite database file, overriding the configuration
    #[arg(long, global = true)]
    db: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print operation timings to stderr when done
    #[arg(long, global = true)]
    stats: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the column types of the facility table
    Schema,
    /// Filter facilities by province, city, and type
    Query {
        /// Province or territory name or code
        #[arg(long)]
        province: Option<String>,
        /// City name
        #[arg(long)]
        city: Option<String>,
        /// Facility type, e.g. museum or gallery
        #[arg(long = "type")]
        facility_type: Option<String>,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<String>,
    },
    /// Keyword search across name, type, city, and province
    Search {
        /// Search terms; every term must match
        #[arg(required = true)]
        terms: Vec<String>,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<String>,
    },
    /// Fetch a single facility by its exact name
    Fetch {
        /// Facility name
        name: String,
    },
    /// List known cities
    Cities,
    /// List known facility types
    Types,
}

fn main() {
    let cli = Cli::parse();
    let stats = cli.stats;

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            let code = err
                .downcast_ref::<Error>()
                .map_or(exit_codes::FAILURE, Error::exit_code);
            Status::error(&err.to_string());
            code
        }
    };

    if stats {
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&odcaf_telemetry::metrics().export_json())
                .unwrap_or_default()
        );
    }
    std::process::exit(code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.schema.store.database = db;
    }

    odcaf_telemetry::init_with_config(TelemetryConfig {
        log_level: if cli.verbose {
            "debug".to_string()
        } else {
            config.schema.logging.level.clone()
        },
        show_target: config.schema.logging.show_target,
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        },
    })?;

    let settings = &config.schema.query;
    let store = SqliteStore::new(&config.schema.store.database)
        .with_table(&config.schema.store.table)
        .map_err(|e| Error::invalid_config("store.table", e.to_string()))?;
    let engine = QueryEngine::with_config(store, settings.engine_config());
    tracing::debug!(
        database = %config.schema.store.database,
        table = %config.schema.store.table,
        "opened facility store"
    );

    let default_limit = Limit::with_max(settings.default_limit, settings.max_limit).map_err(Error::from)?;
    let parse_limit = |text: Option<&str>| {
        Limit::parse_or(text, default_limit, settings.max_limit).map_err(Error::from)
    };

    let started = Instant::now();
    let report_count = |count: usize| {
        Status::success(&format!(
            "{} in {}",
            format_count(count, "facility", "facilities"),
            format_duration(started.elapsed())
        ));
    };

    match cli.command {
        Commands::Schema => {
            timed_span!("get_schema");
            let schema = engine.get_schema().map_err(Error::from)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&json!({ "schema": schema.to_map() }))?);
            } else {
                output::print_schema(&schema);
            }
        }

        Commands::Query {
            province,
            city,
            facility_type,
            limit,
        } => {
            let limit = parse_limit(limit.as_deref())?;
            let query = FacilityQuery {
                province,
                city,
                facility_type,
            };
            timed_span!("query_facilities");
            let rows = engine.query_facilities(&query, limit).map_err(Error::from)?;
            if cli.json {
                let payload = json!({
                    "filters": {
                        "province": query.province,
                        "city": query.city,
                        "facility_type": query.facility_type,
                        "limit": limit.get(),
                    },
                    "count": rows.len(),
                    "facilities": rows,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else if rows.is_empty() {
                Status::warning("No facilities match those filters");
            } else {
                output::print_facilities(&rows);
                report_count(rows.len());
            }
        }

        Commands::Search { terms, limit } => {
            let limit = parse_limit(limit.as_deref())?;
            let query_text = terms.join(" ");
            timed_span!("search_facilities");
            let rows = engine
                .search_facilities(&query_text, limit)
                .map_err(Error::from)?;
            if cli.json {
                let payload = json!({
                    "query": query_text,
                    "limit": limit.get(),
                    "count": rows.len(),
                    "facilities": rows,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else if rows.is_empty() {
                Status::warning(&format!("No facilities match {query_text:?}"));
            } else {
                output::print_facilities(&rows);
                report_count(rows.len());
            }
        }

        Commands::Fetch { name } => {
            timed_span!("fetch_facility_by_id");
            let lookup = engine.fetch_facility_by_id(&name).map_err(Error::from)?;
            let found = lookup.is_found();
            if cli.json {
                let payload = match lookup {
                    Lookup::Found(record) => json!({
                        "facility_id": name,
                        "found": true,
                        "facility": record,
                    }),
                    Lookup::NotFound => json!({
                        "facility_id": name,
                        "found": false,
                        "message": "No facility found with that name.",
                    }),
                };
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                match lookup {
                    Lookup::Found(record) => output::print_facility_detail(&record),
                    Lookup::NotFound => Status::warning(&format!("No facility named {name:?}")),
                }
            }
            if !found {
                return Ok(exit_codes::NOT_FOUND);
            }
        }

        Commands::Cities => {
            timed_span!("list_cities");
            print_list(engine.list_cities().map_err(Error::from)?, cli.json)?;
        }

        Commands::Types => {
            timed_span!("list_facility_types");
            print_list(engine.list_facility_types().map_err(Error::from)?, cli.json)?;
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn print_list(values: Vec<String>, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for value in &values {
            println!("{value}");
        }
    }
    Ok(())
}
