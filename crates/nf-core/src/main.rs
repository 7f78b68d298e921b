//! Nevformance Core - Metric Analytics Engine
//!
//! The main entry point for nf-core, handling:
//! - One-shot analysis of a metric snapshot
//! - On-demand correlation of two metrics
//! - Periodic refresh against a snapshot file
//! - Configuration inspection and validation

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use nf_common::{MetricSnapshot, OutputFormat, TimeRange, SCHEMA_VERSION};
use nf_config::validate::MIN_REFRESH_INTERVAL_MS;
use nf_config::{load_config, resolve_config, AnalyticsConfig, ConfigPath, ValidationError};
use nf_core::exit_codes::ExitCode;
use nf_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use nf_core::refresh::{run_loop, FileSnapshotProvider, TickOutcome};
use nf_core::session::AnalyticsSession;
use nf_core::views::{AnalyticsReport, Analyzer};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Nevformance Core - server performance analytics over metric snapshots
#[derive(Parser)]
#[command(name = "nf-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to analytics.json (falls back to NF_CONFIG, NF_CONFIG_DIR, XDG, /etc)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every view once over a snapshot file
    Analyze(AnalyzeArgs),

    /// Correlate two metrics by timestamp
    Correlate(CorrelateArgs),

    /// Re-read a snapshot file periodically and analyze each refresh
    Watch(WatchArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Print version information
    Version,
}

// ============================================================================
// Command argument structs
// ============================================================================

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Snapshot file (JSON object of metric key to [{timestamp, value}])
    #[arg(long)]
    snapshot: PathBuf,

    /// Lookback for time-sliced views (5m, 15m, 30m, 1h)
    #[arg(long)]
    range: Option<String>,

    /// Reference time in epoch milliseconds (defaults to the wall clock)
    #[arg(long)]
    now: Option<i64>,

    /// Metric shown on the performance chart
    #[arg(long)]
    performance_metric: Option<String>,

    /// Metric shown on the population chart
    #[arg(long)]
    population_metric: Option<String>,

    /// X metric for the correlation view (requires --y)
    #[arg(long, requires = "y")]
    x: Option<String>,

    /// Y metric for the correlation view (requires --x)
    #[arg(long, requires = "x")]
    y: Option<String>,
}

#[derive(Args, Debug)]
struct CorrelateArgs {
    /// Snapshot file
    #[arg(long)]
    snapshot: PathBuf,

    /// X metric key
    #[arg(long)]
    x: String,

    /// Y metric key
    #[arg(long)]
    y: String,

    /// Maximum timestamp distance for a pair, in milliseconds
    #[arg(long)]
    tolerance_ms: Option<i64>,
}

#[derive(Args, Debug)]
struct WatchArgs {
    /// Snapshot file, re-read on every tick
    #[arg(long)]
    snapshot: PathBuf,

    /// Refresh interval in milliseconds (defaults to refresh.interval_ms)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Lookback for time-sliced views (5m, 15m, 30m, 1h)
    #[arg(long)]
    range: Option<String>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the resolved config)
        path: Option<PathBuf>,
    },
    /// Print which configuration file would be used
    Path,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    let log_format = LogFormat::for_output(cli.global.format.is_machine());
    init_logging(&LogConfig::from_env(cli_level, Some(log_format)));

    let exit_code = match cli.command {
        None => {
            print_version(&cli.global);
            ExitCode::Clean
        }
        Some(Commands::Analyze(args)) => run_analyze(&cli.global, &args),
        Some(Commands::Correlate(args)) => run_correlate(&cli.global, &args),
        Some(Commands::Watch(args)) => run_watch(&cli.global, &args),
        Some(Commands::Config(args)) => run_config(&cli.global, &args),
        Some(Commands::Version) => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> ExitCode {
    let run_id = generate_run_id();

    let (config, config_path) = match load_config(global.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => return output_config_error(global, &run_id, &e),
    };
    let range = match resolve_range(args.range.as_deref(), &config) {
        Ok(range) => range,
        Err(message) => return output_args_error(global, &run_id, &message),
    };
    let snapshot = match load_snapshot(&args.snapshot) {
        Ok(snapshot) => snapshot,
        Err(e) => return output_error(global, &run_id, &e),
    };
    let now_ms = args.now.unwrap_or_else(|| Utc::now().timestamp_millis());

    let mut session = AnalyticsSession::new(Analyzer::new(config));
    session.replace_snapshot(snapshot);
    session.set_time_range(range.label());
    if let Some(key) = &args.performance_metric {
        session.set_performance_metric(key);
    }
    if let Some(key) = &args.population_metric {
        session.set_population_metric(key);
    }
    if let (Some(x), Some(y)) = (&args.x, &args.y) {
        session.set_correlation_pair(x, y);
    }

    let report = session.run_pass(now_ms);
    let outcome = if report.is_empty() {
        ExitCode::NoData
    } else {
        ExitCode::Clean
    };
    tracing::info!(
        run_id = %run_id,
        series = report.series_count,
        empty_views = report.empty_views().len(),
        outcome = outcome.code_name(),
        "analysis complete"
    );

    if global.format == OutputFormat::Summary {
        print_report_summary(&run_id, &report);
        return outcome;
    }

    let report_value = match serde_json::to_value(&report) {
        Ok(value) => value,
        Err(e) => return output_internal_error(global, &run_id, &e.to_string()),
    };
    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": Utc::now().to_rfc3339(),
        "snapshot": args.snapshot.display().to_string(),
        "config": config_source_json(&config_path),
        "outcome": outcome.code_name(),
        "report": report_value,
    });
    match write_response(global, &response) {
        Ok(()) => outcome,
        Err(code) => code,
    }
}

fn run_correlate(global: &GlobalOpts, args: &CorrelateArgs) -> ExitCode {
    let run_id = generate_run_id();

    let (mut config, _) = match load_config(global.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => return output_config_error(global, &run_id, &e),
    };
    if let Some(tolerance) = args.tolerance_ms {
        if tolerance <= 0 {
            return output_args_error(
                global,
                &run_id,
                &format!("--tolerance-ms must be positive, got {}", tolerance),
            );
        }
        config.correlation.tolerance_ms = tolerance;
    }
    let snapshot = match load_snapshot(&args.snapshot) {
        Ok(snapshot) => snapshot,
        Err(e) => return output_error(global, &run_id, &e),
    };

    let mut session = AnalyticsSession::new(Analyzer::new(config));
    session.replace_snapshot(snapshot);
    let view = session.correlate(&args.x, &args.y);
    let outcome = if view.is_ready() {
        ExitCode::Clean
    } else {
        ExitCode::NoData
    };

    if global.format == OutputFormat::Summary {
        match view.data() {
            Some(data) => {
                let coefficient = data
                    .coefficient
                    .map(|r| format!("{:.3}", r))
                    .unwrap_or_else(|| "n/a".to_string());
                println!(
                    "[{}] {}: r={} ({}), {} pairs",
                    run_id, data.title, coefficient, data.strength, data.pair_count
                );
            }
            None => println!(
                "[{}] correlate: no data ({})",
                run_id,
                view.reason().unwrap_or("unknown")
            ),
        }
        return outcome;
    }

    let view_value = match serde_json::to_value(&view) {
        Ok(value) => value,
        Err(e) => return output_internal_error(global, &run_id, &e.to_string()),
    };
    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": Utc::now().to_rfc3339(),
        "outcome": outcome.code_name(),
        "correlation": view_value,
    });
    match write_response(global, &response) {
        Ok(()) => outcome,
        Err(code) => code,
    }
}

fn run_watch(global: &GlobalOpts, args: &WatchArgs) -> ExitCode {
    let run_id = generate_run_id();

    let (config, _) = match load_config(global.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => return output_config_error(global, &run_id, &e),
    };
    let range = match resolve_range(args.range.as_deref(), &config) {
        Ok(range) => range,
        Err(message) => return output_args_error(global, &run_id, &message),
    };
    let interval_ms = args.interval_ms.unwrap_or(config.refresh.interval_ms);
    if interval_ms < MIN_REFRESH_INTERVAL_MS {
        return output_args_error(
            global,
            &run_id,
            &format!(
                "--interval-ms must be at least {}, got {}",
                MIN_REFRESH_INTERVAL_MS, interval_ms
            ),
        );
    }

    let mut session = AnalyticsSession::new(Analyzer::new(config));
    session.set_time_range(range.label());
    let mut provider = FileSnapshotProvider::new(&args.snapshot);
    let mut write_failure = None;

    let state = run_loop(
        &mut session,
        &mut provider,
        Duration::from_millis(interval_ms),
        args.ticks,
        |outcome| match emit_tick(global, &run_id, outcome) {
            Ok(()) => true,
            Err(code) => {
                write_failure = Some(code);
                false
            }
        },
    );

    if let Some(code) = write_failure {
        return code;
    }
    if state.last_success_at.is_none() {
        tracing::error!(
            run_id = %run_id,
            failures = state.fetch_failures,
            "no snapshot could be read"
        );
        return ExitCode::SnapshotError;
    }
    ExitCode::Clean
}

fn emit_tick(global: &GlobalOpts, run_id: &str, outcome: &TickOutcome) -> Result<(), ExitCode> {
    if global.format == OutputFormat::Summary {
        let views = outcome.report.view_count();
        let empty = outcome.report.empty_views().len();
        let status = match &outcome.error {
            Some(err) => format!("stale ({})", err),
            None => "fresh".to_string(),
        };
        println!(
            "[{}] tick {}: {} series, {}/{} views with data, {}",
            run_id,
            outcome.tick_number,
            outcome.report.series_count,
            views - empty,
            views,
            status
        );
        return Ok(());
    }

    let outcome_value = serde_json::to_value(outcome).map_err(|e| {
        tracing::error!(error = %e, "failed to serialize tick");
        ExitCode::InternalError
    })?;
    let line = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": Utc::now().to_rfc3339(),
        "tick": outcome_value,
    });
    // One document per tick regardless of json vs jsonl.
    match serde_json::to_string(&line) {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize tick");
            Err(ExitCode::InternalError)
        }
    }
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> ExitCode {
    match &args.command {
        ConfigCommands::Show => run_config_show(global),
        ConfigCommands::Validate { path } => {
            run_config_validate(global, path.as_deref().or(global.config.as_deref()))
        }
        ConfigCommands::Path => run_config_path(global),
    }
}

/// Display the effective configuration (built-in defaults if no file found).
fn run_config_show(global: &GlobalOpts) -> ExitCode {
    let run_id = generate_run_id();

    let (config, config_path) = match load_config(global.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => return output_config_error(global, &run_id, &e),
    };

    if global.format == OutputFormat::Summary {
        println!(
            "[{}] config: {} (refresh {} ms, range {}, {} buckets, {} windows)",
            run_id,
            describe_path(&config_path),
            config.refresh.interval_ms,
            config.refresh.default_time_range,
            config.distribution.buckets.len(),
            config.lag_spikes.windows.len()
        );
        return ExitCode::Clean;
    }

    let config_value = match serde_json::to_value(&config) {
        Ok(value) => value,
        Err(e) => return output_internal_error(global, &run_id, &e.to_string()),
    };
    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": Utc::now().to_rfc3339(),
        "source": config_source_json(&config_path),
        "config": config_value,
    });
    match write_response(global, &response) {
        Ok(()) => ExitCode::Clean,
        Err(code) => code,
    }
}

fn run_config_validate(global: &GlobalOpts, path: Option<&Path>) -> ExitCode {
    let run_id = generate_run_id();

    match load_config(path) {
        Ok((config, config_path)) => {
            if global.format == OutputFormat::Summary {
                println!("[{}] config validate: OK ({})", run_id, describe_path(&config_path));
                return ExitCode::Clean;
            }
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": run_id,
                "generated_at": Utc::now().to_rfc3339(),
                "status": "valid",
                "source": config_source_json(&config_path),
                "config_schema_version": config.schema_version,
            });
            match write_response(global, &response) {
                Ok(()) => ExitCode::Clean,
                Err(code) => code,
            }
        }
        Err(e) => output_config_error(global, &run_id, &e),
    }
}

fn run_config_path(global: &GlobalOpts) -> ExitCode {
    let run_id = generate_run_id();
    let config_path = resolve_config(global.config.as_deref());

    if global.format == OutputFormat::Summary {
        println!("{}", describe_path(&config_path));
        return ExitCode::Clean;
    }

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": Utc::now().to_rfc3339(),
        "source": config_source_json(&config_path),
    });
    match write_response(global, &response) {
        Ok(()) => ExitCode::Clean,
        Err(code) => code,
    }
}

fn print_version(global: &GlobalOpts) {
    if global.format == OutputFormat::Summary {
        println!("nf-core {}", env!("CARGO_PKG_VERSION"));
        println!("schema version: {}", SCHEMA_VERSION);
        return;
    }

    let version_info = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "config_schema_version": nf_config::CONFIG_SCHEMA_VERSION,
        "nf_core_version": env!("CARGO_PKG_VERSION"),
        "rust_version": env!("CARGO_PKG_RUST_VERSION"),
    });
    if let Err(code) = write_response(global, &version_info) {
        tracing::error!(code = %code, "failed to print version");
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load_snapshot(path: &Path) -> nf_common::Result<MetricSnapshot> {
    let snapshot = MetricSnapshot::from_file(path)?;
    tracing::debug!(path = %path.display(), series = snapshot.len(), "snapshot loaded");
    Ok(snapshot)
}

/// Strict range parse for user input; the config default when absent.
fn resolve_range(label: Option<&str>, config: &AnalyticsConfig) -> Result<TimeRange, String> {
    match label {
        None => Ok(config.default_time_range()),
        Some(label) => TimeRange::parse_label(label).ok_or_else(|| {
            format!("unknown range '{}', expected one of 5m, 15m, 30m, 1h", label)
        }),
    }
}

fn describe_path(config_path: &ConfigPath) -> String {
    match &config_path.path {
        Some(path) => format!("{} ({})", path.display(), config_path.source),
        None => format!("built-in defaults ({})", config_path.source),
    }
}

fn config_source_json(config_path: &ConfigPath) -> serde_json::Value {
    serde_json::json!({
        "path": config_path.path.as_ref().map(|p| p.display().to_string()),
        "source": config_path.source.to_string(),
        "using_defaults": config_path.path.is_none(),
    })
}

/// Print a response on stdout in the selected machine format.
fn write_response(global: &GlobalOpts, response: &serde_json::Value) -> Result<(), ExitCode> {
    let rendered = match global.format {
        OutputFormat::Jsonl => serde_json::to_string(response),
        _ => serde_json::to_string_pretty(response),
    };
    match rendered {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            Err(ExitCode::InternalError)
        }
    }
}

fn print_report_summary(run_id: &str, report: &AnalyticsReport) {
    let views = report.view_count();
    let empty = report.empty_views();
    println!(
        "[{}] analyze: {} series, range {}, {}/{} views with data",
        run_id,
        report.series_count,
        report.time_range,
        views - empty.len(),
        views
    );
    for headline in &report.overview.headlines {
        if let Some(value) = headline.value {
            println!("  {}: {}", headline.label, value);
        }
    }
    if let Some(correlation) = report.correlation.data() {
        if let Some(r) = correlation.coefficient {
            println!("  {}: r={:.3} ({})", correlation.title, r, correlation.strength);
        }
    }
    for (view, reason) in empty {
        println!("  - {}: {}", view, reason);
    }
}

/// Emit a structured error on stderr and return the matching exit code.
fn emit_error(
    global: &GlobalOpts,
    run_id: &str,
    exit_code: ExitCode,
    error_code: u32,
    message: &str,
    remediation: Option<&str>,
) -> ExitCode {
    tracing::debug!(run_id, code = error_code, exit = %exit_code, "command failed");

    if global.format == OutputFormat::Summary {
        eprintln!("[{}] error: {}", run_id, message);
        if let Some(fix) = remediation {
            eprintln!("fix: {}", fix);
        }
        return exit_code;
    }

    let response = serde_json::json!({
        "schema_version": SCHEMA_VERSION,
        "run_id": run_id,
        "generated_at": Utc::now().to_rfc3339(),
        "status": "error",
        "error": {
            "code": error_code,
            "exit_code": exit_code.code_name(),
            "message": message,
            "remediation": remediation,
        }
    });
    match serde_json::to_string_pretty(&response) {
        Ok(text) => eprintln!("{}", text),
        Err(_) => eprintln!("{}", message),
    }
    exit_code
}

fn output_error(global: &GlobalOpts, run_id: &str, error: &nf_common::Error) -> ExitCode {
    emit_error(
        global,
        run_id,
        ExitCode::from_error(error),
        error.code(),
        &error.to_string(),
        Some(error.remediation()),
    )
}

fn output_config_error(global: &GlobalOpts, run_id: &str, error: &ValidationError) -> ExitCode {
    emit_error(
        global,
        run_id,
        ExitCode::ConfigError,
        error.code(),
        &error.to_string(),
        Some("Run 'nf-core config validate' to see the offending field."),
    )
}

fn output_args_error(global: &GlobalOpts, run_id: &str, message: &str) -> ExitCode {
    emit_error(global, run_id, ExitCode::ArgsError, 0, message, None)
}

fn output_internal_error(global: &GlobalOpts, run_id: &str, message: &str) -> ExitCode {
    emit_error(global, run_id, ExitCode::InternalError, 0, message, None)
}
