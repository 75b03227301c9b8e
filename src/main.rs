//! fsstress CLI entry point

use anyhow::{Context, Result};
use fsstress::config::cli::Cli;
use fsstress::config::{cli_convert, toml as config_toml, validator, Config};
use fsstress::output::csv::CsvLog;
use fsstress::output::json::{self, RunSummary};
use fsstress::output::text::{self, Console};
use fsstress::output::{ReportSink, Tee};
use fsstress::TimedRunController;
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    let cli = match Cli::try_parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are reported through the same path
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    println!("fsstress v{}", env!("CARGO_PKG_VERSION"));
    println!();

    cli.validate()?;
    let config = build_config(&cli)?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    text::print_configuration(&config);

    if cli.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    println!();
    run(config)
}

/// Build configuration from a TOML file and/or CLI arguments
fn build_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => {
            info!("Loading configuration from {}", path.display());
            let file_config = config_toml::parse_toml_file(path)?;
            config_toml::merge_cli_with_config(cli, file_config)
        }
        None => cli_convert::config_from_cli(cli),
    }
}

fn run(config: Config) -> Result<()> {
    let started_at = chrono::Utc::now();
    let config = Arc::new(config);

    let sinks: Vec<Box<dyn ReportSink>> = vec![
        Box::new(CsvLog::new(&config.log_path)),
        Box::new(Console),
    ];
    let sink = Tee::new(sinks);

    let mut controller = TimedRunController::new(config.clone(), Box::new(sink));
    let reports = controller.run_all()?;

    text::print_summary(&reports);

    if let Some(ref path) = config.json_output {
        let summary = RunSummary::new(&config, &reports, started_at);
        json::write_summary(path, &summary)?;
        println!();
        println!("JSON summary written to {}", path.display());
    }

    Ok(())
}

/// Route diagnostics to stderr; `RUST_LOG` overrides the `-v` level
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fsstress={}", level)));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
