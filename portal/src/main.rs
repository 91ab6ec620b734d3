mod config;
mod telemetry;

use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "Web front-end for the character/episode/location catalog API")]
struct Cli {
    /// YAML config file; built-in defaults are used when omitted
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Serve the HTML pages and JSON routes
    Serve,
    /// Load and validate the config, then exit
    CheckConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        CliCommand::CheckConfig => {
            let catalog = &config.catalog;
            println!("config ok");
            println!("  listener:       {}", catalog.listener.address());
            println!("  admin listener: {}", catalog.admin_listener.address());
            println!("  upstream:       {}", catalog.upstream.url);
            ExitCode::SUCCESS
        }
        CliCommand::Serve => serve(config),
    }
}

fn serve(config: Config) -> ExitCode {
    // Sentry has to be up before the runtime starts its worker threads
    let sentry_guard = telemetry::init_sentry(&config.common.logging);
    telemetry::init_logging(&config.common.logging, sentry_guard.is_some());

    if let Some(metrics) = &config.common.metrics
        && let Err(e) = telemetry::init_metrics(metrics)
    {
        tracing::error!(error = %e, "could not initialize metrics");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "could not start tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("starting portal");
    match runtime.block_on(catalog::run(config.catalog)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "portal stopped with an error");
            ExitCode::FAILURE
        }
    }
}
