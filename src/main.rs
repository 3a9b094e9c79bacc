use clap::Parser;
use sales_dash::args::{Args, Command};
use sales_dash::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().sales_home().path();

    let _: () = match args.command() {
        Command::Init => commands::init(home)?.print(),

        Command::Products(products_args) => {
            let config = Config::load(home)?;
            commands::products(&config, products_args)?.print_rows()
        }

        Command::Rows(rows_args) => {
            let config = Config::load(home)?;
            commands::rows(&config, rows_args)?.print_rows()
        }

        Command::Report(report_args) => {
            let config = Config::load(home)?;
            commands::report(&config, report_args)?.print_rows()
        }

        Command::Summary(summary_args) => {
            let config = Config::load(home)?;
            commands::summary(&config, summary_args)?.print_rows()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for the binary and library only.
            EnvFilter::new(format!(
                "{}={level},sales_dash={level}",
                env!("CARGO_CRATE_NAME"),
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
