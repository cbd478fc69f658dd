//! CLI entry point for the sensor calibration tools.
//!
//! Provides subcommands for averaging daily sensor logs, capturing dry/wet
//! calibration values over serial, and setting the device clock.

use anyhow::{Context, Result};
use calibration_tools::aggregator;
use calibration_tools::config::{
    AggregatorConfig, DEFAULT_BAUD_RATE, DEFAULT_CALIBRATION_FILE, DEFAULT_OUTPUT_FILE,
    SerialConfig,
};
use calibration_tools::output::{print_json, print_pretty};
use calibration_tools::serial::calibrate::{DEFAULT_SAMPLE_COUNT, log_block, write_calibration};
use calibration_tools::serial::clock::{SETTLE_DELAY, sync_clock};
use calibration_tools::serial::{LineReader, list_ports, open_port};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "calibration_tools")]
#[command(about = "Utilities for the sensor calibration workflow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Average temperature and humidity per date across a directory of CSV logs
    Aggregate {
        /// Directory containing the daily CSV logs
        #[arg(short, long, default_value = ".")]
        input_dir: PathBuf,

        /// Tab-separated summary file to (over)write
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// Also read CSV files from subdirectories
        #[arg(short, long, default_value_t = false)]
        recursive: bool,

        /// Print the summary as JSON on stdout as well
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Log dry and wet sensor readings from the device
    Calibrate {
        #[command(flatten)]
        serial: SerialArgs,

        /// Lines to capture for each setup
        #[arg(short = 'n', long, default_value_t = DEFAULT_SAMPLE_COUNT)]
        count: usize,

        /// File to write the captured values to
        #[arg(short, long, default_value = DEFAULT_CALIBRATION_FILE)]
        output: PathBuf,
    },
    /// Wait for the device's time request and reply with the local time
    SetTime {
        #[command(flatten)]
        serial: SerialArgs,
    },
    /// List available serial ports
    ListPorts,
}

#[derive(clap::Args)]
struct SerialArgs {
    /// Serial port the device is connected to
    #[arg(short, long, env = "SERIAL_PORT", default_value = "COM4")]
    port: String,

    /// Baud rate of the device sketch
    #[arg(short, long, env = "SERIAL_BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,
}

impl From<SerialArgs> for SerialConfig {
    fn from(args: SerialArgs) -> Self {
        SerialConfig::new(args.port, args.baud)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/calibration_tools.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("calibration_tools.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Aggregate {
            input_dir,
            output,
            recursive,
            json,
        } => {
            let config = AggregatorConfig::new(input_dir, output).with_recursive(recursive);
            let rows = aggregator::run(&config)?;

            print_pretty(&rows);
            if json {
                print_json(&rows)?;
            }
            info!(dates = rows.len(), output = %config.output_path.display(), "Script done");
        }
        Commands::Calibrate {
            serial,
            count,
            output,
        } => {
            calibrate(&SerialConfig::from(serial), count, &output)?;
        }
        Commands::SetTime { serial } => {
            set_time(&SerialConfig::from(serial))?;
        }
        Commands::ListPorts => {
            list_ports()?;
        }
    }

    Ok(())
}

/// Captures a dry block and a wet block, pausing for the operator before each.
#[tracing::instrument(skip(config), fields(port = %config.port))]
fn calibrate(config: &SerialConfig, count: usize, output: &Path) -> Result<()> {
    info!(count, "Logging readings for both dry and wet setups");

    wait_for_enter("Press Enter/Return to log the dry setup.")?;
    let dry = capture_block(config, count)?;

    wait_for_enter("Press Enter/Return to log the wet setup.")?;
    let wet = capture_block(config, count)?;

    write_calibration(output, &dry, &wet)?;
    info!("Done! Exiting..");
    Ok(())
}

/// Opens the port fresh so nothing buffered while the operator was busy is logged.
fn capture_block(config: &SerialConfig, count: usize) -> Result<Vec<String>> {
    let port = open_port(config)?;
    let mut lines = LineReader::new(BufReader::new(port));
    log_block(&mut lines, count)
}

/// Answers the device's clock request once.
#[tracing::instrument(skip(config), fields(port = %config.port))]
fn set_time(config: &SerialConfig) -> Result<()> {
    let port = open_port(config)?;
    let mut writer = port.try_clone().context("failed to clone serial port handle")?;
    let mut lines = LineReader::new(BufReader::new(port));

    info!("Waiting for time request from device");
    sync_clock(&mut lines, &mut writer, || Local::now().naive_local())?;

    std::thread::sleep(SETTLE_DELAY);
    Ok(())
}

fn wait_for_enter(prompt: &str) -> Result<()> {
    info!("{}", prompt);
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("failed to read from stdin")?;
    Ok(())
}
