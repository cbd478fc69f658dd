//! Explicit run configuration for the tools.
//!
//! Values come from CLI arguments (and, for serial settings, the environment
//! through clap's `env` support) instead of the process working directory.

use std::path::PathBuf;
use std::time::Duration;

/// Default summary file name.
pub const DEFAULT_OUTPUT_FILE: &str = "Output.txt";

/// Default calibration log file name.
pub const DEFAULT_CALIBRATION_FILE: &str = "calibration_values.txt";

/// Baud rate the microcontroller sketches use.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Where the aggregator reads from and writes to.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    /// Also descend into subdirectories of `input_dir`.
    pub recursive: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            recursive: false,
        }
    }
}

impl AggregatorConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_path: output_path.into(),
            recursive: false,
        }
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Connection settings for a serial device.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    /// Read timeout; a timed out read is retried, not treated as end of input.
    pub timeout: Duration,
}

impl SerialConfig {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
            timeout: Duration::from_secs(1),
        }
    }
}
