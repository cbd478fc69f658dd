//! Serial link helpers for the microcontroller used during calibration.
//!
//! The device speaks newline-terminated text. [`LineReader`] turns any
//! [`BufRead`] (a serial port, or an in-memory buffer in tests) into a
//! stream of trimmed lines, treating read timeouts as "nothing yet".

pub mod calibrate;
pub mod clock;

use crate::config::SerialConfig;
use anyhow::{Context, Result};
use std::io::{self, BufRead};
use tracing::{debug, info, warn};

/// Reads trimmed text lines, retrying on read timeouts.
pub struct LineReader<R> {
    inner: R,
    buf: String,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: String::new(),
        }
    }

    /// Returns the next line with surrounding whitespace removed, or `None`
    /// once the source is exhausted.
    ///
    /// Bytes received before a timeout are kept and completed by later reads.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            match self.inner.read_line(&mut self.buf) {
                Ok(0) if self.buf.is_empty() => return Ok(None),
                Ok(_) => {
                    let line = self.buf.trim().to_string();
                    self.buf.clear();
                    return Ok(Some(line));
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

/// Opens the configured serial port.
#[tracing::instrument(fields(port = %config.port, baud_rate = config.baud_rate))]
pub fn open_port(config: &SerialConfig) -> Result<Box<dyn serialport::SerialPort>> {
    // On Windows, COM ports >= 10 need the \\.\COMxx format
    #[cfg(target_os = "windows")]
    let port_name = if config.port.starts_with("COM") && !config.port.starts_with(r"\\") {
        format!(r"\\.\{}", config.port)
    } else {
        config.port.clone()
    };
    #[cfg(not(target_os = "windows"))]
    let port_name = config.port.clone();

    let port = serialport::new(&port_name, config.baud_rate)
        .timeout(config.timeout)
        .flow_control(serialport::FlowControl::None)
        .open()
        .with_context(|| format!("failed to open serial port {}", port_name))?;

    debug!("Serial port opened");
    Ok(port)
}

/// Logs every serial port the OS reports.
pub fn list_ports() -> Result<()> {
    let ports = serialport::available_ports().context("failed to enumerate serial ports")?;

    if ports.is_empty() {
        warn!("No serial ports found");
    }

    for port in ports {
        match &port.port_type {
            serialport::SerialPortType::UsbPort(usb) => info!(
                port = %port.port_name,
                kind = "USB",
                vid = %format!("0x{:04x}", usb.vid),
                pid = %format!("0x{:04x}", usb.pid),
                manufacturer = usb.manufacturer.as_deref().unwrap_or("-"),
                product = usb.product.as_deref().unwrap_or("-"),
                "Serial port"
            ),
            other => info!(port = %port.port_name, kind = port_type_name(other), "Serial port"),
        }
    }

    Ok(())
}

fn port_type_name(port_type: &serialport::SerialPortType) -> &'static str {
    match port_type {
        serialport::SerialPortType::UsbPort(_) => "USB",
        serialport::SerialPortType::BluetoothPort => "Bluetooth",
        serialport::SerialPortType::PciPort => "PCI",
        serialport::SerialPortType::Unknown => "Unknown",
    }
}
