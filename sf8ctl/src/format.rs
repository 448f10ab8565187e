//! Output formatting utilities for the console
//!
//! Provides table and JSON formatting with colors.

use anyhow::Result;
use colored::*;
use serde::Serialize;
use sf8xxx_core::{Rundown, SetOutcome};

use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// One row of the `list` command
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeviceEntry {
    pub alias: String,
    pub port: String,
    pub serial_no: u16,
}

fn on_off(on: bool) -> String {
    if on {
        "on".green().to_string()
    } else {
        "off".dimmed().to_string()
    }
}

fn yes_no(set: bool) -> String {
    if set {
        "yes".to_string()
    } else {
        "no".to_string()
    }
}

fn fault(tripped: bool) -> String {
    if tripped {
        "TRIPPED".red().bold().to_string()
    } else {
        "ok".green().to_string()
    }
}

/// Format a quick rundown of one device
pub fn format_rundown(alias: &str, rundown: &Rundown, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Tagged<'a> {
                alias: &'a str,
                #[serde(flatten)]
                rundown: &'a Rundown,
            }
            Ok(serde_json::to_string_pretty(&Tagged { alias, rundown })?)
        }
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct RundownRow {
                #[tabled(rename = "Parameter")]
                parameter: &'static str,
                #[tabled(rename = "Value")]
                value: String,
            }

            let row = |parameter: &'static str, value: String| RundownRow { parameter, value };
            let driver = &rundown.driver;
            let tec = &rundown.tec;
            let lock = &rundown.lock;

            let rows = vec![
                row("Device", on_off(driver.device_on)),
                row("Driver", on_off(driver.driver_on)),
                row("Driver current source internal", yes_no(driver.current_internal)),
                row("Driver enable internal", yes_no(driver.enable_internal)),
                row("External NTC interlock denied", yes_no(driver.ntc_deny)),
                row("Interlock denied", yes_no(driver.interlock_deny)),
                row("TEC", on_off(tec.tec_on)),
                row("TEC setpoint internal", yes_no(tec.temp_internal)),
                row("TEC enable internal", yes_no(tec.enable_internal)),
                row("Interlock", fault(lock.interlock)),
                row("LD overcurrent", fault(lock.ld_overcurrent)),
                row("LD overheat", fault(lock.ld_overheat)),
                row("External NTC", fault(lock.ntc_external)),
                row("TEC error", fault(lock.tec_error)),
                row("TEC self-heat", fault(lock.tec_self_heat)),
                row(
                    "Driver current",
                    format!(
                        "{:.1} / {:.1} mA (max {:.1} mA)",
                        rundown.driver_current,
                        rundown.driver_current_setpoint,
                        rundown.driver_current_max
                    )
                    .cyan()
                    .to_string(),
                ),
                row(
                    "TEC temperature",
                    format!(
                        "{:.2} / {:.2} °C",
                        rundown.tec_temperature, rundown.tec_setpoint
                    )
                    .cyan()
                    .to_string(),
                ),
                row(
                    "TEC current",
                    format!(
                        "{:.2} A (limit {:.2} A)",
                        rundown.tec_current, rundown.tec_current_limit
                    )
                    .cyan()
                    .to_string(),
                ),
            ];

            let title = format!("{} (SN {})", alias, rundown.serial_no).bold();
            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", title, table))
        }
    }
}

/// Format connected devices
pub fn format_device_list(devices: &[DeviceEntry], format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(devices)?),
        OutputFormat::Table => {
            if devices.is_empty() {
                return Ok("No devices connected.".dimmed().to_string());
            }

            #[derive(Tabled)]
            struct DeviceRow {
                #[tabled(rename = "Alias")]
                alias: String,
                #[tabled(rename = "Port")]
                port: String,
                #[tabled(rename = "Serial No")]
                serial_no: String,
            }

            let rows: Vec<DeviceRow> = devices
                .iter()
                .map(|device| DeviceRow {
                    alias: device.alias.green().to_string(),
                    port: device.port.clone(),
                    serial_no: device.serial_no.to_string(),
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Connected Devices:".bold(), table))
        }
    }
}

/// Format the outcome of a Set on one device
pub fn format_outcome(alias: &str, action: &str, outcome: &SetOutcome) -> String {
    match outcome {
        SetOutcome::Applied => format_success(&format!("{}: {}", alias, action)),
        SetOutcome::RejectedByInterlock(reason) => format_warning(&format!(
            "{}: {} refused by interlock ({})",
            alias, action, reason
        )),
        SetOutcome::ProtocolFailure(code) => {
            format_error(&format!("{}: {} failed: {}", alias, action, code))
        }
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}

/// Format warning message
pub fn format_warning(message: &str) -> String {
    format!("{} {}", "!".yellow().bold(), message)
}

/// Format error message
pub fn format_error(message: &str) -> String {
    format!("{} {}", "✗".red().bold(), message)
}
