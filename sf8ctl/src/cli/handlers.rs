//! Command execution handlers
//!
//! Every handler returns the text to print. Failures on one device become a
//! line of that text, so neither the console nor a sweep over `all` stops on them.

use anyhow::{bail, Result};
use sf8xxx_core::{SetOutcome, Sf8Error};
use sf8xxx_hardware::{is_disconnect_error, DeviceSession};

use crate::format::{
    format_device_list, format_error, format_outcome, format_rundown, format_success,
    format_warning, DeviceEntry, OutputFormat,
};
use crate::registry::DeviceRegistry;

use super::commands::*;

/// What the console does after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Print and read the next line
    Continue(String),
    /// Print and leave the console
    Exit(String),
}

/// A Set applied to one device
#[derive(Debug, Clone, Copy, PartialEq)]
enum SetAction {
    Configure,
    DriverOn,
    DriverOff,
    TecOn,
    TecOff,
    TecTemperature(f64),
    DriverCurrent(f64),
    DriverCurrentMax(f64),
}

impl SetAction {
    fn describe(&self) -> String {
        match self {
            SetAction::Configure => "configured for internal control".to_string(),
            SetAction::DriverOn => "driver on".to_string(),
            SetAction::DriverOff => "driver off".to_string(),
            SetAction::TecOn => "TEC on".to_string(),
            SetAction::TecOff => "TEC off".to_string(),
            SetAction::TecTemperature(celsius) => format!("TEC temperature {:.2} °C", celsius),
            SetAction::DriverCurrent(ma) => format!("driver current {:.1} mA", ma),
            SetAction::DriverCurrentMax(ma) => format!("driver current max {:.1} mA", ma),
        }
    }

    async fn apply(self, session: &mut DeviceSession) -> sf8xxx_core::Result<SetOutcome> {
        match self {
            SetAction::Configure => session.configure().await,
            SetAction::DriverOn => session.set_driver_on().await,
            SetAction::DriverOff => session.set_driver_off().await,
            SetAction::TecOn => session.set_tec_on().await,
            SetAction::TecOff => session.set_tec_off().await,
            SetAction::TecTemperature(celsius) => session.set_tec_temperature(celsius).await,
            SetAction::DriverCurrent(ma) => session.set_driver_current(ma).await,
            SetAction::DriverCurrentMax(ma) => session.set_driver_current_max(ma).await,
        }
    }
}

fn device_error(alias: &str, err: &Sf8Error) -> String {
    if is_disconnect_error(err) {
        format_error(&format!(
            "{}: {}. Hang up and dial again.",
            alias, err
        ))
    } else {
        format_error(&format!("{}: {}", alias, err))
    }
}

fn no_devices() -> String {
    format_warning("No devices connected.")
}

/// Run `action` on every device `target` resolves to
async fn sweep(registry: &mut DeviceRegistry, target: &str, action: SetAction) -> Result<String> {
    let aliases = registry.targets(target)?;
    if aliases.is_empty() {
        return Ok(no_devices());
    }

    let mut lines = Vec::with_capacity(aliases.len());
    for alias in aliases {
        let session = registry.get_mut(&alias)?;
        let line = match action.apply(session).await {
            Ok(SetOutcome::Applied) if action == SetAction::TecOn && session.tec_off() => {
                format_warning(&format!("{}: Failed to set TEC on. Interlock?", alias))
            }
            Ok(outcome) => format_outcome(&alias, &action.describe(), &outcome),
            Err(e) => device_error(&alias, &e),
        };
        lines.push(line);
    }

    Ok(lines.join("\n"))
}

/// Handle dial command
pub async fn handle_dial(registry: &mut DeviceRegistry, port: &str, alias: &str) -> Result<String> {
    let session = registry.dial(port, alias).await?;
    Ok(format_success(&format!(
        "Connected to SF8xxx #{} on {} as {}",
        session.serial_no(),
        session.port(),
        alias
    )))
}

/// Handle hangup command
pub fn handle_hangup(registry: &mut DeviceRegistry, target: &str) -> Result<String> {
    let aliases = registry.targets(target)?;
    if aliases.is_empty() {
        return Ok(no_devices());
    }

    let mut lines = Vec::with_capacity(aliases.len());
    for alias in aliases {
        let closed = registry.hangup(&alias)?;
        lines.push(format!(
            "Disconnecting {} (SF8xxx #{}) from {}",
            closed.alias, closed.serial_no, closed.port
        ));
    }
    Ok(lines.join("\n"))
}

/// Handle qrd command
pub async fn handle_qrd(
    registry: &mut DeviceRegistry,
    target: &str,
    format: &OutputFormat,
) -> Result<String> {
    let aliases = registry.targets(target)?;
    if aliases.is_empty() {
        return Ok(no_devices());
    }

    let mut sections = Vec::with_capacity(aliases.len());
    for alias in aliases {
        let session = registry.get_mut(&alias)?;
        let section = match session.rundown().await {
            Ok(rundown) => format_rundown(&alias, &rundown, format)?,
            Err(e) => device_error(&alias, &e),
        };
        sections.push(section);
    }
    Ok(sections.join("\n"))
}

/// Handle configure command
pub async fn handle_configure(registry: &mut DeviceRegistry, target: &str) -> Result<String> {
    sweep(registry, target, SetAction::Configure).await
}

/// Handle tec commands
pub async fn handle_tec(registry: &mut DeviceRegistry, command: TecCommands) -> Result<String> {
    match command {
        TecCommands::Set { target, state } => {
            let action = match state {
                Switch::On => SetAction::TecOn,
                Switch::Off => SetAction::TecOff,
            };
            sweep(registry, &target, action).await
        }
        TecCommands::Temp { target, celsius } => {
            sweep(registry, &target, SetAction::TecTemperature(celsius)).await
        }
    }
}

/// Handle dri commands
pub async fn handle_dri(registry: &mut DeviceRegistry, command: DriCommands) -> Result<String> {
    match command {
        DriCommands::Set { target, state } => {
            let action = match state {
                Switch::On => SetAction::DriverOn,
                Switch::Off => SetAction::DriverOff,
            };
            sweep(registry, &target, action).await
        }
        DriCommands::Cur { alias, milliamps } => {
            reject_all(&alias)?;
            sweep(registry, &alias, SetAction::DriverCurrent(milliamps)).await
        }
        DriCommands::Curmax { alias, milliamps } => {
            reject_all(&alias)?;
            sweep(registry, &alias, SetAction::DriverCurrentMax(milliamps)).await
        }
    }
}

fn reject_all(alias: &str) -> Result<()> {
    if alias == ALL {
        bail!("Driver current is set one device at a time, \"{}\" is not accepted", ALL);
    }
    Ok(())
}

/// Handle list command
pub fn handle_list(registry: &DeviceRegistry, format: &OutputFormat) -> Result<String> {
    let devices: Vec<DeviceEntry> = registry
        .iter()
        .map(|(alias, session)| DeviceEntry {
            alias: alias.clone(),
            port: session.port().to_string(),
            serial_no: session.serial_no(),
        })
        .collect();
    format_device_list(&devices, format)
}

/// Dispatch one console command
pub async fn execute(
    registry: &mut DeviceRegistry,
    command: ConsoleCommand,
    format: &OutputFormat,
) -> Result<Step> {
    let output = match command {
        ConsoleCommand::Dial { port, alias } => handle_dial(registry, &port, &alias).await?,
        ConsoleCommand::Hangup { target } => handle_hangup(registry, &target)?,
        ConsoleCommand::Qrd { target } => handle_qrd(registry, &target, format).await?,
        ConsoleCommand::Configure { target } => handle_configure(registry, &target).await?,
        ConsoleCommand::Tec { command } => handle_tec(registry, command).await?,
        ConsoleCommand::Dri { command } => handle_dri(registry, command).await?,
        ConsoleCommand::List => handle_list(registry, format)?,
        ConsoleCommand::Exit => {
            let output = if registry.is_empty() {
                String::new()
            } else {
                handle_hangup(registry, ALL)?
            };
            return Ok(Step::Exit(output));
        }
    };
    Ok(Step::Continue(output))
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
