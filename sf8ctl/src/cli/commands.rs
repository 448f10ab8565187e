//! CLI command and subcommand definitions
//!
//! [`Cli`] parses the process arguments. [`ConsoleCommand`] parses one line
//! typed at the interactive prompt.

use clap::{Parser, Subcommand};

/// Alias that addresses every connected device
pub const ALL: &str = "all";

/// SF8xxx Controller Console
#[derive(Parser, Debug)]
#[command(name = "sf8ctl")]
#[command(version, about = "SF8xxx laser diode/TEC controller console", long_about = None)]
pub struct Cli {
    /// Output format (overrides config file)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long)]
    pub verbose: Option<bool>,

    /// Log every frame sent and received
    #[arg(long)]
    pub debug_uart: bool,

    /// Response deadline in milliseconds (overrides config file)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Don't load config file
    #[arg(long)]
    pub no_config: bool,

    /// Config file path (default: ~/.config/sf8xxx/console.toml)
    #[arg(long)]
    pub config: Option<String>,

    /// Dial a device before the prompt opens, as PORT=ALIAS (repeatable)
    #[arg(long = "dial", value_name = "PORT=ALIAS", value_parser = parse_dial)]
    pub dial: Vec<(String, String)>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

fn parse_dial(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((port, alias)) if !port.is_empty() && !alias.is_empty() => {
            Ok((port.to_string(), alias.to_string()))
        }
        _ => Err(format!("expected PORT=ALIAS, got '{}'", value)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty table output
    Table,
    /// JSON output
    Json,
}

impl From<&OutputFormat> for crate::format::OutputFormat {
    fn from(format: &OutputFormat) -> Self {
        match format {
            OutputFormat::Table => crate::format::OutputFormat::Table,
            OutputFormat::Json => crate::format::OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive console (default)
    Console,

    /// Connect to one port, print its quick rundown and disconnect
    Qrd {
        /// Serial port (e.g., /dev/ttyUSB0, COM3)
        port: String,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// One line typed at the console prompt
#[derive(Parser, Debug, PartialEq)]
#[command(
    name = "console",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{all-args}\n\n{after-help}",
    after_help = "[device] = \"all\" performs the command for every device (except dial and driver current)."
)]
pub struct ConsoleLine {
    #[command(subcommand)]
    pub command: ConsoleCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ConsoleCommand {
    /// Connect the device at <port>, addressable as <alias>
    Dial { port: String, alias: String },

    /// Disconnect a device
    Hangup {
        /// Alias, or "all"
        target: String,
    },

    /// Quick rundown of device status
    Qrd {
        /// Alias, or "all"
        target: String,
    },

    /// Set device registers for internal control
    Configure {
        /// Alias, or "all"
        target: String,
    },

    /// TEC control
    Tec {
        #[command(subcommand)]
        command: TecCommands,
    },

    /// Laser driver control
    Dri {
        #[command(subcommand)]
        command: DriCommands,
    },

    /// List connected devices with ports
    List,

    /// Exit program
    #[command(alias = "quit")]
    Exit,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum TecCommands {
    /// Turn TEC on or off
    Set {
        /// Alias, or "all"
        target: String,
        #[arg(value_enum)]
        state: Switch,
    },

    /// Set TEC temperature in °C
    Temp {
        /// Alias, or "all"
        target: String,
        #[arg(allow_negative_numbers = true)]
        celsius: f64,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum DriCommands {
    /// Turn driver on or off
    Set {
        /// Alias, or "all"
        target: String,
        #[arg(value_enum)]
        state: Switch,
    },

    /// Set driver current in mA
    Cur {
        alias: String,
        #[arg(allow_negative_numbers = true)]
        milliamps: f64,
    },

    /// Set maximum driver current in mA
    Curmax {
        alias: String,
        #[arg(allow_negative_numbers = true)]
        milliamps: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl ConsoleLine {
    /// Tokenize on whitespace and parse; `Ok(None)` for a blank line
    pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, clap::Error> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(None);
        }
        ConsoleLine::try_parse_from(tokens).map(|parsed| Some(parsed.command))
    }
}
