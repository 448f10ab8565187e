//! SF8xxx Console
//!
//! Command-line console for SF8xxx laser diode driver/TEC controllers.

use anyhow::Result;
use clap::Parser;
use sf8ctl::cli::{generate_completion, handle_dial, Cli, Commands, OutputFormat};
use sf8ctl::config::{default_config_path, CliConfig};
use sf8ctl::console::run_console;
use sf8ctl::format::{self, format_error, format_rundown};
use sf8ctl::registry::DeviceRegistry;
use sf8xxx_hardware::DeviceSession;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completion { shell }) = cli.command {
        generate_completion(shell);
        return Ok(());
    }

    // Priority chain: CLI args → env → file → defaults; each layer only fills gaps
    let mut builder = CliConfig::builder();

    if let Some(ref format) = cli.format {
        let format_str = match format {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        };
        builder = builder.with_output_format(format_str)?;
    }
    if let Some(verbose) = cli.verbose {
        builder = builder.with_verbose(verbose);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        builder = builder.with_timeout_ms(timeout_ms)?;
    }
    if cli.debug_uart {
        builder = builder.with_debug_uart(true);
    }

    builder = builder.with_env_overrides();

    let config_path = if cli.no_config {
        None
    } else {
        Some(cli.config.as_deref().map(PathBuf::from).unwrap_or_else(default_config_path))
    };
    builder = builder.with_config_file(config_path.as_deref())?;

    // Build final configuration with validation
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            if cli.verbose.unwrap_or(false) {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    };

    init_tracing(config.verbose);
    if let Some(path) = &config_path {
        debug!("Configuration file: {}", path.display());
    }

    let output_format = match config.output_format.as_str() {
        "json" => format::OutputFormat::Json,
        _ => format::OutputFormat::Table,
    };
    let settings = config.serial_settings();

    let result = match cli.command.unwrap_or(Commands::Console) {
        Commands::Qrd { port } => quick_rundown(&port, &settings, &output_format).await,
        Commands::Console => {
            let mut registry = DeviceRegistry::new(settings);

            // Config devices first, then --dial flags
            let startup = config
                .devices
                .iter()
                .map(|(alias, port)| (port.clone(), alias.clone()))
                .chain(cli.dial.iter().cloned());
            for (port, alias) in startup {
                match handle_dial(&mut registry, &port, &alias).await {
                    Ok(line) => println!("{}", line),
                    Err(e) => println!("{}", format_error(&e.to_string())),
                }
            }

            let stdin = BufReader::new(tokio::io::stdin());
            run_console(&mut registry, &output_format, stdin, &mut std::io::stdout()).await
        }
        Commands::Completion { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if config.verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Connect, print one rundown, disconnect
async fn quick_rundown(
    port: &str,
    settings: &sf8xxx_hardware::SerialSettings,
    output_format: &format::OutputFormat,
) -> Result<()> {
    let mut session = DeviceSession::connect(port, settings).await?;
    let rundown = session.rundown().await;
    session.disconnect();

    println!("{}", format_rundown(port, &rundown?, output_format)?);
    Ok(())
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout belongs to the console
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("SF8xxx console {}", env!("CARGO_PKG_VERSION"));
}
