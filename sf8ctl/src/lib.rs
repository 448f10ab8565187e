//! SF8xxx Console Library
//!
//! This library provides the core functionality of the `sf8ctl` console: the
//! alias registry of open device sessions, the line dispatcher and its output
//! formatting.
//!
//! # Public API
//!
//! [`registry::DeviceRegistry`] owns the sessions and [`console::run_console`]
//! drives it from any line source. Configuration types are available via
//! [`config::CliConfig`] and [`config::ConfigBuilder`].
//!
//! ```no_run
//! use sf8ctl::console::run_console;
//! use sf8ctl::format::OutputFormat;
//! use sf8ctl::registry::DeviceRegistry;
//! use sf8xxx_hardware::SerialSettings;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut registry = DeviceRegistry::new(SerialSettings::default());
//! registry.dial("/dev/ttyUSB0", "left").await?;
//!
//! let script: &[u8] = b"qrd left\nexit\n";
//! run_console(&mut registry, &OutputFormat::Table, script, &mut std::io::stdout()).await?;
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// Configuration types for the console.
pub mod config;

/// Interactive line loop.
pub mod console;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

/// Alias → session registry.
pub mod registry;
