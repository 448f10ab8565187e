//! Interactive console loop
//!
//! Reads one command per line, dispatches it and prints the result. Errors are
//! printed and the loop goes on; only `exit` or end of input leave it, and both
//! hang up every device first.

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::cli::{execute, ConsoleCommand, ConsoleLine, Step};
use crate::format::{format_error, OutputFormat};
use crate::registry::DeviceRegistry;

pub const PROMPT: &str = "> ";
pub const GREETING: &str = "SF8xxx controller. Type \"help\" for commands.";

/// Run the console until `exit` or end of input
pub async fn run_console<R, W>(
    registry: &mut DeviceRegistry,
    format: &OutputFormat,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", GREETING)?;
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            debug!("End of console input");
            writeln!(out)?;
            finish(registry, format, out).await?;
            return Ok(());
        };

        let command = match ConsoleLine::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                // Covers `help` as well as malformed lines
                write!(out, "{}", e)?;
                continue;
            }
        };

        match execute(registry, command, format).await {
            Ok(Step::Continue(output)) => print_block(out, &output)?,
            Ok(Step::Exit(output)) => {
                print_block(out, &output)?;
                return Ok(());
            }
            Err(e) => writeln!(out, "{}", format_error(&e.to_string()))?,
        }
    }
}

async fn finish<W: Write>(
    registry: &mut DeviceRegistry,
    format: &OutputFormat,
    out: &mut W,
) -> Result<()> {
    match execute(registry, ConsoleCommand::Exit, format).await? {
        Step::Exit(output) | Step::Continue(output) => print_block(out, &output)?,
    }
    Ok(())
}

fn print_block<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", text)
}
