//! Serial driver for low-level hardware communication
//!
//! Provides async request/response I/O with the SF8xxx board: one frame out,
//! one `\r`-terminated frame back, bounded by the read deadline.

use async_trait::async_trait;
use sf8xxx_core::frame::{SET_FRAME_LEN, TERMINATOR};
use sf8xxx_core::{BoardConfig, DefaultBoard, Result, Sf8Error};
use std::time::Duration;
use tokio::time::timeout;
use tokio_serial::{SerialPort, SerialPortBuilderExt, SerialStream};
use tracing::{debug, error, warn};

/// Trait for serial transport abstraction
///
/// This trait enables testing of `DeviceSession` without real hardware
/// by allowing mock implementations.
#[async_trait]
pub trait SerialTransport: Send {
    /// Write one frame and collect the reply up to and including `\r`
    ///
    /// A reply that does not arrive before the deadline is returned as whatever
    /// bytes were read, possibly none. Interpreting that is the codec's job.
    async fn transaction(&mut self, frame: &[u8]) -> Result<Vec<u8>>;

    /// Clear the input buffer
    fn clear_input_buffer(&mut self) -> Result<()>;

    /// Get the port path for diagnostics
    fn port_path(&self) -> Option<&str>;
}

/// Line settings for opening a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    /// Deadline for a whole reply frame, and for each write
    pub timeout: Duration,
    /// Log every TX/RX frame at debug level
    pub debug_uart: bool,
}

impl SerialSettings {
    /// Settings taken from a board's compile-time constants
    pub fn for_board<B: BoardConfig>() -> Self {
        Self {
            baud_rate: B::BAUD_RATE,
            timeout: Duration::from_millis(B::DEFAULT_TIMEOUT_MS),
            debug_uart: false,
        }
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self::for_board::<DefaultBoard>()
    }
}

/// Serial driver for hardware communication
pub struct SerialDriver {
    port: SerialStream,
    port_path: String,
    timeout_duration: Duration,
    debug_uart: bool,
}

impl SerialDriver {
    /// Open a serial port
    ///
    /// # Arguments
    /// * `port_path` - Path to the serial device (e.g., "/dev/ttyUSB0", "COM3")
    /// * `settings` - Baud rate, deadline and UART logging
    pub fn open(port_path: &str, settings: &SerialSettings) -> Result<Self> {
        debug!("Opening serial port: {}", port_path);

        let port = tokio_serial::new(port_path, settings.baud_rate)
            .timeout(settings.timeout)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| {
                error!("Failed to open serial port {}: {}", port_path, e);
                Sf8Error::Connection(format!("Failed to open serial port {}: {}", port_path, e))
            })?;

        debug!("Serial port opened successfully");

        if settings.debug_uart {
            debug!("UART debug logging enabled");
        }

        Ok(Self {
            port,
            port_path: port_path.to_string(),
            timeout_duration: settings.timeout,
            debug_uart: settings.debug_uart,
        })
    }

    /// Send a frame to the serial port
    async fn send(&mut self, frame: &[u8]) -> Result<()> {
        if self.debug_uart {
            debug!("TX: {:?}", String::from_utf8_lossy(frame));
        }

        use tokio::io::AsyncWriteExt;

        timeout(self.timeout_duration, self.port.write_all(frame))
            .await
            .map_err(|_| {
                error!("Write timeout");
                Sf8Error::Timeout("Write operation timed out".to_string())
            })?
            .map_err(|e| {
                error!("Write failed: {}", e);
                Sf8Error::Serial(format!("Write failed: {}", e))
            })?;

        // Flush to ensure data is sent
        timeout(self.timeout_duration, self.port.flush())
            .await
            .map_err(|_| Sf8Error::Timeout("Flush operation timed out".to_string()))?
            .map_err(|e| Sf8Error::Serial(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    /// Read bytes until the terminator or the deadline, whichever comes first
    async fn read_frame(&mut self) -> Result<Vec<u8>> {
        use tokio::io::AsyncBufReadExt;
        use tokio::io::BufReader;

        let mut frame = Vec::with_capacity(SET_FRAME_LEN);
        let mut reader = BufReader::new(&mut self.port);

        let result = timeout(
            self.timeout_duration,
            reader.read_until(TERMINATOR, &mut frame),
        )
        .await;

        match result {
            Ok(Ok(0)) => {
                // EOF indicates device disconnection (USB unplugged, power loss, etc.)
                warn!("Serial port returned EOF - device may have been disconnected");
                Err(Sf8Error::DeviceDisconnected(
                    "Serial port returned EOF - device may have been unplugged".to_string(),
                ))
            }
            Ok(Ok(_)) => {
                if self.debug_uart {
                    debug!("RX: {:?}", String::from_utf8_lossy(&frame));
                }
                Ok(frame)
            }
            Ok(Err(e)) => {
                error!("Read error: {}", e);
                Err(Sf8Error::Serial(format!("Read error: {}", e)))
            }
            Err(_) => {
                if frame.is_empty() {
                    debug!("Read deadline elapsed with no reply");
                } else {
                    warn!(
                        "Read deadline elapsed mid-frame: {:?}",
                        String::from_utf8_lossy(&frame)
                    );
                }
                Ok(frame)
            }
        }
    }

    /// Clear the input buffer
    fn clear_input_buffer_impl(&mut self) -> Result<()> {
        self.port
            .clear(tokio_serial::ClearBuffer::Input)
            .map_err(|e| {
                warn!("Failed to clear input buffer: {}", e);
                Sf8Error::Serial(format!("Failed to clear buffer: {}", e))
            })
    }
}

#[async_trait]
impl SerialTransport for SerialDriver {
    async fn transaction(&mut self, frame: &[u8]) -> Result<Vec<u8>> {
        // Drop stale bytes from an earlier reply that missed its deadline
        self.clear_input_buffer_impl()?;

        self.send(frame).await?;

        self.read_frame().await
    }

    fn clear_input_buffer(&mut self) -> Result<()> {
        self.clear_input_buffer_impl()
    }

    fn port_path(&self) -> Option<&str> {
        Some(&self.port_path)
    }
}

impl Drop for SerialDriver {
    fn drop(&mut self) {
        debug!("Closing serial port: {}", self.port_path);
    }
}

/// Determine if an error indicates device disconnection
///
/// Returns `true` if the error suggests the device has been disconnected
/// (USB unplugged, power loss, etc.) rather than a transient error.
pub fn is_disconnect_error(err: &Sf8Error) -> bool {
    match err {
        Sf8Error::DeviceDisconnected(_) => true,
        Sf8Error::Serial(msg) => {
            let msg_lower = msg.to_lowercase();
            msg_lower.contains("broken pipe")
                || msg_lower.contains("no such device")
                || msg_lower.contains("device disconnected")
                || msg_lower.contains("device not configured")
                || msg_lower.contains("input/output error")
        }
        // Silence within the deadline is a protocol matter, not a lost device
        Sf8Error::NoResponse | Sf8Error::Timeout(_) => false,
        _ => false,
    }
}
