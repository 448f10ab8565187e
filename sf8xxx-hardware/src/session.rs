//! Device Session - stateful, interlocked access to one SF8xxx board
//!
//! Owns the transport for one connection, caches the last known enable state of
//! the laser driver and the TEC, and refuses unsafe combinations before any
//! frame is written:
//! - the driver may not be switched on while the TEC is off
//! - the TEC may not be switched off while the driver is on
//!
//! The cached flags only reflect Sets issued through this session. A fault trip
//! on the board is not seen until the next status query.

use crate::serial_driver::{SerialDriver, SerialSettings, SerialTransport};
use sf8xxx_core::registers::control;
use sf8xxx_core::{
    decode, encode_get, encode_set, scaled_value, value_of, CommandFrame, DriverState,
    InterlockReason, LockState, Register, ResponseFrame, Result, Rundown, SetOutcome, Sf8Error,
    StatusWord, TecState,
};
use tracing::{debug, info, warn};

/// Convert a physical quantity to wire counts
///
/// The protocol carries unsigned 16-bit values only, so negative or oversized
/// inputs are rejected instead of wrapped.
pub fn to_wire(physical: f64, scale: u16) -> Result<u16> {
    let max = f64::from(u16::MAX) / f64::from(scale);
    if !physical.is_finite() || physical < 0.0 || physical > max {
        return Err(Sf8Error::ValueOutOfRange {
            value: physical,
            min: 0.0,
            max,
        });
    }
    Ok((physical * f64::from(scale)).round() as u16)
}

/// Session with one board
///
/// Generic over the transport type, allowing real hardware (`SerialDriver`)
/// or mock transports for testing.
pub struct DeviceSession<T: SerialTransport + ?Sized = dyn SerialTransport> {
    transport: Option<Box<T>>,
    port: String,
    serial_no: u16,
    driver_off: bool,
    tec_off: bool,
}

impl DeviceSession {
    /// Open `port` and run the connect handshake
    pub async fn connect(port: &str, settings: &SerialSettings) -> Result<Self> {
        let driver = SerialDriver::open(port, settings)?;
        Self::handshake(Box::new(driver), port).await
    }
}

impl<T: SerialTransport + ?Sized> DeviceSession<T> {
    /// Build a session on an already open transport
    ///
    /// Reads the serial number, then the driver and TEC status words to seed the
    /// interlock cache. On failure the transport is closed and no session is returned.
    pub async fn handshake(transport: Box<T>, port: &str) -> Result<Self> {
        let mut session = Self {
            transport: Some(transport),
            port: port.to_string(),
            serial_no: 0,
            driver_off: true,
            tec_off: true,
        };

        match session.initialize().await {
            Ok(()) => {
                info!(
                    "Connected to SF8xxx #{} on {} (driver {}, TEC {})",
                    session.serial_no,
                    session.port,
                    if session.driver_off { "off" } else { "on" },
                    if session.tec_off { "off" } else { "on" },
                );
                Ok(session)
            }
            Err(e) => {
                session.disconnect();
                Err(Sf8Error::Connection(format!(
                    "Handshake with {} failed: {}",
                    port, e
                )))
            }
        }
    }

    async fn initialize(&mut self) -> Result<()> {
        self.serial_no = self.read_register(Register::SerialNo).await?;
        self.driver_off = !self.driver_state().await?.driver_on;
        self.tec_off = !self.tec_state().await?.tec_on;
        Ok(())
    }

    /// Close the transport; returns `false` if it was already closed
    pub fn disconnect(&mut self) -> bool {
        match self.transport.take() {
            Some(transport) => {
                info!("Disconnecting SF8xxx #{} from {}", self.serial_no, self.port);
                drop(transport);
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    /// Serial number read at connect time
    pub fn serial_no(&self) -> u16 {
        self.serial_no
    }

    /// Cached driver state, as of the last successful Set or the handshake
    pub fn driver_off(&self) -> bool {
        self.driver_off
    }

    /// Cached TEC state, as of the last successful Set or the handshake
    pub fn tec_off(&self) -> bool {
        self.tec_off
    }

    /// Write one frame and classify the reply
    async fn request(&mut self, frame: CommandFrame) -> Result<ResponseFrame> {
        let transport = self.transport.as_deref_mut().ok_or_else(|| {
            Sf8Error::DeviceDisconnected(format!("Session on {} is closed", self.port))
        })?;

        debug!("Request {:?} to {}", frame.kind(), frame.address());
        let raw = transport.transaction(frame.as_bytes()).await?;
        decode(&raw, frame.kind())
    }

    async fn get(&mut self, register: Register) -> Result<ResponseFrame> {
        self.request(encode_get(register.address())).await
    }

    async fn set(&mut self, register: Register, value: u16) -> Result<SetOutcome> {
        match self.request(encode_set(register.address(), value)).await? {
            ResponseFrame::Error(code) => {
                warn!(
                    "SF8xxx #{}: set {} = {:04X} failed: {}",
                    self.serial_no, register, value, code
                );
                Ok(SetOutcome::ProtocolFailure(code))
            }
            ResponseFrame::Success(_) | ResponseFrame::Acknowledged => Ok(SetOutcome::Applied),
        }
    }

    /// Raw unscaled value of any register
    pub async fn read_register(&mut self, register: Register) -> Result<u16> {
        let frame = self.get(register).await?;
        value_of(&frame)
    }

    async fn read_scaled(&mut self, register: Register) -> Result<f64> {
        let scale = register
            .scale()
            .ok_or_else(|| Sf8Error::InvalidInput(format!("{} has no physical scale", register)))?;
        let frame = self.get(register).await?;
        scaled_value(&frame, scale)
    }

    async fn write_scaled(&mut self, register: Register, physical: f64) -> Result<SetOutcome> {
        let scale = register
            .scale()
            .ok_or_else(|| Sf8Error::InvalidInput(format!("{} has no physical scale", register)))?;
        let value = to_wire(physical, scale)?;
        self.set(register, value).await
    }

    async fn status_word(&mut self, register: Register) -> Result<StatusWord> {
        let frame = self.get(register).await?;
        StatusWord::from_frame(&frame)
    }

    pub async fn driver_state(&mut self) -> Result<DriverState> {
        Ok(self.status_word(Register::DriverState).await?.into())
    }

    pub async fn tec_state(&mut self) -> Result<TecState> {
        Ok(self.status_word(Register::TecState).await?.into())
    }

    pub async fn lock_state(&mut self) -> Result<LockState> {
        Ok(self.status_word(Register::LockState).await?.into())
    }

    /// Fresh hardware read of the driver enable bit
    pub async fn driver_on(&mut self) -> Result<bool> {
        Ok(self.driver_state().await?.driver_on)
    }

    /// Fresh hardware read of the TEC enable bit
    pub async fn tec_on(&mut self) -> Result<bool> {
        Ok(self.tec_state().await?.tec_on)
    }

    /// Measured driver current in mA
    pub async fn get_driver_current(&mut self) -> Result<f64> {
        self.read_scaled(Register::DriverCurrentMeasured).await
    }

    /// Driver current setpoint in mA
    pub async fn get_driver_current_setpoint(&mut self) -> Result<f64> {
        self.read_scaled(Register::DriverCurrentValue).await
    }

    /// Driver current ceiling in mA
    pub async fn get_driver_current_max(&mut self) -> Result<f64> {
        self.read_scaled(Register::DriverCurrentMaximum).await
    }

    /// Measured TEC temperature in °C
    pub async fn get_tec_temperature(&mut self) -> Result<f64> {
        self.read_scaled(Register::TecTemperatureMeasured).await
    }

    /// TEC temperature setpoint in °C
    pub async fn get_tec_setpoint(&mut self) -> Result<f64> {
        self.read_scaled(Register::TecTemperatureValue).await
    }

    /// Measured TEC current in A
    pub async fn get_tec_current(&mut self) -> Result<f64> {
        self.read_scaled(Register::TecCurrentMeasured).await
    }

    /// TEC current limit in A
    pub async fn get_tec_current_limit(&mut self) -> Result<f64> {
        self.read_scaled(Register::TecCurrentLimit).await
    }

    /// Full status sweep
    pub async fn rundown(&mut self) -> Result<Rundown> {
        Ok(Rundown {
            serial_no: self.serial_no,
            driver: self.driver_state().await?,
            tec: self.tec_state().await?,
            lock: self.lock_state().await?,
            driver_current_setpoint: self.get_driver_current_setpoint().await?,
            driver_current: self.get_driver_current().await?,
            driver_current_max: self.get_driver_current_max().await?,
            tec_setpoint: self.get_tec_setpoint().await?,
            tec_temperature: self.get_tec_temperature().await?,
            tec_current: self.get_tec_current().await?,
            tec_current_limit: self.get_tec_current_limit().await?,
        })
    }

    /// Put both subsystems under internal control and deny the external NTC
    ///
    /// Stops at the first write the board rejects and returns that outcome.
    pub async fn configure(&mut self) -> Result<SetOutcome> {
        let sequence = [
            (Register::TecState, control::INTERNAL_SETPOINT),
            (Register::TecState, control::INTERNAL_ENABLE),
            (Register::DriverState, control::INTERNAL_SETPOINT),
            (Register::DriverState, control::INTERNAL_ENABLE),
            (Register::DriverState, control::DENY_EXTERNAL_NTC),
        ];

        for (register, flag) in sequence {
            let outcome = self.set(register, flag).await?;
            if !outcome.is_applied() {
                return Ok(outcome);
            }
        }

        debug!("SF8xxx #{} configured for internal control", self.serial_no);
        Ok(SetOutcome::Applied)
    }

    fn reject(&self, reason: InterlockReason) -> SetOutcome {
        warn!("SF8xxx #{}: refused by interlock: {}", self.serial_no, reason);
        SetOutcome::RejectedByInterlock(reason)
    }

    /// Energize the laser driver; refused while the TEC is off
    pub async fn set_driver_on(&mut self) -> Result<SetOutcome> {
        if self.tec_off {
            return Ok(self.reject(InterlockReason::TecOff));
        }

        let outcome = self.set(Register::DriverState, control::ON).await?;
        if outcome.is_applied() {
            self.driver_off = false;
        }
        Ok(outcome)
    }

    /// De-energize the laser driver; always permitted
    pub async fn set_driver_off(&mut self) -> Result<SetOutcome> {
        let outcome = self.set(Register::DriverState, control::OFF).await?;
        if outcome.is_applied() {
            self.driver_off = true;
        }
        Ok(outcome)
    }

    /// Enable temperature control
    ///
    /// The board may accept the write and still keep the TEC off (an open
    /// interlock, for example), so the enable bit is read back. An unconfirmed
    /// enable leaves the cache at "off" and is logged, not returned as an error.
    pub async fn set_tec_on(&mut self) -> Result<SetOutcome> {
        let outcome = self.set(Register::TecState, control::ON).await?;
        if !outcome.is_applied() {
            return Ok(outcome);
        }

        let confirmed = match self.tec_on().await {
            Ok(on) => on,
            Err(e) => {
                warn!("SF8xxx #{}: could not read back TEC state: {}", self.serial_no, e);
                false
            }
        };

        self.tec_off = !confirmed;
        if !confirmed {
            warn!(
                "SF8xxx #{}: TEC did not report on after enable. Interlock?",
                self.serial_no
            );
        }
        Ok(outcome)
    }

    /// Disable temperature control; refused while the driver is on
    pub async fn set_tec_off(&mut self) -> Result<SetOutcome> {
        if !self.driver_off {
            return Ok(self.reject(InterlockReason::DriverOn));
        }

        let outcome = self.set(Register::TecState, control::OFF).await?;
        if outcome.is_applied() {
            self.tec_off = true;
        }
        Ok(outcome)
    }

    /// Driver current setpoint in mA
    pub async fn set_driver_current(&mut self, current_ma: f64) -> Result<SetOutcome> {
        self.write_scaled(Register::DriverCurrentValue, current_ma).await
    }

    /// Driver current ceiling in mA
    pub async fn set_driver_current_max(&mut self, current_ma: f64) -> Result<SetOutcome> {
        self.write_scaled(Register::DriverCurrentMaximum, current_ma).await
    }

    /// TEC temperature setpoint in °C
    pub async fn set_tec_temperature(&mut self, temp_c: f64) -> Result<SetOutcome> {
        self.write_scaled(Register::TecTemperatureValue, temp_c).await
    }
}

impl<T: SerialTransport + ?Sized> Drop for DeviceSession<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockHandle, MockTransport};
    use sf8xxx_core::ProtocolErrorCode;

    const SERIAL_REPLY: &[u8] = b"K0701 1F40\r";

    fn reply(address: &str, payload: &str) -> Vec<u8> {
        format!("K{} {}\r", address, payload).into_bytes()
    }

    /// Session after a successful handshake with the given status payloads
    async fn connected(driver: &str, tec: &str) -> (DeviceSession<MockTransport>, MockHandle) {
        let mock = MockTransport::new("/dev/mock0");
        let handle = mock.handle();
        handle.queue_reply(SERIAL_REPLY);
        handle.queue_reply(&reply("0700", driver));
        handle.queue_reply(&reply("0A1A", tec));

        let session = DeviceSession::handshake(Box::new(mock), "/dev/mock0")
            .await
            .unwrap();
        (session, handle)
    }

    #[tokio::test]
    async fn test_handshake_seeds_identity_and_cache() {
        let (session, handle) = connected("0003", "0002").await;

        assert_eq!(session.serial_no(), 0x1F40);
        assert_eq!(session.port(), "/dev/mock0");
        assert!(!session.driver_off());
        assert!(!session.tec_off());
        assert_eq!(
            handle.sent_frames(),
            vec![b"J0701\r".to_vec(), b"J0700\r".to_vec(), b"J0A1A\r".to_vec()]
        );
    }

    #[tokio::test]
    async fn test_handshake_without_reply_fails_and_closes() {
        let mock = MockTransport::new("/dev/mock0");
        let handle = mock.handle();

        let result = DeviceSession::handshake(Box::new(mock), "/dev/mock0").await;

        assert!(matches!(result, Err(Sf8Error::Connection(_))));
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_handshake_error_frame_fails() {
        let mock = MockTransport::new("/dev/mock0").with_reply(b"E0001\r");
        let handle = mock.handle();

        let result = DeviceSession::handshake(Box::new(mock), "/dev/mock0").await;

        assert!(matches!(result, Err(Sf8Error::Connection(msg)) if msg.contains("E0001")));
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_driver_on_rejected_while_tec_off() {
        let (mut session, handle) = connected("0000", "0000").await;
        let before = handle.sent_frames().len();

        let outcome = session.set_driver_on().await.unwrap();

        assert_eq!(outcome, SetOutcome::RejectedByInterlock(InterlockReason::TecOff));
        assert_eq!(handle.sent_frames().len(), before);
        assert!(session.driver_off());
    }

    #[tokio::test]
    async fn test_driver_on_applied_while_tec_on() {
        let (mut session, handle) = connected("0000", "0002").await;

        let outcome = session.set_driver_on().await.unwrap();

        assert_eq!(outcome, SetOutcome::Applied);
        assert!(!session.driver_off());
        assert_eq!(handle.sent_frames().last().unwrap(), b"P0700 0008\r");
    }

    #[tokio::test]
    async fn test_tec_off_rejected_while_driver_on() {
        let (mut session, handle) = connected("0002", "0002").await;
        let before = handle.sent_frames().len();

        let outcome = session.set_tec_off().await.unwrap();

        assert_eq!(outcome, SetOutcome::RejectedByInterlock(InterlockReason::DriverOn));
        assert_eq!(handle.sent_frames().len(), before);
        assert!(!session.tec_off());
    }

    #[tokio::test]
    async fn test_driver_off_then_tec_off() {
        let (mut session, handle) = connected("0002", "0002").await;

        assert_eq!(session.set_driver_off().await.unwrap(), SetOutcome::Applied);
        assert!(session.driver_off());

        assert_eq!(session.set_tec_off().await.unwrap(), SetOutcome::Applied);
        assert!(session.tec_off());

        let sent = handle.sent_frames();
        assert_eq!(sent[sent.len() - 2], b"P0700 0010\r");
        assert_eq!(sent[sent.len() - 1], b"P0A1A 0010\r");
    }

    #[tokio::test]
    async fn test_tec_on_confirmed_by_readback() {
        let (mut session, handle) = connected("0000", "0000").await;
        handle.queue_reply(b"");
        handle.queue_reply(&reply("0A1A", "0002"));

        let outcome = session.set_tec_on().await.unwrap();

        assert_eq!(outcome, SetOutcome::Applied);
        assert!(!session.tec_off());
        let sent = handle.sent_frames();
        assert_eq!(sent[sent.len() - 2], b"P0A1A 0008\r");
        assert_eq!(sent[sent.len() - 1], b"J0A1A\r");
    }

    #[tokio::test]
    async fn test_tec_on_unconfirmed_keeps_cache_off() {
        let (mut session, handle) = connected("0000", "0000").await;
        handle.queue_reply(b"");
        handle.queue_reply(&reply("0A1A", "0000"));

        let outcome = session.set_tec_on().await.unwrap();

        assert_eq!(outcome, SetOutcome::Applied);
        assert!(session.tec_off());

        // Driver stays locked out
        let outcome = session.set_driver_on().await.unwrap();
        assert_eq!(outcome, SetOutcome::RejectedByInterlock(InterlockReason::TecOff));
    }

    #[tokio::test]
    async fn test_tec_on_readback_silence_is_unconfirmed() {
        let (mut session, _handle) = connected("0000", "0002").await;

        // Ack for the write, nothing for the readback
        let outcome = session.set_tec_on().await.unwrap();

        assert_eq!(outcome, SetOutcome::Applied);
        assert!(session.tec_off());
    }

    #[tokio::test]
    async fn test_set_protocol_failure_leaves_cache() {
        let (mut session, handle) = connected("0002", "0002").await;
        handle.queue_reply(b"E0002\r");

        let outcome = session.set_driver_off().await.unwrap();

        assert_eq!(outcome, SetOutcome::ProtocolFailure(ProtocolErrorCode::Crc));
        assert!(!session.driver_off());
    }

    #[tokio::test]
    async fn test_set_driver_current_scales_to_wire() {
        let (mut session, handle) = connected("0000", "0000").await;

        let outcome = session.set_driver_current(123.0).await.unwrap();

        assert_eq!(outcome, SetOutcome::Applied);
        assert_eq!(handle.sent_frames().last().unwrap(), b"P0300 04CE\r");
    }

    #[tokio::test]
    async fn test_set_driver_current_max_and_tec_temperature() {
        let (mut session, handle) = connected("0000", "0000").await;

        session.set_driver_current_max(500.0).await.unwrap();
        session.set_tec_temperature(25.0).await.unwrap();

        let sent = handle.sent_frames();
        assert_eq!(sent[sent.len() - 2], b"P0302 1388\r");
        assert_eq!(sent[sent.len() - 1], b"P0A10 09C4\r");
    }

    #[tokio::test]
    async fn test_negative_setpoint_rejected_before_write() {
        let (mut session, handle) = connected("0000", "0000").await;
        let before = handle.sent_frames().len();

        let result = session.set_tec_temperature(-5.0).await;

        assert!(matches!(result, Err(Sf8Error::ValueOutOfRange { .. })));
        assert_eq!(handle.sent_frames().len(), before);
    }

    #[tokio::test]
    async fn test_get_tec_temperature_scaling() {
        let (mut session, handle) = connected("0000", "0002").await;
        handle.queue_reply(&reply("0A15", "2710"));

        let temperature = session.get_tec_temperature().await.unwrap();

        assert_eq!(temperature, 100.0);
        assert_eq!(handle.sent_frames().last().unwrap(), b"J0A15\r");
        assert!(!session.tec_off());
    }

    #[tokio::test]
    async fn test_get_without_reply_is_no_response() {
        let (mut session, _handle) = connected("0000", "0000").await;

        let result = session.get_driver_current().await;

        assert!(matches!(result, Err(Sf8Error::NoResponse)));
    }

    #[tokio::test]
    async fn test_get_error_frame_is_protocol_error() {
        let (mut session, handle) = connected("0000", "0000").await;
        handle.queue_reply(b"E0042\r");

        let result = session.get_tec_current_limit().await;

        assert!(matches!(
            result,
            Err(Sf8Error::Protocol(ProtocolErrorCode::Unknown(code))) if code == "0042"
        ));
    }

    #[tokio::test]
    async fn test_lock_state_query() {
        let (mut session, handle) = connected("0000", "0000").await;
        handle.queue_reply(&reply("0800", "0012"));

        let lock = session.lock_state().await.unwrap();

        assert!(lock.interlock);
        assert!(lock.ld_overheat);
        assert!(!lock.ld_overcurrent);
        assert_eq!(handle.sent_frames().last().unwrap(), b"J0800\r");
    }

    #[tokio::test]
    async fn test_configure_sequence() {
        let (mut session, handle) = connected("0000", "0000").await;
        let before = handle.sent_frames().len();

        assert_eq!(session.configure().await.unwrap(), SetOutcome::Applied);

        let sent = handle.sent_frames()[before..].to_vec();
        assert_eq!(
            sent,
            vec![
                b"P0A1A 0020\r".to_vec(),
                b"P0A1A 0400\r".to_vec(),
                b"P0700 0020\r".to_vec(),
                b"P0700 0400\r".to_vec(),
                b"P0700 4000\r".to_vec(),
            ]
        );
    }

    #[tokio::test]
    async fn test_configure_stops_at_first_failure() {
        let (mut session, handle) = connected("0000", "0000").await;
        let before = handle.sent_frames().len();
        handle.queue_reply(b"");
        handle.queue_reply(b"E0000\r");

        let outcome = session.configure().await.unwrap();

        assert_eq!(outcome, SetOutcome::ProtocolFailure(ProtocolErrorCode::NoTerminator));
        assert_eq!(handle.sent_frames().len() - before, 2);
    }

    #[tokio::test]
    async fn test_rundown() {
        let (mut session, handle) = connected("0000", "0002").await;
        for (address, payload) in [
            ("0700", "0013"),
            ("0A1A", "0016"),
            ("0800", "0000"),
            ("0300", "04CE"),
            ("0307", "04C4"),
            ("0302", "1388"),
            ("0A10", "09C4"),
            ("0A15", "09BA"),
            ("0A16", "000C"),
            ("0A17", "001E"),
        ] {
            handle.queue_reply(&reply(address, payload));
        }

        let rundown = session.rundown().await.unwrap();

        assert_eq!(rundown.serial_no, 0x1F40);
        assert!(rundown.driver.driver_on);
        assert!(rundown.tec.tec_on);
        assert!(!rundown.lock.any());
        assert_eq!(rundown.driver_current_setpoint, 123.0);
        assert_eq!(rundown.driver_current, 122.0);
        assert_eq!(rundown.driver_current_max, 500.0);
        assert_eq!(rundown.tec_setpoint, 25.0);
        assert_eq!(rundown.tec_temperature, 24.9);
        assert_eq!(rundown.tec_current, 1.2);
        assert_eq!(rundown.tec_current_limit, 3.0);
    }

    #[tokio::test]
    async fn test_read_register_raw() {
        let (mut session, handle) = connected("0000", "0000").await;
        handle.queue_reply(&reply("0407", "00C8"));

        assert_eq!(session.read_register(Register::DriverVoltageMeasured).await.unwrap(), 200);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let (mut session, handle) = connected("0000", "0000").await;

        assert!(session.disconnect());
        assert!(handle.is_closed());
        assert!(!session.is_connected());
        assert!(!session.disconnect());

        let before = handle.sent_frames().len();
        let result = session.get_tec_setpoint().await;
        assert!(matches!(result, Err(Sf8Error::DeviceDisconnected(_))));
        assert_eq!(handle.sent_frames().len(), before);
    }

    #[tokio::test]
    async fn test_drop_closes_transport() {
        let (session, handle) = connected("0000", "0000").await;
        drop(session);
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_transport_disconnect_surfaces_without_closing_session() {
        let (mut session, handle) = connected("0000", "0000").await;
        handle.queue_disconnect();

        let result = session.get_driver_current().await;

        assert!(matches!(result, Err(Sf8Error::DeviceDisconnected(_))));
        assert!(session.is_connected());
    }

    #[test]
    fn test_to_wire() {
        assert_eq!(to_wire(123.0, 10).unwrap(), 1230);
        assert_eq!(to_wire(25.5, 100).unwrap(), 2550);
        assert_eq!(to_wire(0.0, 100).unwrap(), 0);
        assert_eq!(to_wire(655.35, 100).unwrap(), 0xFFFF);
        assert!(to_wire(-0.1, 10).is_err());
        assert!(to_wire(6553.6, 10).is_err());
        assert!(to_wire(f64::NAN, 10).is_err());
    }
}
