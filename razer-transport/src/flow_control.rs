//! Flow-control layer: the command exchange state machine
//!
//! `FlowControl` drives one request/response cycle over an open
//! [`FeatureDevice`]: checksum, send, settle, read, validate, correlate and
//! interpret the device status, retrying while the device reports a
//! transient condition.
//!
//! ```text
//! [HidFeatureDevice / fakes]   ← implements FeatureDevice (raw I/O)
//!            |
//!      [FlowControl]           ← adds checksum, echo matching, retries
//!            |
//!   [CommandSession / CLI]
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::TransportError;
use crate::protocol::{timing, Frame, Status, REPORT_ID, REPORT_SIZE};
use crate::FeatureDevice;

/// Blocking delay strategy used between protocol steps
pub trait Pacer {
    fn pause(&self, duration: Duration);
}

/// Real-time pacing via `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleep;

impl Pacer for ThreadSleep {
    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Retry budget and timing for one exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowConfig {
    /// Attempts before giving up (values below 1 are treated as 1)
    pub max_tries: usize,
    /// Wait between attempts while the device is busy
    pub retry_delay: Duration,
    /// Wait after each write before reading the response
    pub settle_delay: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_tries: timing::MAX_TRIES,
            retry_delay: Duration::from_millis(timing::RETRY_DELAY_MS),
            settle_delay: Duration::from_millis(timing::SETTLE_DELAY_MS),
        }
    }
}

/// Exchange driver shared by all sessions
#[derive(Clone)]
pub struct FlowControl {
    config: FlowConfig,
    pacer: Arc<dyn Pacer>,
}

impl Default for FlowControl {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}

impl FlowControl {
    /// Create a flow controller that sleeps in real time
    pub fn new(config: FlowConfig) -> Self {
        Self::with_pacer(config, Arc::new(ThreadSleep))
    }

    /// Create a flow controller with a custom delay strategy
    pub fn with_pacer(config: FlowConfig, pacer: Arc<dyn Pacer>) -> Self {
        Self { config, pacer }
    }

    /// Run one command exchange.
    ///
    /// Seals `request` with its checksum, then sends it until the device
    /// answers `SUCCESSFUL` or the retry budget runs out. Only `BUSY` and
    /// `NO_RESPONSE` are retried; everything else ends the exchange.
    pub fn exchange(
        &self,
        device: &mut dyn FeatureDevice,
        request: &mut Frame,
    ) -> Result<Frame, TransportError> {
        request.seal();
        let report = request.to_report();
        let max_tries = self.config.max_tries.max(1);

        for attempt in 0..max_tries {
            self.send(device, &report)?;
            let response = self.receive(device)?;

            if !response.matches(request) {
                warn!(
                    "Response doesn't match request: sent 0x{:02X}/0x{:02X}, got 0x{:02X}/0x{:02X}",
                    request.command_class,
                    request.command_id,
                    response.command_class,
                    response.command_id
                );
                return Err(TransportError::ProtocolMismatch {
                    expected_class: request.command_class,
                    expected_id: request.command_id,
                    actual_class: response.command_class,
                    actual_id: response.command_id,
                });
            }

            match response.status {
                Status::Successful => {
                    debug!(
                        "Command 0x{:02X}/0x{:02X} successful (attempt {})",
                        request.command_class,
                        request.command_id,
                        attempt + 1
                    );
                    return Ok(response);
                }
                Status::Busy | Status::NoResponse => debug!(
                    "Device reported {:?} (attempt {}/{})",
                    response.status,
                    attempt + 1,
                    max_tries
                ),
                Status::NotSupported => {
                    return Err(TransportError::CommandNotSupported {
                        class: request.command_class,
                        id: request.command_id,
                    });
                }
                Status::Failure => {
                    return Err(TransportError::CommandFailed {
                        class: request.command_class,
                        id: request.command_id,
                    });
                }
                // NEW_COMMAND is never a valid reply
                Status::NewCommand | Status::Unknown(_) => {
                    return Err(TransportError::UnknownStatus(response.status.into()));
                }
            }

            if attempt + 1 < max_tries {
                self.pacer.pause(self.config.retry_delay);
            }
        }

        warn!("Abort command after {} tries", max_tries);
        Err(TransportError::ExchangeAborted { tries: max_tries })
    }

    /// Write one report and wait for the device to process it
    fn send(&self, device: &mut dyn FeatureDevice, report: &[u8]) -> Result<(), TransportError> {
        let written = device.send_feature_report(report)?;
        self.pacer.pause(self.config.settle_delay);

        if written != report.len() {
            return Err(TransportError::ShortWrite {
                expected: report.len(),
                actual: written,
            });
        }
        Ok(())
    }

    /// Read one report and decode the frame behind the report ID byte
    fn receive(&self, device: &mut dyn FeatureDevice) -> Result<Frame, TransportError> {
        let data = device.get_feature_report(REPORT_ID, REPORT_SIZE)?;
        if data.len() != REPORT_SIZE {
            return Err(TransportError::ShortRead {
                expected: REPORT_SIZE,
                actual: data.len(),
            });
        }

        let frame = Frame::decode(&data[1..])?;
        if !frame.is_valid() {
            warn!("CRC failed for response {:02X?}", &data[1..9]);
            return Err(TransportError::ChecksumMismatch {
                expected: frame.checksum(),
                actual: frame.crc,
            });
        }
        Ok(frame)
    }
}
