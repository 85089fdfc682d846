//! Protocol constants and the report frame codec for Razer peripherals
//!
//! Every command and response travels as one 90-byte frame inside a HID
//! feature report:
//!
//! ```text
//! [0]      status
//! [1]      transaction id
//! [2..4]   remaining packets (big-endian)
//! [4]      protocol type
//! [5]      data size
//! [6]      command class
//! [7]      command id
//! [8..88]  arguments
//! [88]     crc (XOR of bytes 2..88)
//! [89]     reserved
//! ```

use zerocopy::byteorder::big_endian::U16;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::TransportError;

/// Size of one frame on the wire
pub const FRAME_SIZE: usize = 90;
/// Size of the argument block inside a frame
pub const ARGUMENTS_SIZE: usize = 80;
/// Report ID prefixed to every feature report
pub const REPORT_ID: u8 = 0x00;
/// Feature report size including the report ID byte
pub const REPORT_SIZE: usize = FRAME_SIZE + 1;

/// Exchange timing constants
pub mod timing {
    /// Attempts per command before giving up on a busy device
    pub const MAX_TRIES: usize = 10;
    /// Delay between attempts (ms)
    pub const RETRY_DELAY_MS: u64 = 500;
    /// Delay after each feature report write (ms)
    pub const SETTLE_DELAY_MS: u64 = 60;
}

/// Byte range covered by the checksum
const CRC_RANGE: std::ops::Range<usize> = 2..88;

/// Frame status bytes
pub mod status {
    pub const NEW_COMMAND: u8 = 0x00;
    pub const BUSY: u8 = 0x01;
    pub const SUCCESSFUL: u8 = 0x02;
    pub const FAILURE: u8 = 0x03;
    pub const NO_RESPONSE: u8 = 0x04;
    pub const NOT_SUPPORTED: u8 = 0x05;
}

/// Command classes and ids
pub mod cmd {
    /// Power / battery command class
    pub const CLASS_POWER: u8 = 0x07;

    pub const GET_BATTERY_LEVEL: u8 = 0x80;
    pub const GET_CHARGING_STATUS: u8 = 0x84;

    /// Get human-readable name for a (class, id) pair
    pub fn name(class: u8, id: u8) -> &'static str {
        match (class, id) {
            (CLASS_POWER, GET_BATTERY_LEVEL) => "GET_BATTERY_LEVEL",
            (CLASS_POWER, GET_CHARGING_STATUS) => "GET_CHARGING_STATUS",
            _ => "UNKNOWN",
        }
    }
}

/// Frame status as carried in byte 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    NewCommand,
    Busy,
    Successful,
    Failure,
    NoResponse,
    NotSupported,
    /// Any byte outside the documented set
    Unknown(u8),
}

impl From<u8> for Status {
    fn from(v: u8) -> Self {
        match v {
            status::NEW_COMMAND => Status::NewCommand,
            status::BUSY => Status::Busy,
            status::SUCCESSFUL => Status::Successful,
            status::FAILURE => Status::Failure,
            status::NO_RESPONSE => Status::NoResponse,
            status::NOT_SUPPORTED => Status::NotSupported,
            other => Status::Unknown(other),
        }
    }
}

impl From<Status> for u8 {
    fn from(s: Status) -> Self {
        match s {
            Status::NewCommand => status::NEW_COMMAND,
            Status::Busy => status::BUSY,
            Status::Successful => status::SUCCESSFUL,
            Status::Failure => status::FAILURE,
            Status::NoResponse => status::NO_RESPONSE,
            Status::NotSupported => status::NOT_SUPPORTED,
            Status::Unknown(v) => v,
        }
    }
}

/// Wire layout of a frame.
#[derive(Debug, Clone, Copy, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
struct WireFrame {
    status: u8,
    transaction_id: u8,
    remaining_packets: U16,
    protocol_type: u8,
    data_size: u8,
    command_class: u8,
    command_id: u8,
    arguments: [u8; ARGUMENTS_SIZE],
    crc: u8,
    reserved: u8,
}

const _: () = assert!(std::mem::size_of::<WireFrame>() == FRAME_SIZE);

/// A command to be sent to a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub class: u8,
    pub id: u8,
    pub data_size: u8,
    pub arguments: [u8; ARGUMENTS_SIZE],
}

impl Command {
    /// Read the battery level (argument 1 = raw level 0-255)
    pub const BATTERY_LEVEL: Command = Command::new(cmd::CLASS_POWER, cmd::GET_BATTERY_LEVEL, 0x02);

    /// Read the charging state (argument 1 = non-zero while charging)
    pub const CHARGING_STATUS: Command =
        Command::new(cmd::CLASS_POWER, cmd::GET_CHARGING_STATUS, 0x02);

    /// Create a command with zeroed arguments
    pub const fn new(class: u8, id: u8, data_size: u8) -> Self {
        Self {
            class,
            id,
            data_size,
            arguments: [0; ARGUMENTS_SIZE],
        }
    }

    /// Copy request arguments into the command (truncated to 80 bytes)
    pub fn with_arguments(mut self, args: &[u8]) -> Self {
        let len = args.len().min(ARGUMENTS_SIZE);
        self.arguments[..len].copy_from_slice(&args[..len]);
        self
    }

    pub fn name(&self) -> &'static str {
        cmd::name(self.class, self.id)
    }
}

/// One decoded 90-byte frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub status: Status,
    pub transaction_id: u8,
    pub remaining_packets: u16,
    pub protocol_type: u8,
    pub data_size: u8,
    pub command_class: u8,
    pub command_id: u8,
    pub arguments: [u8; ARGUMENTS_SIZE],
    pub crc: u8,
    pub reserved: u8,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            status: Status::NewCommand,
            transaction_id: 0,
            remaining_packets: 0,
            protocol_type: 0,
            data_size: 0,
            command_class: 0,
            command_id: 0,
            arguments: [0; ARGUMENTS_SIZE],
            crc: 0,
            reserved: 0,
        }
    }
}

impl Frame {
    /// Build a NEW_COMMAND request frame (crc left at zero)
    pub fn request(transaction_id: u8, command: &Command) -> Self {
        Self {
            status: Status::NewCommand,
            transaction_id,
            data_size: command.data_size,
            command_class: command.class,
            command_id: command.id,
            arguments: command.arguments,
            ..Self::default()
        }
    }

    /// Decode a frame from exactly 90 bytes
    pub fn decode(bytes: &[u8]) -> Result<Self, TransportError> {
        let wire = WireFrame::read_from_bytes(bytes)
            .map_err(|_| TransportError::MalformedFrame { len: bytes.len() })?;

        Ok(Self {
            status: Status::from(wire.status),
            transaction_id: wire.transaction_id,
            remaining_packets: wire.remaining_packets.get(),
            protocol_type: wire.protocol_type,
            data_size: wire.data_size,
            command_class: wire.command_class,
            command_id: wire.command_id,
            arguments: wire.arguments,
            crc: wire.crc,
            reserved: wire.reserved,
        })
    }

    /// Encode to the 90-byte wire layout. The checksum is not computed here.
    pub fn encode(&self) -> [u8; FRAME_SIZE] {
        let wire = WireFrame {
            status: self.status.into(),
            transaction_id: self.transaction_id,
            remaining_packets: U16::new(self.remaining_packets),
            protocol_type: self.protocol_type,
            data_size: self.data_size,
            command_class: self.command_class,
            command_id: self.command_id,
            arguments: self.arguments,
            crc: self.crc,
            reserved: self.reserved,
        };

        let mut out = [0u8; FRAME_SIZE];
        out.copy_from_slice(wire.as_bytes());
        out
    }

    /// XOR of the encoded bytes 2..=87
    pub fn checksum(&self) -> u8 {
        self.encode()[CRC_RANGE].iter().fold(0, |acc, &b| acc ^ b)
    }

    /// Store the computed checksum in `crc`
    pub fn seal(&mut self) {
        self.crc = self.checksum();
    }

    pub fn is_valid(&self) -> bool {
        self.checksum() == self.crc
    }

    /// Whether this response correlates to `request`
    pub fn matches(&self, request: &Frame) -> bool {
        self.remaining_packets == request.remaining_packets
            && self.command_class == request.command_class
            && self.command_id == request.command_id
    }

    /// Build the feature report carrying this frame: `[REPORT_ID] [frame...]`
    pub fn to_report(&self) -> [u8; REPORT_SIZE] {
        let mut buf = [0u8; REPORT_SIZE];
        buf[0] = REPORT_ID;
        buf[1..].copy_from_slice(&self.encode());
        buf
    }
}
