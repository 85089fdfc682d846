//! Device layer for Razer wireless mice
//!
//! [`DeviceRegistry`] matches connected HID interfaces against the catalog
//! and keeps one [`CommandSession`] per match. Sessions expose the battery
//! and charging queries on top of the transport's exchange state machine.

pub mod error;
pub mod registry;
pub mod session;

pub use error::DeviceError;
pub use registry::{DeviceChanges, DeviceRegistry};
pub use session::{battery_percent, CommandSession};

pub use razer_transport::{Catalog, DeviceDescriptor, FlowConfig, FlowControl};
