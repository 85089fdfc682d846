//! Device registry - catalog matching and session lifecycle

use std::collections::BTreeSet;
use std::sync::Arc;

use razer_transport::{Catalog, DeviceDescriptor, FlowControl, HidBackend, InterfaceInfo};
use tracing::{debug, info};

use crate::error::DeviceError;
use crate::session::CommandSession;

/// Product ids that appeared or disappeared during one refresh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceChanges {
    pub removed: BTreeSet<u16>,
    pub added: BTreeSet<u16>,
}

impl DeviceChanges {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Whether an enumerated interface is the control interface of `descriptor`
fn interface_matches(
    descriptor: &DeviceDescriptor,
    candidate: &InterfaceInfo,
    usage_subdivided: bool,
) -> bool {
    if candidate.interface_number != descriptor.interface {
        return false;
    }
    !usage_subdivided
        || (candidate.usage_page == descriptor.usage_page && candidate.usage == descriptor.usage)
}

/// Set of sessions for the currently connected devices
pub struct DeviceRegistry {
    backend: Arc<dyn HidBackend>,
    catalog: Catalog,
    flow: FlowControl,
    sessions: Vec<CommandSession>,
}

impl DeviceRegistry {
    /// Create an empty registry; call [`DeviceRegistry::refresh`] to populate it
    pub fn new(backend: Arc<dyn HidBackend>, catalog: Catalog, flow: FlowControl) -> Self {
        Self {
            backend,
            catalog,
            flow,
            sessions: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Sessions in registration order
    pub fn sessions(&self) -> &[CommandSession] {
        &self.sessions
    }

    /// Re-enumerate all catalog entries and replace the session set.
    ///
    /// On an enumeration error the previous sessions are kept.
    pub fn refresh(&mut self) -> Result<DeviceChanges, DeviceError> {
        let fresh = self.scan()?;

        let old_ids: BTreeSet<u16> = self.sessions.iter().map(|s| s.product_id()).collect();
        let new_ids: BTreeSet<u16> = fresh.iter().map(|s| s.product_id()).collect();

        let changes = DeviceChanges {
            removed: old_ids.difference(&new_ids).copied().collect(),
            added: new_ids.difference(&old_ids).copied().collect(),
        };

        for pid in &changes.removed {
            info!("Device 0x{:04X} disconnected", pid);
        }
        for pid in &changes.added {
            info!("Device 0x{:04X} connected", pid);
        }

        self.sessions = fresh;
        Ok(changes)
    }

    /// Build a session for every matching interface of every catalog entry
    fn scan(&self) -> Result<Vec<CommandSession>, DeviceError> {
        let usage_subdivided = self.backend.usage_subdivided();
        let mut sessions = Vec::new();

        for descriptor in self.catalog.devices() {
            let candidates = self
                .backend
                .enumerate(descriptor.vendor_id, descriptor.product_id)?;

            for candidate in candidates
                .iter()
                .filter(|c| interface_matches(descriptor, c, usage_subdivided))
            {
                let transaction_id = self.catalog.transaction_id_for(descriptor.product_id);
                debug!(
                    "Matched {} (0x{:04X}) at {} with transaction id 0x{:02X}",
                    descriptor.name, descriptor.product_id, candidate.path, transaction_id
                );
                sessions.push(CommandSession::new(
                    Arc::clone(&self.backend),
                    self.flow.clone(),
                    descriptor.name.clone(),
                    descriptor.product_id,
                    candidate.path.clone(),
                    transaction_id,
                ));
            }
        }

        Ok(sessions)
    }

    /// First session registered for `pid`
    pub fn resolve(&self, pid: u16) -> Result<&CommandSession, DeviceError> {
        self.sessions
            .iter()
            .find(|s| s.product_id() == pid)
            .ok_or(DeviceError::UnknownDevice(pid))
    }

    /// Every session registered for `pid`, in registration order
    pub fn resolve_all(&self, pid: u16) -> impl Iterator<Item = &CommandSession> {
        self.sessions.iter().filter(move |s| s.product_id() == pid)
    }

    pub fn device_name(&self, pid: u16) -> Result<&str, DeviceError> {
        Ok(self.resolve(pid)?.name())
    }

    /// Battery percent for `pid`, -1 when the query fails
    pub fn battery_level(&self, pid: u16) -> Result<i32, DeviceError> {
        Ok(self.resolve(pid)?.query_battery_level())
    }

    pub fn is_charging(&self, pid: u16) -> Result<bool, DeviceError> {
        Ok(self.resolve(pid)?.query_charging_status())
    }
}
