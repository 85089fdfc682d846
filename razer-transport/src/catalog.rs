//! Device catalog - known Razer devices and their transaction families
//!
//! The catalog is the single source of truth for which HID interfaces are
//! probed and which transaction id a device expects. Product ids are grouped
//! into named families; any id outside every group uses the default family.

use serde::{Deserialize, Serialize};

/// Razer vendor ID
pub const VENDOR_ID: u16 = 0x1532;

/// Known product IDs
pub mod pid {
    pub const BASILISK_V3_PRO_WIRED: u16 = 0x00AA;
    pub const BASILISK_V3_PRO_WIRELESS: u16 = 0x00AB;
    pub const DEATHADDER_V2_PRO_WIRED: u16 = 0x007C;
    pub const DEATHADDER_V2_PRO_WIRELESS: u16 = 0x007D;
    pub const NAGA_PRO_WIRED: u16 = 0x008F;
    pub const NAGA_PRO_WIRELESS: u16 = 0x0090;
}

/// Control interface number on all supported mice
pub const INTERFACE_CONTROL: i32 = 0;
/// Generic desktop usage page
pub const USAGE_PAGE_GENERIC_DESKTOP: u16 = 0x01;
/// Mouse usage (generic desktop)
pub const USAGE_MOUSE: u16 = 0x02;

/// Protocol revision group a device belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionFamily {
    /// Older wireless mice and anything not listed elsewhere
    #[default]
    Legacy,
    /// Newer HyperSpeed-era mice
    Modern,
}

impl TransactionFamily {
    /// Transaction id stamped into every request for this family
    pub const fn transaction_id(self) -> u8 {
        match self {
            TransactionFamily::Legacy => 0x3F,
            TransactionFamily::Modern => 0x1F,
        }
    }
}

/// Product ids sharing one transaction family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyGroup {
    pub family: TransactionFamily,
    pub product_ids: Vec<u16>,
}

fn default_vendor_id() -> u16 {
    VENDOR_ID
}

/// One addressable device variant (wired and wireless are separate entries)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Display name
    pub name: String,
    pub product_id: u16,
    #[serde(default = "default_vendor_id")]
    pub vendor_id: u16,
    /// Required USB interface number
    pub interface: i32,
    /// Required HID usage page (checked only on usage-subdivided platforms)
    pub usage_page: u16,
    /// Required HID usage (checked only on usage-subdivided platforms)
    pub usage: u16,
}

impl DeviceDescriptor {
    /// Descriptor for a mouse control interface with the standard usages
    pub fn mouse(name: &str, product_id: u16) -> Self {
        Self {
            name: name.to_string(),
            product_id,
            vendor_id: VENDOR_ID,
            interface: INTERFACE_CONTROL,
            usage_page: USAGE_PAGE_GENERIC_DESKTOP,
            usage: USAGE_MOUSE,
        }
    }
}

/// All built-in device variants, in probe order
const BUILTIN_DEVICES: &[(&str, u16)] = &[
    ("Razer Basilisk V3 Pro", pid::BASILISK_V3_PRO_WIRED),
    ("Razer Basilisk V3 Pro", pid::BASILISK_V3_PRO_WIRELESS),
    ("Razer DeathAdder V2 Pro", pid::DEATHADDER_V2_PRO_WIRED),
    ("Razer DeathAdder V2 Pro", pid::DEATHADDER_V2_PRO_WIRELESS),
    ("Razer Naga Pro", pid::NAGA_PRO_WIRED),
    ("Razer Naga Pro", pid::NAGA_PRO_WIRELESS),
];

/// Product ids that need the modern transaction id
const MODERN_PIDS: &[u16] = &[
    pid::NAGA_PRO_WIRED,
    pid::NAGA_PRO_WIRELESS,
    pid::BASILISK_V3_PRO_WIRED,
    pid::BASILISK_V3_PRO_WIRELESS,
];

/// Product ids explicitly on the legacy transaction id
const LEGACY_PIDS: &[u16] = &[pid::DEATHADDER_V2_PRO_WIRED, pid::DEATHADDER_V2_PRO_WIRELESS];

/// Ordered device table plus family groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    devices: Vec<DeviceDescriptor>,
    families: Vec<FamilyGroup>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn new(devices: Vec<DeviceDescriptor>, families: Vec<FamilyGroup>) -> Self {
        Self { devices, families }
    }

    /// Catalog of all devices known to this crate
    pub fn builtin() -> Self {
        Self {
            devices: builtin_devices(),
            families: builtin_families(),
        }
    }

    /// Device variants in probe order
    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    pub fn families(&self) -> &[FamilyGroup] {
        &self.families
    }

    /// Family for a product id; the first matching group wins
    pub fn family_for(&self, pid: u16) -> TransactionFamily {
        self.families
            .iter()
            .find(|group| group.product_ids.contains(&pid))
            .map(|group| group.family)
            .unwrap_or_default()
    }

    /// Transaction id a session for `pid` must use
    pub fn transaction_id_for(&self, pid: u16) -> u8 {
        self.family_for(pid).transaction_id()
    }
}

/// Built-in device table as owned descriptors
pub fn builtin_devices() -> Vec<DeviceDescriptor> {
    BUILTIN_DEVICES
        .iter()
        .map(|&(name, pid)| DeviceDescriptor::mouse(name, pid))
        .collect()
}

/// Built-in family groups
pub fn builtin_families() -> Vec<FamilyGroup> {
    vec![
        FamilyGroup {
            family: TransactionFamily::Modern,
            product_ids: MODERN_PIDS.to_vec(),
        },
        FamilyGroup {
            family: TransactionFamily::Legacy,
            product_ids: LEGACY_PIDS.to_vec(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modern_pids() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.transaction_id_for(pid::NAGA_PRO_WIRED), 0x1F);
        assert_eq!(catalog.transaction_id_for(pid::NAGA_PRO_WIRELESS), 0x1F);
        assert_eq!(catalog.transaction_id_for(pid::BASILISK_V3_PRO_WIRED), 0x1F);
        assert_eq!(catalog.transaction_id_for(pid::BASILISK_V3_PRO_WIRELESS), 0x1F);
    }

    #[test]
    fn test_legacy_pids() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.transaction_id_for(pid::DEATHADDER_V2_PRO_WIRED), 0x3F);
        assert_eq!(catalog.transaction_id_for(pid::DEATHADDER_V2_PRO_WIRELESS), 0x3F);
    }

    #[test]
    fn test_unlisted_pid_uses_default_family() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.family_for(0x0000), TransactionFamily::Legacy);
        assert_eq!(catalog.transaction_id_for(0xBEEF), 0x3F);
    }

    #[test]
    fn test_first_group_wins() {
        let catalog = Catalog::new(
            Vec::new(),
            vec![
                FamilyGroup {
                    family: TransactionFamily::Modern,
                    product_ids: vec![0x0042],
                },
                FamilyGroup {
                    family: TransactionFamily::Legacy,
                    product_ids: vec![0x0042],
                },
            ],
        );
        assert_eq!(catalog.family_for(0x0042), TransactionFamily::Modern);
    }

    #[test]
    fn test_builtin_devices() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.devices().len(), 6);
        for device in catalog.devices() {
            assert_eq!(device.vendor_id, VENDOR_ID);
            assert_eq!(device.interface, INTERFACE_CONTROL);
            assert_eq!(device.usage_page, USAGE_PAGE_GENERIC_DESKTOP);
            assert_eq!(device.usage, USAGE_MOUSE);
        }
        assert_eq!(catalog.devices()[0].product_id, pid::BASILISK_V3_PRO_WIRED);
    }
}
