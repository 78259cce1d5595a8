//! Device registry: the immutable name -> hardware address table.

use std::collections::HashMap;

use pnet::util::MacAddr;

use crate::errors::ConfigError;
use crate::models::Device;

/// Immutable mapping from device name to hardware address, built once per
/// process start and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Registry {
    devices: Vec<Device>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    /// Build a registry from an already-parsed, name-deduplicated device
    /// table. Rejects an empty table: a detector with nothing to listen for
    /// would spin forever asking the capture port for nothing.
    pub fn from_entries(devices: Vec<Device>) -> Result<Self, ConfigError> {
        if devices.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        let by_name = devices
            .iter()
            .enumerate()
            .map(|(idx, device)| (device.name.clone(), idx))
            .collect();

        Ok(Self { devices, by_name })
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&Device> {
        self.by_name.get(name).map(|idx| &self.devices[*idx])
    }

    /// Reverse lookup for a captured frame's address.
    ///
    /// Address compare is case-insensitive by construction: both sides are
    /// parsed `MacAddr` values, never text. If the table maps one address to
    /// several names, the first entry in load order wins.
    pub fn lookup_by_address(&self, address: MacAddr) -> Option<&Device> {
        self.devices.iter().find(|device| device.address == address)
    }

    /// All registered hardware addresses in load order.
    pub fn addresses(&self) -> Vec<MacAddr> {
        self.devices.iter().map(|device| device.address).collect()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac(text: &str) -> MacAddr {
        text.parse().expect("test mac should parse")
    }

    fn sample_registry() -> Registry {
        Registry::from_entries(vec![
            Device::new("phone", mac("aa:bb:cc:dd:ee:ff")),
            Device::new("tablet", mac("11:22:33:44:55:66")),
        ])
        .expect("two devices should build a registry")
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = Registry::from_entries(Vec::new()).expect_err("empty table must fail");
        assert!(matches!(err, ConfigError::EmptyRegistry));
    }

    #[test]
    fn lookup_by_name_finds_configured_device() {
        let registry = sample_registry();
        let device = registry.lookup_by_name("phone").expect("phone is configured");
        assert_eq!(device.address, mac("aa:bb:cc:dd:ee:ff"));
        assert!(registry.lookup_by_name("laptop").is_none());
    }

    #[test]
    fn address_lookup_ignores_text_case() {
        let registry = sample_registry();
        // Uppercase text parses to the same MacAddr value.
        let device = registry
            .lookup_by_address(mac("AA:BB:CC:DD:EE:FF"))
            .expect("case must not matter");
        assert_eq!(device.name, "phone");
    }

    #[test]
    fn duplicate_address_resolves_to_first_entry() {
        let shared = mac("aa:bb:cc:dd:ee:ff");
        let registry = Registry::from_entries(vec![
            Device::new("first", shared),
            Device::new("second", shared),
        ])
        .expect("registry should build");

        let device = registry.lookup_by_address(shared).expect("address is known");
        assert_eq!(device.name, "first");
    }

    #[test]
    fn addresses_preserve_load_order() {
        let registry = sample_registry();
        assert_eq!(
            registry.addresses(),
            vec![mac("aa:bb:cc:dd:ee:ff"), mac("11:22:33:44:55:66")]
        );
    }
}
