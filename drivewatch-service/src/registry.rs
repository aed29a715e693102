// SPDX-License-Identifier: GPL-3.0-only

//! Insertion-ordered device registry
//!
//! Process-wide shared state, read and written by many concurrent request
//! handlers. Registration order is load-bearing: summaries are returned in
//! the order devices were first registered.

use std::collections::HashMap;

use parking_lot::RwLock;

use drivewatch_types::DeviceIdentity;

#[derive(Default)]
struct RegistryState {
    /// WWNs in first-registration order
    order: Vec<String>,
    devices: HashMap<String, DeviceIdentity>,
}

#[derive(Default)]
pub struct DeviceRegistry {
    state: RwLock<RegistryState>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a batch of descriptors and return the accepted set.
    ///
    /// The key and the first-registration position never change; metadata
    /// (including the reported device type) is refreshed from the incoming
    /// descriptor.
    pub fn register(&self, descriptors: Vec<DeviceIdentity>) -> Vec<DeviceIdentity> {
        let mut state = self.state.write();
        let mut accepted = Vec::with_capacity(descriptors.len());
        for mut descriptor in descriptors {
            match state.devices.get_mut(&descriptor.wwn) {
                Some(existing) => {
                    descriptor.wwn = existing.wwn.clone();
                    *existing = descriptor.clone();
                }
                None => {
                    tracing::info!(wwn = %descriptor.wwn, model = %descriptor.model_name, "device registered");
                    state.order.push(descriptor.wwn.clone());
                    state
                        .devices
                        .insert(descriptor.wwn.clone(), descriptor.clone());
                }
            }
            accepted.push(descriptor);
        }
        accepted
    }

    pub fn get(&self, wwn: &str) -> Option<DeviceIdentity> {
        self.state.read().devices.get(wwn).cloned()
    }

    pub fn contains(&self, wwn: &str) -> bool {
        self.state.read().devices.contains_key(wwn)
    }

    /// All devices, in first-registration order.
    pub fn list(&self) -> Vec<DeviceIdentity> {
        let state = self.state.read();
        state
            .order
            .iter()
            .filter_map(|wwn| state.devices.get(wwn).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
