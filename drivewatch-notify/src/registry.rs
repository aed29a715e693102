// SPDX-License-Identifier: GPL-3.0-only

//! Scheme-to-transport routing, fixed at startup.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use drivewatch_contracts::NotificationTransport;

use crate::transport::{ProviderTransport, ScriptTransport, WebhookTransport, scheme_of};

/// Static table mapping URI scheme to the transport that claims it.
///
/// Unknown schemes are not an error at lookup time; the dispatcher turns a
/// missing route into a per-endpoint failure so the rest of the dispatch
/// still runs.
pub struct TransportRegistry {
    routes: HashMap<&'static str, Arc<dyn NotificationTransport>>,
}

impl TransportRegistry {
    /// Registry with the built-in transports, sharing one HTTP client.
    pub fn build_default(request_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        let mut registry = Self {
            routes: HashMap::new(),
        };
        registry.register(Arc::new(WebhookTransport::new(client.clone())));
        registry.register(Arc::new(ScriptTransport));
        registry.register(Arc::new(ProviderTransport::new(client)));
        registry
    }

    /// Claim every scheme the transport reports. Later registrations win,
    /// which lets callers override a built-in.
    pub fn register(&mut self, transport: Arc<dyn NotificationTransport>) {
        for scheme in transport.schemes() {
            self.routes.insert(scheme, Arc::clone(&transport));
        }
    }

    /// Transport for the endpoint's scheme, if any is registered.
    pub fn route_for(&self, endpoint: &str) -> Option<Arc<dyn NotificationTransport>> {
        let scheme = scheme_of(endpoint)?;
        self.routes.get(scheme.as_str()).cloned()
    }

    pub fn schemes(&self) -> Vec<&'static str> {
        let mut schemes: Vec<_> = self.routes.keys().copied().collect();
        schemes.sort_unstable();
        schemes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_routes_builtin_schemes() {
        let registry = TransportRegistry::build_default(Duration::from_secs(5));
        for endpoint in [
            "http://example.com/hook",
            "https://example.com/hook",
            "script:///usr/local/bin/alert",
            "discord://token@channel",
            "telegram://token@telegram?chats=1",
            "gotify://push.example.com/token",
        ] {
            assert!(registry.route_for(endpoint).is_some(), "{endpoint}");
        }
    }

    #[test]
    fn unknown_scheme_has_no_route() {
        let registry = TransportRegistry::build_default(Duration::from_secs(5));
        assert!(registry.route_for("carrierpigeon://coop/12").is_none());
        assert!(registry.route_for("not a uri").is_none());
    }
}
