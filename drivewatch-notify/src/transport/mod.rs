// SPDX-License-Identifier: GPL-3.0-only

pub mod provider;
pub mod script;
pub mod webhook;

pub use provider::ProviderTransport;
pub use script::ScriptTransport;
pub use webhook::WebhookTransport;

/// Scheme portion of an endpoint URI, lowercase.
pub(crate) fn scheme_of(endpoint: &str) -> Option<String> {
    endpoint
        .split_once("://")
        .map(|(scheme, _)| scheme.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_extraction() {
        assert_eq!(scheme_of("https://example.com/hook").as_deref(), Some("https"));
        assert_eq!(scheme_of("SCRIPT:///usr/local/bin/alert").as_deref(), Some("script"));
        assert_eq!(scheme_of("not a uri"), None);
    }
}
