// SPDX-License-Identifier: GPL-3.0-only

//! Notification request/result models
//!
//! Both types are transient: produced and consumed within one dispatch
//! call, never persisted.

use serde::{Deserialize, Serialize};

/// One outbound message for one configured endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationRequest {
    /// Endpoint URI, scheme selects the transport
    pub endpoint: String,

    /// Short subject line
    pub subject: String,

    /// Message body
    pub body: String,
}

/// Delivery outcome for one endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationResult {
    /// Endpoint the attempt targeted
    pub endpoint: String,

    /// Whether delivery succeeded
    pub succeeded: bool,

    /// Failure detail, absent on success
    pub detail: Option<String>,
}

impl NotificationResult {
    pub fn success(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            succeeded: true,
            detail: None,
        }
    }

    pub fn failure(endpoint: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            succeeded: false,
            detail: Some(detail.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_result_roundtrips() {
        let result = NotificationResult::failure("script:///usr/bin/missing", "exit code 2");
        let json = serde_json::to_string(&result).unwrap();
        let deserialized: NotificationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, deserialized);
    }

    #[test]
    fn success_has_no_detail() {
        let result = NotificationResult::success("https://example.com/hook");
        assert!(result.succeeded);
        assert!(result.detail.is_none());
    }
}
