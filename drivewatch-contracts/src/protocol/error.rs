// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthErrorKind {
    /// Malformed or incomplete payload; a client-input error, never retried
    Validation,
    /// Device or record not known to the registry/store
    NotFound,
    /// Payload discriminator names an unknown disk family
    UnsupportedDevice,
    /// Network, process or provider failure during notification delivery
    Transport,
    /// A bounded call did not complete within its budget
    Timeout,
    /// Durable-write failure; fatal for that ingestion
    Store,
    Internal,
}

impl HealthErrorKind {
    pub fn code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::UnsupportedDevice => 422,
            Self::Transport => 502,
            Self::Timeout => 504,
            Self::Store => 500,
            Self::Internal => 500,
        }
    }

    /// Whether the error is the caller's fault (4xx class).
    pub fn is_client_error(self) -> bool {
        self.code() < 500
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind:?}: {message}")]
pub struct HealthError {
    pub kind: HealthErrorKind,
    pub message: String,
}

impl HealthError {
    pub fn new(kind: HealthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(HealthErrorKind::Validation, message)
    }

    pub fn unsupported_device(message: impl Into<String>) -> Self {
        Self::new(HealthErrorKind::UnsupportedDevice, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(HealthErrorKind::Store, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_error_roundtrips() {
        let error = HealthError::validation("missing ata_smart_attributes");
        let json = serde_json::to_string(&error).expect("serialize error");
        let parsed: HealthError = serde_json::from_str(&json).expect("deserialize error");
        assert_eq!(parsed, error);
    }

    #[test]
    fn status_classes() {
        assert!(HealthErrorKind::Validation.is_client_error());
        assert!(HealthErrorKind::UnsupportedDevice.is_client_error());
        assert!(!HealthErrorKind::Transport.is_client_error());
        assert_eq!(HealthErrorKind::Timeout.code(), 504);
        assert_eq!(HealthErrorKind::Store.code(), 500);
    }
}
