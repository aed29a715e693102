// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;

use drivewatch_types::{NotificationRequest, NotificationResult};

/// One outbound delivery mechanism, selected by URI scheme.
///
/// `send` never fails at the type level: delivery problems are encoded in
/// the returned result so the dispatcher can give every endpoint a chance
/// to run and aggregate afterwards.
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    /// URI schemes this transport claims in the registry.
    fn schemes(&self) -> &'static [&'static str];

    /// Attempt delivery of one message to one endpoint.
    async fn send(&self, request: &NotificationRequest) -> NotificationResult;
}
