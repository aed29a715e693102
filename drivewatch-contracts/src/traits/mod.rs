// SPDX-License-Identifier: GPL-3.0-only

pub mod store;
pub mod transport;

pub use store::MetricsStore;
pub use transport::NotificationTransport;
