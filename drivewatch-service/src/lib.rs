// SPDX-License-Identifier: GPL-3.0-only

//! Drivewatch ingestion pipeline
//!
//! Telemetry flows: raw smartctl-style payload → [`normalize`] (device-family
//! dispatch) → canonical `HealthRecord` → [`evaluate`] (threshold verdict
//! possibly escalated by the trend rule over stored history) → metrics
//! store. The [`service::Monitor`] facade ties the pieces together and backs
//! the serving layer's four logical operations; notification fan-out lives
//! in the `drivewatch-notify` crate.

pub mod config;
pub mod evaluate;
pub mod normalize;
pub mod registry;
pub mod service;

pub use config::ServiceConfig;
pub use evaluate::Evaluator;
pub use registry::DeviceRegistry;
pub use service::Monitor;
