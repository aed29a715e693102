// SPDX-License-Identifier: GPL-3.0-only

//! Canonical domain models for the drivewatch telemetry pipeline
//!
//! This crate defines the single source of truth for all telemetry domain
//! types. These models are used throughout the stack:
//!
//! - **drivewatch-service**: Produces `HealthRecord`s from raw payloads and
//!   exposes `DeviceSummary` wrappers to the serving layer
//! - **drivewatch-store**: Persists and replays `HealthRecord`s verbatim
//! - **drivewatch-notify**: Consumes `NotificationRequest`, produces
//!   `NotificationResult`
//!
//! All types serialize with serde; the persisted record schema is stable
//! across device families (discriminated on `DeviceType`).

pub mod device;
pub mod notify;
pub mod record;

pub use device::{DeviceIdentity, DeviceSummary, DeviceType};
pub use notify::{NotificationRequest, NotificationResult};
pub use record::{AttributeKind, HealthRecord, HealthStatus, SmartAttribute};
