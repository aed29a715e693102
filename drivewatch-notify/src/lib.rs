// SPDX-License-Identifier: GPL-3.0-only

//! Notification transports and fan-out dispatcher
//!
//! Transports are selected by URI scheme from a registry fixed at startup:
//! `http`/`https` post the message to a webhook, `script` runs a local
//! executable with the body on stdin, and provider schemes (`discord`,
//! `telegram`, `gotify`) map onto the respective HTTPS APIs.
//!
//! The dispatcher fans one message out to every configured endpoint in
//! parallel, bounds each attempt with a timeout, and reports either overall
//! success or an error enumerating every failing endpoint.

pub mod dispatch;
pub mod registry;
pub mod transport;

pub use dispatch::{DispatchError, Dispatcher, DispatcherConfig};
pub use registry::TransportRegistry;
