// SPDX-License-Identifier: GPL-3.0-only

//! Process-wide facade over registry, store, evaluator and dispatcher.
//!
//! These are the logical operations the serving layer mounts: register
//! devices, ingest telemetry, summarize, send a test notification. The
//! facade is `Send + Sync`; request handlers share one instance.

use std::sync::Arc;

use serde_json::Value;

use drivewatch_contracts::{HealthError, HealthErrorKind, MetricsStore};
use drivewatch_notify::{Dispatcher, DispatcherConfig, TransportRegistry};
use drivewatch_store::MetricsLog;
use drivewatch_types::{DeviceIdentity, DeviceSummary, HealthRecord};

use crate::config::ServiceConfig;
use crate::evaluate::Evaluator;
use crate::normalize;
use crate::registry::DeviceRegistry;

pub struct Monitor {
    registry: DeviceRegistry,
    store: Arc<dyn MetricsStore>,
    evaluator: Evaluator,
    dispatcher: Dispatcher,
    notify_urls: Vec<String>,
}

impl Monitor {
    /// Open the durable store under the configured data dir and assemble
    /// the pipeline with the built-in transports.
    pub async fn open(config: &ServiceConfig) -> Result<Self, HealthError> {
        let store = MetricsLog::open(&config.store.data_dir).await?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Assemble the pipeline over a caller-provided store.
    pub fn with_store(config: &ServiceConfig, store: Arc<dyn MetricsStore>) -> Self {
        let registry = TransportRegistry::build_default(config.notify.endpoint_timeout());
        let dispatcher = Dispatcher::new(
            registry,
            DispatcherConfig {
                endpoint_timeout: config.notify.endpoint_timeout(),
                dispatch_timeout: config.notify.dispatch_timeout(),
            },
        );
        Self {
            registry: DeviceRegistry::new(),
            store,
            evaluator: Evaluator::new(config.evaluator.trend_window),
            dispatcher,
            notify_urls: config.notify.urls.clone(),
        }
    }

    /// Register or update a batch of devices; returns the accepted set.
    pub fn register_devices(
        &self,
        descriptors: Vec<DeviceIdentity>,
    ) -> Result<Vec<DeviceIdentity>, HealthError> {
        if descriptors.is_empty() {
            return Err(HealthError::validation("no device descriptors supplied"));
        }
        Ok(self.registry.register(descriptors))
    }

    /// Normalize, evaluate and persist one telemetry snapshot.
    ///
    /// An error anywhere before the append leaves the store untouched; a
    /// store error aborts the ingestion with nothing partially written.
    pub async fn ingest(&self, wwn: &str, payload: &Value) -> Result<HealthRecord, HealthError> {
        let registered = self.registry.get(wwn);
        let expected = registered.as_ref().map(|d| d.device_type);

        let record = normalize::normalize(expected, wwn, payload)?;

        // Only records strictly prior to this snapshot count as history: a
        // re-ingestion must not see its own stored copy, and a late-arriving
        // snapshot must not treat newer records as "prior".
        let mut history = self
            .store
            .history(wwn, Some(self.evaluator.trend_window() + 1))
            .await?;
        history.retain(|prior| prior.collected_at < record.collected_at);
        let record = self.evaluator.evaluate(record, &history);

        // Telemetry for a device nobody registered still carries its own
        // identity; remember it so it shows up in summaries.
        if registered.is_none() {
            self.registry
                .register(vec![DeviceIdentity::minimal(wwn, record.device_type)]);
        }

        let stored = self.store.append(record).await?;
        tracing::info!(
            wwn,
            status = ?stored.overall_status,
            collected_at = %stored.collected_at,
            "snapshot ingested"
        );
        Ok(stored)
    }

    /// Summaries in device-registration order. `filter` narrows to the
    /// given WWNs (preserving registration order); `None` means all.
    pub async fn summary(
        &self,
        filter: Option<&[String]>,
    ) -> Result<Vec<DeviceSummary>, HealthError> {
        let mut summaries = Vec::new();
        for device in self.registry.list() {
            if let Some(filter) = filter
                && !filter.iter().any(|wwn| wwn == &device.wwn)
            {
                continue;
            }
            let latest = self.store.latest(&device.wwn).await?;
            summaries.push(DeviceSummary { device, latest });
        }
        Ok(summaries)
    }

    /// Send a test message to every configured endpoint. Fails if any
    /// single endpoint fails, enumerating the failures.
    pub async fn send_test_notification(&self) -> Result<(), HealthError> {
        self.dispatcher
            .dispatch_test(&self.notify_urls)
            .await
            .map_err(|e| {
                tracing::error!(failures = e.failures.len(), "test notification failed");
                HealthError::new(HealthErrorKind::Transport, e.to_string())
            })
    }

    /// Fan a real alert out to the configured endpoints.
    pub async fn send_alert(&self, subject: &str, body: &str) -> Result<(), HealthError> {
        self.dispatcher
            .dispatch(subject, body, &self.notify_urls)
            .await
            .map_err(|e| HealthError::new(HealthErrorKind::Transport, e.to_string()))
    }
}
