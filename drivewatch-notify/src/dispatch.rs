// SPDX-License-Identifier: GPL-3.0-only

//! Fan-out dispatcher with all-or-nothing aggregation.
//!
//! Every endpoint gets an independent, timeout-bounded attempt; the call as
//! a whole fails if any single endpoint fails, and the error enumerates
//! every failing endpoint so partial success stays visible.

use std::fmt;
use std::time::Duration;

use futures::future::join_all;

use drivewatch_types::{NotificationRequest, NotificationResult};

use crate::registry::TransportRegistry;

/// Timeout budget for one dispatch call.
#[derive(Debug, Clone, Copy)]
pub struct DispatcherConfig {
    /// Per-endpoint send budget
    pub endpoint_timeout: Duration,
    /// Overall budget for the whole dispatch
    pub dispatch_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            endpoint_timeout: Duration::from_secs(10),
            dispatch_timeout: Duration::from_secs(30),
        }
    }
}

/// Aggregate failure of one dispatch call: every failing endpoint with its
/// detail, in endpoint-configuration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchError {
    pub failures: Vec<NotificationResult>,
}

impl std::error::Error for DispatchError {}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} endpoint(s) failed:", self.failures.len())?;
        for failure in &self.failures {
            write!(
                f,
                " [{}: {}]",
                failure.endpoint,
                failure.detail.as_deref().unwrap_or("unknown error")
            )?;
        }
        Ok(())
    }
}

pub struct Dispatcher {
    registry: TransportRegistry,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(registry: TransportRegistry, config: DispatcherConfig) -> Self {
        Self { registry, config }
    }

    /// Send a fixed test message to every configured endpoint.
    pub async fn dispatch_test(&self, endpoints: &[String]) -> Result<(), DispatchError> {
        self.dispatch(
            "Drivewatch test notification",
            "This is a test notification. If you can read this, the endpoint works.",
            endpoints,
        )
        .await
    }

    /// Fan one message out to every endpoint concurrently and aggregate.
    /// Zero endpoints trivially succeed.
    pub async fn dispatch(
        &self,
        subject: &str,
        body: &str,
        endpoints: &[String],
    ) -> Result<(), DispatchError> {
        if endpoints.is_empty() {
            return Ok(());
        }

        // Each send is capped by the smaller of the per-endpoint budget and
        // the overall dispatch budget, so joining all of them cannot exceed
        // the dispatch budget and a hung endpoint never delays the others.
        let send_budget = self
            .config
            .endpoint_timeout
            .min(self.config.dispatch_timeout);

        let attempts = endpoints.iter().map(|endpoint| {
            let request = NotificationRequest {
                endpoint: endpoint.clone(),
                subject: subject.to_string(),
                body: body.to_string(),
            };
            async move {
                let Some(transport) = self.registry.route_for(endpoint) else {
                    return NotificationResult::failure(
                        endpoint,
                        format!(
                            "unsupported scheme (known: {})",
                            self.registry.schemes().join(", ")
                        ),
                    );
                };
                match tokio::time::timeout(send_budget, transport.send(&request)).await {
                    Ok(result) => result,
                    Err(_) => NotificationResult::failure(
                        endpoint,
                        format!("timed out after {}s", send_budget.as_secs()),
                    ),
                }
            }
        });

        let results = join_all(attempts).await;
        for result in &results {
            if result.succeeded {
                tracing::info!(endpoint = %result.endpoint, "notification delivered");
            } else {
                tracing::warn!(
                    endpoint = %result.endpoint,
                    detail = result.detail.as_deref().unwrap_or(""),
                    "notification failed"
                );
            }
        }

        let failures: Vec<NotificationResult> =
            results.into_iter().filter(|r| !r.succeeded).collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError { failures })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use drivewatch_contracts::NotificationTransport;
    use std::sync::Arc;

    struct SleepyTransport;

    #[async_trait]
    impl NotificationTransport for SleepyTransport {
        fn schemes(&self) -> &'static [&'static str] {
            &["sleepy"]
        }

        async fn send(&self, request: &NotificationRequest) -> NotificationResult {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            NotificationResult::success(&request.endpoint)
        }
    }

    fn dispatcher(config: DispatcherConfig) -> Dispatcher {
        let mut registry = TransportRegistry::build_default(Duration::from_secs(2));
        registry.register(Arc::new(SleepyTransport));
        Dispatcher::new(registry, config)
    }

    #[tokio::test]
    async fn zero_endpoints_trivially_succeed() {
        let dispatcher = dispatcher(DispatcherConfig::default());
        assert!(dispatcher.dispatch_test(&[]).await.is_ok());
    }

    #[tokio::test]
    async fn unsupported_scheme_fails_that_endpoint() {
        let dispatcher = dispatcher(DispatcherConfig::default());
        let err = dispatcher
            .dispatch_test(&["carrierpigeon://coop/12".to_string()])
            .await
            .unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].endpoint, "carrierpigeon://coop/12");
        assert!(err.failures[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("unsupported scheme"));
    }

    #[tokio::test(start_paused = true)]
    async fn hung_endpoint_is_recorded_as_timeout() {
        let config = DispatcherConfig {
            endpoint_timeout: Duration::from_secs(5),
            dispatch_timeout: Duration::from_secs(30),
        };
        let dispatcher = dispatcher(config);
        let err = dispatcher
            .dispatch_test(&["sleepy://endpoint".to_string()])
            .await
            .unwrap_err();
        assert!(err.failures[0]
            .detail
            .as_deref()
            .unwrap()
            .contains("timed out after 5s"));
    }

    #[tokio::test]
    async fn one_failure_fails_the_dispatch_but_names_only_failures() {
        let dir = tempfile::tempdir().unwrap();
        let ok_path = dir.path().join("ok.sh");
        std::fs::write(&ok_path, "#!/bin/sh\nexit 0\n").unwrap();
        let mut perms = std::fs::metadata(&ok_path).unwrap().permissions();
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(0o755);
        std::fs::set_permissions(&ok_path, perms).unwrap();

        let endpoints = vec![
            format!("script://{}", ok_path.display()),
            "script:///missing/path/on/disk".to_string(),
        ];
        let dispatcher = dispatcher(DispatcherConfig::default());
        let err = dispatcher.dispatch_test(&endpoints).await.unwrap_err();

        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].endpoint, "script:///missing/path/on/disk");
        assert!(err.to_string().contains("/missing/path/on/disk"));
    }
}
