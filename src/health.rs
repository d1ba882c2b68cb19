use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::ports::FundingStore;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub dependencies: HashMap<String, DependencyStatus>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status != "unhealthy"
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyStatus {
    Healthy { status: String, latency_ms: u64 },
    Unhealthy { status: String, error: String },
}

#[async_trait]
pub trait DependencyChecker: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self) -> DependencyStatus;
}

/// Checks the funding store backing the ledger.
pub struct StoreChecker {
    store: Arc<dyn FundingStore>,
}

impl StoreChecker {
    pub fn new(store: Arc<dyn FundingStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DependencyChecker for StoreChecker {
    fn name(&self) -> &str {
        self.store.backend()
    }

    async fn check(&self) -> DependencyStatus {
        let start = Instant::now();
        match self.store.ping().await {
            Ok(()) => DependencyStatus::Healthy {
                status: "healthy".to_string(),
                latency_ms: start.elapsed().as_millis() as u64,
            },
            Err(e) => DependencyStatus::Unhealthy {
                status: "unhealthy".to_string(),
                error: e.to_string(),
            },
        }
    }
}

pub async fn check_health(
    checkers: &[Arc<dyn DependencyChecker>],
    start_time: Instant,
) -> HealthResponse {
    let results = join_all(checkers.iter().map(|checker| async move {
        let status = timeout(CHECK_TIMEOUT, checker.check())
            .await
            .unwrap_or_else(|_| DependencyStatus::Unhealthy {
                status: "unhealthy".to_string(),
                error: "timeout".to_string(),
            });
        (checker.name().to_string(), status)
    }))
    .await;

    let dependencies: HashMap<String, DependencyStatus> = results.into_iter().collect();
    let overall_status = determine_overall_status(&dependencies);

    HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: start_time.elapsed().as_secs(),
        dependencies,
    }
}

/// Every checked dependency backs the ledger, so any failure makes the service unhealthy.
fn determine_overall_status(dependencies: &HashMap<String, DependencyStatus>) -> String {
    let any_failed = dependencies
        .values()
        .any(|status| matches!(status, DependencyStatus::Unhealthy { .. }));

    if any_failed {
        "unhealthy".to_string()
    } else {
        "healthy".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryFundingStore;

    struct Fixed {
        name: &'static str,
        healthy: bool,
    }

    #[async_trait]
    impl DependencyChecker for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn check(&self) -> DependencyStatus {
            if self.healthy {
                DependencyStatus::Healthy {
                    status: "healthy".to_string(),
                    latency_ms: 1,
                }
            } else {
                DependencyStatus::Unhealthy {
                    status: "unhealthy".to_string(),
                    error: "connection refused".to_string(),
                }
            }
        }
    }

    #[test]
    fn test_dependency_status_serialization() {
        let healthy = DependencyStatus::Healthy {
            status: "healthy".to_string(),
            latency_ms: 42,
        };

        let json = serde_json::to_value(&healthy).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["latency_ms"], 42);
        assert!(json.get("error").is_none());

        let unhealthy = DependencyStatus::Unhealthy {
            status: "unhealthy".to_string(),
            error: "timeout".to_string(),
        };

        let json = serde_json::to_value(&unhealthy).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error"], "timeout");
        assert!(json.get("latency_ms").is_none());
    }

    #[tokio::test]
    async fn test_in_memory_store_reports_healthy() {
        let checker: Arc<dyn DependencyChecker> =
            Arc::new(StoreChecker::new(Arc::new(InMemoryFundingStore::new())));

        let response = check_health(&[checker], Instant::now()).await;

        assert_eq!(response.status, "healthy");
        assert!(response.is_healthy());
        assert!(matches!(
            response.dependencies.get("memory"),
            Some(DependencyStatus::Healthy { .. })
        ));
    }

    #[tokio::test]
    async fn test_store_failure_is_unhealthy() {
        let checkers: Vec<Arc<dyn DependencyChecker>> = vec![Arc::new(Fixed {
            name: "postgres",
            healthy: false,
        })];

        let response = check_health(&checkers, Instant::now()).await;
        assert_eq!(response.status, "unhealthy");
        assert!(!response.is_healthy());
    }

    #[tokio::test]
    async fn test_any_failed_dependency_is_unhealthy() {
        let checkers: Vec<Arc<dyn DependencyChecker>> = vec![
            Arc::new(Fixed {
                name: "postgres",
                healthy: true,
            }),
            Arc::new(Fixed {
                name: "replica",
                healthy: false,
            }),
        ];

        let response = check_health(&checkers, Instant::now()).await;
        assert_eq!(response.status, "unhealthy");
        assert!(!response.is_healthy());
        assert!(matches!(
            response.dependencies.get("postgres"),
            Some(DependencyStatus::Healthy { .. })
        ));
    }
}
