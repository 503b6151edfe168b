use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single sub-check. Check-specific fields (`uptime`,
/// `specsCount`, `model`) are flattened next to `status` and `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: HealthStatus,
    pub message: String,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl CheckResult {
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checks {
    pub backend: CheckResult,
    pub storage: CheckResult,
    pub llm: CheckResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub timestamp: DateTime<Utc>,
    pub checks: Checks,
    pub overall: HealthStatus,
}

/// The backend check: if this runs, the process is alive.
pub fn backend_check(uptime: Duration) -> CheckResult {
    CheckResult::healthy("Server running").with_detail("uptime", uptime.as_secs_f64())
}

/// Combine the three sub-checks. Overall is healthy only when every check
/// is healthy; there is no intermediate state.
pub fn aggregate(backend: CheckResult, storage: CheckResult, llm: CheckResult) -> HealthReport {
    let checks = Checks {
        backend,
        storage,
        llm,
    };
    let all_healthy = [&checks.backend, &checks.storage, &checks.llm]
        .iter()
        .all(|c| c.is_healthy());
    HealthReport {
        timestamp: Utc::now(),
        checks,
        overall: if all_healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
    }
}
