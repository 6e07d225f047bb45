// file: src/utils/telemetry.rs
// description: engine health probes and query timing
// reference: https://docs.rs/tracing

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    fn icon(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✓",
            HealthStatus::Degraded => "⚠",
            HealthStatus::Unhealthy => "✗",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub component: String,
    pub status: HealthStatus,
    pub message: Option<String>,
    pub response_time_ms: u64,
}

impl HealthCheck {
    /// Healthy when the check succeeded within `slow_after`, degraded when it was slower.
    pub fn from_outcome<T, E: Display>(
        component: &str,
        outcome: &Result<T, E>,
        elapsed: Duration,
        slow_after: Duration,
    ) -> Self {
        let (status, message) = match outcome {
            Err(e) => (HealthStatus::Unhealthy, Some(e.to_string())),
            Ok(_) if elapsed > slow_after => (
                HealthStatus::Degraded,
                Some(format!("answered after {} ms", elapsed.as_millis())),
            ),
            Ok(_) => (HealthStatus::Healthy, None),
        };

        Self {
            component: component.to_string(),
            status,
            message,
            response_time_ms: elapsed.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub checked_at: String,
    pub version: String,
}

impl HealthReport {
    /// The worst check decides the overall status.
    pub fn new(checks: Vec<HealthCheck>) -> Self {
        let status = checks
            .iter()
            .map(|c| c.status)
            .max_by_key(|s| match s {
                HealthStatus::Healthy => 0,
                HealthStatus::Degraded => 1,
                HealthStatus::Unhealthy => 2,
            })
            .unwrap_or(HealthStatus::Healthy);

        Self {
            status,
            checks,
            checked_at: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status != HealthStatus::Unhealthy
    }

    pub fn format(&self) -> String {
        let mut output = format!(
            "{} paragraph_search {} is {:?} ({})\n",
            self.status.icon(),
            self.version,
            self.status,
            self.checked_at
        );

        for check in &self.checks {
            output.push_str(&format!(
                "  {} {}: {} ms",
                check.status.icon(),
                check.component,
                check.response_time_ms
            ));
            if let Some(message) = &check.message {
                output.push_str(&format!(" ({})", message));
            }
            output.push('\n');
        }

        output
    }
}

/// Times one engine round trip and warns when it exceeds the slow threshold.
pub struct OperationTimer {
    operation: String,
    start: Instant,
    slow_after: Duration,
}

impl OperationTimer {
    pub fn new(operation: impl Into<String>, slow_after: Duration) -> Self {
        let operation = operation.into();
        debug!("Starting {}", operation);
        Self {
            operation,
            start: Instant::now(),
            slow_after,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn is_slow(&self) -> bool {
        self.elapsed() > self.slow_after
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        if elapsed > self.slow_after {
            warn!(
                "Slow {}: {} ms (threshold {} ms)",
                self.operation,
                elapsed.as_millis(),
                self.slow_after.as_millis()
            );
        } else {
            debug!("Finished {} in {} ms", self.operation, elapsed.as_millis());
        }
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOW: Duration = Duration::from_millis(500);

    #[test]
    fn test_check_from_outcome() {
        let ok: Result<(), String> = Ok(());
        let check = HealthCheck::from_outcome("manticore", &ok, Duration::from_millis(50), SLOW);
        assert_eq!(check.status, HealthStatus::Healthy);
        assert_eq!(check.response_time_ms, 50);
        assert!(check.message.is_none());

        let slow = HealthCheck::from_outcome("manticore", &ok, Duration::from_millis(900), SLOW);
        assert_eq!(slow.status, HealthStatus::Degraded);

        let failed: Result<(), String> = Err("connection refused".to_string());
        let down = HealthCheck::from_outcome("manticore", &failed, Duration::from_millis(3), SLOW);
        assert_eq!(down.status, HealthStatus::Unhealthy);
        assert_eq!(down.message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_report_takes_worst_status() {
        let ok: Result<(), String> = Ok(());
        let failed: Result<(), String> = Err("timeout".to_string());

        let degraded = HealthReport::new(vec![
            HealthCheck::from_outcome("a", &ok, Duration::from_millis(1), SLOW),
            HealthCheck::from_outcome("b", &ok, Duration::from_secs(1), SLOW),
        ]);
        assert_eq!(degraded.status, HealthStatus::Degraded);
        assert!(degraded.is_healthy());

        let down = HealthReport::new(vec![HealthCheck::from_outcome(
            "manticore",
            &failed,
            Duration::from_millis(1),
            SLOW,
        )]);
        assert!(!down.is_healthy());
        let text = down.format();
        assert!(text.contains("manticore"));
        assert!(text.contains("(timeout)"));

        assert_eq!(HealthReport::new(Vec::new()).status, HealthStatus::Healthy);
    }

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("search", Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.is_slow());
        assert!(timer.finish() >= Duration::from_millis(10));
    }
}
