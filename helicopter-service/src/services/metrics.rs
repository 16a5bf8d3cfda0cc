use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Safe to call more than once; only the
/// first call installs.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if METRICS_HANDLE.set(handle).is_err() {
                tracing::debug!("Metrics handle already set");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install Prometheus recorder");
            return;
        }
    }

    describe_counter!("auth_registrations_total", "Registration attempts by outcome");
    describe_counter!("auth_logins_total", "Login attempts by outcome");
    describe_counter!(
        "ownership_denials_total",
        "Mutations rejected by the creator check, by resource kind"
    );
    describe_histogram!(
        "db_query_duration_seconds",
        "Database query duration by operation"
    );
}

pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_registration(outcome: &'static str) {
    counter!("auth_registrations_total", "outcome" => outcome).increment(1);
}

pub fn record_login(outcome: &'static str) {
    counter!("auth_logins_total", "outcome" => outcome).increment(1);
}

pub fn record_ownership_denial(kind: &'static str) {
    counter!("ownership_denials_total", "kind" => kind).increment(1);
}

/// Records `db_query_duration_seconds{operation}` when dropped.
pub struct DbTimer {
    operation: &'static str,
    start: Instant,
}

impl DbTimer {
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for DbTimer {
    fn drop(&mut self) {
        histogram!("db_query_duration_seconds", "operation" => self.operation)
            .record(self.start.elapsed().as_secs_f64());
    }
}
