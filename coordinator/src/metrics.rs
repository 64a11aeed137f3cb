//! Metrics collection for faucet monitoring.

use std::sync::atomic::{AtomicU64, Ordering};

/// Faucet metrics.
pub struct FaucetMetrics {
    /// Total claim requests received.
    pub claims_total: AtomicU64,
    /// Claims granted with a successful transfer.
    pub claims_granted: AtomicU64,
    /// Claims rejected before any transfer (invalid address, already
    /// claimed).
    pub claims_rejected: AtomicU64,
    /// Claims that failed on the store or the transfer.
    pub claims_failed: AtomicU64,
    /// Claims currently in flight.
    pub claims_in_flight: AtomicU64,
    /// Failed compensation writes. Every count here is a record stuck
    /// claimed without a transfer.
    pub compensation_failures: AtomicU64,
}

impl FaucetMetrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            claims_total: AtomicU64::new(0),
            claims_granted: AtomicU64::new(0),
            claims_rejected: AtomicU64::new(0),
            claims_failed: AtomicU64::new(0),
            claims_in_flight: AtomicU64::new(0),
            compensation_failures: AtomicU64::new(0),
        }
    }

    /// Record a claim request starting.
    pub fn claim_started(&self) {
        self.claims_total.fetch_add(1, Ordering::Relaxed);
        self.claims_in_flight.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a granted claim.
    pub fn claim_granted(&self) {
        self.claims_granted.fetch_add(1, Ordering::Relaxed);
        self.claims_in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record a rejected claim.
    pub fn claim_rejected(&self) {
        self.claims_rejected.fetch_add(1, Ordering::Relaxed);
        self.claims_in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record a failed claim.
    pub fn claim_failed(&self) {
        self.claims_failed.fetch_add(1, Ordering::Relaxed);
        self.claims_in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record a failed compensation write.
    pub fn compensation_failed(&self) {
        self.compensation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            claims_total: self.claims_total.load(Ordering::Relaxed),
            claims_granted: self.claims_granted.load(Ordering::Relaxed),
            claims_rejected: self.claims_rejected.load(Ordering::Relaxed),
            claims_failed: self.claims_failed.load(Ordering::Relaxed),
            claims_in_flight: self.claims_in_flight.load(Ordering::Relaxed),
            compensation_failures: self.compensation_failures.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP spigot_claims_total Total claim requests received
# TYPE spigot_claims_total counter
spigot_claims_total {}

# HELP spigot_claims_granted Total claims granted
# TYPE spigot_claims_granted counter
spigot_claims_granted {}

# HELP spigot_claims_rejected Total claims rejected
# TYPE spigot_claims_rejected counter
spigot_claims_rejected {}

# HELP spigot_claims_failed Total claims failed
# TYPE spigot_claims_failed counter
spigot_claims_failed {}

# HELP spigot_claims_in_flight Current claims in flight
# TYPE spigot_claims_in_flight gauge
spigot_claims_in_flight {}

# HELP spigot_compensation_failures Total failed compensation writes
# TYPE spigot_compensation_failures counter
spigot_compensation_failures {}
"#,
            snapshot.claims_total,
            snapshot.claims_granted,
            snapshot.claims_rejected,
            snapshot.claims_failed,
            snapshot.claims_in_flight,
            snapshot.compensation_failures,
        )
    }
}

impl Default for FaucetMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub claims_total: u64,
    pub claims_granted: u64,
    pub claims_rejected: u64,
    pub claims_failed: u64,
    pub claims_in_flight: u64,
    pub compensation_failures: u64,
}
