//! Metrics collection for access model operations.

use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for access model operations.
///
/// Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct AccessMetrics {
    /// Role assignments performed.
    pub role_assignments: Arc<AtomicU64>,
    /// Role removals that removed something.
    pub role_removals: Arc<AtomicU64>,
    /// Role removals for roles the principal did not hold.
    pub removal_misses: Arc<AtomicU64>,
    /// Checks that were granted.
    pub checks_granted: Arc<AtomicU64>,
    /// Checks that were denied.
    pub checks_denied: Arc<AtomicU64>,
    /// Bulk permission updates applied.
    pub bulk_updates: Arc<AtomicU64>,
    /// Saves the storage collaborator rejected.
    pub persistence_failures: Arc<AtomicU64>,
    /// Mutations per principal id.
    pub principal_activity: Arc<DashMap<String, AtomicU64>>,
}

impl AccessMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a role assignment.
    pub fn record_role_assignment(&self, principal_id: &str) {
        self.role_assignments.fetch_add(1, Ordering::Relaxed);
        self.record_principal_activity(principal_id);
    }

    /// Record a role removal and whether anything was removed.
    pub fn record_role_removal(&self, principal_id: &str, removed: bool) {
        if removed {
            self.role_removals.fetch_add(1, Ordering::Relaxed);
            self.record_principal_activity(principal_id);
        } else {
            self.removal_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record the outcome of a role or permission check.
    pub fn record_check(&self, granted: bool) {
        let counter = if granted {
            &self.checks_granted
        } else {
            &self.checks_denied
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a bulk permission update.
    pub fn record_bulk_update(&self, principal_id: &str) {
        self.bulk_updates.fetch_add(1, Ordering::Relaxed);
        self.record_principal_activity(principal_id);
    }

    /// Record a failed save.
    pub fn record_persistence_failure(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn record_principal_activity(&self, principal_id: &str) {
        self.principal_activity
            .entry(principal_id.to_string())
            .and_modify(|count| {
                count.fetch_add(1, Ordering::Relaxed);
            })
            .or_insert_with(|| AtomicU64::new(1));
    }

    /// Get a point-in-time copy of every counter.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            role_assignments: self.role_assignments.load(Ordering::Relaxed),
            role_removals: self.role_removals.load(Ordering::Relaxed),
            removal_misses: self.removal_misses.load(Ordering::Relaxed),
            checks_granted: self.checks_granted.load(Ordering::Relaxed),
            checks_denied: self.checks_denied.load(Ordering::Relaxed),
            bulk_updates: self.bulk_updates.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
            principal_activity: self
                .principal_activity
                .iter()
                .map(|entry| (entry.key().clone(), entry.value().load(Ordering::Relaxed)))
                .collect(),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.role_assignments.store(0, Ordering::Relaxed);
        self.role_removals.store(0, Ordering::Relaxed);
        self.removal_misses.store(0, Ordering::Relaxed);
        self.checks_granted.store(0, Ordering::Relaxed);
        self.checks_denied.store(0, Ordering::Relaxed);
        self.bulk_updates.store(0, Ordering::Relaxed);
        self.persistence_failures.store(0, Ordering::Relaxed);
        self.principal_activity.clear();
    }
}

/// Plain copy of [`AccessMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Role assignments performed.
    pub role_assignments: u64,
    /// Role removals that removed something.
    pub role_removals: u64,
    /// Role removals for roles the principal did not hold.
    pub removal_misses: u64,
    /// Checks that were granted.
    pub checks_granted: u64,
    /// Checks that were denied.
    pub checks_denied: u64,
    /// Bulk permission updates applied.
    pub bulk_updates: u64,
    /// Saves the storage collaborator rejected.
    pub persistence_failures: u64,
    /// Mutations per principal id.
    pub principal_activity: HashMap<String, u64>,
}

impl MetricsSnapshot {
    /// Total checks answered.
    pub fn checks_total(&self) -> u64 {
        self.checks_granted + self.checks_denied
    }
}
