//! Batch operations API for bulk role changes and checks

use crate::{
    Error,
    core::{AccessModel, RemovalOutcome},
    storage::Storage,
    subject::Principal,
};

/// Result of a batch operation
#[derive(Debug)]
pub struct BatchResult<T> {
    /// Successful operations with their results
    pub successes: Vec<(usize, T)>,
    /// Failed operations with their errors
    pub failures: Vec<(usize, Error)>,
}

impl<T> BatchResult<T> {
    /// Create a new empty batch result
    pub fn new() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Add a successful result
    pub fn add_success(&mut self, index: usize, result: T) {
        self.successes.push((index, result));
    }

    /// Add a failed result
    pub fn add_failure(&mut self, index: usize, error: Error) {
        self.failures.push((index, error));
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_operations();
        if total == 0 {
            return 0.0;
        }
        (self.successes.len() as f64 / total as f64) * 100.0
    }

    /// Check if all operations succeeded
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Get total number of operations
    pub fn total_operations(&self) -> usize {
        self.successes.len() + self.failures.len()
    }
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Batch role change request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRoleOperation {
    pub principal_id: String,
    pub role: String,
    pub assign: bool, // true for assign, false for remove
}

impl BatchRoleOperation {
    /// Create a new batch role assignment
    pub fn assignment(principal_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            role: role.into(),
            assign: true,
        }
    }

    /// Create a new batch role removal
    pub fn removal(principal_id: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            principal_id: principal_id.into(),
            role: role.into(),
            assign: false,
        }
    }
}

/// What a batch role operation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Assigned,
    Removed(RemovalOutcome),
}

/// Extension trait for AccessModel to support batch operations
pub trait BatchOperations {
    /// Check many permissions for one principal, in input order
    fn batch_check_permissions<'a>(
        &self,
        principal: &Principal,
        permissions: impl IntoIterator<Item = &'a str>,
    ) -> Vec<bool>;

    /// Apply role assignments and removals to stored principals
    ///
    /// Each operation loads its principal, changes it, and saves it; a failing
    /// operation does not stop the rest.
    fn batch_role_operations(
        &mut self,
        operations: Vec<BatchRoleOperation>,
    ) -> BatchResult<RoleChange>;
}

impl<S: Storage> BatchOperations for AccessModel<S> {
    fn batch_check_permissions<'a>(
        &self,
        principal: &Principal,
        permissions: impl IntoIterator<Item = &'a str>,
    ) -> Vec<bool> {
        permissions
            .into_iter()
            .map(|permission| self.has_permission(principal, permission))
            .collect()
    }

    fn batch_role_operations(
        &mut self,
        operations: Vec<BatchRoleOperation>,
    ) -> BatchResult<RoleChange> {
        let mut result = BatchResult::new();

        for (i, operation) in operations.iter().enumerate() {
            let op_result = self.load_principal(&operation.principal_id).and_then(|mut principal| {
                if operation.assign {
                    self.assign_role(&mut principal, operation.role.as_str())
                        .map(|_| RoleChange::Assigned)
                } else {
                    self.remove_role(&mut principal, operation.role.as_str())
                        .map(RoleChange::Removed)
                }
            });

            match op_result {
                Ok(change) => result.add_success(i, change),
                Err(error) => result.add_failure(i, error),
            }
        }

        result
    }
}
