//! Ordered, validated batches of route options.

use std::collections::HashSet;

use tracing::warn;

use super::{DomainError, RouteOption};

/// A candidate that failed validation, kept for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    pub id: String,
    pub reason: DomainError,
}

/// The route options produced by one search.
///
/// Order is exactly as supplied; the first option is the default selection.
/// Once built, a result set is never modified, only replaced.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    options: Vec<RouteOption>,
    rejected: Vec<Rejected>,
}

impl ResultSet {
    /// Build a result set from candidates that have already been validated
    /// individually.
    ///
    /// Failed candidates, and any option whose id was already accepted, are
    /// logged and set aside instead of aborting the batch.
    pub fn collect<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Result<RouteOption, Rejected>>,
    {
        let mut options = Vec::new();
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();

        for candidate in candidates {
            match candidate {
                Ok(option) if seen.contains(option.id()) => {
                    let id = option.id().to_string();
                    warn!(id = %id, "rejecting route option with duplicate id");
                    rejected.push(Rejected {
                        reason: DomainError::DuplicateId(id.clone()),
                        id,
                    });
                }
                Ok(option) => {
                    seen.insert(option.id().to_string());
                    options.push(option);
                }
                Err(r) => {
                    warn!(id = %r.id, reason = %r.reason, "rejecting invalid route option");
                    rejected.push(r);
                }
            }
        }

        Self { options, rejected }
    }

    pub fn options(&self) -> &[RouteOption] {
        &self.options
    }

    pub fn get(&self, index: usize) -> Option<&RouteOption> {
        self.options.get(index)
    }

    /// The recommended option (first in supplied order).
    pub fn best(&self) -> Option<&RouteOption> {
        self.options.first()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Candidates that were dropped, in the order they were seen.
    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }
}
