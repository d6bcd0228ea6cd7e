//! # Failure Observer
//!
//! Read operations never hand query failures to their caller: they return an
//! empty result instead. The failure still has to be seen by someone, so
//! every degraded call is reported to a [`FailureObserver`] first.
//!
//! ```text
//! repository call ──► query fails ──► observer.degraded(op, &err) ──► Ok(empty)
//! ```
//!
//! The default observer logs through `tracing`. Embedders swap it with
//! [`Database::with_observer`](crate::Database::with_observer) to feed
//! metrics or to assert on failures in tests.

use std::fmt;

use tracing::error;

use crate::error::DbError;

/// Receives query failures that were degraded to empty results.
pub trait FailureObserver: Send + Sync + fmt::Debug {
    /// Called once per degraded operation, before the empty result is returned.
    fn degraded(&self, operation: &'static str, error: &DbError);
}

/// Logs degraded operations at `ERROR` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FailureObserver for TracingObserver {
    fn degraded(&self, operation: &'static str, error: &DbError) {
        error!(operation, error = %error, "Query failed, returning empty result");
    }
}
