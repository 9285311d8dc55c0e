// Copyright 2026 Quarry Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Execution Context
//!
//! Cross-cutting execution state is passed explicitly through every planner
//! and executor entry point rather than living in ambient globals. Today
//! that state is the cooperative cancellation flag; cloning a context is
//! cheap (one Arc bump) so operators hold their own copy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::{Error, Result};

/// Execution context for planning and query execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Cancellation flag shared with every operator built under this context
    cancelled: Arc<AtomicBool>,
}

impl ExecutionContext {
    /// Create a new execution context
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if the query has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Cancel the query
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Get a cancellation handle that can be used from another thread
    pub fn cancellation_handle(&self) -> CancellationHandle {
        CancellationHandle {
            cancelled: self.cancelled.clone(),
        }
    }

    /// Check for cancellation and return an error if cancelled
    ///
    /// Long-running build/probe loops call this once per outer iteration;
    /// rows emitted before the abort remain valid.
    #[inline]
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::QueryCancelled)
        } else {
            Ok(())
        }
    }
}

/// Handle for cancelling a query from another thread
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancellationHandle {
    /// Cancel the query
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check if the query has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_new() {
        let ctx = ExecutionContext::new();
        assert!(!ctx.is_cancelled());
        assert!(ctx.check_cancelled().is_ok());
    }

    #[test]
    fn test_context_cancellation() {
        let ctx = ExecutionContext::new();
        let handle = ctx.cancellation_handle();
        assert!(!handle.is_cancelled());

        handle.cancel();
        assert!(ctx.is_cancelled());
        assert!(handle.is_cancelled());
        assert_eq!(ctx.check_cancelled(), Err(Error::QueryCancelled));
    }

    #[test]
    fn test_clones_share_flag() {
        let ctx = ExecutionContext::new();
        let clone = ctx.clone();
        ctx.cancel();
        assert!(clone.is_cancelled());
    }
}
