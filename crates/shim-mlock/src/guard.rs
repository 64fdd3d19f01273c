// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Exclusive-access strategies for the ledger's running total.
//!
//! The ledger's check-call-commit sequence runs inside
//! [`CounterGuard::with_exclusive`], so the guard scope spans the OS call.

use core::cell::Cell;
use std::sync::Mutex;

use crate::error::MlockError;

/// Exclusive access to the locked-bytes counter.
pub trait CounterGuard: Sized {
    /// Creates a guard holding `initial`.
    ///
    /// # Errors
    ///
    /// [`MlockError::MtxInit`] if the guard cannot be constructed.
    fn try_new(initial: u64) -> Result<Self, MlockError>;

    /// Runs `f` with exclusive access to the counter.
    ///
    /// # Errors
    ///
    /// [`MlockError::MtxOp`] if exclusive access cannot be obtained.
    fn with_exclusive<R>(&self, f: impl FnOnce(&mut u64) -> R) -> Result<R, MlockError>;
}

/// Mutex-backed guard. Use when the ledger is shared between threads.
#[derive(Debug, Default)]
pub struct Guarded(Mutex<u64>);

impl CounterGuard for Guarded {
    fn try_new(initial: u64) -> Result<Self, MlockError> {
        Ok(Self(Mutex::new(initial)))
    }

    fn with_exclusive<R>(&self, f: impl FnOnce(&mut u64) -> R) -> Result<R, MlockError> {
        // A poisoned counter may no longer match what the OS has pinned.
        let mut total = self.0.lock().map_err(|_| MlockError::MtxOp)?;
        Ok(f(&mut total))
    }
}

#[cfg(test)]
impl Guarded {
    /// Reads the counter even if the mutex is poisoned.
    pub(crate) fn peek_for_test(&self) -> u64 {
        *self
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// No-op guard for single-threaded use.
///
/// `Cell` makes the ledger `!Sync`, so the compiler enforces the external
/// serialization this strategy relies on.
#[derive(Debug, Default)]
pub struct Unguarded(Cell<u64>);

impl CounterGuard for Unguarded {
    fn try_new(initial: u64) -> Result<Self, MlockError> {
        Ok(Self(Cell::new(initial)))
    }

    fn with_exclusive<R>(&self, f: impl FnOnce(&mut u64) -> R) -> Result<R, MlockError> {
        let mut total = self.0.get();
        let result = f(&mut total);
        self.0.set(total);

        Ok(result)
    }
}
