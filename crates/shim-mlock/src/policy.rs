// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Failure policy for the enforcing (`*_enforced`) ledger operations.
//!
//! A non-tolerated failure terminates the process with a one-line diagnostic.
//! A tolerated one is absorbed as a no-op.

use core::ops::{BitOr, BitOrAssign};

use crate::error::MlockError;

/// Set of failure kinds the caller is willing to absorb.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Tolerance(u8);

impl Tolerance {
    /// Tolerate nothing: every failure is fatal.
    pub const NONE: Self = Self(0);
    /// Tolerate [`MlockError::LockOp`] from a lock call.
    pub const LOCK_FAIL: Self = Self(1 << 0);
    /// Tolerate [`MlockError::OverMemLimit`].
    pub const OVER_MEM_LIMIT: Self = Self(1 << 1);
    /// Tolerate [`MlockError::LockOp`] from an unlock call.
    pub const UNLOCK_FAIL: Self = Self(1 << 2);

    /// Returns true if every flag in `other` is set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Tolerance {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Tolerance {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Operation the failure came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Operation {
    Init,
    Lock,
    Unlock,
}

impl Operation {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Init => "BudgetLedger::init_enforced",
            Self::Lock => "BudgetLedger::lock_enforced",
            Self::Unlock => "BudgetLedger::unlock_enforced",
        }
    }
}

/// What to do with a failure under a given policy.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Disposition {
    Continue,
    Abort,
}

/// Maps `(operation, error, policy)` to a disposition.
///
/// Guard failures are never tolerable: once the guard is broken the running
/// total cannot be trusted.
pub(crate) fn disposition(op: Operation, error: MlockError, policy: Tolerance) -> Disposition {
    let tolerated = match (op, error) {
        (_, MlockError::MtxInit | MlockError::MtxOp) => false,
        (Operation::Lock, MlockError::LockOp) => policy.contains(Tolerance::LOCK_FAIL),
        (Operation::Lock, MlockError::OverMemLimit) => policy.contains(Tolerance::OVER_MEM_LIMIT),
        (Operation::Unlock, MlockError::LockOp) => policy.contains(Tolerance::UNLOCK_FAIL),
        _ => false,
    };

    if tolerated {
        Disposition::Continue
    } else {
        Disposition::Abort
    }
}

/// Resolves a result under `policy`, terminating the process on a
/// non-tolerated failure.
pub(crate) fn enforce<T>(
    op: Operation,
    result: Result<T, MlockError>,
    policy: Tolerance,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => match disposition(op, error, policy) {
            Disposition::Continue => {
                log::debug!("{}: tolerated {error}", op.name());
                None
            }
            Disposition::Abort => fatal(op, error),
        },
    }
}

#[cold]
#[inline(never)]
fn fatal(op: Operation, error: MlockError) -> ! {
    log::error!("{}: {error}", op.name());
    eprintln!("Error: {}: {}", op.name(), error.diagnostic());

    std::process::exit(1)
}
