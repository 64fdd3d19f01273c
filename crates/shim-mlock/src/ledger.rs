// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! BudgetLedger - process-wide accounting of locked memory.

use core::ptr::NonNull;

use crate::error::MlockError;
use crate::guard::{CounterGuard, Guarded};
use crate::pages::round_up_to_pages;
use crate::platform::MemoryPlatform;
use crate::policy::{Operation, Tolerance, enforce};
use crate::region::{LockedRegion, LockedRegionMut};

#[cfg(any(all(unix, not(target_os = "openbsd")), windows))]
use crate::platform::SystemPlatform;

/// Tracks how many bytes the process holds locked and refuses requests that
/// would exceed the OS limit before any OS call is made.
///
/// Only aggregate byte counts are kept, never individual ranges. Unlocking a
/// range that was never locked is accepted as long as it does not exceed the
/// running total.
pub struct BudgetLedger<P, G = Guarded> {
    platform: P,
    page_size: u64,
    limit: u64,
    locked: G,
}

#[cfg(any(all(unix, not(target_os = "openbsd")), windows))]
impl BudgetLedger<SystemPlatform, Guarded> {
    /// Initializes a thread-safe ledger against the host OS.
    ///
    /// # Errors
    ///
    /// See [`BudgetLedger::init`].
    pub fn new() -> Result<Self, MlockError> {
        Self::init(SystemPlatform)
    }

    /// Like [`BudgetLedger::new`], but terminates the process on failure.
    pub fn new_enforced() -> Self {
        Self::init_enforced(SystemPlatform)
    }
}

impl<P: MemoryPlatform, G: CounterGuard> BudgetLedger<P, G> {
    /// Probes page size and limit, then builds the guard with a zero total.
    ///
    /// # Errors
    ///
    /// - [`MlockError::GetLimit`] / [`MlockError::SetLimit`] from the limit probe.
    /// - [`MlockError::MtxInit`] if the guard cannot be built.
    pub fn init(platform: P) -> Result<Self, MlockError> {
        let page_size = platform.page_size();
        let limit = platform.memlock_limit()?;
        let locked = G::try_new(0)?;

        log::info!("memlock ledger ready: page_size={page_size} limit={limit}");

        Ok(Self {
            platform,
            page_size,
            limit,
            locked,
        })
    }

    /// Like [`BudgetLedger::init`], but terminates the process on failure.
    pub fn init_enforced(platform: P) -> Self {
        match enforce(Operation::Init, Self::init(platform), Tolerance::NONE) {
            Some(ledger) => ledger,
            // Init tolerates nothing, so `enforce` has already exited.
            None => unreachable!("init failures are never tolerated"),
        }
    }

    /// Lowers the budget to `cap` if it is below the OS limit.
    pub fn with_limit_cap(mut self, cap: u64) -> Self {
        self.limit = self.limit.min(cap);
        self
    }

    /// Native page size in bytes.
    #[inline]
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Maximum number of bytes this ledger admits.
    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Bytes currently accounted as locked (always whole pages).
    pub fn locked_bytes(&self) -> Result<u64, MlockError> {
        self.locked.with_exclusive(|total| *total)
    }

    /// Bytes still available under the limit.
    pub fn remaining(&self) -> Result<u64, MlockError> {
        let locked = self.locked_bytes()?;
        Ok(self.limit.saturating_sub(locked))
    }

    /// Pins `len` bytes at `ptr` if the page-rounded size fits the budget.
    ///
    /// The admission check, the OS call and the counter update happen under a
    /// single guard acquisition. The OS call receives the exact `len`; rounding
    /// only affects accounting.
    ///
    /// # Errors
    ///
    /// - [`MlockError::OverMemLimit`] without any OS call if the budget is exceeded.
    /// - [`MlockError::LockOp`] if the OS refuses; the total is unchanged.
    /// - [`MlockError::MtxOp`] if the guard is broken.
    pub fn lock(&self, ptr: NonNull<u8>, len: usize) -> Result<(), MlockError> {
        let requested = round_up_to_pages(len as u64, self.page_size);

        self.locked.with_exclusive(|total| {
            // `requested + total > limit`, without overflowing.
            if requested > self.limit.saturating_sub(*total) {
                log::warn!(
                    "lock of {requested} bytes rejected: {total} of {} in use",
                    self.limit
                );
                return Err(MlockError::OverMemLimit);
            }

            if let Err(e) = self.platform.pin(ptr, len) {
                log::warn!("pin of {len} bytes at {ptr:p} failed: {e}");
                return Err(MlockError::LockOp);
            }

            *total += requested;
            log::debug!("locked {requested} bytes, total {total}");

            Ok(())
        })?
    }

    /// Unpins `len` bytes at `ptr` and returns their pages to the budget.
    ///
    /// # Errors
    ///
    /// - [`MlockError::UnderMemMin`] without any OS call if the rounded size
    ///   exceeds the running total.
    /// - [`MlockError::LockOp`] if the OS refuses; the total is unchanged.
    /// - [`MlockError::MtxOp`] if the guard is broken.
    pub fn unlock(&self, ptr: NonNull<u8>, len: usize) -> Result<(), MlockError> {
        let requested = round_up_to_pages(len as u64, self.page_size);

        self.locked.with_exclusive(|total| {
            if requested > *total {
                log::warn!("unlock of {requested} bytes rejected: only {total} locked");
                return Err(MlockError::UnderMemMin);
            }

            if let Err(e) = self.platform.unpin(ptr, len) {
                log::warn!("unpin of {len} bytes at {ptr:p} failed: {e}");
                return Err(MlockError::LockOp);
            }

            *total -= requested;
            log::debug!("unlocked {requested} bytes, total {total}");

            Ok(())
        })?
    }

    /// [`BudgetLedger::lock`] under a failure policy.
    ///
    /// Failures in `policy` return silently. Anything else, including a
    /// broken guard, terminates the process.
    pub fn lock_enforced(&self, ptr: NonNull<u8>, len: usize, policy: Tolerance) {
        enforce(Operation::Lock, self.lock(ptr, len), policy);
    }

    /// [`BudgetLedger::unlock`] under a failure policy.
    ///
    /// Only [`Tolerance::UNLOCK_FAIL`] is meaningful here; an underflow is
    /// always fatal.
    pub fn unlock_enforced(&self, ptr: NonNull<u8>, len: usize, policy: Tolerance) {
        enforce(Operation::Unlock, self.unlock(ptr, len), policy);
    }

    /// Locks the memory backing `bytes`. An empty slice is a no-op.
    pub fn lock_slice(&self, bytes: &[u8]) -> Result<(), MlockError> {
        match slice_ptr(bytes) {
            Some(ptr) => self.lock(ptr, bytes.len()),
            None => Ok(()),
        }
    }

    /// Unlocks the memory backing `bytes`. An empty slice is a no-op.
    pub fn unlock_slice(&self, bytes: &[u8]) -> Result<(), MlockError> {
        match slice_ptr(bytes) {
            Some(ptr) => self.unlock(ptr, bytes.len()),
            None => Ok(()),
        }
    }

    /// Locks `bytes` and returns a handle that unlocks them on drop.
    pub fn lock_region<'a>(
        &'a self,
        bytes: &'a [u8],
    ) -> Result<LockedRegion<'a, P, G>, MlockError> {
        self.lock_slice(bytes)?;
        Ok(LockedRegion::new(self, bytes))
    }

    /// Like [`BudgetLedger::lock_region`], but the handle allows writing into
    /// the locked bytes (e.g. to fill in key material after locking).
    pub fn lock_region_mut<'a>(
        &'a self,
        bytes: &'a mut [u8],
    ) -> Result<LockedRegionMut<'a, P, G>, MlockError> {
        self.lock_slice(bytes)?;
        Ok(LockedRegionMut::new(self, bytes))
    }

    #[cfg(test)]
    pub(crate) fn guard_for_test(&self) -> &G {
        &self.locked
    }
}

fn slice_ptr(bytes: &[u8]) -> Option<NonNull<u8>> {
    if bytes.is_empty() {
        return None;
    }

    NonNull::new(bytes.as_ptr() as *mut u8)
}

impl<P, G> core::fmt::Debug for BudgetLedger<P, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BudgetLedger")
            .field("page_size", &self.page_size)
            .field("limit", &self.limit)
            .finish_non_exhaustive()
    }
}
