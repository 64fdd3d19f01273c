// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! LockedRegion - scoped lock over a byte slice.

use crate::error::MlockError;
use crate::guard::CounterGuard;
use crate::ledger::BudgetLedger;
use crate::platform::MemoryPlatform;

/// Memory locked through a [`BudgetLedger`], unlocked again on drop.
///
/// Pairs every unlock with the exact range and size of its lock, which the
/// ledger alone cannot guarantee.
pub struct LockedRegion<'a, P: MemoryPlatform, G: CounterGuard> {
    ledger: &'a BudgetLedger<P, G>,
    bytes: &'a [u8],
    released: bool,
}

impl<'a, P: MemoryPlatform, G: CounterGuard> LockedRegion<'a, P, G> {
    pub(crate) fn new(ledger: &'a BudgetLedger<P, G>, bytes: &'a [u8]) -> Self {
        Self {
            ledger,
            bytes,
            released: false,
        }
    }

    /// The locked bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.bytes
    }

    /// Unlocks now and reports the outcome instead of logging it on drop.
    pub fn release(mut self) -> Result<(), MlockError> {
        self.released = true;
        self.ledger.unlock_slice(self.bytes)
    }
}

impl<P: MemoryPlatform, G: CounterGuard> Drop for LockedRegion<'_, P, G> {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = self.ledger.unlock_slice(self.bytes) {
            log::error!("failed to unlock {} bytes on drop: {e}", self.bytes.len());
        }
    }
}

impl<P: MemoryPlatform, G: CounterGuard> core::fmt::Debug for LockedRegion<'_, P, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LockedRegion")
            .field("len", &self.bytes.len())
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

/// Writable counterpart of [`LockedRegion`].
pub struct LockedRegionMut<'a, P: MemoryPlatform, G: CounterGuard> {
    ledger: &'a BudgetLedger<P, G>,
    bytes: &'a mut [u8],
    released: bool,
}

impl<'a, P: MemoryPlatform, G: CounterGuard> LockedRegionMut<'a, P, G> {
    pub(crate) fn new(ledger: &'a BudgetLedger<P, G>, bytes: &'a mut [u8]) -> Self {
        Self {
            ledger,
            bytes,
            released: false,
        }
    }

    /// The locked bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &*self.bytes
    }

    /// The locked bytes, writable.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut *self.bytes
    }

    /// Unlocks now and reports the outcome instead of logging it on drop.
    pub fn release(mut self) -> Result<(), MlockError> {
        self.released = true;
        self.ledger.unlock_slice(&*self.bytes)
    }
}

impl<P: MemoryPlatform, G: CounterGuard> Drop for LockedRegionMut<'_, P, G> {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = self.ledger.unlock_slice(&*self.bytes) {
            log::error!("failed to unlock {} bytes on drop: {e}", self.bytes.len());
        }
    }
}

impl<P: MemoryPlatform, G: CounterGuard> core::fmt::Debug for LockedRegionMut<'_, P, G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LockedRegionMut")
            .field("len", &self.bytes.len())
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}
