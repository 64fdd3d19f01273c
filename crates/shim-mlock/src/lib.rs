// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Memory locking with a process-wide byte budget.
//!
//! Sensitive buffers (key material, passphrases) are pinned into RAM so they
//! never reach swap. Operating systems cap how much a process may pin, and
//! exceeding that cap fails late and expensively. [`BudgetLedger`] keeps a
//! running, page-rounded total of what has been locked and rejects requests
//! that would exceed the limit before any OS call is made.
//!
//! # Components
//!
//! - [`MemoryPlatform`]: page size, limit probe, pin/unpin. [`SystemPlatform`]
//!   is the host implementation (Unix-like via `mlock`, Windows via
//!   `VirtualLock`).
//! - [`round_up_to_pages`]: the accounting unit is a whole page.
//! - [`BudgetLedger`]: admission check, OS call and counter update under one
//!   guard acquisition.
//! - [`CounterGuard`]: [`Guarded`] (mutex, shareable between threads) or
//!   [`Unguarded`] (single-threaded, `!Sync`).
//! - [`Tolerance`]: failure policy for the `*_enforced` operations, which
//!   terminate the process on any failure the caller did not tolerate.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(unix)]
//! # fn example() -> Result<(), shim_mlock::MlockError> {
//! use shim_mlock::{BudgetLedger, Tolerance};
//!
//! let ledger = BudgetLedger::new()?;
//! let key = vec![0u8; 32];
//!
//! {
//!     // Unlocked again when `region` goes out of scope
//!     let region = ledger.lock_region(&key)?;
//!     assert_eq!(region.as_slice().len(), 32);
//! }
//!
//! // Enforcing form: an over-limit request is absorbed, anything else aborts
//! ledger.lock_enforced(
//!     core::ptr::NonNull::from(&key[0]),
//!     key.len(),
//!     Tolerance::OVER_MEM_LIMIT,
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod error;
mod guard;
mod ledger;
mod pages;
mod platform;
mod policy;
mod region;
mod support;

pub use error::MlockError;
pub use guard::{CounterGuard, Guarded, Unguarded};
pub use ledger::BudgetLedger;
pub use pages::round_up_to_pages;
pub use platform::MemoryPlatform;
pub use policy::Tolerance;
pub use region::{LockedRegion, LockedRegionMut};

#[cfg(any(all(unix, not(target_os = "openbsd")), windows))]
pub use platform::SystemPlatform;

#[cfg(any(test, feature = "test-utils"))]
pub use support::test_utils;
