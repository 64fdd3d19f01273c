// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for shim-mlock.

use core::ptr::NonNull;
use std::process::Output;

use crate::error::MlockError;
use crate::guard::{CounterGuard, Guarded};
use crate::ledger::BudgetLedger;
use crate::support::test_utils::MockPlatform;

/// Installs `env_logger` once, honouring `RUST_LOG`.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs an ignored test as a subprocess and returns its exit status and output.
pub fn run_test_as_subprocess(test_name: &str) -> Output {
    let exe = std::env::current_exe().expect("Failed to current_exe()");

    std::process::Command::new(exe)
        .args([
            "--exact",
            test_name,
            "--ignored",
            "--test-threads=1",
            "--nocapture",
        ])
        .output()
        .expect("Failed to run subprocess")
}

/// A heap-allocated buffer of `len` bytes to hand to the ledger.
pub fn buffer(len: usize) -> Vec<u8> {
    vec![0xA5; len]
}

/// A thread-safe ledger over `mock`.
pub fn ledger(mock: &MockPlatform) -> BudgetLedger<&MockPlatform, Guarded> {
    init_logger();
    BudgetLedger::<_, Guarded>::init(mock).expect("Failed to init()")
}

/// Pointer to the first byte of a non-empty slice.
pub fn ptr_of(bytes: &[u8]) -> NonNull<u8> {
    NonNull::from(&bytes[0])
}

/// Guard that can never be constructed nor acquired.
pub struct FailingGuard;

impl CounterGuard for FailingGuard {
    fn try_new(_initial: u64) -> Result<Self, MlockError> {
        Err(MlockError::MtxInit)
    }

    fn with_exclusive<R>(&self, _f: impl FnOnce(&mut u64) -> R) -> Result<R, MlockError> {
        Err(MlockError::MtxOp)
    }
}

/// Poisons the ledger's mutex by panicking while holding it.
pub fn poison(ledger: &BudgetLedger<&MockPlatform, Guarded>) {
    std::thread::scope(|s| {
        let joined = s
            .spawn(|| {
                let _: Result<(), MlockError> = ledger
                    .guard_for_test()
                    .with_exclusive(|_| panic!("poison the counter"));
            })
            .join();

        assert!(joined.is_err());
    });
}
