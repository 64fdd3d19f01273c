// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::error::MlockError;
use crate::policy::{Disposition, Operation, Tolerance, disposition};

#[test]
fn test_tolerance_none_contains_nothing() {
    assert!(!Tolerance::NONE.contains(Tolerance::LOCK_FAIL));
    assert!(!Tolerance::NONE.contains(Tolerance::OVER_MEM_LIMIT));
    assert!(!Tolerance::NONE.contains(Tolerance::UNLOCK_FAIL));
}

#[test]
fn test_tolerance_bitor_combines() {
    let mut policy = Tolerance::LOCK_FAIL | Tolerance::OVER_MEM_LIMIT;
    assert!(policy.contains(Tolerance::LOCK_FAIL));
    assert!(policy.contains(Tolerance::OVER_MEM_LIMIT));
    assert!(!policy.contains(Tolerance::UNLOCK_FAIL));

    policy |= Tolerance::UNLOCK_FAIL;
    assert!(policy.contains(Tolerance::UNLOCK_FAIL));
}

#[test]
fn test_lock_failures_follow_policy() {
    assert_eq!(
        disposition(Operation::Lock, MlockError::LockOp, Tolerance::LOCK_FAIL),
        Disposition::Continue
    );
    assert_eq!(
        disposition(Operation::Lock, MlockError::LockOp, Tolerance::OVER_MEM_LIMIT),
        Disposition::Abort
    );
    assert_eq!(
        disposition(Operation::Lock, MlockError::OverMemLimit, Tolerance::OVER_MEM_LIMIT),
        Disposition::Continue
    );
    assert_eq!(
        disposition(Operation::Lock, MlockError::OverMemLimit, Tolerance::NONE),
        Disposition::Abort
    );
}

#[test]
fn test_unlock_fail_flag_does_not_apply_to_lock() {
    assert_eq!(
        disposition(Operation::Lock, MlockError::LockOp, Tolerance::UNLOCK_FAIL),
        Disposition::Abort
    );
    assert_eq!(
        disposition(Operation::Unlock, MlockError::LockOp, Tolerance::LOCK_FAIL),
        Disposition::Abort
    );
    assert_eq!(
        disposition(Operation::Unlock, MlockError::LockOp, Tolerance::UNLOCK_FAIL),
        Disposition::Continue
    );
}

#[test]
fn test_underflow_is_never_tolerated() {
    let all = Tolerance::LOCK_FAIL | Tolerance::OVER_MEM_LIMIT | Tolerance::UNLOCK_FAIL;

    assert_eq!(
        disposition(Operation::Unlock, MlockError::UnderMemMin, all),
        Disposition::Abort
    );
}

#[test]
fn test_guard_failures_are_never_tolerated() {
    let all = Tolerance::LOCK_FAIL | Tolerance::OVER_MEM_LIMIT | Tolerance::UNLOCK_FAIL;

    for op in [Operation::Init, Operation::Lock, Operation::Unlock] {
        assert_eq!(disposition(op, MlockError::MtxOp, all), Disposition::Abort);
        assert_eq!(disposition(op, MlockError::MtxInit, all), Disposition::Abort);
    }
}

#[test]
fn test_init_failures_are_never_tolerated() {
    let all = Tolerance::LOCK_FAIL | Tolerance::OVER_MEM_LIMIT | Tolerance::UNLOCK_FAIL;

    assert_eq!(
        disposition(Operation::Init, MlockError::GetLimit, all),
        Disposition::Abort
    );
    assert_eq!(
        disposition(Operation::Init, MlockError::SetLimit, all),
        Disposition::Abort
    );
}

#[test]
fn test_diagnostics_name_the_failure() {
    assert_eq!(MlockError::GetLimit.diagnostic(), "Failed to get memory limit.");
    assert_eq!(
        MlockError::OverMemLimit.diagnostic(),
        "Went over memory locking limit."
    );
    assert_eq!(
        MlockError::UnderMemMin.diagnostic(),
        "Went under minimum memory locking limit."
    );
}

#[test]
fn test_limit_messages_do_not_name_a_platform() {
    for error in [MlockError::GetLimit, MlockError::SetLimit, MlockError::LockOp] {
        let message = error.to_string();

        assert!(!message.contains("rlimit"), "{message}");
        assert!(!message.contains("mlock"), "{message}");
    }
}
