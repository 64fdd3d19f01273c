// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::error::MlockError;
use crate::support::test_utils::{MockPlatform, MockPlatformBehaviour};
use crate::tests::utils::{buffer, ledger};

const PAGE: u64 = 4096;

#[test]
fn test_region_unlocks_on_drop() {
    let mock = MockPlatform::new(PAGE, PAGE, MockPlatformBehaviour::None);
    let ledger = ledger(&mock);
    let key = buffer(32);

    {
        let region = ledger.lock_region(&key).expect("Failed to lock_region()");

        assert_eq!(region.as_slice().len(), 32);
        assert_eq!(ledger.locked_bytes(), Ok(PAGE));
    }

    assert_eq!(ledger.locked_bytes(), Ok(0));
    assert_eq!(mock.unpin_count(), 1);
}

#[test]
fn test_region_release_reports_and_skips_drop() {
    let mock = MockPlatform::new(PAGE, PAGE, MockPlatformBehaviour::None);
    let ledger = ledger(&mock);
    let key = buffer(32);

    let region = ledger.lock_region(&key).expect("Failed to lock_region()");
    region.release().expect("Failed to release()");

    assert_eq!(ledger.locked_bytes(), Ok(0));
    assert_eq!(mock.unpin_count(), 1);
}

#[test]
fn test_region_release_surfaces_unlock_failure() {
    let mock = MockPlatform::new(PAGE, PAGE, MockPlatformBehaviour::None);
    let ledger = ledger(&mock);
    let key = buffer(32);

    let region = ledger.lock_region(&key).expect("Failed to lock_region()");
    mock.change_behaviour(MockPlatformBehaviour::FailUnlockAlways);

    assert_eq!(region.release(), Err(MlockError::LockOp));
    assert_eq!(ledger.locked_bytes(), Ok(PAGE));
}

#[test]
fn test_region_drop_swallows_unlock_failure() {
    let mock = MockPlatform::new(PAGE, PAGE, MockPlatformBehaviour::None);
    let ledger = ledger(&mock);
    let key = buffer(32);

    {
        let _region = ledger.lock_region(&key).expect("Failed to lock_region()");
        mock.change_behaviour(MockPlatformBehaviour::FailUnlockAlways);
    }

    assert_eq!(ledger.locked_bytes(), Ok(PAGE));
}

#[test]
fn test_region_over_limit_is_not_created() {
    let mock = MockPlatform::new(PAGE, PAGE, MockPlatformBehaviour::None);
    let ledger = ledger(&mock);
    let key = buffer(PAGE as usize + 1);

    let result = ledger.lock_region(&key);

    assert!(matches!(result, Err(MlockError::OverMemLimit)));
    assert_eq!(mock.pin_count(), 0);
}

#[test]
fn test_region_mut_allows_writing_locked_bytes() {
    let mock = MockPlatform::new(PAGE, PAGE, MockPlatformBehaviour::None);
    let ledger = ledger(&mock);
    let mut key = buffer(32);

    {
        let mut region = ledger.lock_region_mut(&mut key).expect("Failed to lock_region_mut()");
        region.as_mut_slice().fill(0x42);

        assert!(region.as_slice().iter().all(|b| *b == 0x42));
        assert_eq!(ledger.locked_bytes(), Ok(PAGE));
    }

    assert_eq!(ledger.locked_bytes(), Ok(0));
    assert!(key.iter().all(|b| *b == 0x42));
}

#[test]
fn test_region_mut_release_reports_unlock_failure() {
    let mock = MockPlatform::new(PAGE, PAGE, MockPlatformBehaviour::None);
    let ledger = ledger(&mock);
    let mut key = buffer(32);

    let region = ledger.lock_region_mut(&mut key).expect("Failed to lock_region_mut()");
    mock.change_behaviour(MockPlatformBehaviour::FailUnlockAlways);

    assert_eq!(region.release(), Err(MlockError::LockOp));
    assert_eq!(ledger.locked_bytes(), Ok(PAGE));
}
