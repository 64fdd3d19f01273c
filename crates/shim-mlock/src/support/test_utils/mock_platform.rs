// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::io;
use std::sync::Mutex;

use crate::error::MlockError;
use crate::platform::MemoryPlatform;

/// Configurable behavior for [`MockPlatform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockPlatformBehaviour {
    /// Every call succeeds.
    None,
    /// Every pin fails.
    FailLockAlways,
    /// Every unpin fails.
    FailUnlockAlways,
    /// Fail pin on the Nth call (1-indexed: 1 = first call fails).
    FailLockAtNth(usize),
    /// The limit probe cannot read the limit.
    FailGetLimit,
    /// The limit probe cannot raise the limit.
    FailSetLimit,
}

/// In-memory platform with a fixed page size and limit.
///
/// Never touches the OS. Counts pin/unpin calls so tests can assert that a
/// rejected request issued no OS call.
#[derive(Debug)]
pub struct MockPlatform {
    page_size: u64,
    limit: u64,
    behaviour: Mutex<MockPlatformBehaviour>,
    pin_count: AtomicUsize,
    unpin_count: AtomicUsize,
}

impl MockPlatform {
    /// Creates a mock reporting `page_size` and `limit`.
    pub fn new(page_size: u64, limit: u64, behaviour: MockPlatformBehaviour) -> Self {
        Self {
            page_size,
            limit,
            behaviour: Mutex::new(behaviour),
            pin_count: AtomicUsize::new(0),
            unpin_count: AtomicUsize::new(0),
        }
    }

    /// Changes the mock behavior at runtime.
    pub fn change_behaviour(&self, behaviour: MockPlatformBehaviour) {
        *self
            .behaviour
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = behaviour;
    }

    /// Number of pin calls made so far.
    pub fn pin_count(&self) -> usize {
        self.pin_count.load(Ordering::SeqCst)
    }

    /// Number of unpin calls made so far.
    pub fn unpin_count(&self) -> usize {
        self.unpin_count.load(Ordering::SeqCst)
    }

    /// Resets both call counters.
    pub fn reset_counts(&self) {
        self.pin_count.store(0, Ordering::SeqCst);
        self.unpin_count.store(0, Ordering::SeqCst);
    }

    fn behaviour(&self) -> MockPlatformBehaviour {
        *self
            .behaviour
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MemoryPlatform for MockPlatform {
    fn page_size(&self) -> u64 {
        self.page_size
    }

    fn memlock_limit(&self) -> Result<u64, MlockError> {
        match self.behaviour() {
            MockPlatformBehaviour::FailGetLimit => Err(MlockError::GetLimit),
            MockPlatformBehaviour::FailSetLimit => Err(MlockError::SetLimit),
            _ => Ok(self.limit),
        }
    }

    fn pin(&self, _ptr: NonNull<u8>, _len: usize) -> io::Result<()> {
        let current = self.pin_count.fetch_add(1, Ordering::SeqCst);

        match self.behaviour() {
            MockPlatformBehaviour::FailLockAlways => Err(io::Error::other("mock pin failure")),
            MockPlatformBehaviour::FailLockAtNth(n) if current + 1 == n => {
                Err(io::Error::other("mock pin failure"))
            }
            _ => Ok(()),
        }
    }

    fn unpin(&self, _ptr: NonNull<u8>, _len: usize) -> io::Result<()> {
        self.unpin_count.fetch_add(1, Ordering::SeqCst);

        match self.behaviour() {
            MockPlatformBehaviour::FailUnlockAlways => Err(io::Error::other("mock unpin failure")),
            _ => Ok(()),
        }
    }
}
