// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! OS capabilities consumed by the ledger.
//!
//! The ledger never calls the operating system directly. It talks to a
//! [`MemoryPlatform`], which is [`SystemPlatform`] in production and a mock
//! in tests.

use core::ptr::NonNull;
use std::io;

use crate::error::MlockError;

#[cfg(all(unix, not(target_os = "openbsd")))]
mod unix;
#[cfg(windows)]
mod windows;

/// Page-size, limit and pin/unpin primitives of the host OS.
pub trait MemoryPlatform {
    /// Native page size in bytes.
    fn page_size(&self) -> u64;

    /// Maximum number of bytes this process may hold locked.
    ///
    /// May raise the soft limit to the hard ceiling as a side effect.
    ///
    /// # Errors
    ///
    /// [`MlockError::GetLimit`] if the limit cannot be read,
    /// [`MlockError::SetLimit`] if raising it fails.
    fn memlock_limit(&self) -> Result<u64, MlockError>;

    /// Pins `len` bytes at `ptr` into physical memory.
    fn pin(&self, ptr: NonNull<u8>, len: usize) -> io::Result<()>;

    /// Releases a pin taken with [`MemoryPlatform::pin`].
    fn unpin(&self, ptr: NonNull<u8>, len: usize) -> io::Result<()>;
}

/// The host operating system.
#[cfg(any(all(unix, not(target_os = "openbsd")), windows))]
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SystemPlatform;

#[cfg(all(unix, not(target_os = "openbsd")))]
impl MemoryPlatform for SystemPlatform {
    #[inline]
    fn page_size(&self) -> u64 {
        unix::page_size()
    }

    fn memlock_limit(&self) -> Result<u64, MlockError> {
        unix::raise_memlock_limit()
    }

    #[inline]
    fn pin(&self, ptr: NonNull<u8>, len: usize) -> io::Result<()> {
        unix::mlock(ptr, len)
    }

    #[inline]
    fn unpin(&self, ptr: NonNull<u8>, len: usize) -> io::Result<()> {
        unix::munlock(ptr, len)
    }
}

#[cfg(windows)]
impl MemoryPlatform for SystemPlatform {
    #[inline]
    fn page_size(&self) -> u64 {
        windows::page_size()
    }

    fn memlock_limit(&self) -> Result<u64, MlockError> {
        windows::working_set_limit()
    }

    #[inline]
    fn pin(&self, ptr: NonNull<u8>, len: usize) -> io::Result<()> {
        windows::virtual_lock(ptr, len)
    }

    #[inline]
    fn unpin(&self, ptr: NonNull<u8>, len: usize) -> io::Result<()> {
        windows::virtual_unlock(ptr, len)
    }
}

impl<P: MemoryPlatform + ?Sized> MemoryPlatform for &P {
    #[inline]
    fn page_size(&self) -> u64 {
        (**self).page_size()
    }

    #[inline]
    fn memlock_limit(&self) -> Result<u64, MlockError> {
        (**self).memlock_limit()
    }

    #[inline]
    fn pin(&self, ptr: NonNull<u8>, len: usize) -> io::Result<()> {
        (**self).pin(ptr, len)
    }

    #[inline]
    fn unpin(&self, ptr: NonNull<u8>, len: usize) -> io::Result<()> {
        (**self).unpin(ptr, len)
    }
}
