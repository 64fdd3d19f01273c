// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::ptr::NonNull;
use std::io;

use crate::error::MlockError;

/// Wraps `sysconf(_SC_PAGESIZE)`, or `vm_page_size` on macOS.
#[inline]
pub(super) fn page_size() -> u64 {
    #[cfg(target_os = "macos")]
    unsafe {
        libc::vm_page_size as u64
    }
    #[cfg(not(target_os = "macos"))]
    {
        let ret = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        debug_assert!(ret > 0, "sysconf(_SC_PAGESIZE) failed");
        ret as u64
    }
}

/// Reads `RLIMIT_MEMLOCK` and raises the soft limit to the hard limit when
/// they differ. Returns the (possibly raised) soft limit.
///
/// `RLIM_INFINITY` maps to `u64::MAX`.
pub(super) fn raise_memlock_limit() -> Result<u64, MlockError> {
    let mut rl = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };

    if unsafe { libc::getrlimit(libc::RLIMIT_MEMLOCK, &mut rl) } != 0 {
        log::warn!("getrlimit(RLIMIT_MEMLOCK): {}", io::Error::last_os_error());
        return Err(MlockError::GetLimit);
    }

    if rl.rlim_max > rl.rlim_cur {
        rl.rlim_cur = rl.rlim_max;

        if unsafe { libc::setrlimit(libc::RLIMIT_MEMLOCK, &rl) } != 0 {
            log::warn!("setrlimit(RLIMIT_MEMLOCK): {}", io::Error::last_os_error());
            return Err(MlockError::SetLimit);
        }
    }

    if rl.rlim_cur == libc::RLIM_INFINITY {
        return Ok(u64::MAX);
    }

    Ok(rl.rlim_cur as u64)
}

/// Wraps `mlock`.
pub(super) fn mlock(ptr: NonNull<u8>, len: usize) -> io::Result<()> {
    match unsafe { libc::mlock(ptr.as_ptr() as *const libc::c_void, len) } {
        -1 => Err(io::Error::last_os_error()),
        _ => Ok(()),
    }
}

/// Wraps `munlock`.
pub(super) fn munlock(ptr: NonNull<u8>, len: usize) -> io::Result<()> {
    match unsafe { libc::munlock(ptr.as_ptr() as *const libc::c_void, len) } {
        -1 => Err(io::Error::last_os_error()),
        _ => Ok(()),
    }
}
