// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use core::{mem::MaybeUninit, ptr::NonNull};
use std::io;

use windows_sys::Win32::System::{
    Memory as win, SystemInformation as win_info, Threading as win_thread,
};

use crate::error::MlockError;

/// Wraps `GetSystemInfo` and returns `dwPageSize`.
#[inline]
pub(super) fn page_size() -> u64 {
    let mut info = MaybeUninit::<win_info::SYSTEM_INFO>::uninit();
    unsafe {
        win_info::GetSystemInfo(info.as_mut_ptr());
        info.assume_init().dwPageSize as u64
    }
}

/// Derives the lockable budget from the minimum working set size.
///
/// `VirtualLock` is bounded by the working set minimum; one page of it is
/// reserved for the process itself. There is no soft/hard split to raise.
pub(super) fn working_set_limit() -> Result<u64, MlockError> {
    let mut minimum: usize = 0;
    let mut maximum: usize = 0;

    let ok = unsafe {
        win_thread::GetProcessWorkingSetSize(
            win_thread::GetCurrentProcess(),
            &mut minimum,
            &mut maximum,
        )
    };

    if ok == 0 {
        log::warn!("GetProcessWorkingSetSize: {}", io::Error::last_os_error());
        return Err(MlockError::GetLimit);
    }

    Ok((minimum as u64).saturating_sub(page_size()))
}

/// Wraps `VirtualLock`.
pub(super) fn virtual_lock(ptr: NonNull<u8>, len: usize) -> io::Result<()> {
    match unsafe { win::VirtualLock(ptr.as_ptr() as _, len) } {
        0 => Err(io::Error::last_os_error()),
        _ => Ok(()),
    }
}

/// Wraps `VirtualUnlock`.
pub(super) fn virtual_unlock(ptr: NonNull<u8>, len: usize) -> io::Result<()> {
    match unsafe { win::VirtualUnlock(ptr.as_ptr() as _, len) } {
        0 => Err(io::Error::last_os_error()),
        _ => Ok(()),
    }
}
