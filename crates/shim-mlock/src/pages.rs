// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Page accounting arithmetic.

/// Rounds `n` up to a whole number of pages and returns the byte count.
///
/// Every page touched by a partial range is counted, so the result is the
/// smallest multiple of `page_size` that is `>= n`.
///
/// # Panics
///
/// Panics if `page_size` is zero or if the rounded value does not fit in a
/// `u64`. Truncating here would let a request slip past the admission check.
#[inline]
pub fn round_up_to_pages(n: u64, page_size: u64) -> u64 {
    assert!(page_size > 0, "page size must be non-zero");

    let pages = n.div_ceil(page_size);

    match pages.checked_mul(page_size) {
        Some(bytes) => bytes,
        None => panic!("page rounding overflowed: {n} bytes, {page_size}-byte pages"),
    }
}
