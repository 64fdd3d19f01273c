// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test doubles for code built on the ledger.

mod mock_platform;

pub use mock_platform::{MockPlatform, MockPlatformBehaviour};
