// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for shim-mlock.
use thiserror::Error;

/// Failures reported by the budget ledger and its platform probes.
///
/// Every variant leaves the ledger's running total unchanged.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[repr(u8)]
pub enum MlockError {
    /// The OS memory-lock limit could not be read.
    #[error("memory-lock limit could not be read")]
    GetLimit = 0,

    /// Raising the soft memory-lock limit to the hard ceiling failed.
    #[error("memory-lock limit could not be raised")]
    SetLimit = 1,

    /// The counter guard could not be constructed.
    #[error("counter guard initialization failed")]
    MtxInit = 2,

    /// The counter guard could not be acquired (poisoned).
    #[error("counter guard acquisition failed")]
    MtxOp = 3,

    /// The request would push the locked total over the limit.
    #[error("request exceeds the memory locking limit")]
    OverMemLimit = 4,

    /// The request would drive the locked total below zero.
    #[error("request exceeds the currently locked total")]
    UnderMemMin = 5,

    /// The OS refused to pin or unpin the range.
    #[error("OS refused to lock or unlock the range")]
    LockOp = 6,
}

impl MlockError {
    /// One-line diagnostic printed before a fatal exit.
    pub fn diagnostic(&self) -> &'static str {
        match self {
            Self::GetLimit => "Failed to get memory limit.",
            Self::SetLimit => "Failed to increase memory limit.",
            Self::MtxInit => "Failed to initialize n mutex.",
            Self::MtxOp => "Failed to lock or unlock mutex.",
            Self::OverMemLimit => "Went over memory locking limit.",
            Self::UnderMemMin => "Went under minimum memory locking limit.",
            Self::LockOp => "Failed to memlock or memunlock.",
        }
    }
}
