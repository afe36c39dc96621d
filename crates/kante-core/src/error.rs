// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Kante.
//
// Detection itself never fails: "no corners this frame" is a normal outcome.
// These variants cover the fallible edges around it (configuration, input
// construction, image decoding, and the command-line front end).

use thiserror::Error;

/// Top-level error type for all Kante operations.
#[derive(Debug, Error)]
pub enum KanteError {
    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Input data --
    #[error("edge map has {actual} samples, expected {expected} for {width}x{height}")]
    EdgeMapSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("image must be at least 1x1, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Runtime --
    #[error("analysis worker stopped: {0}")]
    Worker(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KanteError>;
