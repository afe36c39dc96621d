// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polar line geometry — line evaluation, clipping to the frame, and
// pairwise intersection.

pub mod extreme;
pub mod line;

pub use extreme::{ExtremePoints, clip_to_bounds};
pub use line::{Line, LineId, RawLine, angle_between};
