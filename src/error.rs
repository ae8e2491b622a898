// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Errors shared by the calculator, the analyzers and the synthesizer.

use snafu::Snafu;

/// Maximum number of halvings performed when folding a frequency into an octave.
pub const MAX_OCTAVE_REDUCTIONS: u32 = 64;

/// Possible errors of the numeric core.
///
/// All of them are local to a single call. Nothing is left in a partially
/// updated state, so callers can report the message and carry on.
#[derive(Debug, Clone, PartialEq, Snafu)]
pub enum TuningError {
    #[snafu(display("Scale degree {} is outside of the table range 0..=12", degree))]
    InvalidDegree { degree: i32 },
    #[snafu(display("{} must be positive, got {}", name, value))]
    NonPositiveInput { name: &'static str, value: f64 },
    #[snafu(display("{} must be a finite number, got {}", name, value))]
    NonFiniteInput { name: &'static str, value: f64 },
    #[snafu(display(
        "Folding {} Hz into the octave above {} Hz did not settle after {} halvings",
        value,
        reference,
        iterations
    ))]
    NonConverging {
        value: f64,
        reference: f64,
        iterations: u32,
    },
}

/// Check that a quantity is a positive, finite number.
pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TuningError::NonPositiveInput { name, value })
    }
}

/// Check that a quantity is neither infinite nor NaN. Zero and negative values pass.
pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, TuningError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TuningError::NonFiniteInput { name, value })
    }
}
