// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Where the frets of a string instrument go in each tuning system.

use crate::error::{positive, TuningError};
use crate::note::CHROMATIC_NAMES;
use crate::tuning::{TuningSystem, TABLE_LEN};

/// Scale length of a classical guitar in millimetres.
pub const CLASSICAL_GUITAR_MM: f64 = 650.0;

/// Distance from the nut at which the string sounds `ratio` times its open frequency.
///
/// # Examples
///
/// ```
/// use tuning_lab::fretboard::*;
///
/// assert_eq!(fret_position(650.0, 2.0), Ok(325.0));
/// assert_eq!(fret_position(650.0, 1.0), Ok(0.0));
/// assert!(fret_position(0.0, 2.0).is_err());
/// ```
pub fn fret_position(scale_length_mm: f64, ratio: f64) -> Result<f64, TuningError> {
    let scale_length_mm = positive("scale length", scale_length_mm)?;
    let ratio = positive("ratio", ratio)?;
    Ok(scale_length_mm * (1.0 - 1.0 / ratio))
}

/// Positions of the frets for degrees 0 through 12, measured from the nut.
pub fn frets(scale_length_mm: f64, system: TuningSystem) -> Result<Vec<f64>, TuningError> {
    system
        .ratios()
        .iter()
        .map(|&ratio| fret_position(scale_length_mm, ratio))
        .collect()
}

/// A fret as placed by two different tuning systems.
#[derive(Debug, Clone, PartialEq)]
pub struct FretComparison {
    pub degree: usize,
    pub name: &'static str,
    pub position_a: f64,
    pub position_b: f64,
    /// `position_a - position_b` in millimetres.
    pub difference: f64,
}

/// Compare the fret positions of two systems, degree by degree.
/// The open string name is taken to be C.
pub fn compare_frets(
    scale_length_mm: f64,
    a: TuningSystem,
    b: TuningSystem,
) -> Result<Vec<FretComparison>, TuningError> {
    let frets_a = frets(scale_length_mm, a)?;
    let frets_b = frets(scale_length_mm, b)?;
    Ok((0..TABLE_LEN)
        .map(|degree| FretComparison {
            degree,
            name: CHROMATIC_NAMES[degree % 12],
            position_a: frets_a[degree],
            position_b: frets_b[degree],
            difference: frets_a[degree] - frets_b[degree],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_fret_is_in_the_middle() {
        for system in TuningSystem::ALL.iter() {
            let positions = frets(CLASSICAL_GUITAR_MM, *system).unwrap();
            assert_eq!(positions.len(), 13);
            assert_eq!(positions[0], 0.0);
            assert_eq!(positions[12], 325.0);
        }
    }

    #[test]
    fn tempered_major_third_fret_sits_further_up() {
        let rows = compare_frets(
            CLASSICAL_GUITAR_MM,
            TuningSystem::EqualTemperament,
            TuningSystem::JustIntonation,
        )
        .unwrap();
        let third = &rows[4];
        assert_eq!(third.name, "E");
        // just: 650 * (1 - 4/5) = 130
        assert!((third.position_b - 130.0).abs() < 1e-9);
        assert!((third.difference - 4.095).abs() < 1e-3);
        assert_eq!(rows[0].difference, 0.0);
        assert_eq!(rows[12].name, "C");
    }

    #[test]
    fn invalid_scale_length() {
        assert!(frets(-650.0, TuningSystem::Pythagorean).is_err());
        assert!(compare_frets(
            f64::NAN,
            TuningSystem::Pythagorean,
            TuningSystem::Mesotonic
        )
        .is_err());
    }
}
