// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The harmonic series and how its members line up with the tempered scale.

use crate::error::{positive, TuningError};
use crate::note::interval_name;

/// One member of a harmonic series.
#[derive(Debug, Clone, PartialEq)]
pub struct Harmonic {
    /// 1 is the fundamental.
    pub order: u32,
    pub frequency: f64,
    /// Amplitude in a sawtooth-like spectrum, `1/order`.
    pub amplitude: f64,
    /// Closest tempered interval above the fundamental, in semitones.
    pub semitones: u32,
    pub interval: &'static str,
    /// How far the harmonic is from that tempered interval.
    pub cents_deviation: f64,
}

/// The first `count` harmonics of `fundamental`.
///
/// # Examples
///
/// ```
/// use tuning_lab::harmonics::*;
///
/// let series = harmonic_series(110.0, 8).unwrap();
/// assert_eq!(series.len(), 8);
/// assert_eq!(series[2].frequency, 330.0);
/// assert_eq!(series[2].interval, "Perfect fifth");
/// assert_eq!(series[3].amplitude, 0.25);
/// ```
pub fn harmonic_series(fundamental: f64, count: u32) -> Result<Vec<Harmonic>, TuningError> {
    let fundamental = positive("fundamental", fundamental)?;
    Ok((1..=count)
        .map(|order| {
            let cents = 1200.0 * (order as f64).log2();
            let semitones = (cents / 100.0).round() as u32;
            Harmonic {
                order,
                frequency: fundamental * order as f64,
                amplitude: 1.0 / order as f64,
                semitones,
                interval: interval_name(semitones),
                cents_deviation: cents - 100.0 * semitones as f64,
            }
        })
        .collect())
}

/// Positions of the inner nodes of a string vibrating in its `order`-th mode,
/// as fractions of the string length.
///
/// ```
/// use tuning_lab::harmonics::node_positions;
///
/// assert_eq!(node_positions(4), vec![0.25, 0.5, 0.75]);
/// assert!(node_positions(1).is_empty());
/// ```
pub fn node_positions(order: u32) -> Vec<f64> {
    (1..order).map(|k| k as f64 / order as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifth_and_seventh_harmonics_are_flat() {
        let series = harmonic_series(100.0, 7).unwrap();
        let fifth = &series[4];
        assert_eq!(fifth.interval, "Major third");
        assert_eq!(fifth.semitones, 28);
        assert!((fifth.cents_deviation + 13.686).abs() < 1e-3);
        let seventh = &series[6];
        assert_eq!(seventh.interval, "Minor seventh");
        assert!((seventh.cents_deviation + 31.174).abs() < 1e-3);
    }

    #[test]
    fn octaves_are_exact() {
        let series = harmonic_series(55.0, 16).unwrap();
        for order in &[2usize, 4, 8, 16] {
            let harmonic = &series[order - 1];
            assert_eq!(harmonic.interval, "Octave");
            assert_eq!(harmonic.cents_deviation, 0.0);
        }
        assert_eq!(series[0].interval, "Unison");
    }

    #[test]
    fn empty_and_invalid() {
        assert!(harmonic_series(100.0, 0).unwrap().is_empty());
        assert!(harmonic_series(0.0, 4).is_err());
        assert!(node_positions(0).is_empty());
    }
}
