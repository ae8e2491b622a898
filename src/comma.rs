// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Drift analysis: stacking intervals, the commas they leave behind,
//! and the irregular intervals (wolves) inside a tuning table.

use std::convert::TryFrom;

use log::debug;

use crate::error::{finite, positive, TuningError};
use crate::pitch::{cents_deviation, nearest_octave, reduce_to_octave};
use crate::rational::Rational;
use crate::tuning::TuningSystem;

/// Ratio of a pure fifth.
pub const PURE_FIFTH: f64 = 1.5;

/// Deviation from a pure interval above which an interval counts as a wolf.
pub const WOLF_THRESHOLD_CENTS: f64 = 10.0;

/// The ratio of an equally tempered fifth, `2^(7/12)`.
pub fn tempered_fifth() -> f64 {
    2.0f64.powf(7.0 / 12.0)
}

/// The Pythagorean comma as an exact ratio: twelve pure fifths minus seven octaves.
///
/// ```
/// use tuning_lab::comma::*;
/// use tuning_lab::rational::Rational;
///
/// assert_eq!(pythagorean_comma(), Rational::new(531441, 524288));
/// ```
pub fn pythagorean_comma() -> Rational {
    Rational::new(531_441, 524_288)
}

/// Frequency reached after stacking `steps` intervals of `interval_ratio` on top of `root_hz`.
///
/// # Examples
///
/// ```
/// use tuning_lab::comma::*;
///
/// assert_eq!(chain_interval(100.0, 1.5, 2), Ok(225.0));
/// assert_eq!(chain_interval(100.0, 1.5, 0), Ok(100.0));
/// ```
pub fn chain_interval(root_hz: f64, interval_ratio: f64, steps: u32) -> Result<f64, TuningError> {
    let root_hz = positive("root frequency", root_hz)?;
    let interval_ratio = positive("interval ratio", interval_ratio)?;
    let factor = match i32::try_from(steps) {
        Ok(steps) => interval_ratio.powi(steps),
        Err(_) => interval_ratio.powf(steps as f64),
    };
    let chained = finite("chained frequency", root_hz * factor)?;
    positive("chained frequency", chained)
}

/// Where a chain of stacked intervals ends up compared to the octaves of its root.
#[derive(Debug, Clone, PartialEq)]
pub struct CommaAnalysis {
    pub root_hz: f64,
    pub steps: u32,
    /// End point of the chain before any octave reduction.
    pub chained_hz: f64,
    /// End point folded into `[root, 2 * root)`.
    pub reduced_hz: f64,
    /// Number of halvings needed for `reduced_hz`.
    pub reductions: u32,
    /// Octaves between the root and the closest power-of-two multiple of the chain.
    pub octaves: i32,
    /// End point transposed next to the octave above the root.
    pub closing_hz: f64,
    /// The pure octave above the root, `2 * root`.
    pub octave_target_hz: f64,
    /// `closing_hz - octave_target_hz`
    pub comma_hz: f64,
    /// Distance of the chain from its nearest octave, in cents.
    pub comma_cents: f64,
}

/// Stack `steps` intervals of `interval_ratio` and measure how far the
/// result lands from the nearest octave of the root.
///
/// # Examples
///
/// ```
/// use tuning_lab::comma::*;
///
/// let pure = analyze_chain(100.0, PURE_FIFTH, 12).unwrap();
/// assert!((pure.closing_hz - 202.73).abs() < 0.01);
/// assert!((pure.comma_cents - 23.46).abs() < 0.01);
///
/// let tempered = analyze_chain(100.0, tempered_fifth(), 12).unwrap();
/// assert!((tempered.closing_hz - 200.0).abs() < 1e-9);
/// assert!(tempered.comma_cents.abs() < 1e-9);
/// ```
pub fn analyze_chain(
    root_hz: f64,
    interval_ratio: f64,
    steps: u32,
) -> Result<CommaAnalysis, TuningError> {
    let chained_hz = chain_interval(root_hz, interval_ratio, steps)?;
    let (reduced_hz, reductions) = reduce_to_octave(chained_hz, root_hz)?;
    let (octave_hz, octaves) = nearest_octave(chained_hz, root_hz)?;
    let closing_hz = chained_hz * 2.0f64.powi(1 - octaves);
    let octave_target_hz = root_hz * 2.0;
    let comma_cents = cents_deviation(chained_hz, octave_hz)?;
    debug!(
        "{} steps of {} from {} Hz end {:.3} cents from {} octaves",
        steps, interval_ratio, root_hz, comma_cents, octaves
    );
    Ok(CommaAnalysis {
        root_hz,
        steps,
        chained_hz,
        reduced_hz,
        reductions,
        octaves,
        closing_hz,
        octave_target_hz,
        comma_hz: closing_hz - octave_target_hz,
        comma_cents,
    })
}

/// Exact counterpart of [`analyze_chain`] for whole number ratios:
/// the chain folded into the octave above unison, or `None` if the
/// fraction outgrows the integer range.
///
/// ```
/// use tuning_lab::comma::*;
/// use tuning_lab::rational::Rational;
///
/// assert_eq!(exact_chain(Rational::new(3, 2), 12), Some((pythagorean_comma(), 7)));
/// ```
pub fn exact_chain(interval: Rational, steps: u32) -> Option<(Rational, u32)> {
    interval
        .checked_pow(steps)?
        .reduce_to_octave(Rational::one())
}

/// The chromatic degrees visited by a walk of fifths starting on degree 0,
/// `count` notes long, sorted from low to high.
///
/// # Examples
///
/// ```
/// use tuning_lab::comma::*;
///
/// assert_eq!(fifths_scale(5), vec![0, 2, 4, 7, 9]);
/// assert_eq!(fifths_scale(7), vec![0, 2, 4, 6, 7, 9, 11]);
/// assert_eq!(fifths_scale(40).len(), 12);
/// ```
pub fn fifths_scale(count: usize) -> Vec<u8> {
    let mut degrees: Vec<u8> = (0..count.min(12)).map(|i| (i * 7 % 12) as u8).collect();
    degrees.sort_unstable();
    degrees
}

/// One instance of an interval inside a tuning table, e.g. the fifth from D to A.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalInstance {
    /// Degree the interval starts on.
    pub from_degree: i32,
    /// Degree the interval ends on, folded into `0..12`.
    pub to_degree: i32,
    pub ratio: f64,
    /// Deviation from the pure ratio in cents; positive means wider than pure.
    pub deviation_cents: f64,
}

/// All twelve instances of an interval of `semitones` in a tuning table,
/// compared with the pure ratio `pure_ratio`.
///
/// # Examples
///
/// ```
/// use tuning_lab::comma::*;
/// use tuning_lab::tuning::TuningSystem;
///
/// let thirds = intervals(TuningSystem::JustIntonation, 4, 1.25).unwrap();
/// assert_eq!(thirds.len(), 12);
/// assert!(thirds[0].deviation_cents.abs() < 1e-9);
/// ```
pub fn intervals(
    system: TuningSystem,
    semitones: u32,
    pure_ratio: f64,
) -> Result<Vec<IntervalInstance>, TuningError> {
    let pure_ratio = positive("pure ratio", pure_ratio)?;
    let table = system.ratios();
    (0..12)
        .map(|from| {
            let to = from + semitones as usize;
            let octaves = (to / 12) as i32;
            let to_degree = to % 12;
            let ratio = table[to_degree] * 2.0f64.powi(octaves) / table[from];
            Ok(IntervalInstance {
                from_degree: from as i32,
                to_degree: to_degree as i32,
                ratio,
                deviation_cents: cents_deviation(ratio, pure_ratio)?,
            })
        })
        .collect()
}

/// The twelve fifths of a tuning table.
pub fn fifths(system: TuningSystem) -> Result<Vec<IntervalInstance>, TuningError> {
    intervals(system, 7, PURE_FIFTH)
}

/// The fifth that strays furthest from 3:2, if it strays further than
/// [`WOLF_THRESHOLD_CENTS`]. Equal temperament spreads the comma evenly and has none.
///
/// # Examples
///
/// ```
/// use tuning_lab::comma::*;
/// use tuning_lab::tuning::TuningSystem;
///
/// let wolf = wolf_fifth(TuningSystem::Mesotonic).unwrap().unwrap();
/// assert_eq!((wolf.from_degree, wolf.to_degree), (8, 3));
/// assert_eq!(wolf_fifth(TuningSystem::EqualTemperament), Ok(None));
/// ```
pub fn wolf_fifth(system: TuningSystem) -> Result<Option<IntervalInstance>, TuningError> {
    let mut wolf: Option<IntervalInstance> = None;
    for fifth in fifths(system)? {
        let worse = match wolf {
            None => true,
            Some(current) => fifth.deviation_cents.abs() > current.deviation_cents.abs(),
        };
        if worse {
            wolf = Some(fifth);
        }
    }
    let wolf = wolf.filter(|w| w.deviation_cents.abs() > WOLF_THRESHOLD_CENTS);
    if let Some(w) = wolf {
        debug!(
            "{}: wolf fifth on degree {} ({:+.2} cents)",
            system, w.from_degree, w.deviation_cents
        );
    }
    Ok(wolf)
}

/// How one degree of a tuning system compares to the same degree of another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeDeviation {
    pub degree: i32,
    pub ratio: f64,
    pub reference_ratio: f64,
    /// Positive when `ratio` is sharper than `reference_ratio`.
    pub cents: f64,
}

/// Compare every degree of `system` with the same degree of `reference`.
///
/// # Examples
///
/// ```
/// use tuning_lab::comma::*;
/// use tuning_lab::tuning::TuningSystem;
///
/// let rows = deviation_table(TuningSystem::EqualTemperament, TuningSystem::JustIntonation).unwrap();
/// // the tempered major third is noticeably sharp
/// assert!((rows[4].cents - 13.69).abs() < 0.01);
/// ```
pub fn deviation_table(
    system: TuningSystem,
    reference: TuningSystem,
) -> Result<Vec<DegreeDeviation>, TuningError> {
    (0..=12)
        .map(|degree| {
            let ratio = system.ratio(degree)?;
            let reference_ratio = reference.ratio(degree)?;
            Ok(DegreeDeviation {
                degree,
                ratio,
                reference_ratio,
                cents: cents_deviation(ratio, reference_ratio)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_pure_fifths_leave_the_pythagorean_comma() {
        let a = analyze_chain(100.0, PURE_FIFTH, 12).unwrap();
        assert_eq!(a.chained_hz, 12974.6337890625);
        assert_eq!(a.octaves, 7);
        assert_eq!(a.reductions, 7);
        assert!((a.reduced_hz - 101.3643).abs() < 1e-4);
        assert!((a.closing_hz - 202.7287).abs() < 1e-4);
        assert_eq!(a.octave_target_hz, 200.0);
        assert!((a.comma_hz - 2.7287).abs() < 1e-4);
        assert!((a.comma_cents - 23.4600).abs() < 1e-4);

        let from_reduced = cents_deviation(a.reduced_hz, 100.0).unwrap();
        assert!((from_reduced - a.comma_cents).abs() < 1e-9);
        let exact = 1200.0 * pythagorean_comma().to_f64().log2();
        assert!((exact - a.comma_cents).abs() < 1e-9);
    }

    #[test]
    fn reducing_against_the_octave_target() {
        let chained = chain_interval(100.0, PURE_FIFTH, 12).unwrap();
        let (reduced, halvings) = reduce_to_octave(chained, 200.0).unwrap();
        assert_eq!(halvings, 6);
        assert!((reduced - 202.7287).abs() < 1e-4);
    }

    #[test]
    fn twelve_tempered_fifths_close_the_circle() {
        let a = analyze_chain(100.0, tempered_fifth(), 12).unwrap();
        assert_eq!(a.octaves, 7);
        assert!((a.closing_hz - 200.0).abs() < 1e-9);
        assert!(a.comma_hz.abs() < 1e-9);
        assert!(a.comma_cents.abs() < 1e-9);
        assert!(a.reduced_hz >= 100.0 && a.reduced_hz < 200.0);
    }

    #[test]
    fn a_single_fifth_is_far_from_any_octave() {
        let a = analyze_chain(100.0, PURE_FIFTH, 1).unwrap();
        assert_eq!(a.chained_hz, 150.0);
        assert_eq!(a.reduced_hz, 150.0);
        assert_eq!(a.reductions, 0);
        assert_eq!(a.octaves, 1);
        assert_eq!(a.closing_hz, 150.0);
        assert!((a.comma_cents + 498.045).abs() < 1e-3);
    }

    #[test]
    fn chain_rejects_bad_input() {
        assert!(chain_interval(0.0, 1.5, 3).is_err());
        assert!(chain_interval(100.0, -1.5, 3).is_err());
        assert!(analyze_chain(100.0, 0.0, 3).is_err());
    }

    #[test]
    fn chains_leaving_the_float_range() {
        assert_eq!(
            chain_interval(100.0, PURE_FIFTH, 1 << 31),
            Err(TuningError::NonFiniteInput {
                name: "chained frequency",
                value: f64::INFINITY
            })
        );
        assert_eq!(
            chain_interval(100.0, 0.5, u32::MAX),
            Err(TuningError::NonPositiveInput {
                name: "chained frequency",
                value: 0.0
            })
        );
        assert_eq!(chain_interval(100.0, 1.0, u32::MAX), Ok(100.0));
        assert!(chain_interval(100.0, PURE_FIFTH, 2000).is_err());
    }

    #[test]
    fn long_chains_hit_the_reduction_bound() {
        // 1.5^200 is about 2^117, more than the allowed halvings
        assert!(matches!(
            analyze_chain(100.0, PURE_FIFTH, 200),
            Err(TuningError::NonConverging { .. })
        ));
    }

    #[test]
    fn exact_chain_overflow() {
        assert_eq!(exact_chain(Rational::new(3, 2), 50), None);
        assert_eq!(
            exact_chain(Rational::new(5, 4), 3),
            Some((Rational::new(125, 64), 0))
        );
    }

    #[test]
    fn pythagorean_fifths() {
        let fifths = fifths(TuningSystem::Pythagorean).unwrap();
        let pure = fifths
            .iter()
            .filter(|f| f.deviation_cents.abs() < 1e-9)
            .count();
        assert_eq!(pure, 11);

        let wolf = wolf_fifth(TuningSystem::Pythagorean).unwrap().unwrap();
        assert_eq!((wolf.from_degree, wolf.to_degree), (6, 1));
        assert!((wolf.deviation_cents + 23.46).abs() < 0.01);
    }

    #[test]
    fn meantone_fifths() {
        let fifths = fifths(TuningSystem::Mesotonic).unwrap();
        for fifth in fifths.iter().filter(|f| f.from_degree != 8) {
            assert!((fifth.deviation_cents + 5.377).abs() < 1e-3, "{:?}", fifth);
        }
        let wolf = wolf_fifth(TuningSystem::Mesotonic).unwrap().unwrap();
        assert!((wolf.ratio - 1.53124).abs() < 1e-4);
        assert!((wolf.deviation_cents - 35.68).abs() < 0.01);
    }

    #[test]
    fn just_intonation_wolf() {
        let wolf = wolf_fifth(TuningSystem::JustIntonation).unwrap().unwrap();
        assert!(wolf.from_degree == 2 || wolf.from_degree == 10);
        assert!((wolf.deviation_cents + 21.506).abs() < 1e-3);
    }

    #[test]
    fn equal_temperament_fifths_are_all_equal() {
        for fifth in fifths(TuningSystem::EqualTemperament).unwrap() {
            assert!((fifth.deviation_cents + 1.955).abs() < 1e-3);
        }
    }

    #[test]
    fn deviation_of_a_system_from_itself_is_zero() {
        for system in TuningSystem::ALL.iter() {
            for row in deviation_table(*system, *system).unwrap() {
                assert_eq!(row.cents, 0.0);
            }
        }
    }

    #[test]
    fn meantone_third_against_pythagorean() {
        let rows = deviation_table(TuningSystem::Mesotonic, TuningSystem::Pythagorean).unwrap();
        // the syntonic comma
        assert!((rows[4].cents + 21.506).abs() < 1e-3);
    }

    #[test]
    fn fifths_scale_edge_cases() {
        assert!(fifths_scale(0).is_empty());
        assert_eq!(fifths_scale(1), vec![0]);
        assert_eq!(fifths_scale(12), (0..12).collect::<Vec<u8>>());
    }
}
