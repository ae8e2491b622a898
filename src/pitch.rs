// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The frequency calculator: from tuning tables to Hz, and from Hz to cents.

use log::trace;

use crate::error::{positive, TuningError, MAX_OCTAVE_REDUCTIONS};
use crate::note::{interval_name, Note};
use crate::tuning::TuningSystem;

/// Compute a factor measured in cents (1/100 of a semitone)
///
/// # Example
///
/// ```
/// # use tuning_lab::pitch::*;
///
/// assert_eq!(from_cents(-16.0), from_semitones(-16.0 / 100.0));
/// assert_eq!(from_cents(1200.0), 2.0);
/// ```
pub fn from_cents(cents: f64) -> f64 {
    2.0f64.powf(cents / 1200.0)
}

/// Compute a factor measured in octaves (one octave corresponds to a factor of two).
///
/// # Example
///
/// ```
/// # use tuning_lab::pitch::*;
///
/// assert_eq!(from_octaves(3.0), 8.0);
/// assert_eq!(from_octaves(-1.0), 0.5);
/// ```
pub fn from_octaves(octaves: f64) -> f64 {
    2.0f64.powf(octaves)
}

/// Compute a factor measured in semitones (one octave consists of 12 semitones)
///
/// # Example
///
/// ```
/// # use tuning_lab::pitch::*;
///
/// assert_eq!(from_semitones(3.0), from_octaves(3.0 / 12.0));
/// ```
pub fn from_semitones(semitones: f64) -> f64 {
    2.0f64.powf(semitones / 12.0)
}

/// Absolute frequency of a scale degree, `octave_offset` octaves above (or below) the root.
///
/// # Examples
///
/// ```
/// use tuning_lab::pitch::*;
/// use tuning_lab::tuning::TuningSystem;
///
/// assert_eq!(frequency(100.0, 7, 0, TuningSystem::JustIntonation), Ok(150.0));
/// assert_eq!(frequency(100.0, 7, -1, TuningSystem::JustIntonation), Ok(75.0));
/// assert_eq!(frequency(100.0, 12, 1, TuningSystem::Pythagorean), Ok(400.0));
/// assert!(frequency(0.0, 0, 0, TuningSystem::Pythagorean).is_err());
/// ```
pub fn frequency(
    root_hz: f64,
    degree: i32,
    octave_offset: i32,
    system: TuningSystem,
) -> Result<f64, TuningError> {
    let root_hz = positive("root frequency", root_hz)?;
    let ratio = system.ratio(degree)?;
    // far away octaves leave the range of f64
    positive("frequency", root_hz * ratio * 2.0f64.powi(octave_offset))
}

/// Size of the interval from `f_b` up to `f_a` in cents.
/// Positive values mean that `f_a` is sharper than `f_b`.
///
/// # Examples
///
/// ```
/// use tuning_lab::pitch::*;
///
/// assert_eq!(cents_deviation(440.0, 440.0), Ok(0.0));
/// assert_eq!(cents_deviation(880.0, 440.0), Ok(1200.0));
/// assert_eq!(cents_deviation(220.0, 440.0), Ok(-1200.0));
/// assert!(cents_deviation(0.0, 440.0).is_err());
/// ```
pub fn cents_deviation(f_a: f64, f_b: f64) -> Result<f64, TuningError> {
    let f_a = positive("frequency", f_a)?;
    let f_b = positive("reference frequency", f_b)?;
    Ok(1200.0 * (f_a / f_b).log2())
}

/// Fold `freq` down into the octave starting at `reference` by repeated halving.
/// Returns the folded frequency and the number of halvings.
///
/// Frequencies that already lie below `2 * reference` are returned unchanged.
/// Inputs for which the halving cannot settle (non-positive or non-finite
/// values, or more than [`MAX_OCTAVE_REDUCTIONS`] halvings) are rejected.
///
/// # Examples
///
/// ```
/// use tuning_lab::pitch::*;
///
/// assert_eq!(reduce_to_octave(1600.0, 100.0), Ok((100.0, 4)));
/// assert_eq!(reduce_to_octave(150.0, 100.0), Ok((150.0, 0)));
/// assert!(reduce_to_octave(150.0, 0.0).is_err());
/// ```
pub fn reduce_to_octave(freq: f64, reference: f64) -> Result<(f64, u32), TuningError> {
    let non_converging = |iterations| TuningError::NonConverging {
        value: freq,
        reference,
        iterations,
    };
    if !(freq.is_finite() && freq > 0.0) {
        return Err(non_converging(0));
    }

    let upper = reference * 2.0;
    let mut value = freq;
    let mut halvings = 0;
    while value >= upper {
        if halvings == MAX_OCTAVE_REDUCTIONS {
            trace!(
                "giving up folding {} Hz into the octave above {} Hz",
                freq,
                reference
            );
            return Err(non_converging(halvings));
        }
        value /= 2.0;
        halvings += 1;
    }
    Ok((value, halvings))
}

/// The power-of-two multiple of `reference` closest to `freq` on a logarithmic scale,
/// together with the signed number of octaves between them.
///
/// # Examples
///
/// ```
/// use tuning_lab::pitch::*;
///
/// assert_eq!(nearest_octave(390.0, 100.0), Ok((400.0, 2)));
/// assert_eq!(nearest_octave(60.0, 100.0), Ok((50.0, -1)));
/// ```
pub fn nearest_octave(freq: f64, reference: f64) -> Result<(f64, i32), TuningError> {
    let freq = positive("frequency", freq)?;
    let reference = positive("reference frequency", reference)?;
    let octaves = (freq / reference).log2().round() as i32;
    Ok((reference * 2.0f64.powi(octaves), octaves))
}

/// One row of a scale listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleRow {
    /// Semitones above the tonic.
    pub step: u32,
    pub note: Note,
    pub frequency: f64,
    /// Distance from the tonic in cents.
    pub cents: f64,
    pub interval: &'static str,
}

/// List the degrees of a tuning system starting at `tonic` (sounding at `root_hz`),
/// across the given number of octaves, ending with the closing octave.
///
/// Notes that fall outside the MIDI range are skipped.
///
/// # Examples
///
/// ```
/// use tuning_lab::note::Note;
/// use tuning_lab::pitch::*;
/// use tuning_lab::tuning::TuningSystem;
///
/// let c4 = Note::from_midi(60);
/// let rows = scale_table(c4, 261.63, TuningSystem::JustIntonation, 2).unwrap();
/// assert_eq!(rows.len(), 25);
/// assert_eq!(rows[24].note.to_string(), "C6");
/// assert!((rows[24].frequency - 4.0 * 261.63).abs() < 1e-9);
/// ```
pub fn scale_table(
    tonic: Note,
    root_hz: f64,
    system: TuningSystem,
    octaves: u32,
) -> Result<Vec<ScaleRow>, TuningError> {
    let root_hz = positive("root frequency", root_hz)?;
    let mut rows = Vec::with_capacity(octaves as usize * 12 + 1);
    for step in 0..=octaves * 12 {
        let (degree, octave) = if step == octaves * 12 && step > 0 {
            (12, octaves as i32 - 1)
        } else {
            ((step % 12) as i32, (step / 12) as i32)
        };
        let note = match tonic.transpose(step as i32) {
            Some(note) => note,
            None => continue,
        };
        let hz = frequency(root_hz, degree, octave, system)?;
        rows.push(ScaleRow {
            step,
            note,
            frequency: hz,
            cents: cents_deviation(hz, root_hz)?,
            interval: interval_name(step),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_matches_ratio_table() {
        for system in TuningSystem::ALL.iter() {
            for degree in 0..12 {
                assert_eq!(
                    frequency(100.0, degree, 0, *system).unwrap(),
                    100.0 * system.ratio(degree).unwrap()
                );
            }
            assert_eq!(
                frequency(100.0, 0, 1, *system).unwrap(),
                200.0 * system.ratio(0).unwrap()
            );
        }
    }

    #[test]
    fn frequency_rejects_bad_input() {
        let system = TuningSystem::EqualTemperament;
        assert_eq!(
            frequency(100.0, 13, 0, system),
            Err(TuningError::InvalidDegree { degree: 13 })
        );
        assert_eq!(
            frequency(-5.0, 0, 0, system),
            Err(TuningError::NonPositiveInput {
                name: "root frequency",
                value: -5.0
            })
        );
    }

    #[test]
    fn frequency_is_positive_for_low_octaves() {
        let hz = frequency(1.0, 11, -20, TuningSystem::Mesotonic).unwrap();
        assert!(hz > 0.0);
    }

    #[test]
    fn frequency_outside_the_float_range() {
        let system = TuningSystem::EqualTemperament;
        assert_eq!(
            frequency(100.0, 0, -1100, system),
            Err(TuningError::NonPositiveInput {
                name: "frequency",
                value: 0.0
            })
        );
        assert_eq!(
            frequency(100.0, 0, 1100, system),
            Err(TuningError::NonPositiveInput {
                name: "frequency",
                value: f64::INFINITY
            })
        );
    }

    #[test]
    fn cents_sign_convention() {
        let sharp = cents_deviation(442.0, 440.0).unwrap();
        let flat = cents_deviation(440.0, 442.0).unwrap();
        assert!(sharp > 0.0);
        assert!((sharp + flat).abs() < 1e-12);
        assert!((sharp - 7.8514).abs() < 1e-3);
    }

    #[test]
    fn cents_of_a_tempered_semitone() {
        let semitone = cents_deviation(from_semitones(1.0) * 440.0, 440.0).unwrap();
        assert!((semitone - 100.0).abs() < 1e-9);
    }

    #[test]
    fn cents_rejects_non_positive() {
        assert!(cents_deviation(440.0, 0.0).is_err());
        assert!(cents_deviation(-440.0, 440.0).is_err());
    }

    #[test]
    fn reduce_into_window() {
        let (reduced, halvings) = reduce_to_octave(12974.6337890625, 100.0).unwrap();
        assert_eq!(halvings, 7);
        assert!(reduced >= 100.0 && reduced < 200.0);
        // the upper bound of the window is exclusive
        assert_eq!(reduce_to_octave(200.0, 100.0), Ok((100.0, 1)));
    }

    #[test]
    fn reduce_is_bounded() {
        assert_eq!(
            reduce_to_octave(440.0, 0.0),
            Err(TuningError::NonConverging {
                value: 440.0,
                reference: 0.0,
                iterations: MAX_OCTAVE_REDUCTIONS
            })
        );
        assert!(reduce_to_octave(440.0, -3.0).is_err());
        assert!(reduce_to_octave(1e30, 1.0).is_err());
        assert!(reduce_to_octave(f64::INFINITY, 1.0).is_err());
        assert!(reduce_to_octave(0.0, 100.0).is_err());
        assert!(reduce_to_octave(-800.0, 100.0).is_err());
    }

    #[test]
    fn nearest_octave_rounds_logarithmically() {
        // 141 Hz is just below the tritone between 100 Hz and 200 Hz
        assert_eq!(nearest_octave(141.0, 100.0), Ok((100.0, 0)));
        assert_eq!(nearest_octave(142.0, 100.0), Ok((200.0, 1)));
    }

    #[test]
    fn scale_table_single_octave() {
        let rows = scale_table(
            Note::from_midi(60),
            100.0,
            TuningSystem::Pythagorean,
            1,
        )
        .unwrap();
        assert_eq!(rows.len(), 13);
        assert_eq!(rows[0].interval, "Unison");
        assert_eq!(rows[0].cents, 0.0);
        assert_eq!(rows[4].note.to_string(), "E4");
        assert!((rows[4].cents - 407.82).abs() < 0.01);
        assert_eq!(rows[12].frequency, 200.0);
        assert_eq!(rows[12].interval, "Octave");
    }

    #[test]
    fn scale_table_skips_notes_beyond_midi() {
        let rows = scale_table(
            Note::from_midi(120),
            100.0,
            TuningSystem::EqualTemperament,
            1,
        )
        .unwrap();
        assert_eq!(rows.len(), 8);
    }

    #[test]
    fn scale_table_without_octaves_is_the_tonic() {
        let rows = scale_table(Note::from_midi(60), 100.0, TuningSystem::Mesotonic, 0).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].frequency, 100.0);
    }
}
