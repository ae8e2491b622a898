// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Ratio tables of the historical tuning systems.
//!
//! Every table holds 13 entries: the twelve chromatic degrees above the tonic
//! and the closing octave. Entry 0 is always `1` and entry 12 always `2`.

use std::fmt;

use snafu::Snafu;

use crate::error::TuningError;
use crate::note::*;
use crate::rational::Rational;

/// Number of entries in a ratio table, including the octave.
pub const TABLE_LEN: usize = 13;

/// Pythagorean tuning, built from pure fifths (3:2).
/// The flat side is used for Eb, Ab and Bb, which puts the wolf between F# and C#.
const PYTHAGOREAN: [(i64, i64); TABLE_LEN] = [
    (1, 1),
    (256, 243),
    (9, 8),
    (32, 27),
    (81, 64),
    (4, 3),
    (729, 512),
    (3, 2),
    (128, 81),
    (27, 16),
    (16, 9),
    (243, 128),
    (2, 1),
];

/// Five limit just intonation (Ptolemy's and Zarlino's ratios).
const JUST: [(i64, i64); TABLE_LEN] = [
    (1, 1),
    (16, 15),
    (9, 8),
    (6, 5),
    (5, 4),
    (4, 3),
    (45, 32),
    (3, 2),
    (8, 5),
    (5, 3),
    (9, 5),
    (15, 8),
    (2, 1),
];

/// Quarter-comma meantone. Entry `(k, m)` stands for the ratio `5^(k/4) * 2^m`,
/// i.e. `k` tempered fifths of `5^(1/4)` folded back by `m` octaves.
/// The sharps C#, F#, G# and the flats Eb, Bb make G#-Eb the wolf.
const MESOTONIC: [(i32, i32); TABLE_LEN] = [
    (0, 0),
    (7, -4),
    (2, -1),
    (-3, 2),
    (4, -2),
    (-1, 1),
    (6, -3),
    (1, 0),
    (8, -4),
    (3, -1),
    (-2, 2),
    (5, -2),
    (0, 1),
];

/// A tuning system assigns a frequency ratio to every chromatic degree above a tonic.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TuningSystem {
    Pythagorean,
    JustIntonation,
    Mesotonic,
    EqualTemperament,
}

impl TuningSystem {
    pub const ALL: [TuningSystem; 4] = [
        TuningSystem::Pythagorean,
        TuningSystem::JustIntonation,
        TuningSystem::Mesotonic,
        TuningSystem::EqualTemperament,
    ];

    /// Frequency ratio of a degree relative to the tonic.
    /// Degree 12 is the octave.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::tuning::*;
    ///
    /// assert_eq!(TuningSystem::JustIntonation.ratio(4), Ok(1.25));
    /// assert_eq!(TuningSystem::Pythagorean.ratio(7), Ok(1.5));
    /// assert_eq!(TuningSystem::EqualTemperament.ratio(12), Ok(2.0));
    /// assert!(TuningSystem::Mesotonic.ratio(13).is_err());
    /// ```
    pub fn ratio(self, degree: i32) -> Result<f64, TuningError> {
        let index = table_index(degree)?;
        let ratio = match self {
            TuningSystem::Pythagorean | TuningSystem::JustIntonation => {
                let (num, denom) = self.fractions()[index];
                Rational::new(num, denom).to_f64()
            }
            TuningSystem::Mesotonic => {
                let (fifths, octaves) = MESOTONIC[index];
                5.0f64.powf(fifths as f64 / 4.0) * 2.0f64.powi(octaves)
            }
            TuningSystem::EqualTemperament => 2.0f64.powf(degree as f64 / 12.0),
        };
        Ok(ratio)
    }

    /// The exact ratio of a degree, for the systems built from whole number ratios.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::rational::Rational;
    /// use tuning_lab::tuning::*;
    ///
    /// assert_eq!(TuningSystem::Pythagorean.exact_ratio(4), Ok(Some(Rational::new(81, 64))));
    /// assert_eq!(TuningSystem::EqualTemperament.exact_ratio(4), Ok(None));
    /// ```
    pub fn exact_ratio(self, degree: i32) -> Result<Option<Rational>, TuningError> {
        let index = table_index(degree)?;
        Ok(match self {
            TuningSystem::Pythagorean | TuningSystem::JustIntonation => {
                let (num, denom) = self.fractions()[index];
                Some(Rational::new(num, denom))
            }
            TuningSystem::Mesotonic | TuningSystem::EqualTemperament => None,
        })
    }

    /// The complete table, from the tonic up to and including the octave.
    pub fn ratios(self) -> [f64; TABLE_LEN] {
        let mut table = [1.0; TABLE_LEN];
        for (degree, entry) in table.iter_mut().enumerate() {
            // every index of the table is a valid degree
            if let Ok(ratio) = self.ratio(degree as i32) {
                *entry = ratio;
            }
        }
        table
    }

    /// Human readable name of the system.
    pub fn name(self) -> &'static str {
        match self {
            TuningSystem::Pythagorean => "Pythagorean",
            TuningSystem::JustIntonation => "Just intonation",
            TuningSystem::Mesotonic => "Quarter-comma meantone",
            TuningSystem::EqualTemperament => "Equal temperament",
        }
    }

    fn fractions(self) -> &'static [(i64, i64); TABLE_LEN] {
        match self {
            TuningSystem::Pythagorean => &PYTHAGOREAN,
            _ => &JUST,
        }
    }
}

fn table_index(degree: i32) -> Result<usize, TuningError> {
    if degree >= 0 && degree < TABLE_LEN as i32 {
        Ok(degree as usize)
    } else {
        Err(TuningError::InvalidDegree { degree })
    }
}

impl fmt::Display for TuningSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseTuningSystemError {
    #[snafu(display(
        "Unknown tuning system {:?}, expected one of pythagorean, just, mesotonic, equal",
        input
    ))]
    UnknownSystem { input: String },
}

/// ```
/// use tuning_lab::tuning::*;
///
/// assert_eq!("just".parse(), Ok(TuningSystem::JustIntonation));
/// assert_eq!("Meantone".parse(), Ok(TuningSystem::Mesotonic));
/// assert!("werckmeister".parse::<TuningSystem>().is_err());
/// ```
impl std::str::FromStr for TuningSystem {
    type Err = ParseTuningSystemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pythagorean" | "pythagoras" => Ok(TuningSystem::Pythagorean),
            "just" | "justintonation" | "just-intonation" | "natural" => {
                Ok(TuningSystem::JustIntonation)
            }
            "mesotonic" | "meantone" => Ok(TuningSystem::Mesotonic),
            "equal" | "tempered" | "12-tet" | "equal-temperament" => {
                Ok(TuningSystem::EqualTemperament)
            }
            _ => Err(ParseTuningSystemError::UnknownSystem {
                input: s.to_string(),
            }),
        }
    }
}

/// Defines concert pitch by assigning a frequency to a certain note.
/// This defines the frequencies of all other notes at a standard tuning of 12 half-tones per octave.
///
/// # Examples
///
/// ```
/// use tuning_lab::note::*;
/// use tuning_lab::tuning::*;
/// assert_eq!(ConcertPitch::default().frequency(Note::from_midi(57)), 220.0);
/// assert_eq!(ConcertPitch::default().frequency(Note::from_midi(81)), 880.0);
/// ```
#[derive(Debug, Clone)]
pub struct ConcertPitch {
    pub reference_note: Note,
    pub reference_frequency: f64,
}

impl ConcertPitch {
    /// Return the frequency of a note relative to this pitch standard.
    pub fn frequency(&self, other: Note) -> f64 {
        let semitones = other.index() - self.reference_note.index();
        let octaves = semitones as f64 / 12.0;
        self.reference_frequency * 2.0f64.powf(octaves)
    }
}

/// Default concert pitch, where A4 corresponds to 440 Hz.
impl Default for ConcertPitch {
    fn default() -> Self {
        ConcertPitch {
            reference_note: Note::from_midi(69),
            reference_frequency: 440.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_start_at_unison_and_end_at_octave() {
        for system in TuningSystem::ALL.iter() {
            let table = system.ratios();
            assert_eq!(table[0], 1.0, "{}", system);
            assert_eq!(table[12], 2.0, "{}", system);
        }
    }

    #[test]
    fn tables_are_strictly_increasing() {
        for system in TuningSystem::ALL.iter() {
            let table = system.ratios();
            for pair in table.windows(2) {
                assert!(pair[0] < pair[1], "{}: {:?}", system, table);
            }
        }
    }

    #[test]
    fn degrees_outside_the_table_are_rejected() {
        for system in TuningSystem::ALL.iter() {
            assert_eq!(
                system.ratio(-1),
                Err(TuningError::InvalidDegree { degree: -1 })
            );
            assert_eq!(
                system.ratio(13),
                Err(TuningError::InvalidDegree { degree: 13 })
            );
        }
    }

    #[test]
    fn meantone_has_pure_thirds_and_narrow_fifths() {
        let m = TuningSystem::Mesotonic;
        assert!((m.ratio(4).unwrap() - 1.25).abs() < 1e-12);
        assert!((m.ratio(8).unwrap() - 1.5625).abs() < 1e-12);
        assert!((m.ratio(7).unwrap() - 1.495348781).abs() < 1e-9);
        assert!((m.ratio(2).unwrap() - 1.118033989).abs() < 1e-9);
        assert!((m.ratio(3).unwrap() - 1.196279539).abs() < 1e-9);
    }

    #[test]
    fn equal_temperament_semitone() {
        let semitone = TuningSystem::EqualTemperament.ratio(1).unwrap();
        assert!((semitone - 1.059463094).abs() < 1e-9);
    }

    #[test]
    fn concert_pitch_middle_c() {
        let c4 = Note::from_midi(60);
        assert!((ConcertPitch::default().frequency(c4) - 261.6255653).abs() < 1e-6);
    }
}
