// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Chords built on a root, tuned in any of the tuning systems.

use std::fmt;

use snafu::Snafu;

use crate::error::{positive, TuningError};
use crate::note::{interval_name, Note};
use crate::pitch::{cents_deviation, frequency, from_semitones};
use crate::tuning::TuningSystem;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus4,
    MajorSeventh,
    MinorSeventh,
}

impl ChordQuality {
    pub const ALL: [ChordQuality; 7] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::Sus4,
        ChordQuality::MajorSeventh,
        ChordQuality::MinorSeventh,
    ];

    /// Semitones of the chord tones above the root.
    pub fn offsets(self) -> &'static [u32] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Sus4 => &[0, 5, 7],
            ChordQuality::MajorSeventh => &[0, 4, 7, 11],
            ChordQuality::MinorSeventh => &[0, 3, 7, 10],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "diminished",
            ChordQuality::Augmented => "augmented",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::MajorSeventh => "maj7",
            ChordQuality::MinorSeventh => "min7",
        }
    }

    pub fn chord(self) -> Chord {
        Chord::new(self.offsets().to_vec())
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseChordQualityError {
    #[snafu(display(
        "Unknown chord quality {:?}, expected one of major, minor, diminished, augmented, sus4, maj7, min7",
        input
    ))]
    UnknownQuality { input: String },
}

/// ```
/// use tuning_lab::chord::*;
///
/// assert_eq!("Major".parse(), Ok(ChordQuality::Major));
/// assert_eq!("m7".parse(), Ok(ChordQuality::MinorSeventh));
/// assert!("add9".parse::<ChordQuality>().is_err());
/// ```
impl std::str::FromStr for ChordQuality {
    type Err = ParseChordQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "major" | "maj" => Ok(ChordQuality::Major),
            "minor" | "min" | "m" => Ok(ChordQuality::Minor),
            "diminished" | "dim" => Ok(ChordQuality::Diminished),
            "augmented" | "aug" => Ok(ChordQuality::Augmented),
            "sus4" | "sus" => Ok(ChordQuality::Sus4),
            "maj7" | "major7" => Ok(ChordQuality::MajorSeventh),
            "min7" | "minor7" | "m7" => Ok(ChordQuality::MinorSeventh),
            _ => Err(ParseChordQualityError::UnknownQuality {
                input: s.to_string(),
            }),
        }
    }
}

/// A set of chord tones given as semitones above the root.
/// Offsets of 12 or more sound in the next octaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chord {
    pub offsets: Vec<u32>,
}

/// One tone of a chord.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordTone {
    pub offset: u32,
    pub note: Option<Note>,
    pub interval: &'static str,
    pub frequency: f64,
    /// Deviation from the same tone in equal temperament.
    pub cents_from_equal: f64,
}

impl Chord {
    pub fn new(offsets: Vec<u32>) -> Self {
        Chord { offsets }
    }

    /// Frequencies of the chord tones in the given system.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::chord::*;
    /// use tuning_lab::tuning::TuningSystem;
    ///
    /// let major = ChordQuality::Major.chord();
    /// assert_eq!(
    ///     major.frequencies(200.0, TuningSystem::JustIntonation),
    ///     Ok(vec![200.0, 250.0, 300.0])
    /// );
    /// ```
    pub fn frequencies(&self, root_hz: f64, system: TuningSystem) -> Result<Vec<f64>, TuningError> {
        self.offsets
            .iter()
            .map(|&offset| {
                frequency(
                    root_hz,
                    (offset % 12) as i32,
                    (offset / 12) as i32,
                    system,
                )
            })
            .collect()
    }

    /// Names of the chord tones when the root is `root`.
    /// Tones beyond the MIDI range are left out.
    pub fn notes(&self, root: Note) -> Vec<Note> {
        self.offsets
            .iter()
            .filter_map(|&offset| root.transpose(offset as i32))
            .collect()
    }

    /// Detailed listing of the chord tones.
    pub fn tones(
        &self,
        root: Note,
        root_hz: f64,
        system: TuningSystem,
    ) -> Result<Vec<ChordTone>, TuningError> {
        let root_hz = positive("root frequency", root_hz)?;
        let frequencies = self.frequencies(root_hz, system)?;
        self.offsets
            .iter()
            .zip(frequencies)
            .map(|(&offset, hz)| {
                let tempered = root_hz * from_semitones(offset as f64);
                Ok(ChordTone {
                    offset,
                    note: root.transpose(offset as i32),
                    interval: interval_name(offset),
                    frequency: hz,
                    cents_from_equal: cents_deviation(hz, tempered)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_major_third_is_flat_of_tempered() {
        let tones = ChordQuality::Major
            .chord()
            .tones(Note::from_midi(60), 261.63, TuningSystem::JustIntonation)
            .unwrap();
        assert_eq!(tones.len(), 3);
        assert_eq!(tones[1].interval, "Major third");
        assert_eq!(tones[1].note.map(|n| n.to_string()), Some("E4".to_string()));
        assert!((tones[1].cents_from_equal + 13.686).abs() < 1e-3);
        assert!((tones[2].cents_from_equal - 1.955).abs() < 1e-3);
        assert!(tones[0].cents_from_equal.abs() < 1e-12);
    }

    #[test]
    fn equal_temperament_has_no_deviation() {
        let tones = ChordQuality::MinorSeventh
            .chord()
            .tones(Note::from_midi(57), 220.0, TuningSystem::EqualTemperament)
            .unwrap();
        for tone in tones {
            assert!(tone.cents_from_equal.abs() < 1e-9);
        }
    }

    #[test]
    fn offsets_above_an_octave() {
        let chord = Chord::new(vec![0, 7, 16]);
        let hz = chord.frequencies(100.0, TuningSystem::Pythagorean).unwrap();
        assert_eq!(hz, vec![100.0, 150.0, 100.0 * 81.0 / 64.0 * 2.0]);
        let names: Vec<String> = chord
            .notes(Note::from_midi(60))
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["C4", "G4", "E5"]);
    }

    #[test]
    fn every_quality_parses_its_name() {
        for quality in ChordQuality::ALL.iter() {
            assert_eq!(quality.name().parse(), Ok(*quality));
            assert_eq!(quality.chord().offsets[0], 0);
        }
    }

    #[test]
    fn bad_root_is_rejected() {
        let chord = ChordQuality::Minor.chord();
        assert!(chord.tones(Note::from_midi(60), 0.0, TuningSystem::Mesotonic).is_err());
    }
}
