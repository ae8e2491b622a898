// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is, and how notes and intervals are called.

use std::fmt;

use snafu::Snafu;

/// Names of the twelve chromatic degrees starting from C, spelled with sharps.
pub const CHROMATIC_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Names of the intervals from a unison up to the octave, indexed by semitones.
pub const INTERVAL_NAMES: [&str; 13] = [
    "Unison",
    "Minor second",
    "Major second",
    "Minor third",
    "Major third",
    "Perfect fourth",
    "Tritone",
    "Perfect fifth",
    "Minor sixth",
    "Major sixth",
    "Minor seventh",
    "Major seventh",
    "Octave",
];

/// Name of an interval spanning the given number of semitones.
/// Intervals wider than an octave are named after their simple interval,
/// so that e.g. 16 semitones is still a major third.
///
/// # Examples
///
/// ```
/// use tuning_lab::note::*;
///
/// assert_eq!(interval_name(7), "Perfect fifth");
/// assert_eq!(interval_name(12), "Octave");
/// assert_eq!(interval_name(16), "Major third");
/// assert_eq!(interval_name(24), "Octave");
/// ```
pub fn interval_name(semitones: u32) -> &'static str {
    if semitones <= 12 {
        INTERVAL_NAMES[semitones as usize]
    } else if semitones % 12 == 0 {
        INTERVAL_NAMES[12]
    } else {
        INTERVAL_NAMES[(semitones % 12) as usize]
    }
}

/// A "note" is just an index on a keyboard.
/// This definition follows the MIDI standard where C4 corresponds to index 60.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Note(u8);

/// The name of a note in standard notation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NoteName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Any offset applied to a note in standard notation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Accidental {
    /// The note is a half-tone lower then indicated by its name.
    Flat,
    /// The note is left unchanged.
    Base,
    /// The note is a half-tone higher then indicated by its name.
    Sharp,
}

impl Note {
    /// Convert a note from standard notation to a MIDI note index.
    /// Note that different names may refer to the same note, e.g. a G♯ is the same as a A♭.
    /// Returns `None` if the note is not representable in the MIDI note system.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::note::*;
    ///
    /// assert_eq!(Note::try_named(NoteName::A, Accidental::Base, 4), Some(Note::from_midi(69)));
    /// assert_eq!(Note::try_named(NoteName::C, Accidental::Sharp, 6), Some(Note::from_midi(85)));
    /// assert_eq!(Note::try_named(NoteName::G, Accidental::Flat, 2), Some(Note::from_midi(42)));
    /// assert_eq!(Note::try_named(NoteName::C, Accidental::Flat, -1), None);
    /// ```
    pub fn try_named(name: NoteName, offset: Accidental, octave: i32) -> Option<Note> {
        let name_index = match name {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        };
        let offset_index = match offset {
            Accidental::Base => 0,
            Accidental::Flat => -1,
            Accidental::Sharp => 1,
        };
        // C4 is MIDI note number 60
        let normalize_index = 60 - 4 * 12;
        let note_index = octave
            .checked_mul(12)?
            .checked_add(name_index + offset_index + normalize_index)?;
        Note::try_from_midi(note_index as i64)
    }

    /// Parse a name string of the format `<letter><accidental><octave>`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tuning_lab::note::*;
    ///
    /// assert_eq!(Note::named_str("A4"), Some(Note::from_midi(69)));
    /// assert_eq!(Note::named_str("a4"), Some(Note::from_midi(69)));
    /// assert_eq!(Note::named_str("Csharp6"), Some(Note::from_midi(85)));
    /// assert_eq!(Note::named_str("C♯6"), Some(Note::from_midi(85)));
    /// assert_eq!(Note::named_str("Gb2"), Some(Note::from_midi(42)));
    /// assert_eq!(Note::named_str("H2"), None);
    /// ```
    pub fn named_str(name_str: &str) -> Option<Note> {
        let mut name_chars = name_str.chars();
        let name_ch = name_chars.next()?;
        let name = match name_ch.to_ascii_uppercase() {
            'A' => NoteName::A,
            'B' => NoteName::B,
            'C' => NoteName::C,
            'D' => NoteName::D,
            'E' => NoteName::E,
            'F' => NoteName::F,
            'G' => NoteName::G,
            _ => return None,
        };

        let offset_str = name_chars
            .as_str()
            .trim_end_matches(|ch: char| ch.is_ascii_digit() || ch == '-');
        let offset = match offset_str {
            "sharp" | "♯" | "#" => Accidental::Sharp,
            "flat" | "♭" | "b" => Accidental::Flat,
            "" => Accidental::Base,
            _ => return None,
        };

        let octave_str = &name_chars.as_str()[offset_str.len()..];
        let octave = octave_str.parse().ok()?;
        Note::try_named(name, offset, octave)
    }

    /// # Panics
    ///
    /// If `midi_note` is outside of the MIDI range.
    pub fn from_midi(midi_note: u8) -> Note {
        assert!(midi_note < 128, "MIDI only has notes 0 - 127");
        Note(midi_note)
    }

    pub fn try_from_midi(midi_note: i64) -> Option<Note> {
        if midi_note >= 0 && midi_note < 128 {
            Some(Note(midi_note as u8))
        } else {
            None
        }
    }

    pub fn to_midi(self) -> u8 {
        self.0
    }

    /// Return the note index in a signed type, convenient for further calculations.
    pub fn index(self) -> i32 {
        self.0 as i32
    }

    /// Chromatic degree of the note counted from C.
    ///
    /// ```
    /// # use tuning_lab::note::*;
    /// assert_eq!(Note::named_str("E4").unwrap().degree(), 4);
    /// assert_eq!(Note::named_str("Cb4").unwrap().degree(), 11);
    /// ```
    pub fn degree(self) -> i32 {
        self.index() % 12
    }

    /// Octave number in scientific pitch notation (C4 is middle C).
    ///
    /// ```
    /// # use tuning_lab::note::*;
    /// assert_eq!(Note::named_str("B3").unwrap().octave(), 3);
    /// assert_eq!(Note::named_str("C4").unwrap().octave(), 4);
    /// ```
    pub fn octave(self) -> i32 {
        self.index() / 12 - 1
    }

    /// Whether the note sits on a black key of a piano keyboard.
    pub fn is_black_key(self) -> bool {
        CHROMATIC_NAMES[self.degree() as usize].ends_with('#')
    }

    /// The note a number of semitones higher, if it still is a MIDI note.
    pub fn transpose(self, semitones: i32) -> Option<Note> {
        Note::try_from_midi(self.index() as i64 + semitones as i64)
    }
}

/// Notes are always printed with sharps.
///
/// ```
/// # use tuning_lab::note::*;
/// assert_eq!(Note::named_str("Eb3").unwrap().to_string(), "D#3");
/// assert_eq!(Note::from_midi(60).to_string(), "C4");
/// ```
impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", CHROMATIC_NAMES[self.degree() as usize], self.octave())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseNoteError {
    #[snafu(display("{:?} is not a note name like C4, F#3 or Bb2", input))]
    UnknownNote { input: String },
}

impl std::str::FromStr for Note {
    type Err = ParseNoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::named_str(s).ok_or_else(|| ParseNoteError::UnknownNote {
            input: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_display() {
        for midi in 0..128 {
            let note = Note::from_midi(midi);
            assert_eq!(Note::named_str(&note.to_string()), Some(note));
        }
    }

    #[test]
    fn negative_octave() {
        assert_eq!(Note::named_str("C-1"), Some(Note::from_midi(0)));
        assert_eq!(Note::from_midi(0).octave(), -1);
    }

    #[test]
    fn black_keys() {
        let black: Vec<_> = (60..72)
            .map(Note::from_midi)
            .filter(|n| n.is_black_key())
            .map(|n| n.to_string())
            .collect();
        assert_eq!(black, vec!["C#4", "D#4", "F#4", "G#4", "A#4"]);
    }

    #[test]
    fn transpose_stays_in_range() {
        let a4 = Note::from_midi(69);
        assert_eq!(a4.transpose(12), Some(Note::from_midi(81)));
        assert_eq!(a4.transpose(100), None);
        assert_eq!(a4.transpose(-70), None);
    }

    #[test]
    fn parse_error_message() {
        let err = "X9".parse::<Note>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "\"X9\" is not a note name like C4, F#3 or Bb2"
        );
    }
}
