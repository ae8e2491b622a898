// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Scoring for tuning-by-ear practice, where a player matches a target pitch.

use std::fmt;

use snafu::Snafu;

use crate::error::TuningError;
use crate::synth::{synthesize, Envelope, Timbre, WaveformSpec};
use crate::wave::SampleBuffer;

/// Length of the fade at both ends of a rendered duet.
pub const EAR_FADE_S: f64 = 0.045;

/// Peak level of the practice mixes, leaving half the range as headroom.
const MIX_LEVEL: f64 = 0.5;

/// Pitch of the reference tone in the beat quiz.
pub const QUIZ_BASE_HZ: f64 = 440.0;

/// Rate of the beating heard when two sine tones sound together.
///
/// ```
/// use tuning_lab::ear::beat_frequency;
///
/// assert_eq!(beat_frequency(440.0, 443.0), 3.0);
/// assert_eq!(beat_frequency(443.0, 440.0), 3.0);
/// ```
pub fn beat_frequency(a: f64, b: f64) -> f64 {
    (a - b).abs()
}

/// How close a guess got to the target.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Grade {
    /// No beating at all.
    Perfect,
    /// At most 1 Hz off.
    Excellent,
    /// At most 3 Hz off.
    Close,
    Miss,
}

impl Grade {
    pub fn is_hit(self) -> bool {
        self != Grade::Miss
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Grade::Perfect => "perfect, no beating",
            Grade::Excellent => "excellent, slow beating",
            Grade::Close => "close, audible beating",
            Grade::Miss => "miss",
        };
        f.write_str(text)
    }
}

/// Grade a guess by the beat frequency against the target.
///
/// ```
/// use tuning_lab::ear::*;
///
/// assert_eq!(grade(440.0, 440.0), Grade::Perfect);
/// assert_eq!(grade(440.0, 441.0), Grade::Excellent);
/// assert_eq!(grade(440.0, 437.5), Grade::Close);
/// assert_eq!(grade(440.0, 450.0), Grade::Miss);
/// ```
pub fn grade(target: f64, guess: f64) -> Grade {
    let beats = beat_frequency(target, guess);
    if beats == 0.0 {
        Grade::Perfect
    } else if beats <= 1.0 {
        Grade::Excellent
    } else if beats <= 3.0 {
        Grade::Close
    } else {
        Grade::Miss
    }
}

/// Render the target and the guess sounding together, each with its own waveform.
///
/// Both voices are normalized on their own before they are summed, so a quiet
/// timbre is not drowned by a loud one. The mix gets a short fade at both ends
/// and a peak of one half.
///
/// # Examples
///
/// ```
/// use tuning_lab::ear::*;
/// use tuning_lab::synth::Timbre;
///
/// let flute = Timbre::Flute.spec();
/// let duet = render_duet(440.0, &flute, 442.0, &flute, 1.0, 8000).unwrap();
/// assert_eq!(duet.len(), 8000);
/// assert_eq!(duet.peak(), 0.5);
/// ```
pub fn render_duet(
    target_hz: f64,
    target: &WaveformSpec,
    guess_hz: f64,
    guess: &WaveformSpec,
    duration_s: f64,
    sample_rate: u32,
) -> Result<SampleBuffer, TuningError> {
    let voices = [
        synthesize(&[target_hz], duration_s, sample_rate, target)?,
        synthesize(&[guess_hz], duration_s, sample_rate, guess)?,
    ];
    let mut mixed = SampleBuffer::mix(sample_rate, &voices);
    Envelope::Fade {
        attack: EAR_FADE_S,
        release: EAR_FADE_S,
    }
    .apply(mixed.samples_mut(), sample_rate as f64);
    mixed.normalize();
    Ok(mixed.scaled(MIX_LEVEL))
}

/// The beat rates a listener is asked to tell apart.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum BeatSpeed {
    Slow,
    Medium,
    Fast,
    Motor,
}

impl BeatSpeed {
    pub const ALL: [BeatSpeed; 4] = [
        BeatSpeed::Slow,
        BeatSpeed::Medium,
        BeatSpeed::Fast,
        BeatSpeed::Motor,
    ];

    /// Beats per second.
    pub fn hz(self) -> f64 {
        match self {
            BeatSpeed::Slow => 1.0,
            BeatSpeed::Medium => 2.0,
            BeatSpeed::Fast => 4.0,
            BeatSpeed::Motor => 8.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BeatSpeed::Slow => "slow",
            BeatSpeed::Medium => "medium",
            BeatSpeed::Fast => "fast",
            BeatSpeed::Motor => "motor",
        }
    }
}

impl fmt::Display for BeatSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz ({})", self.hz(), self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseBeatSpeedError {
    #[snafu(display("Unknown beat speed {:?}, expected 1, 2, 4, 8 or a name", input))]
    UnknownSpeed { input: String },
}

/// Accepts the rate in Hz or the name.
///
/// ```
/// use tuning_lab::ear::BeatSpeed;
///
/// assert_eq!("4".parse(), Ok(BeatSpeed::Fast));
/// assert_eq!("Motor".parse(), Ok(BeatSpeed::Motor));
/// assert!("3".parse::<BeatSpeed>().is_err());
/// ```
impl std::str::FromStr for BeatSpeed {
    type Err = ParseBeatSpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        BeatSpeed::ALL
            .iter()
            .copied()
            .find(|speed| speed.name() == lower || speed.hz().to_string() == lower)
            .ok_or_else(|| ParseBeatSpeedError::UnknownSpeed {
                input: s.to_string(),
            })
    }
}

/// Render a quiz tone: a soft string at [`QUIZ_BASE_HZ`] against a flute
/// detuned by the beat rate.
pub fn render_beat_quiz(
    speed: BeatSpeed,
    duration_s: f64,
    sample_rate: u32,
) -> Result<SampleBuffer, TuningError> {
    let voices = [
        synthesize(
            &[QUIZ_BASE_HZ],
            duration_s,
            sample_rate,
            &Timbre::SoftString.spec(),
        )?,
        synthesize(
            &[QUIZ_BASE_HZ + speed.hz()],
            duration_s,
            sample_rate,
            &Timbre::Flute.spec(),
        )?,
    ];
    Ok(SampleBuffer::mix(sample_rate, &voices).scaled(MIX_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_boundaries() {
        assert_eq!(grade(200.0, 203.0), Grade::Close);
        assert_eq!(grade(200.0, 203.5), Grade::Miss);
        assert_eq!(grade(200.0, 199.0), Grade::Excellent);
        assert!(grade(200.0, 199.0).is_hit());
        assert!(!grade(200.0, f64::NAN).is_hit());
    }

    #[test]
    fn duet_fades_at_both_ends() {
        let duet = render_duet(
            300.0,
            &WaveformSpec::pure(),
            303.0,
            &Timbre::Organ.spec(),
            0.5,
            8000,
        )
        .unwrap();
        assert_eq!(duet.len(), 4000);
        assert_eq!(duet.samples()[0], 0.0);
        assert_eq!(duet.samples()[3999], 0.0);
        assert!((duet.peak() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn duet_voices_keep_their_timbre() {
        let flute = Timbre::Flute.spec();
        let string = Timbre::SoftString.spec();
        let same = render_duet(440.0, &flute, 441.0, &flute, 0.2, 8000).unwrap();
        let mixed = render_duet(440.0, &flute, 441.0, &string, 0.2, 8000).unwrap();
        assert_ne!(same, mixed);
    }

    #[test]
    fn duet_rejects_bad_guesses() {
        let flute = Timbre::Flute.spec();
        assert_eq!(
            render_duet(440.0, &flute, 0.0, &flute, 1.0, 8000),
            Err(TuningError::NonPositiveInput {
                name: "frequency",
                value: 0.0
            })
        );
    }

    #[test]
    fn beat_quiz_speeds() {
        let rates: Vec<f64> = BeatSpeed::ALL.iter().map(|s| s.hz()).collect();
        assert_eq!(rates, vec![1.0, 2.0, 4.0, 8.0]);
        for &speed in BeatSpeed::ALL.iter() {
            let quiz = render_beat_quiz(speed, 0.25, 8000).unwrap();
            assert_eq!(quiz.len(), 2000);
            assert!(quiz.peak() <= 1.0);
            assert!(!quiz.is_silent());
        }
        assert_eq!(BeatSpeed::Slow.to_string(), "1 Hz (slow)");
    }
}
