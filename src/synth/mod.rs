// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This namespace contains all the parts converting from frequencies to wave data.

pub mod envelope;
pub mod oscillator;

use std::f64::consts::PI;
use std::fmt;

use log::debug;
use snafu::Snafu;

use crate::error::{finite, positive, TuningError};
use crate::wave::SampleBuffer;

pub use envelope::{Envelope, ADSR};
use oscillator::Oscillator;

/// The harmonic content of a tone.
///
/// `partials[h]` is the amplitude of harmonic `h + 1`, so `partials[0]` belongs
/// to the fundamental itself.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSpec {
    pub partials: Vec<f64>,
    pub envelope: Option<Envelope>,
}

impl WaveformSpec {
    /// A plain sine wave.
    pub fn pure() -> Self {
        WaveformSpec {
            partials: vec![1.0],
            envelope: None,
        }
    }

    pub fn harmonics(partials: Vec<f64>) -> Self {
        WaveformSpec {
            partials,
            envelope: None,
        }
    }

    /// Only the listed harmonics, each with amplitude `1/h`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::synth::WaveformSpec;
    ///
    /// let spec = WaveformSpec::harmonic_selection(&[1, 2, 4]);
    /// assert_eq!(spec.partials, vec![1.0, 0.5, 0.0, 0.25]);
    /// ```
    pub fn harmonic_selection(orders: &[u32]) -> Self {
        let highest = orders.iter().copied().max().unwrap_or(0) as usize;
        let mut partials = vec![0.0; highest];
        for &order in orders.iter().filter(|h| **h > 0) {
            partials[order as usize - 1] = 1.0 / order as f64;
        }
        WaveformSpec::harmonics(partials)
    }

    /// Fourier approximation of a triangle wave using its first `count` odd harmonics.
    pub fn triangle(count: usize) -> Self {
        let mut partials = vec![0.0; 2 * count.max(1) - 1];
        for k in 0..count {
            let order = 2 * k + 1;
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            partials[order - 1] = 8.0 / (PI * PI) * sign / (order * order) as f64;
        }
        WaveformSpec::harmonics(partials)
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }
}

impl Default for WaveformSpec {
    fn default() -> Self {
        WaveformSpec::pure()
    }
}

/// Ready made waveforms for the demos.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Timbre {
    Pure,
    Piano,
    Organ,
    Flute,
    Clarinet,
    Violin,
    Bell,
    ElectricPiano,
    SoftString,
}

impl Timbre {
    pub const ALL: [Timbre; 9] = [
        Timbre::Pure,
        Timbre::Piano,
        Timbre::Organ,
        Timbre::Flute,
        Timbre::Clarinet,
        Timbre::Violin,
        Timbre::Bell,
        Timbre::ElectricPiano,
        Timbre::SoftString,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Timbre::Pure => "pure",
            Timbre::Piano => "piano",
            Timbre::Organ => "organ",
            Timbre::Flute => "flute",
            Timbre::Clarinet => "clarinet",
            Timbre::Violin => "violin",
            Timbre::Bell => "bell",
            Timbre::ElectricPiano => "electric-piano",
            Timbre::SoftString => "soft-string",
        }
    }

    pub fn spec(self) -> WaveformSpec {
        let soft_edges = Envelope::Fade {
            attack: 0.05,
            release: 0.05,
        };
        match self {
            Timbre::Pure => WaveformSpec::pure(),
            Timbre::Piano => WaveformSpec::harmonics(vec![1.0, 0.5])
                .with_envelope(Envelope::Exponential { rate: 3.0 }),
            Timbre::Organ => {
                WaveformSpec::harmonics(vec![0.6, 0.2, 0.1]).with_envelope(Envelope::Fade {
                    attack: 0.1,
                    release: 0.3,
                })
            }
            Timbre::Flute => WaveformSpec::harmonics(vec![1.0, 0.1, 0.05]).with_envelope(soft_edges),
            // odd harmonics only
            Timbre::Clarinet => WaveformSpec::harmonics(vec![1.0, 0.0, 0.6, 0.0, 0.3])
                .with_envelope(soft_edges),
            Timbre::Violin => WaveformSpec::harmonics(vec![1.0, 0.5, 0.33, 0.25, 0.2, 0.16])
                .with_envelope(Envelope::Adsr(ADSR {
                    attack: 0.08,
                    decay: 0.1,
                    sustain: 0.8,
                    release: 0.2,
                })),
            Timbre::Bell => WaveformSpec::harmonics(vec![1.0, 0.0, 0.0, 0.0, 0.8])
                .with_envelope(Envelope::Exponential { rate: 1.5 }),
            Timbre::ElectricPiano => WaveformSpec::harmonics(vec![0.4, 0.2, 0.0, 0.1])
                .with_envelope(Envelope::Exponential { rate: 2.0 }),
            Timbre::SoftString => WaveformSpec::triangle(8).with_envelope(soft_edges),
        }
    }
}

impl fmt::Display for Timbre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum ParseTimbreError {
    #[snafu(display("Unknown timbre {:?}", input))]
    UnknownTimbre { input: String },
}

impl std::str::FromStr for Timbre {
    type Err = ParseTimbreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase().replace('_', "-");
        Timbre::ALL
            .iter()
            .copied()
            .find(|timbre| timbre.name() == lower)
            .ok_or_else(|| ParseTimbreError::UnknownTimbre {
                input: s.to_string(),
            })
    }
}

/// How a tone gets rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParams {
    /// Length of every tone in seconds.
    pub duration_s: f64,
    pub sample_rate: u32,
    pub spec: WaveformSpec,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        SynthesisParams {
            duration_s: 2.0,
            sample_rate: 44100,
            spec: WaveformSpec::pure(),
        }
    }
}

impl SynthesisParams {
    /// Render all frequencies at once, see [`synthesize`].
    pub fn render(&self, frequencies: &[f64]) -> Result<SampleBuffer, TuningError> {
        synthesize(frequencies, self.duration_s, self.sample_rate, &self.spec)
    }
}

/// Additively synthesize the given frequencies sounding together.
///
/// Every frequency contributes all partials of `spec` at integer multiples of itself.
/// The mix is shaped by the envelope (if any) and then scaled to a peak of 1.0.
/// An empty set of frequencies yields silence of the requested length.
///
/// # Examples
///
/// ```
/// use tuning_lab::synth::*;
///
/// let buffer = synthesize(&[220.0, 330.0], 0.5, 8000, &WaveformSpec::pure()).unwrap();
/// assert_eq!(buffer.len(), 4000);
/// assert_eq!(buffer.peak(), 1.0);
/// assert!(synthesize(&[220.0], 0.0, 8000, &WaveformSpec::pure()).is_err());
/// ```
pub fn synthesize(
    frequencies: &[f64],
    duration_s: f64,
    sample_rate: u32,
    spec: &WaveformSpec,
) -> Result<SampleBuffer, TuningError> {
    let duration_s = positive("duration", duration_s)?;
    let rate = positive("sample rate", sample_rate as f64)?;
    for &frequency in frequencies {
        positive("frequency", frequency)?;
    }
    for &amplitude in &spec.partials {
        finite("partial amplitude", amplitude)?;
    }
    if let Some(envelope) = &spec.envelope {
        envelope.validate()?;
    }

    let oscillators: Vec<Oscillator> = frequencies
        .iter()
        .flat_map(|&frequency| {
            spec.partials
                .iter()
                .enumerate()
                .filter(|(_, amplitude)| **amplitude != 0.0)
                .map(move |(h, &amplitude)| {
                    Oscillator::new(frequency * (h + 1) as f64, amplitude, rate)
                })
        })
        .collect();

    let len = (duration_s * rate).round() as usize;
    let mut buffer = SampleBuffer::new(len, sample_rate);
    for (index, sample) in buffer.samples_mut().iter_mut().enumerate() {
        *sample = oscillators.iter().map(|osc| osc.sample(index)).sum();
    }
    if let Some(envelope) = &spec.envelope {
        envelope.apply(buffer.samples_mut(), rate);
    }
    // huge but finite amplitudes can still add up to infinity
    if let Some(&value) = buffer.samples().iter().find(|s| !s.is_finite()) {
        return Err(TuningError::NonFiniteInput {
            name: "mixed sample",
            value,
        });
    }
    if !buffer.normalize() {
        debug!("synthesized buffer is silent, skipping normalization");
    }
    debug!(
        "synthesized {} samples from {} partials of {:?} Hz",
        len,
        oscillators.len(),
        frequencies
    );
    Ok(buffer)
}

/// Render the frequencies one after another, separated by `gap_s` seconds of silence.
/// Every tone is normalized on its own.
pub fn synthesize_sequence(
    frequencies: &[f64],
    params: &SynthesisParams,
    gap_s: f64,
) -> Result<SampleBuffer, TuningError> {
    if !(gap_s.is_finite() && gap_s >= 0.0) {
        return Err(TuningError::NonPositiveInput {
            name: "gap",
            value: gap_s,
        });
    }
    let tones = frequencies
        .iter()
        .map(|&frequency| params.render(&[frequency]))
        .collect::<Result<Vec<_>, _>>()?;
    let gap_samples = (gap_s * params.sample_rate as f64).round() as usize;
    Ok(SampleBuffer::concat(params.sample_rate, &tones, gap_samples))
}
