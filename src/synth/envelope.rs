// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Amplitude envelopes applied to a finished tone, to avoid clicks at the edges
//! or to give a preset its decay.

use crate::error::TuningError;

/// Shape of the gain applied over the length of a tone.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// Linear fade in over `attack` seconds and linear fade out over the last `release` seconds.
    /// The last sample is always silent when `release` is non-zero.
    Fade { attack: f64, release: f64 },
    /// Exponential decay `exp(-rate * t)`, like a struck string.
    Exponential { rate: f64 },
    /// A keyboard style envelope, released so that it reaches zero on the last sample.
    Adsr(ADSR),
}

impl Envelope {
    /// Reject negative or non-finite times and rates.
    pub fn validate(&self) -> Result<(), TuningError> {
        let check = |name: &'static str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(TuningError::NonPositiveInput { name, value })
            }
        };
        match self {
            Envelope::Fade { attack, release } => {
                check("fade in time", *attack)?;
                check("fade out time", *release)
            }
            Envelope::Exponential { rate } => check("decay rate", *rate),
            Envelope::Adsr(adsr) => {
                check("attack time", adsr.attack)?;
                check("decay time", adsr.decay)?;
                check("sustain level", adsr.sustain)?;
                check("release time", adsr.release)
            }
        }
    }

    /// Multiply the samples in place with the envelope gain.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::synth::envelope::*;
    ///
    /// let mut samples = vec![1.0; 9];
    /// let fade = Envelope::Fade { attack: 0.5, release: 0.5 };
    /// fade.apply(&mut samples, 8.0);
    /// assert_eq!(samples, vec![0.0, 0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25, 0.0]);
    /// ```
    pub fn apply(&self, samples: &mut [f64], sample_rate: f64) {
        let len = samples.len();
        match self {
            Envelope::Fade { attack, release } => {
                let attack_samples = seconds_to_samples(*attack, sample_rate).min(len);
                let release_samples =
                    seconds_to_samples(*release, sample_rate).min(len - attack_samples);
                for (index, sample) in samples.iter_mut().enumerate() {
                    let mut gain = 1.0;
                    if index < attack_samples {
                        gain = index as f64 / attack_samples as f64;
                    }
                    let remaining = len - 1 - index;
                    if remaining < release_samples {
                        gain = f64::min(gain, remaining as f64 / release_samples as f64);
                    }
                    *sample *= gain;
                }
            }
            Envelope::Exponential { rate } => {
                for (index, sample) in samples.iter_mut().enumerate() {
                    let t = index as f64 / sample_rate;
                    *sample *= (-rate * t).exp();
                }
            }
            Envelope::Adsr(adsr) => {
                let mut eval = adsr.instantiate(sample_rate);
                let release_at = len.saturating_sub(eval.release_samples + 1);
                for (index, sample) in samples.iter_mut().enumerate() {
                    if index == release_at {
                        eval.release();
                    }
                    *sample *= eval.step();
                }
            }
        }
    }
}

fn seconds_to_samples(seconds: f64, sample_rate: f64) -> usize {
    (seconds * sample_rate).round() as usize
}

/// An Attack-Decay-Sustain-Release envelope.
/// The amplitude first rises from zero to one over `attack` seconds,
/// then decays over an additional `decay` seconds to the `sustain` level where it is held
/// until the tone is released. After the release, the volume falls back to zero
/// over the next `release` seconds.
///
/// # Example
///
/// ```
/// use tuning_lab::synth::envelope::*;
/// let e = ADSR {
///     attack: 0.25,
///     decay: 0.5,
///     sustain: 0.75,
///     release: 1.0,
/// };
/// let mut eval = e.instantiate(4.0); // 4 samples per second
/// assert_eq!(eval.step(), 0.0);
/// assert_eq!(eval.step(), 1.0);
/// assert_eq!(eval.step(), 0.875);
/// assert_eq!(eval.step(), 0.75);
/// assert_eq!(eval.step(), 0.75);
/// eval.release();
/// assert!(!eval.faded());
///
/// assert_eq!(eval.step(), 0.75);
/// assert_eq!(eval.step(), 0.5625);
/// assert_eq!(eval.step(), 0.375);
/// assert_eq!(eval.step(), 0.1875);
/// assert_eq!(eval.step(), 0.0);
/// assert!(eval.faded());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ADSR {
    /// Time in seconds to go from 0.0 to 1.0
    pub attack: f64,
    /// Time in seconds to go from 1.0 to `sustain`.
    pub decay: f64,
    /// Constant amplitude until the release.
    pub sustain: f64,
    /// Time in seconds to go from `sustain` to 0.0.
    pub release: f64,
}

impl ADSR {
    pub fn instantiate(&self, sample_rate: f64) -> EvalADSR {
        EvalADSR {
            attack_samples: seconds_to_samples(self.attack, sample_rate),
            decay_samples: seconds_to_samples(self.decay, sample_rate),
            release_samples: seconds_to_samples(self.release, sample_rate),
            sustain_level: self.sustain,
            release_level: self.sustain,
            current_sample: 0,
            released: false,
        }
    }
}

/// Sample-exact evaluator for an ADSR envelope.
#[derive(Debug, Clone)]
pub struct EvalADSR {
    attack_samples: usize,
    decay_samples: usize,
    release_samples: usize,
    sustain_level: f64,
    current_sample: usize,
    release_level: f64,
    released: bool,
}

impl EvalADSR {
    /// Called for every sample, returning the envelope gain at that sample.
    pub fn step(&mut self) -> f64 {
        let gain = self.compute_gain();
        let held_until = self.attack_samples + self.decay_samples;
        let moving = if self.released {
            self.current_sample < held_until + self.release_samples
        } else {
            self.current_sample < held_until
        };
        if moving {
            self.current_sample += 1;
        }
        gain
    }

    fn compute_gain(&self) -> f64 {
        let held_until = self.attack_samples + self.decay_samples;
        if self.current_sample < self.attack_samples {
            self.current_sample as f64 / self.attack_samples as f64
        } else if self.current_sample < held_until {
            let progress =
                (self.current_sample - self.attack_samples) as f64 / self.decay_samples as f64;
            1.0 - progress * (1.0 - self.sustain_level)
        } else if !self.released {
            self.sustain_level
        } else if self.current_sample < held_until + self.release_samples {
            let progress = (self.current_sample - held_until) as f64 / self.release_samples as f64;
            (1.0 - progress) * self.release_level
        } else {
            0.0
        }
    }

    /// Start the release phase from whatever level the envelope is at.
    pub fn release(&mut self) {
        if !self.released {
            self.release_level = self.compute_gain();
            self.current_sample = self.attack_samples + self.decay_samples;
            self.released = true;
        }
    }

    /// Whether all subsequent `step` calls return zero.
    pub fn faded(&self) -> bool {
        self.released
            && self.current_sample >= self.attack_samples + self.decay_samples + self.release_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_silences_both_edges() {
        let mut samples = vec![1.0; 1000];
        Envelope::Fade {
            attack: 0.01,
            release: 0.02,
        }
        .apply(&mut samples, 1000.0);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[999], 0.0);
        assert_eq!(samples[500], 1.0);
        assert_eq!(samples[5], 0.5);
    }

    #[test]
    fn fade_longer_than_the_tone() {
        let mut samples = vec![1.0; 4];
        Envelope::Fade {
            attack: 10.0,
            release: 10.0,
        }
        .apply(&mut samples, 100.0);
        assert_eq!(samples, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn exponential_decay() {
        let mut samples = vec![1.0; 3];
        Envelope::Exponential { rate: 2.0 }.apply(&mut samples, 2.0);
        assert_eq!(samples[0], 1.0);
        assert!((samples[1] - (-1.0f64).exp()).abs() < 1e-12);
        assert!((samples[2] - (-2.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn adsr_ends_silent() {
        let mut samples = vec![1.0; 12];
        let adsr = ADSR {
            attack: 0.25,
            decay: 0.25,
            sustain: 0.5,
            release: 0.5,
        };
        Envelope::Adsr(adsr).apply(&mut samples, 4.0);
        assert_eq!(samples[0], 0.0);
        assert_eq!(samples[1], 1.0);
        assert_eq!(samples[5], 0.5);
        assert_eq!(samples[11], 0.0);
    }

    #[test]
    fn adsr_early_release() {
        let e = ADSR {
            attack: 0.25,
            decay: 0.5,
            sustain: 0.75,
            release: 1.0,
        };
        let mut eval = e.instantiate(4.0);
        assert_eq!(eval.step(), 0.0);
        eval.release();
        assert_eq!(eval.step(), 1.0);
        assert_eq!(eval.step(), 0.75);
        assert_eq!(eval.step(), 0.5);
        assert_eq!(eval.step(), 0.25);
        assert_eq!(eval.step(), 0.0);
    }

    #[test]
    fn negative_times_are_rejected() {
        let fade = Envelope::Fade {
            attack: -1.0,
            release: 0.0,
        };
        assert!(fade.validate().is_err());
        assert!(Envelope::Exponential { rate: f64::NAN }.validate().is_err());
        assert!(Envelope::Exponential { rate: 0.0 }.validate().is_ok());
    }
}
