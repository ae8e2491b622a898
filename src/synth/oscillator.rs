// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use std::f64::consts::PI;

/// A single sine partial sampled at a fixed sample rate.
///
/// The phase is derived from the sample index rather than accumulated,
/// so long tones do not drift and sample 0 always starts at phase zero.
#[derive(Debug, Clone)]
pub struct Oscillator {
    frequency: f64,
    amplitude: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(frequency: f64, amplitude: f64, sample_rate: f64) -> Self {
        Self {
            frequency,
            amplitude,
            sample_rate,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Position within the current period, in `[0, 1)`.
    pub fn phase(&self, index: usize) -> f64 {
        (self.frequency * index as f64 / self.sample_rate).fract()
    }

    /// Value of the partial at the given sample index.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::synth::oscillator::Oscillator;
    ///
    /// let osc = Oscillator::new(1.0, 0.5, 4.0);
    /// assert_eq!(osc.sample(0), 0.0);
    /// assert_eq!(osc.sample(1), 0.5);
    /// assert!(osc.sample(2).abs() < 1e-12);
    /// assert_eq!(osc.sample(3), -0.5);
    /// ```
    pub fn sample(&self, index: usize) -> f64 {
        self.amplitude * (2.0 * PI * self.phase(index)).sin()
    }

    /// Iterate over the samples, starting at index 0.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        (0..).map(move |index| self.sample(index))
    }
}
