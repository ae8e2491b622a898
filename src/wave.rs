// tuning-lab -- tuning systems and additive synthesis for acoustics demos
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This is the namespace for all parts dealing with data in sampled waves.

/// A mono buffer of floating point audio data, tagged with its sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// A silent buffer of the given length.
    pub fn new(sample_count: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; sample_count],
            sample_rate,
        }
    }

    pub fn from_samples(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Join buffers back to back, with `gap_samples` of silence between neighbours.
    /// The parts are expected to share `sample_rate`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::wave::*;
    ///
    /// let a = SampleBuffer::from_samples(vec![0.5, 0.5], 4);
    /// let b = SampleBuffer::from_samples(vec![-1.0], 4);
    /// let joined = SampleBuffer::concat(4, &[a, b], 2);
    /// assert_eq!(joined.samples(), &[0.5, 0.5, 0.0, 0.0, -1.0]);
    /// ```
    pub fn concat(sample_rate: u32, parts: &[SampleBuffer], gap_samples: usize) -> SampleBuffer {
        let total = parts.iter().map(|p| p.len()).sum::<usize>()
            + gap_samples * parts.len().saturating_sub(1);
        let mut samples = Vec::with_capacity(total);
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                samples.resize(samples.len() + gap_samples, 0.0);
            }
            samples.extend_from_slice(&part.samples);
        }
        SampleBuffer::from_samples(samples, sample_rate)
    }

    /// Sum buffers sample by sample. The result is as long as the longest part.
    /// The parts are expected to share `sample_rate`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::wave::*;
    ///
    /// let a = SampleBuffer::from_samples(vec![0.5, 0.5, 0.5], 4);
    /// let b = SampleBuffer::from_samples(vec![-1.0], 4);
    /// let mixed = SampleBuffer::mix(4, &[a, b]);
    /// assert_eq!(mixed.samples(), &[-0.5, 0.5, 0.5]);
    /// ```
    pub fn mix(sample_rate: u32, parts: &[SampleBuffer]) -> SampleBuffer {
        let len = parts.iter().map(|p| p.len()).max().unwrap_or(0);
        let mut mixed = SampleBuffer::new(len, sample_rate);
        for part in parts {
            for (out, sample) in mixed.samples.iter_mut().zip(part.samples.iter()) {
                *out += sample;
            }
        }
        mixed
    }

    /// Size of the buffer in samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Length of the buffer in seconds.
    pub fn duration_s(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    /// Size of the buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.len() * std::mem::size_of::<f64>()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Largest absolute amplitude in the buffer, zero for an empty buffer.
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0, |peak, s| peak.max(s.abs()))
    }

    /// Whether every sample is zero.
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|s| *s == 0.0)
    }

    /// Scale the buffer so that its peak is exactly 1.0.
    /// Silent buffers are left untouched, in which case `false` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use tuning_lab::wave::*;
    ///
    /// let mut buffer = SampleBuffer::from_samples(vec![0.25, -0.5, 0.125], 8);
    /// assert!(buffer.normalize());
    /// assert_eq!(buffer.samples(), &[0.5, -1.0, 0.25]);
    ///
    /// let mut silence = SampleBuffer::new(3, 8);
    /// assert!(!silence.normalize());
    /// assert_eq!(silence.samples(), &[0.0, 0.0, 0.0]);
    /// ```
    pub fn normalize(&mut self) -> bool {
        let peak = self.peak();
        if peak == 0.0 {
            return false;
        }
        self.samples.iter_mut().for_each(|s| *s /= peak);
        true
    }

    /// A copy with every sample multiplied by `gain`, e.g. to leave some headroom.
    pub fn scaled(&self, gain: f64) -> SampleBuffer {
        SampleBuffer::from_samples(
            self.samples.iter().map(|s| s * gain).collect(),
            self.sample_rate,
        )
    }

    /// Copy the `f64` samples to little endian bytes.
    ///
    /// Returns the number of samples that were actually copied.
    /// Might be less than the number of input samples if the output buffer was not large enough.
    pub fn copy_bytes_to(&self, bytes: &mut [u8]) -> usize {
        let mut processed = 0;
        for (sample, target) in self.samples.iter().zip(bytes.chunks_exact_mut(8)) {
            target.copy_from_slice(&sample.to_le_bytes());
            processed += 1;
        }
        processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_and_bytes() {
        let buffer = SampleBuffer::new(22050, 44100);
        assert_eq!(buffer.duration_s(), 0.5);
        assert_eq!(buffer.byte_len(), 22050 * 8);
        assert!(buffer.is_silent());
        assert_eq!(buffer.peak(), 0.0);
    }

    #[test]
    fn copy_bytes_stops_at_short_output() {
        let buffer = SampleBuffer::from_samples(vec![1.0, -2.0, 0.5], 10);
        let mut bytes = vec![0u8; 16];
        assert_eq!(buffer.copy_bytes_to(&mut bytes), 2);
        assert_eq!(&bytes[0..8], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[8..16], &(-2.0f64).to_le_bytes());
    }

    #[test]
    fn scaled_keeps_rate() {
        let buffer = SampleBuffer::from_samples(vec![1.0, -0.5], 100).scaled(0.8);
        assert_eq!(buffer.samples(), &[0.8, -0.4]);
        assert_eq!(buffer.sample_rate(), 100);
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let joined = SampleBuffer::concat(100, &[], 50);
        assert!(joined.is_empty());
    }

    #[test]
    fn mix_of_nothing_is_empty() {
        let mixed = SampleBuffer::mix(100, &[]);
        assert!(mixed.is_empty());
        assert_eq!(mixed.sample_rate(), 100);
    }
}
