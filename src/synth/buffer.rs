//! Mono sample buffer

use crate::error::{Result, SynthError};

/// Number of samples covering `duration` seconds at `sample_rate`
///
/// Rounds to the nearest sample. Negative or non-finite durations are
/// rejected.
pub fn sample_count(duration: f64, sample_rate: u32) -> Result<usize> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(SynthError::InvalidDuration(duration));
    }
    if sample_rate == 0 {
        return Err(SynthError::InvalidSampleRate);
    }
    Ok((duration * sample_rate as f64).round() as usize)
}

/// A run of mono samples at a fixed sample rate
///
/// Samples are nominally in -1.0..=1.0 but may overshoot until the final
/// normalization pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    sample_rate: u32,
    samples: Vec<f64>,
}

impl SampleBuffer {
    /// Create an empty buffer
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
        }
    }

    /// Wrap existing samples
    pub fn from_samples(sample_rate: u32, samples: Vec<f64>) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// All-zero buffer lasting `duration` seconds
    pub fn silence(duration: f64, sample_rate: u32) -> Result<Self> {
        let len = sample_count(duration, sample_rate)?;
        Ok(Self::from_samples(sample_rate, vec![0.0; len]))
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Largest absolute sample value (0.0 for an empty buffer)
    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |peak, s| peak.max(s.abs()))
    }

    /// True when every sample is exactly zero
    pub fn is_silent(&self) -> bool {
        self.samples.iter().all(|&s| s == 0.0)
    }

    /// Multiply every sample by `gain`
    pub fn scale(&mut self, gain: f64) {
        for sample in &mut self.samples {
            *sample *= gain;
        }
    }

    /// Append another buffer's samples
    pub fn append(&mut self, other: &SampleBuffer) {
        self.samples.extend_from_slice(&other.samples);
    }

    /// `count` back-to-back copies of this buffer, with no cross-fade
    pub fn tiled(&self, count: usize) -> SampleBuffer {
        let mut samples = Vec::with_capacity(self.samples.len() * count);
        for _ in 0..count {
            samples.extend_from_slice(&self.samples);
        }
        Self::from_samples(self.sample_rate, samples)
    }
}
