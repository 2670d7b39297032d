//! Track mixer
//!
//! Sums channel buffers into one and rescales the result to a fixed peak.
//! The same peak normalization runs twice per render: once at
//! [`MIX_PEAK`] when channels are combined, and once at [`OUTPUT_PEAK`]
//! right before encoding.

use crate::synth::SampleBuffer;

/// Peak of a freshly mixed composition
pub const MIX_PEAK: f64 = 0.8;

/// Peak of the buffer handed to the encoder
pub const OUTPUT_PEAK: f64 = 0.9;

/// Scale `buffer` so its largest absolute sample equals `target`
///
/// Silent buffers are left alone.
pub fn normalize_peak(buffer: &mut SampleBuffer, target: f64) {
    let peak = buffer.peak();
    if peak > 0.0 {
        buffer.scale(target / peak);
    }
}

/// Sums tracks and normalizes the result
#[derive(Debug, Clone, Copy)]
pub struct Mixer {
    sample_rate: u32,
    target_peak: f64,
}

impl Mixer {
    /// Create a mixer normalizing to `target_peak`
    pub fn new(sample_rate: u32, target_peak: f64) -> Self {
        Self {
            sample_rate,
            target_peak,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn target_peak(&self) -> f64 {
        self.target_peak
    }

    /// Sum raw tracks sample by sample
    ///
    /// Shorter tracks are treated as zero past their end, so the result is as
    /// long as the longest track.
    pub fn sum(&self, tracks: &[SampleBuffer]) -> SampleBuffer {
        let len = tracks.iter().map(SampleBuffer::len).max().unwrap_or(0);
        let mut mixed = SampleBuffer::from_samples(self.sample_rate, vec![0.0; len]);

        for track in tracks {
            debug_assert_eq!(track.sample_rate(), self.sample_rate);
            for (out, &sample) in mixed.samples_mut().iter_mut().zip(track.samples()) {
                *out += sample;
            }
        }

        mixed
    }

    /// Sum tracks and normalize the peak to the mixer's target
    pub fn mix(&self, tracks: &[SampleBuffer]) -> SampleBuffer {
        let mut mixed = self.sum(tracks);
        normalize_peak(&mut mixed, self.target_peak);
        mixed
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(44100, MIX_PEAK)
    }
}
