//! ADSR envelope shaper
//!
//! Attack-Decay-Sustain-Release amplitude shaping over a whole, already
//! rendered buffer. The envelope always spans the full buffer: release ends
//! on the last sample.

use super::buffer::SampleBuffer;
use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};

/// Sample counts of each stage for one buffer
///
/// The four counts always add up to the buffer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageLengths {
    pub attack: usize,
    pub decay: usize,
    pub sustain: usize,
    pub release: usize,
}

impl StageLengths {
    pub fn total(&self) -> usize {
        self.attack + self.decay + self.sustain + self.release
    }
}

/// ADSR envelope parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Attack time in seconds
    pub attack: f64,
    /// Decay time in seconds
    pub decay: f64,
    /// Sustain level (0.0-1.0)
    pub sustain: f64,
    /// Release time in seconds
    pub release: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::note()
    }
}

impl Envelope {
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        Self {
            attack,
            decay,
            sustain,
            release,
        }
    }

    /// Shape shared by every melodic instrument in the themes
    pub fn note() -> Self {
        Self::new(0.01, 0.05, 0.7, 0.05)
    }

    /// Reject negative times and out-of-range sustain
    pub fn validate(&self) -> Result<()> {
        for (stage, value) in [
            ("attack", self.attack),
            ("decay", self.decay),
            ("release", self.release),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SynthError::InvalidEnvelopeTime { stage, value });
            }
        }
        if !(0.0..=1.0).contains(&self.sustain) {
            return Err(SynthError::InvalidSustain(self.sustain));
        }
        Ok(())
    }

    /// Lay the stages out over a buffer of `len` samples
    ///
    /// When attack, decay and release together are longer than the buffer
    /// they shrink proportionally to fill it exactly and sustain gets no
    /// samples.
    pub fn stage_lengths(&self, len: usize, sample_rate: u32) -> StageLengths {
        let rate = sample_rate as f64;
        // Each stage is capped at `len` so the sum cannot overflow
        let attack = ((self.attack * rate) as usize).min(len);
        let decay = ((self.decay * rate) as usize).min(len);
        let release = ((self.release * rate) as usize).min(len);
        let timed = attack + decay + release;

        if timed <= len {
            return StageLengths {
                attack,
                decay,
                sustain: len - timed,
                release,
            };
        }

        // Cumulative boundaries so the rounding never loses or adds samples
        let scale = |n: usize| (n as u128 * len as u128 / timed as u128) as usize;
        let attack_end = scale(attack);
        let decay_end = scale(attack + decay);
        StageLengths {
            attack: attack_end,
            decay: decay_end - attack_end,
            sustain: 0,
            release: len - decay_end,
        }
    }

    /// Amplitude curve for a buffer of `len` samples
    pub fn curve(&self, len: usize, sample_rate: u32) -> Vec<f64> {
        let stages = self.stage_lengths(len, sample_rate);
        let mut curve = Vec::with_capacity(stages.total());
        push_ramp(&mut curve, 0.0, 1.0, stages.attack);
        push_ramp(&mut curve, 1.0, self.sustain, stages.decay);
        curve.extend(std::iter::repeat(self.sustain).take(stages.sustain));
        push_ramp(&mut curve, self.sustain, 0.0, stages.release);
        curve
    }

    /// Shape `buffer` with this envelope
    ///
    /// Silent buffers pass through untouched.
    pub fn apply(&self, mut buffer: SampleBuffer) -> Result<SampleBuffer> {
        self.validate()?;
        if buffer.is_silent() {
            return Ok(buffer);
        }

        let curve = self.curve(buffer.len(), buffer.sample_rate());
        for (sample, level) in buffer.samples_mut().iter_mut().zip(curve) {
            *sample *= level;
        }
        Ok(buffer)
    }
}

/// Append a linear ramp that hits both endpoints
fn push_ramp(curve: &mut Vec<f64>, from: f64, to: f64, len: usize) {
    if len == 1 {
        curve.push(from);
        return;
    }
    let last = len.saturating_sub(1) as f64;
    curve.extend((0..len).map(|i| from + (to - from) * i as f64 / last));
}
