//! Oscillator bank
//!
//! Stateless waveform renderers. Every renderer produces a whole buffer at
//! once; sample `i` of an `n`-sample render sits at `t = i * duration / n`.

use super::buffer::{sample_count, SampleBuffer};
use crate::error::{Result, SynthError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Duty cycle used by [`Waveform::Pulse`]
pub const PULSE_DUTY: f64 = 0.25;

/// Waveform families
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    /// Square whose low half sits at `-duty` instead of -1.0
    ///
    /// `duty = 1.0` gives the symmetric square; smaller values thin the
    /// low half out for a raspier tone.
    Square { duty: f64 },
    Sawtooth,
    Triangle,
    /// Square with a fixed duty of 0.25, used for bass lines
    Pulse,
}

impl Waveform {
    /// The classic symmetric square wave
    pub const SQUARE: Waveform = Waveform::Square { duty: 1.0 };

    /// Square wave with the given duty
    pub fn square(duty: f64) -> Self {
        Waveform::Square { duty }
    }

    /// Check the waveform's own parameters
    pub fn validate(&self) -> Result<()> {
        if let Waveform::Square { duty } = *self {
            if !(duty > 0.0 && duty <= 1.0) {
                return Err(SynthError::InvalidDutyCycle(duty));
            }
        }
        Ok(())
    }

    /// Evaluate the waveform after `cycles` periods have elapsed
    pub fn value_at(&self, cycles: f64) -> f64 {
        match *self {
            Waveform::Sine => (2.0 * PI * cycles).sin(),
            Waveform::Square { duty } => square(cycles, duty),
            Waveform::Pulse => square(cycles, PULSE_DUTY),
            Waveform::Sawtooth => saw(cycles),
            Waveform::Triangle => 2.0 * saw(cycles).abs() - 1.0,
        }
    }
}

fn square(cycles: f64, duty: f64) -> f64 {
    if (2.0 * PI * cycles).sin() > 0.0 {
        1.0
    } else {
        -duty
    }
}

fn saw(cycles: f64) -> f64 {
    2.0 * (cycles - (cycles + 0.5).floor())
}

fn check_frequency(frequency: f64) -> Result<()> {
    if !frequency.is_finite() || frequency < 0.0 {
        return Err(SynthError::InvalidFrequency(frequency));
    }
    Ok(())
}

/// Render `duration` seconds of `waveform` at `frequency`
///
/// A frequency of 0 is a rest and always yields silence of the exact
/// length, whatever the waveform.
pub fn render(
    waveform: Waveform,
    frequency: f64,
    duration: f64,
    sample_rate: u32,
) -> Result<SampleBuffer> {
    check_frequency(frequency)?;
    waveform.validate()?;
    let len = sample_count(duration, sample_rate)?;

    if frequency == 0.0 {
        return Ok(SampleBuffer::from_samples(sample_rate, vec![0.0; len]));
    }

    let step = if len > 0 { duration / len as f64 } else { 0.0 };
    let samples = (0..len)
        .map(|i| waveform.value_at(frequency * i as f64 * step))
        .collect();

    Ok(SampleBuffer::from_samples(sample_rate, samples))
}

/// Render a sine whose frequency moves linearly from `start` to `end`
///
/// The phase is accumulated sample by sample, so the pitch glides without
/// clicks.
pub fn render_sweep(start: f64, end: f64, duration: f64, sample_rate: u32) -> Result<SampleBuffer> {
    check_frequency(start)?;
    check_frequency(end)?;
    let len = sample_count(duration, sample_rate)?;

    let rate = sample_rate as f64;
    let mut phase = 0.0;
    let mut samples = Vec::with_capacity(len);
    for i in 0..len {
        let progress = i as f64 / len as f64;
        let frequency = start + (end - start) * progress;
        phase += 2.0 * PI * frequency / rate;
        samples.push(phase.sin());
    }

    Ok(SampleBuffer::from_samples(sample_rate, samples))
}

/// Render a white noise burst in `-amplitude..amplitude` fading linearly to 0
///
/// An amplitude of 0 yields silence; negative or non-finite amplitudes are
/// rejected.
pub fn render_noise_hit<R: Rng + ?Sized>(
    amplitude: f64,
    duration: f64,
    sample_rate: u32,
    rng: &mut R,
) -> Result<SampleBuffer> {
    if !amplitude.is_finite() || amplitude < 0.0 {
        return Err(SynthError::InvalidVolume(amplitude));
    }
    let len = sample_count(duration, sample_rate)?;
    if amplitude == 0.0 || len == 0 {
        return Ok(SampleBuffer::from_samples(sample_rate, vec![0.0; len]));
    }

    let fade = len.saturating_sub(1).max(1) as f64;
    let samples = (0..len)
        .map(|i| {
            let level = 1.0 - i as f64 / fade;
            rng.random_range(-amplitude..amplitude) * level
        })
        .collect();

    Ok(SampleBuffer::from_samples(sample_rate, samples))
}
