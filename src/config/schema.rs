//! Configuration schema definitions

use crate::engine::mixer::{MIX_PEAK, OUTPUT_PEAK};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Render settings shared by every composition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Sample rate and tempo
    #[serde(default)]
    pub audio: AudioConfig,

    /// Loudness staging and noise seed
    #[serde(default)]
    pub master: MasterConfig,

    /// Where rendered files go
    #[serde(default)]
    pub output: OutputConfig,
}

impl RenderConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate < 8000 || self.audio.sample_rate > 192000 {
            bail!("Sample rate must be between 8000 and 192000");
        }
        if !(20.0..=300.0).contains(&self.audio.bpm) {
            bail!("BPM must be between 20 and 300");
        }
        if !(self.master.mix_peak > 0.0 && self.master.mix_peak <= 1.0) {
            bail!("Mix peak must be in (0.0, 1.0]");
        }
        if !(self.master.output_peak > 0.0 && self.master.output_peak <= 1.0) {
            bail!("Output peak must be in (0.0, 1.0]");
        }
        Ok(())
    }

    pub fn sample_rate(&self) -> u32 {
        self.audio.sample_rate
    }

    /// Length of one beat in seconds
    pub fn beat(&self) -> f64 {
        60.0 / self.audio.bpm
    }
}

/// Audio format and tempo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Sample rate in Hz (default: 44100)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Beats per minute for the themes (default: 140)
    #[serde(default = "default_bpm")]
    pub bpm: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            bpm: default_bpm(),
        }
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_bpm() -> f64 { 140.0 }

/// Master settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Peak after channels are mixed (default: 0.8)
    #[serde(default = "default_mix_peak")]
    pub mix_peak: f64,

    /// Peak of the encoded file (default: 0.9)
    #[serde(default = "default_output_peak")]
    pub output_peak: f64,

    /// Seed for percussion noise
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            mix_peak: default_mix_peak(),
            output_peak: default_output_peak(),
            seed: default_seed(),
        }
    }
}

fn default_mix_peak() -> f64 { MIX_PEAK }
fn default_output_peak() -> f64 { OUTPUT_PEAK }
fn default_seed() -> u64 { 0x5EED_0F_A4CADE }

/// Output location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory rendered files are written to (default: current directory)
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

fn default_dir() -> PathBuf { PathBuf::from(".") }
