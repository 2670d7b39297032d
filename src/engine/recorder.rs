//! PCM encoder and WAV file output
//!
//! Encodes a finished buffer into a mono 16-bit WAV image in memory, then
//! writes that image to disk in one go.

use crate::error::Result;
use crate::synth::SampleBuffer;
use anyhow::Context;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::Path;

/// Size of the canonical RIFF/WAVE header for 16-bit mono PCM
pub const WAV_HEADER_LEN: usize = 44;

/// Convert normalized samples to 16-bit PCM
///
/// Each sample maps to `round(s * 32767)`, clamped to the i16 range so
/// overshoot saturates instead of wrapping.
pub fn to_pcm_i16(samples: &[f64]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| {
            let scaled = (s * i16::MAX as f64).round();
            scaled.clamp(i16::MIN as f64, i16::MAX as f64) as i16
        })
        .collect()
}

/// An encoded WAV file held in memory
#[derive(Debug, Clone)]
pub struct AudioFile {
    spec: WavSpec,
    frames: usize,
    bytes: Vec<u8>,
}

impl AudioFile {
    /// Encode `buffer` as mono 16-bit little-endian PCM
    pub fn encode(buffer: &SampleBuffer) -> Result<Self> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: buffer.sample_rate(),
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let pcm = to_pcm_i16(buffer.samples());
        let mut bytes = Vec::with_capacity(WAV_HEADER_LEN + pcm.len() * 2);
        {
            let mut writer = WavWriter::new(Cursor::new(&mut bytes), spec)?;
            for &sample in &pcm {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }

        Ok(Self {
            spec,
            frames: pcm.len(),
            bytes,
        })
    }

    /// Number of PCM frames in the payload
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / self.spec.sample_rate as f64
    }

    /// The complete file image, header included
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Write the file to `path`
    ///
    /// The image goes to a temporary sibling first and is renamed into place,
    /// so a failed write never leaves a truncated file under `path`.
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let partial = path.with_extension("wav.part");
        std::fs::write(&partial, &self.bytes)
            .with_context(|| format!("failed to write WAV file: {:?}", partial))?;

        if let Err(e) = std::fs::rename(&partial, path) {
            let _ = std::fs::remove_file(&partial);
            return Err(e).with_context(|| format!("failed to move WAV file into place: {:?}", path));
        }
        Ok(())
    }
}
