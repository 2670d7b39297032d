//! Render engine for chipwave
//!
//! Turns composition tables into finished WAV files: compile every channel,
//! mix, normalize for output, encode, write.

pub mod mixer;
mod recorder;

pub use mixer::{normalize_peak, Mixer, MIX_PEAK, OUTPUT_PEAK};
pub use recorder::{to_pcm_i16, AudioFile, WAV_HEADER_LEN};

use crate::compositions::{check_unique_outputs, Channel, Composition, Source};
use crate::config::RenderConfig;
use crate::error::{Result, SynthError};
use crate::synth::{
    compile_arpeggio, compile_phrase, render_noise_hit, render_sweep, sample_count, Note,
    SampleBuffer,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// A composition that made it to disk
#[derive(Debug, Clone)]
pub struct Rendered {
    pub id: String,
    pub path: PathBuf,
    pub frames: usize,
    pub duration_secs: f64,
}

/// Outcome of rendering several compositions
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<Rendered>,
    pub failed: Vec<(String, anyhow::Error)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The render engine
pub struct Engine {
    config: RenderConfig,
    mixer: Mixer,
}

impl Engine {
    /// Create a new engine with the given configuration
    pub fn new(config: RenderConfig) -> Self {
        let mixer = Mixer::new(config.sample_rate(), config.master.mix_peak);
        Self { config, mixer }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate()
    }

    /// Compile one pass of `source`, tiled `repeat` times
    ///
    /// `unit` is the length of one composition time unit in seconds.
    /// Spanning sources (kicks) are only valid as a whole channel and are
    /// rejected here, including inside a sequence.
    pub fn compile_source(
        &self,
        source: &Source,
        unit: f64,
        repeat: usize,
    ) -> Result<SampleBuffer> {
        if repeat == 0 {
            return Err(SynthError::InvalidRepeat);
        }
        let rate = self.sample_rate();

        let pass = match source {
            Source::Phrase { instrument, notes } => {
                let notes: Vec<Note> = notes
                    .iter()
                    .map(|n| Note::new(n.pitch.clone(), n.duration * unit))
                    .collect();
                return compile_phrase(&notes, instrument, repeat, rate);
            }
            Source::Arpeggio {
                instrument,
                notes,
                duration,
            } => compile_arpeggio(notes, duration * unit, instrument, rate)?,
            Source::Sweep {
                from,
                to,
                duration,
                envelope,
                volume,
            } => {
                if !(0.0..=1.0).contains(volume) {
                    return Err(SynthError::InvalidVolume(*volume));
                }
                let mut swept = envelope.apply(render_sweep(*from, *to, duration * unit, rate)?)?;
                swept.scale(*volume);
                swept
            }
            Source::Sequence { parts } => {
                let mut joined = SampleBuffer::new(rate);
                for part in parts {
                    joined.append(&self.compile_source(part, unit, 1)?);
                }
                joined
            }
            Source::Kick { .. } => return Err(SynthError::SpanningInSequence),
        };

        Ok(if repeat > 1 { pass.tiled(repeat) } else { pass })
    }

    /// Lay noise hits every `every` seconds across `span` samples
    ///
    /// A hit is only placed where it fits entirely before the end.
    fn render_kick(
        &self,
        amplitude: f64,
        length: f64,
        every: f64,
        span: usize,
        rng: &mut Pcg32,
    ) -> Result<SampleBuffer> {
        let rate = self.sample_rate();
        if !every.is_finite() || every <= 0.0 {
            return Err(SynthError::InvalidDuration(every));
        }
        let hit_len = sample_count(length, rate)?;
        let spacing = rate as f64 * every;
        let hits = (span as f64 / spacing) as usize;

        let mut track = SampleBuffer::from_samples(rate, vec![0.0; span]);
        for i in 0..hits {
            let start = (i as f64 * spacing) as usize;
            if start + hit_len >= span {
                continue;
            }
            let hit = render_noise_hit(amplitude, length, rate, rng)?;
            for (out, &s) in track.samples_mut()[start..].iter_mut().zip(hit.samples()) {
                *out += s;
            }
        }
        Ok(track)
    }

    /// Compile every channel of `composition` into its own track
    pub fn compile_channels(&self, composition: &Composition) -> Result<Vec<SampleBuffer>> {
        let unit = composition.unit.seconds(self.config.beat());
        let mut tracks: Vec<Option<SampleBuffer>> = Vec::with_capacity(composition.channels.len());

        for channel in &composition.channels {
            if channel.source.is_spanning() {
                tracks.push(None);
                continue;
            }
            let track = self.compile_source(&channel.source, unit, channel.repeat)?;
            debug!(
                composition = %composition.id,
                channel = %channel.name,
                samples = track.len(),
                "compiled channel"
            );
            tracks.push(Some(track));
        }

        let span = tracks.iter().flatten().map(SampleBuffer::len).max().unwrap_or(0);

        composition
            .channels
            .iter()
            .zip(tracks)
            .enumerate()
            .map(|(index, (channel, track))| match track {
                Some(track) => Ok(track),
                None => self.compile_spanning(channel, index, unit, span),
            })
            .collect()
    }

    fn compile_spanning(
        &self,
        channel: &Channel,
        index: usize,
        unit: f64,
        span: usize,
    ) -> Result<SampleBuffer> {
        match channel.source {
            Source::Kick {
                amplitude,
                length,
                every,
            } => {
                let mut rng = Pcg32::seed_from_u64(self.config.master.seed.wrapping_add(index as u64));
                let track = self.render_kick(amplitude, length, every * unit, span, &mut rng)?;
                debug!(channel = %channel.name, samples = track.len(), "compiled percussion");
                Ok(track)
            }
            _ => self.compile_source(&channel.source, unit, channel.repeat),
        }
    }

    /// Compile and mix a composition (first normalization stage)
    pub fn render(&self, composition: &Composition) -> Result<SampleBuffer> {
        let tracks = self.compile_channels(composition)?;
        Ok(self.mixer.mix(&tracks))
    }

    /// Render, apply the output normalization stage and encode
    pub fn master(&self, composition: &Composition) -> Result<AudioFile> {
        let mut mixed = self.render(composition)?;
        normalize_peak(&mut mixed, self.config.master.output_peak);
        AudioFile::encode(&mixed)
    }

    /// Where `composition` is written
    pub fn output_path(&self, composition: &Composition) -> PathBuf {
        self.config.output.dir.join(composition.file_name())
    }

    /// Render `composition` and write it to its output path
    pub fn write(&self, composition: &Composition) -> anyhow::Result<Rendered> {
        let file = self.master(composition)?;
        let path = self.output_path(composition);
        file.write(&path)?;

        info!(
            composition = %composition.id,
            path = %path.display(),
            seconds = file.duration_secs(),
            "wrote WAV"
        );

        Ok(Rendered {
            id: composition.id.clone(),
            path,
            frames: file.frames(),
            duration_secs: file.duration_secs(),
        })
    }

    /// Render a batch; one composition failing does not stop the others
    ///
    /// Fails up front if two compositions would write the same file.
    pub fn write_all(&self, compositions: &[Composition]) -> Result<BatchReport> {
        check_unique_outputs(compositions)?;

        let mut report = BatchReport::default();
        for composition in compositions {
            match self.write(composition) {
                Ok(rendered) => report.written.push(rendered),
                Err(e) => {
                    warn!(composition = %composition.id, error = %e, "render failed");
                    report.failed.push((composition.id.clone(), e));
                }
            }
        }
        Ok(report)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositions::{self, CompositionKind, TimeUnit};
    use crate::synth::{Envelope, Instrument, Pitch, Waveform};
    use tempfile::tempdir;

    fn engine_in(dir: &std::path::Path) -> Engine {
        let mut config = RenderConfig::default();
        config.output.dir = dir.to_path_buf();
        Engine::new(config)
    }

    fn single(id: &str, channels: Vec<Channel>) -> Composition {
        Composition {
            id: id.to_string(),
            kind: CompositionKind::Effect,
            description: String::new(),
            unit: TimeUnit::Seconds,
            channels,
        }
    }

    fn lead_phrase(notes: Vec<Note>) -> Source {
        Source::Phrase {
            instrument: Instrument::new(Waveform::square(0.5), 0.6),
            notes,
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = Engine::default();
        assert_eq!(engine.sample_rate(), 44100);
        assert_eq!(engine.config().master.mix_peak, MIX_PEAK);
    }

    #[test]
    fn test_beats_scale_with_tempo() {
        let engine = Engine::default();
        let mut theme = single(
            "beat",
            vec![Channel::new("lead", lead_phrase(vec![Note::new("A4", 2.0)]))],
        );
        theme.unit = TimeUnit::Beats;
        let tracks = engine.compile_channels(&theme).unwrap();
        // two beats at 140 BPM
        assert_eq!(tracks[0].len(), 37800);
    }

    #[test]
    fn test_render_peak_is_mix_peak() {
        let engine = Engine::default();
        let composition = single(
            "duet",
            vec![
                Channel::new("a", lead_phrase(vec![Note::new("C5", 0.5)])),
                Channel::new("b", lead_phrase(vec![Note::new("E5", 0.25)])),
            ],
        );
        let mixed = engine.render(&composition).unwrap();
        assert_eq!(mixed.len(), 22050);
        assert!((mixed.peak() - MIX_PEAK).abs() < 1e-9);
    }

    #[test]
    fn test_all_rest_composition_encodes_silence() {
        let engine = Engine::default();
        let composition = single(
            "quiet",
            vec![
                Channel::new("a", lead_phrase(vec![Note::rest(0.5)])),
                Channel::new("b", lead_phrase(vec![Note::new("REST", 0.25)])).repeat(3),
            ],
        );
        let file = engine.master(&composition).unwrap();
        assert_eq!(file.frames(), 33075);
        assert!(file.bytes()[WAV_HEADER_LEN..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_sequence_and_sweep_sources() {
        let engine = Engine::default();
        let source = Source::Sequence {
            parts: vec![
                Source::Sweep {
                    from: 300.0,
                    to: 600.0,
                    duration: 0.1,
                    envelope: Envelope::note(),
                    volume: 0.5,
                },
                Source::Arpeggio {
                    instrument: Instrument::new(Waveform::Sawtooth, 0.5),
                    notes: vec![Pitch::from("C4"), Pitch::from("G4")],
                    duration: 0.2,
                },
            ],
        };
        let buf = engine.compile_source(&source, 1.0, 2).unwrap();
        assert_eq!(buf.len(), 2 * (4410 + 8820));
        assert!(buf.peak() <= 0.5 + 1e-12);
    }

    #[test]
    fn test_kick_spans_other_channels() {
        let engine = Engine::default();
        let composition = single(
            "groove",
            vec![
                Channel::new("lead", lead_phrase(vec![Note::new("C5", 1.0)])),
                Channel::new(
                    "kick",
                    Source::Kick {
                        amplitude: 0.3,
                        length: 0.05,
                        every: 0.25,
                    },
                ),
            ],
        );
        let tracks = engine.compile_channels(&composition).unwrap();
        let kick = &tracks[1];
        assert_eq!(kick.len(), 44100);
        // hits at 0, 0.25, 0.5, 0.75 s, silence between them
        assert!(kick.samples()[..2205].iter().any(|&s| s != 0.0));
        assert!(kick.samples()[2205..11025].iter().all(|&s| s == 0.0));
        assert!(kick.samples()[33075..33075 + 2205].iter().any(|&s| s != 0.0));
        assert!(kick.peak() <= 0.3);

        let again = engine.compile_channels(&composition).unwrap();
        assert_eq!(again[1], tracks[1]);
    }

    #[test]
    fn test_kick_alone_is_empty() {
        let engine = Engine::default();
        let composition = single(
            "kick-only",
            vec![Channel::new(
                "kick",
                Source::Kick {
                    amplitude: 0.3,
                    length: 0.05,
                    every: 0.25,
                },
            )],
        );
        let mixed = engine.render(&composition).unwrap();
        assert!(mixed.is_empty());
    }

    #[test]
    fn test_kick_inside_sequence_is_rejected() {
        let engine = Engine::default();
        let kick = Source::Kick {
            amplitude: 0.3,
            length: 0.05,
            every: 0.25,
        };
        let nested = Source::Sequence {
            parts: vec![kick.clone()],
        };
        assert!(matches!(
            engine.compile_source(&nested, 1.0, 1),
            Err(SynthError::SpanningInSequence)
        ));
        assert!(matches!(
            engine.compile_source(&kick, 1.0, 1),
            Err(SynthError::SpanningInSequence)
        ));

        let composition = single(
            "nested",
            vec![
                Channel::new("lead", lead_phrase(vec![Note::new("C5", 0.5)])),
                Channel::new("fx", nested),
            ],
        );
        assert!(matches!(
            engine.render(&composition),
            Err(SynthError::SpanningInSequence)
        ));
    }

    #[test]
    fn test_invalid_kick_amplitude() {
        let engine = Engine::default();
        let composition = single(
            "loud",
            vec![
                Channel::new("lead", lead_phrase(vec![Note::new("C5", 1.0)])),
                Channel::new(
                    "kick",
                    Source::Kick {
                        amplitude: f64::NAN,
                        length: 0.05,
                        every: 0.25,
                    },
                ),
            ],
        );
        assert!(matches!(
            engine.render(&composition),
            Err(SynthError::InvalidVolume(_))
        ));
    }

    #[test]
    fn test_invalid_channel_fails_whole_composition() {
        let engine = Engine::default();
        let composition = single(
            "broken",
            vec![
                Channel::new("ok", lead_phrase(vec![Note::new("C5", 0.1)])),
                Channel::new("bad", lead_phrase(vec![Note::new("C5", -0.1)])),
            ],
        );
        assert!(matches!(
            engine.master(&composition),
            Err(SynthError::InvalidDuration(_))
        ));
    }

    #[test]
    fn test_builtin_effect_is_deterministic() {
        let engine = Engine::default();
        let chomp = compositions::find("chomp").unwrap();
        let first = engine.master(&chomp).unwrap();
        let second = engine.master(&chomp).unwrap();
        assert_eq!(first.bytes(), second.bytes());
        assert_eq!(first.frames(), 3528);
    }

    #[test]
    fn test_builtin_theme_with_kick_is_deterministic() {
        let engine = Engine::default();
        let theme = compositions::find("background-theme").unwrap();
        let first = engine.master(&theme).unwrap();
        let second = engine.master(&theme).unwrap();
        assert_eq!(first.bytes(), second.bytes());
        // 70 beats at 140 BPM
        assert_eq!(first.frames(), 70 * 18900);
    }

    #[test]
    fn test_output_peak_in_file() {
        let engine = Engine::default();
        let file = engine.master(&compositions::find("menu-select").unwrap()).unwrap();
        let peak = file.bytes()[WAV_HEADER_LEN..]
            .chunks(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]).unsigned_abs())
            .max()
            .unwrap();
        assert_eq!(peak, (0.9f64 * 32767.0).round() as u16);
    }

    #[test]
    fn test_write_all() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let batch = vec![
            compositions::find("menu-navigate").unwrap(),
            compositions::find("eat-ghost").unwrap(),
        ];
        let report = engine.write_all(&batch).unwrap();
        assert!(report.is_success());
        assert_eq!(report.written.len(), 2);

        let path = dir.path().join("eat-ghost.wav");
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().bits_per_sample, 16);
        assert_eq!(reader.len(), 17640);
    }

    #[test]
    fn test_write_all_continues_after_failure() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let broken = single(
            "broken",
            vec![Channel::new("bad", lead_phrase(vec![Note::new("nope", 0.1)]))],
        );
        let batch = vec![broken, compositions::find("menu-select").unwrap()];
        let report = engine.write_all(&batch).unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken");
        assert_eq!(report.written.len(), 1);
        assert!(!dir.path().join("broken.wav").exists());
        assert!(dir.path().join("menu-select.wav").exists());
    }

    #[test]
    fn test_write_all_rejects_duplicate_outputs() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let chomp = compositions::find("chomp").unwrap();
        assert!(matches!(
            engine.write_all(&[chomp.clone(), chomp]),
            Err(SynthError::DuplicateOutput(_))
        ));
    }
}
