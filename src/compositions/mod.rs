//! Composition tables
//!
//! Every theme and sound effect is plain data: a list of channels, each
//! naming what to play and how. The engine turns these tables into audio;
//! nothing in here synthesizes anything.

mod effects;
mod themes;

use crate::error::{Result, SynthError};
use crate::synth::{Envelope, Instrument, Note, Pitch};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Whether a composition is a looping theme or a one-shot effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionKind {
    Theme,
    Effect,
}

/// Unit the durations in a composition are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    #[default]
    Seconds,
    /// Beats at the configured tempo
    Beats,
}

impl TimeUnit {
    /// Seconds per unit at `beat` seconds per beat
    pub fn seconds(&self, beat: f64) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Beats => beat,
        }
    }
}

/// What a channel plays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    /// Notes played back to back
    Phrase {
        instrument: Instrument,
        notes: Vec<Note>,
    },
    /// Notes sharing `duration` evenly
    Arpeggio {
        instrument: Instrument,
        notes: Vec<Pitch>,
        duration: f64,
    },
    /// Sine gliding linearly from `from` Hz to `to` Hz
    Sweep {
        from: f64,
        to: f64,
        duration: f64,
        envelope: Envelope,
        #[serde(default = "full_volume")]
        volume: f64,
    },
    /// Noise hits every `every` units across the other channels' length
    Kick {
        amplitude: f64,
        /// Length of one hit in seconds
        length: f64,
        every: f64,
    },
    /// Several sources one after another
    Sequence { parts: Vec<Source> },
}

fn full_volume() -> f64 {
    1.0
}

impl Source {
    /// Length of one pass in composition units (0 for kicks, which follow
    /// the other channels)
    pub fn duration(&self) -> f64 {
        match self {
            Source::Phrase { notes, .. } => notes.iter().map(|n| n.duration).sum(),
            Source::Arpeggio { duration, .. } | Source::Sweep { duration, .. } => *duration,
            Source::Kick { .. } => 0.0,
            Source::Sequence { parts } => parts.iter().map(Source::duration).sum(),
        }
    }

    /// True for sources whose length follows the rest of the composition
    pub fn is_spanning(&self) -> bool {
        matches!(self, Source::Kick { .. })
    }
}

/// One voice of a composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub source: Source,
    /// How many times the compiled channel is tiled
    #[serde(default = "single_pass")]
    pub repeat: usize,
}

fn single_pass() -> usize {
    1
}

impl Channel {
    pub fn new(name: impl Into<String>, source: Source) -> Self {
        Self {
            name: name.into(),
            source,
            repeat: 1,
        }
    }

    pub fn repeat(mut self, count: usize) -> Self {
        self.repeat = count;
        self
    }
}

/// A named theme or effect, rendered to `<id>.wav`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub id: String,
    pub kind: CompositionKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit: TimeUnit,
    pub channels: Vec<Channel>,
}

impl Composition {
    /// Output file name
    pub fn file_name(&self) -> String {
        format!("{}.wav", self.id)
    }

    /// Expected length in seconds at `beat` seconds per beat
    pub fn duration_secs(&self, beat: f64) -> f64 {
        let unit = self.unit.seconds(beat);
        self.channels
            .iter()
            .map(|c| c.source.duration() * c.repeat as f64 * unit)
            .fold(0.0, f64::max)
    }

    /// Parse a composition from YAML
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Shorthand for a phrase of named notes
pub(crate) fn phrase(instrument: Instrument, notes: &[(&str, f64)]) -> Source {
    Source::Phrase {
        instrument,
        notes: notes.iter().map(|&(name, len)| Note::new(name, len)).collect(),
    }
}

/// Shorthand for a phrase of raw frequencies (0 Hz rests)
pub(crate) fn tones(instrument: Instrument, notes: &[(f64, f64)]) -> Source {
    Source::Phrase {
        instrument,
        notes: notes.iter().map(|&(hz, len)| Note::new(hz, len)).collect(),
    }
}

/// Every built-in composition: themes first, then effects
pub fn catalog() -> Vec<Composition> {
    let mut all = themes::all();
    all.extend(effects::all());
    all
}

/// Built-in composition by id
pub fn find(id: &str) -> Result<Composition> {
    catalog()
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| SynthError::UnknownComposition(id.to_string()))
}

/// Reject batches where two compositions would write the same file
pub fn check_unique_outputs(compositions: &[Composition]) -> Result<()> {
    let mut seen = HashSet::new();
    for composition in compositions {
        if !seen.insert(composition.file_name()) {
            return Err(SynthError::DuplicateOutput(composition.file_name()));
        }
    }
    Ok(())
}
