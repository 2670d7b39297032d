//! chipwave - Procedural chiptune music and sound effects
//!
//! Builds game audio from nothing but tables: oscillators shaped by ADSR
//! envelopes, strung into phrases, mixed into channels and written out as
//! 16-bit mono WAV files.

pub mod compositions;
pub mod config;
pub mod engine;
pub mod error;
pub mod synth;

pub use compositions::{Composition, CompositionKind};
pub use config::RenderConfig;
pub use engine::{AudioFile, Engine};
pub use error::{Result, SynthError};
