//! Synthesis building blocks
//!
//! Contains sample buffers, oscillators, envelopes, note parsing and the
//! phrase compiler.

mod buffer;
mod envelope;
mod note;
mod oscillator;
mod phrase;

pub use buffer::{sample_count, SampleBuffer};
pub use envelope::{Envelope, StageLengths};
pub use note::{midi_to_frequency, note_frequency, Note, Pitch};
pub use oscillator::{render, render_noise_hit, render_sweep, Waveform, PULSE_DUTY};
pub use phrase::{arpeggio_notes, compile_arpeggio, compile_phrase, Instrument};
