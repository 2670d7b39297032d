//! Error types for synthesis and encoding

use thiserror::Error;

/// Errors raised while rendering or encoding audio
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("duration must be a finite, non-negative number of seconds (got {0})")]
    InvalidDuration(f64),

    #[error("frequency must be a finite, non-negative number of Hz (got {0})")]
    InvalidFrequency(f64),

    #[error("duty cycle must lie in (0, 1] (got {0})")]
    InvalidDutyCycle(f64),

    #[error("sustain level must lie in [0, 1] (got {0})")]
    InvalidSustain(f64),

    #[error("envelope {stage} time must be finite and non-negative (got {value})")]
    InvalidEnvelopeTime { stage: &'static str, value: f64 },

    #[error("volume must lie in [0, 1] (got {0})")]
    InvalidVolume(f64),

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("unknown note name '{0}'")]
    UnknownNote(String),

    #[error("arpeggio needs at least one note")]
    EmptyArpeggio,

    #[error("repeat count must be at least 1")]
    InvalidRepeat,

    #[error("kick percussion spans the whole composition and must be its own channel")]
    SpanningInSequence,

    #[error("no composition named '{0}'")]
    UnknownComposition(String),

    #[error("output '{0}' is targeted by more than one composition")]
    DuplicateOutput(String),

    #[error("WAV encoding failed: {0}")]
    Encode(#[from] hound::Error),
}

/// Result alias for synthesis operations
pub type Result<T> = std::result::Result<T, SynthError>;
