//! Note names and pitches

use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tokens accepted as a rest
const REST_NAMES: [&str; 3] = ["REST", "R", "-"];

/// Frequency of an equal-tempered note, A4 = 440 Hz
///
/// Rounded to hundredths of a hertz, matching the usual published note
/// tables (C4 = 261.63).
pub fn midi_to_frequency(midi_note: i32) -> f64 {
    let exact = 440.0 * 2.0_f64.powf((midi_note as f64 - 69.0) / 12.0);
    (exact * 100.0).round() / 100.0
}

/// Parse a note name such as `C4`, `F#3`, `Bb2` or `rest` into Hz
///
/// Rests resolve to 0.0.
pub fn note_frequency(name: &str) -> Result<f64> {
    let trimmed = name.trim();
    if REST_NAMES.iter().any(|r| r.eq_ignore_ascii_case(trimmed)) {
        return Ok(0.0);
    }

    let unknown = || SynthError::UnknownNote(name.to_string());
    let mut chars = trimmed.chars();

    let semitone = match chars.next().map(|c| c.to_ascii_uppercase()) {
        Some('C') => 0,
        Some('D') => 2,
        Some('E') => 4,
        Some('F') => 5,
        Some('G') => 7,
        Some('A') => 9,
        Some('B') => 11,
        _ => return Err(unknown()),
    };

    let rest = chars.as_str();
    let (accidental, octave) = if let Some(octave) = rest.strip_prefix('#') {
        (1, octave)
    } else if let Some(octave) = rest.strip_prefix('b') {
        (-1, octave)
    } else {
        (0, rest)
    };

    let octave: i32 = octave.parse().map_err(|_| unknown())?;
    if !(0..=8).contains(&octave) {
        return Err(unknown());
    }

    Ok(midi_to_frequency((octave + 1) * 12 + semitone + accidental))
}

/// Pitch of one step in a phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pitch {
    /// Explicit frequency in Hz (0 is a rest)
    Hz(f64),
    /// Note name such as `E5` or `rest`
    Name(String),
}

impl Pitch {
    pub fn rest() -> Self {
        Pitch::Hz(0.0)
    }

    /// Frequency in Hz
    pub fn frequency(&self) -> Result<f64> {
        match self {
            Pitch::Hz(hz) => {
                if !hz.is_finite() || *hz < 0.0 {
                    return Err(SynthError::InvalidFrequency(*hz));
                }
                Ok(*hz)
            }
            Pitch::Name(name) => note_frequency(name),
        }
    }
}

impl From<f64> for Pitch {
    fn from(hz: f64) -> Self {
        Pitch::Hz(hz)
    }
}

impl From<&str> for Pitch {
    fn from(name: &str) -> Self {
        Pitch::Name(name.to_string())
    }
}

impl FromStr for Pitch {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        note_frequency(s)?;
        Ok(Pitch::Name(s.trim().to_string()))
    }
}

/// A pitch held for a duration in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    pub duration: f64,
}

impl Note {
    pub fn new(pitch: impl Into<Pitch>, duration: f64) -> Self {
        Self {
            pitch: pitch.into(),
            duration,
        }
    }

    pub fn rest(duration: f64) -> Self {
        Self::new(Pitch::rest(), duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_pitches() {
        assert_eq!(note_frequency("A4").unwrap(), 440.0);
        assert_eq!(note_frequency("C4").unwrap(), 261.63);
        assert_eq!(note_frequency("C3").unwrap(), 130.81);
        assert_eq!(note_frequency("F#3").unwrap(), 185.0);
        assert_eq!(note_frequency("A#4").unwrap(), 466.16);
        assert_eq!(note_frequency("G#5").unwrap(), 830.61);
        assert_eq!(note_frequency("C6").unwrap(), 1046.5);
    }

    #[test]
    fn test_flats_match_sharps() {
        assert_eq!(note_frequency("Bb3").unwrap(), note_frequency("A#3").unwrap());
        assert_eq!(note_frequency("Db5").unwrap(), note_frequency("C#5").unwrap());
    }

    #[test]
    fn test_low_octaves() {
        assert_eq!(note_frequency("A2").unwrap(), 110.0);
        assert_eq!(note_frequency("C2").unwrap(), 65.41);
    }

    #[test]
    fn test_rests() {
        for name in ["REST", "rest", "R", "-"] {
            assert_eq!(note_frequency(name).unwrap(), 0.0);
        }
        assert_eq!(Pitch::rest().frequency().unwrap(), 0.0);
    }

    #[test]
    fn test_unknown_notes() {
        for name in ["H4", "C", "C#", "C9", "E#x", ""] {
            assert!(
                matches!(note_frequency(name), Err(SynthError::UnknownNote(_))),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_pitch_frequency() {
        assert_eq!(Pitch::from(659.0).frequency().unwrap(), 659.0);
        assert_eq!(Pitch::from("E5").frequency().unwrap(), 659.26);
        assert!(Pitch::Hz(-3.0).frequency().is_err());
        assert!("Q1".parse::<Pitch>().is_err());
    }

    #[test]
    fn test_note_yaml() {
        let note: Note = serde_yaml::from_str("pitch: G4\nduration: 0.25").unwrap();
        assert_eq!(note, Note::new("G4", 0.25));
        let note: Note = serde_yaml::from_str("pitch: 784\nduration: 0.3").unwrap();
        assert_eq!(note.pitch.frequency().unwrap(), 784.0);
    }
}
