//! Phrase compiler
//!
//! Turns note sequences into track buffers: one render per note, shaped by
//! the instrument's envelope, scaled by its volume and laid end to end.

use super::buffer::SampleBuffer;
use super::envelope::Envelope;
use super::note::Note;
use super::oscillator::{self, Waveform};
use crate::error::{Result, SynthError};
use serde::{Deserialize, Serialize};

/// How a channel sounds: waveform, amplitude shape and level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub waveform: Waveform,
    #[serde(default)]
    pub envelope: Envelope,
    /// Linear gain 0.0-1.0
    pub volume: f64,
}

impl Instrument {
    /// Instrument with the default note envelope
    pub fn new(waveform: Waveform, volume: f64) -> Self {
        Self {
            waveform,
            envelope: Envelope::note(),
            volume,
        }
    }

    pub fn with_envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(SynthError::InvalidVolume(self.volume));
        }
        self.waveform.validate()?;
        self.envelope.validate()
    }

    /// Render one note: oscillator, then envelope, then volume
    ///
    /// Rests come back as plain silence and are never enveloped.
    pub fn play(&self, note: &Note, sample_rate: u32) -> Result<SampleBuffer> {
        let frequency = note.pitch.frequency()?;
        let mut buffer = oscillator::render(self.waveform, frequency, note.duration, sample_rate)?;
        if frequency > 0.0 {
            buffer = self.envelope.apply(buffer)?;
            buffer.scale(self.volume);
        }
        Ok(buffer)
    }
}

/// Compile `notes` into one buffer, repeated `repeat_count` times
///
/// Repetition is plain buffer replication, so the result is exactly
/// `repeat_count` copies of the single pass.
pub fn compile_phrase(
    notes: &[Note],
    instrument: &Instrument,
    repeat_count: usize,
    sample_rate: u32,
) -> Result<SampleBuffer> {
    if repeat_count == 0 {
        return Err(SynthError::InvalidRepeat);
    }
    instrument.validate()?;

    let mut pass = SampleBuffer::new(sample_rate);
    for note in notes {
        pass.append(&instrument.play(note, sample_rate)?);
    }

    if repeat_count == 1 {
        Ok(pass)
    } else {
        Ok(pass.tiled(repeat_count))
    }
}

/// Split `duration` evenly across `notes`, played back to back
pub fn arpeggio_notes<P>(notes: &[P], duration: f64) -> Result<Vec<Note>>
where
    P: Clone + Into<super::note::Pitch>,
{
    if notes.is_empty() {
        return Err(SynthError::EmptyArpeggio);
    }
    let step = duration / notes.len() as f64;
    Ok(notes.iter().cloned().map(|p| Note::new(p, step)).collect())
}

/// Compile a fast arpeggio lasting `duration` seconds in total
pub fn compile_arpeggio<P>(
    notes: &[P],
    duration: f64,
    instrument: &Instrument,
    sample_rate: u32,
) -> Result<SampleBuffer>
where
    P: Clone + Into<super::note::Pitch>,
{
    let steps = arpeggio_notes(notes, duration)?;
    compile_phrase(&steps, instrument, 1, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: u32 = 44100;

    #[test]
    fn test_single_square_note() {
        let lead = Instrument::new(Waveform::square(0.5), 0.6);
        let buf = compile_phrase(&[Note::new(440.0, 0.1)], &lead, 1, RATE).unwrap();
        assert_eq!(buf.len(), 4410);
        assert!((buf.peak() - 0.6).abs() < 0.006, "peak {}", buf.peak());
    }

    #[test]
    fn test_concatenates_notes() {
        let lead = Instrument::new(Waveform::Triangle, 0.5);
        let notes = [Note::new("C5", 0.1), Note::rest(0.05), Note::new("E5", 0.2)];
        let buf = compile_phrase(&notes, &lead, 1, RATE).unwrap();
        assert_eq!(buf.len(), 4410 + 2205 + 8820);
        // The rest sits between the two notes untouched
        assert!(buf.samples()[4410..6615].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_tiling_law() {
        let bass = Instrument::new(Waveform::Pulse, 0.4);
        let notes = [Note::new("C3", 0.1), Note::new("G3", 0.1)];
        let once = compile_phrase(&notes, &bass, 1, RATE).unwrap();
        let thrice = compile_phrase(&notes, &bass, 3, RATE).unwrap();
        assert_eq!(thrice.len(), once.len() * 3);
        for chunk in thrice.samples().chunks(once.len()) {
            assert_eq!(chunk, once.samples());
        }
    }

    #[test]
    fn test_all_rests_are_silent() {
        let lead = Instrument::new(Waveform::Sine, 1.0);
        let notes = [Note::rest(0.1), Note::new("REST", 0.1)];
        let buf = compile_phrase(&notes, &lead, 2, RATE).unwrap();
        assert_eq!(buf.len(), 17640);
        assert!(buf.is_silent());
    }

    #[test]
    fn test_arpeggio_divides_duration() {
        let arp = Instrument::new(Waveform::square(0.5), 0.2);
        let notes = ["C4", "E4", "G4", "C5"];
        let steps = arpeggio_notes(&notes, 0.4).unwrap();
        assert!(steps.iter().all(|n| (n.duration - 0.1).abs() < 1e-12));

        let buf = compile_arpeggio(&notes, 0.4, &arp, RATE).unwrap();
        let direct = compile_phrase(&steps, &arp, 1, RATE).unwrap();
        assert_eq!(buf, direct);
        assert_eq!(buf.len(), 4 * 4410);
    }

    #[test]
    fn test_invalid_inputs() {
        let lead = Instrument::new(Waveform::Sine, 0.5);
        let notes = [Note::new("A4", 0.1)];
        assert!(matches!(
            compile_phrase(&notes, &lead, 0, RATE),
            Err(SynthError::InvalidRepeat)
        ));
        assert!(matches!(
            compile_phrase(&notes, &Instrument::new(Waveform::Sine, 1.2), 1, RATE),
            Err(SynthError::InvalidVolume(_))
        ));
        assert!(matches!(
            compile_phrase(&[Note::new("X9", 0.1)], &lead, 1, RATE),
            Err(SynthError::UnknownNote(_))
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(
            compile_arpeggio(&empty, 0.4, &lead, RATE),
            Err(SynthError::EmptyArpeggio)
        ));
    }
}
