//! Looping background themes
//!
//! Durations are in beats; the tempo comes from the render config.

use super::{phrase, Channel, Composition, CompositionKind, Source, TimeUnit};
use crate::synth::{Instrument, Pitch, Waveform};

const EIGHTH: f64 = 0.5;
const QUARTER: f64 = 1.0;
const HALF: f64 = 2.0;
const WHOLE: f64 = 4.0;

pub(super) fn all() -> Vec<Composition> {
    vec![main_theme(), menu_theme(), game_over_theme()]
}

fn theme(id: &str, description: &str, channels: Vec<Channel>) -> Composition {
    Composition {
        id: id.to_string(),
        kind: CompositionKind::Theme,
        description: description.to_string(),
        unit: TimeUnit::Beats,
        channels,
    }
}

/// Lead: square with a half-depth low level
fn lead(volume: f64) -> Instrument {
    Instrument::new(Waveform::square(0.5), volume)
}

fn bass(volume: f64) -> Instrument {
    Instrument::new(Waveform::Pulse, volume)
}

fn soft(volume: f64) -> Instrument {
    Instrument::new(Waveform::Triangle, volume)
}

fn main_theme() -> Composition {
    const E: f64 = EIGHTH;
    const Q: f64 = QUARTER;
    const H: f64 = HALF;

    #[rustfmt::skip]
    let melody = phrase(
        lead(0.6),
        &[
            ("E5", E), ("E5", E), ("E5", E), ("C5", E),
            ("E5", Q), ("G5", Q), ("REST", Q), ("G4", Q),
            ("C5", E), ("REST", E), ("G4", E), ("REST", E),
            ("E4", E), ("REST", E), ("A4", E), ("B4", E),
            ("A#4", E), ("A4", E),
            ("G4", E), ("E5", E), ("G5", E), ("A5", Q),
            ("F5", E), ("G5", E), ("REST", E), ("E5", E),
            ("C5", E), ("D5", E), ("B4", Q),
        ],
    );

    #[rustfmt::skip]
    let bass_line = phrase(
        bass(0.4),
        &[
            ("C3", Q), ("C3", Q), ("C3", Q), ("C3", Q),
            ("G3", Q), ("G3", Q), ("G3", Q), ("G3", Q),
            ("A3", Q), ("A3", Q), ("F3", Q), ("F3", Q),
            ("G3", Q), ("G3", Q), ("C3", Q), ("C3", Q),
        ],
    );

    #[rustfmt::skip]
    let harmony = phrase(
        soft(0.3),
        &[
            ("G4", H), ("E4", H),
            ("C5", H), ("G4", H),
            ("F4", H), ("D4", H),
            ("E4", H), ("C4", H),
        ],
    );

    theme(
        "background-theme",
        "Upbeat in-game loop: lead, bass, harmony and kick",
        vec![
            Channel::new("melody", melody).repeat(4),
            Channel::new("bass", bass_line).repeat(4),
            Channel::new("harmony", harmony).repeat(4),
            Channel::new(
                "percussion",
                Source::Kick {
                    amplitude: 0.3,
                    length: 0.05,
                    every: QUARTER,
                },
            ),
        ],
    )
}

fn menu_theme() -> Composition {
    const Q: f64 = QUARTER;
    const H: f64 = HALF;

    #[rustfmt::skip]
    let melody = phrase(
        soft(0.5),
        &[
            ("C5", Q), ("E5", Q), ("G5", Q), ("E5", Q),
            ("F5", Q), ("D5", Q), ("G5", H),
            ("C5", Q), ("E5", Q), ("G5", Q), ("C6", Q),
            ("B5", Q), ("A5", Q), ("G5", H),
            ("A5", Q), ("G5", Q), ("F5", Q), ("E5", Q),
            ("D5", Q), ("E5", Q), ("C5", H),
            ("E5", Q), ("D5", Q), ("C5", Q), ("D5", Q),
            ("E5", Q), ("G5", Q), ("C5", H),
        ],
    );

    #[rustfmt::skip]
    let bass_line = phrase(
        bass(0.35),
        &[
            ("C3", H), ("C3", H),
            ("F3", H), ("G3", H),
            ("C3", H), ("C3", H),
            ("G3", H), ("C3", H),
        ],
    );

    let arpeggio = Source::Arpeggio {
        instrument: lead(0.2),
        notes: ["C4", "E4", "G4", "C5"].into_iter().map(Pitch::from).collect(),
        duration: QUARTER,
    };

    theme(
        "menu-theme",
        "Relaxed menu loop: melody, bass and a running arpeggio",
        vec![
            Channel::new("melody", melody).repeat(3),
            Channel::new("bass", bass_line).repeat(3),
            // one arpeggio per beat across the 96-beat melody
            Channel::new("arpeggio", arpeggio).repeat(96),
        ],
    )
}

fn game_over_theme() -> Composition {
    const Q: f64 = QUARTER;
    const H: f64 = HALF;
    const W: f64 = WHOLE;

    #[rustfmt::skip]
    let melody = phrase(
        soft(0.6),
        &[
            ("C5", Q), ("B4", Q), ("A#4", Q), ("A4", Q),
            ("G#4", Q), ("G4", Q), ("F#4", Q), ("F4", Q),
            ("E4", H), ("D4", H),
            ("C4", H), ("REST", H),
            ("A4", Q), ("G4", Q), ("F4", Q), ("E4", Q),
            ("D4", Q), ("C4", Q), ("B3", H),
            ("C4", W),
            ("REST", Q),
        ],
    );

    #[rustfmt::skip]
    let bass_line = phrase(
        bass(0.4),
        &[
            ("C3", W), ("F3", W),
            ("G3", W), ("C3", W),
            ("A2", W), ("D3", W),
            ("G2", W), ("C2", W),
        ],
    );

    #[rustfmt::skip]
    let pad = phrase(
        soft(0.25),
        &[("E4", W), ("F4", W), ("D4", W), ("C4", W)],
    );

    theme(
        "game-over-theme",
        "Slow descending lament",
        vec![
            Channel::new("melody", melody).repeat(2),
            Channel::new("bass", bass_line).repeat(2),
            Channel::new("pad", pad).repeat(2),
        ],
    )
}
