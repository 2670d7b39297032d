//! One-shot sound effects
//!
//! Durations are in seconds and pitches are raw frequencies.

use super::{tones, Channel, Composition, CompositionKind, Source, TimeUnit};
use crate::synth::{Envelope, Instrument, Waveform};

pub(super) fn all() -> Vec<Composition> {
    vec![
        chomp(),
        eat_power_pellet(),
        eat_ghost(),
        eat_fruit(),
        death(),
        extra_life(),
        game_start(),
        level_complete(),
        game_over(),
        menu_select(),
        menu_navigate(),
        ghost_return(),
    ]
}

fn effect(id: &str, description: &str, source: Source) -> Composition {
    Composition {
        id: id.to_string(),
        kind: CompositionKind::Effect,
        description: description.to_string(),
        unit: TimeUnit::Seconds,
        channels: vec![Channel::new("main", source)],
    }
}

fn voice(waveform: Waveform, envelope: Envelope) -> Instrument {
    Instrument::new(waveform, 1.0).with_envelope(envelope)
}

fn sweep(from: f64, to: f64, duration: f64, envelope: Envelope) -> Source {
    Source::Sweep {
        from,
        to,
        duration,
        envelope,
        volume: 1.0,
    }
}

fn chomp() -> Composition {
    let half = 0.08 / 2.0;
    let high = voice(Waveform::SQUARE, Envelope::new(0.001, 0.01, 0.6, 0.02));
    let low = voice(Waveform::SQUARE, Envelope::new(0.001, 0.01, 0.5, 0.02));
    effect(
        "chomp",
        "Short two-tone waka for eating a dot",
        Source::Sequence {
            parts: vec![tones(high, &[(800.0, half)]), tones(low, &[(400.0, half)])],
        },
    )
}

fn eat_power_pellet() -> Composition {
    let step = 0.3 / 4.0;
    let square = voice(Waveform::SQUARE, Envelope::new(0.005, 0.02, 0.7, 0.03));
    effect(
        "eat-power-pellet",
        "Rising four-step square run",
        tones(square, &[(400.0, step), (500.0, step), (600.0, step), (800.0, step)]),
    )
}

fn eat_ghost() -> Composition {
    effect(
        "eat-ghost",
        "Quick upward sweep",
        sweep(200.0, 800.0, 0.4, Envelope::new(0.01, 0.05, 0.8, 0.1)),
    )
}

fn eat_fruit() -> Composition {
    let sine = voice(Waveform::Sine, Envelope::new(0.005, 0.02, 0.7, 0.03));
    effect(
        "eat-fruit",
        "Bright four-note arpeggio",
        tones(sine, &[(659.0, 0.1), (784.0, 0.1), (988.0, 0.15), (1319.0, 0.15)]),
    )
}

fn death() -> Composition {
    effect(
        "death",
        "Long falling sweep",
        sweep(800.0, 100.0, 1.0, Envelope::new(0.01, 0.1, 0.6, 0.4)),
    )
}

fn extra_life() -> Composition {
    let sine = voice(Waveform::Sine, Envelope::new(0.01, 0.03, 0.7, 0.05));
    effect(
        "extra-life",
        "Ascending major arpeggio",
        tones(
            sine,
            &[(523.0, 0.15), (659.0, 0.15), (784.0, 0.15), (1047.0, 0.2), (1047.0, 0.15)],
        ),
    )
}

fn game_start() -> Composition {
    let sine = voice(Waveform::Sine, Envelope::new(0.01, 0.03, 0.7, 0.05));
    effect(
        "game-start",
        "Level intro fanfare",
        tones(
            sine,
            &[
                (392.0, 0.15),
                (523.0, 0.15),
                (659.0, 0.15),
                (784.0, 0.2),
                (659.0, 0.15),
                (784.0, 0.3),
                (0.0, 0.2),
                (659.0, 0.2),
                (784.0, 0.4),
            ],
        ),
    )
}

fn level_complete() -> Composition {
    let triangle = voice(Waveform::Triangle, Envelope::new(0.01, 0.02, 0.8, 0.04));
    effect(
        "level-complete",
        "Victory phrase",
        tones(
            triangle,
            &[
                (659.0, 0.1),
                (659.0, 0.1),
                (659.0, 0.2),
                (523.0, 0.1),
                (659.0, 0.1),
                (784.0, 0.3),
                (392.0, 0.3),
            ],
        ),
    )
}

fn game_over() -> Composition {
    let sine = voice(Waveform::Sine, Envelope::new(0.02, 0.05, 0.6, 0.1));
    effect(
        "game-over",
        "Falling six-note phrase",
        tones(
            sine,
            &[
                (523.0, 0.3),
                (494.0, 0.3),
                (440.0, 0.3),
                (392.0, 0.3),
                (349.0, 0.4),
                (330.0, 0.4),
            ],
        ),
    )
}

fn menu_select() -> Composition {
    let square = voice(Waveform::SQUARE, Envelope::new(0.005, 0.02, 0.5, 0.03));
    effect("menu-select", "Confirm blip", tones(square, &[(800.0, 0.1)]))
}

fn menu_navigate() -> Composition {
    let sine = voice(Waveform::Sine, Envelope::new(0.005, 0.015, 0.4, 0.02));
    effect("menu-navigate", "Soft cursor blip", tones(sine, &[(600.0, 0.08)]))
}

fn ghost_return() -> Composition {
    effect(
        "ghost-return",
        "Short upward sweep",
        sweep(300.0, 600.0, 0.3, Envelope::new(0.01, 0.05, 0.5, 0.08)),
    )
}
