//! Keyboard layout.
//!
//! The letter rows are a two-octave piano: z..m plays the current octave
//! with s/d/g/h/j as the black keys, q..i plays one octave up with
//! 2/3/5/6/7 above it. F1-F8 strike the drum pads, since the digit row
//! belongs to the upper piano octave.

use crossterm::event::KeyCode;
use tonedeck::catalog::notes::PitchClass;

/// Map a key to a pitch and an octave offset from the current octave.
pub fn note_for(code: KeyCode) -> Option<(PitchClass, i32)> {
    use PitchClass::*;
    let (pitch, offset) = match code {
        // lower row
        KeyCode::Char('z') => (C, 0),
        KeyCode::Char('s') => (Cs, 0),
        KeyCode::Char('x') => (D, 0),
        KeyCode::Char('d') => (Ds, 0),
        KeyCode::Char('c') => (E, 0),
        KeyCode::Char('v') => (F, 0),
        KeyCode::Char('g') => (Fs, 0),
        KeyCode::Char('b') => (G, 0),
        KeyCode::Char('h') => (Gs, 0),
        KeyCode::Char('n') => (A, 0),
        KeyCode::Char('j') => (As, 0),
        KeyCode::Char('m') => (B, 0),
        // upper row
        KeyCode::Char('q') => (C, 1),
        KeyCode::Char('2') => (Cs, 1),
        KeyCode::Char('w') => (D, 1),
        KeyCode::Char('3') => (Ds, 1),
        KeyCode::Char('e') => (E, 1),
        KeyCode::Char('r') => (F, 1),
        KeyCode::Char('5') => (Fs, 1),
        KeyCode::Char('t') => (G, 1),
        KeyCode::Char('6') => (Gs, 1),
        KeyCode::Char('y') => (A, 1),
        KeyCode::Char('7') => (As, 1),
        KeyCode::Char('u') => (B, 1),
        KeyCode::Char('i') => (C, 2),
        _ => return None,
    };
    Some((pitch, offset))
}

/// Map a function key to a pad index within the current kit.
pub fn pad_for(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::F(n @ 1..=8) => Some(n as usize - 1),
        _ => None,
    }
}
