//! Chord table for the call-and-response pad
//!
//! Two sets of four split buttons. Each button has a call chord on its left
//! half and a response chord on its right half; the halves sound
//! independently under their own [`SoundId`].

use std::fmt;

use crate::engine::SoundId;

// Equal temperament, A4 = 440 Hz
const G3: f64 = 196.00;
const A3: f64 = 220.00;
const B3: f64 = 246.94;
const C4: f64 = 261.63;
const D4: f64 = 293.66;
const E4: f64 = 329.63;
const F_SHARP_4: f64 = 369.99;
const G4: f64 = 392.00;
const A4: f64 = 440.00;
const B4: f64 = 493.88;

/// Colour family a chord is drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    Yellow,
    Red,
    Orange,
    Blue,
    Teal,
}

/// A named set of frequencies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    pub name: &'static str,
    pub notes: &'static [f64],
    pub tint: Tint,
}

pub const CHORD_EM: Chord = Chord {
    name: "Em",
    notes: &[E4, G4, B4],
    tint: Tint::Yellow,
};

pub const CHORD_C: Chord = Chord {
    name: "C",
    notes: &[C4, E4, G4],
    tint: Tint::Red,
};

pub const CHORD_D: Chord = Chord {
    name: "D",
    notes: &[D4, F_SHARP_4, A4],
    tint: Tint::Orange,
};

pub const CHORD_AM: Chord = Chord {
    name: "Am",
    notes: &[A3, C4, E4],
    tint: Tint::Blue,
};

pub const CHORD_G: Chord = Chord {
    name: "G",
    notes: &[G3, B3, D4],
    tint: Tint::Teal,
};

/// Which half of a split button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Side {
    /// Left half
    Call,
    /// Right half
    Response,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Call => f.write_str("call"),
            Side::Response => f.write_str("response"),
        }
    }
}

/// A button with a call chord and a response chord
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitButton {
    pub id: u32,
    pub call: Chord,
    pub response: Chord,
}

impl SplitButton {
    /// The chord on one half
    pub fn chord(&self, side: Side) -> &Chord {
        match side {
            Side::Call => &self.call,
            Side::Response => &self.response,
        }
    }

    /// Identity of one half, unique across every button in every set
    pub fn sound_id(&self, side: Side) -> SoundId {
        SoundId::new(format!("{}-{}", self.id, side))
    }
}

/// Buttons shown together
pub type ChordSet = [SplitButton; 4];

pub const SET_1: ChordSet = [
    SplitButton { id: 1, call: CHORD_EM, response: CHORD_C },
    SplitButton { id: 2, call: CHORD_EM, response: CHORD_C },
    SplitButton { id: 3, call: CHORD_D, response: CHORD_AM },
    SplitButton { id: 4, call: CHORD_D, response: CHORD_EM },
];

pub const SET_2: ChordSet = [
    SplitButton { id: 5, call: CHORD_G, response: CHORD_C },
    SplitButton { id: 6, call: CHORD_G, response: CHORD_C },
    SplitButton { id: 7, call: CHORD_D, response: CHORD_AM },
    SplitButton { id: 8, call: CHORD_D, response: CHORD_EM },
];

pub static CHORD_SETS: [ChordSet; 2] = [SET_1, SET_2];

/// Find a button by id in any set
pub fn find_button(id: u32) -> Option<&'static SplitButton> {
    CHORD_SETS.iter().flatten().find(|b| b.id == id)
}

/// Number key bound to a slot's half: slot 0 is `1`/`2`, slot 1 is `3`/`4`, ...
pub fn key_for(slot: usize, side: Side) -> char {
    let n = slot * 2
        + match side {
            Side::Call => 1,
            Side::Response => 2,
        };
    char::from_digit(n as u32, 10).unwrap_or('?')
}

/// Inverse of [`key_for`]
pub fn slot_for_key(key: char) -> Option<(usize, Side)> {
    let n = key.to_digit(10)? as usize;
    if !(1..=8).contains(&n) {
        return None;
    }
    let side = if n % 2 == 1 { Side::Call } else { Side::Response };
    Some(((n - 1) / 2, side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sound_ids_are_unique() {
        let ids: HashSet<SoundId> = CHORD_SETS
            .iter()
            .flatten()
            .flat_map(|b| [b.sound_id(Side::Call), b.sound_id(Side::Response)])
            .collect();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn test_sound_id_format() {
        assert_eq!(SET_1[0].sound_id(Side::Call).as_str(), "1-call");
        assert_eq!(SET_2[3].sound_id(Side::Response).as_str(), "8-response");
    }

    #[test]
    fn test_chord_notes_are_valid() {
        for chord in [CHORD_EM, CHORD_C, CHORD_D, CHORD_AM, CHORD_G] {
            assert_eq!(chord.notes.len(), 3);
            assert!(chord.notes.iter().all(|&f| (150.0..500.0).contains(&f)));
        }
    }

    #[test]
    fn test_key_bindings_round_trip() {
        assert_eq!(key_for(0, Side::Call), '1');
        assert_eq!(key_for(3, Side::Response), '8');
        assert_eq!(slot_for_key('4'), Some((1, Side::Response)));
        assert_eq!(slot_for_key('5'), Some((2, Side::Call)));
        assert_eq!(slot_for_key('9'), None);
        assert_eq!(slot_for_key('0'), None);
        assert_eq!(slot_for_key('x'), None);
    }

    #[test]
    fn test_find_button() {
        assert_eq!(find_button(7).map(|b| b.call.name), Some("D"));
        assert!(find_button(9).is_none());
    }

    #[test]
    fn test_button_chord_by_side() {
        let button = &SET_2[0];
        assert_eq!(button.chord(Side::Call).name, "G");
        assert_eq!(button.chord(Side::Response).name, "C");
    }
}
