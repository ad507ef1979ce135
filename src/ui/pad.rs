//! Trigger state for the on-screen pad
//!
//! Turns key and pointer events into engine `start`/`stop` calls, and keeps
//! the highlight state the grid draws from. The highlight mirrors triggers;
//! it is never read back from the engine.

use std::collections::HashSet;

use crate::chords::{slot_for_key, ChordSet, Side, CHORD_SETS};
use crate::engine::VoiceEngine;

/// A button half in the current set
pub type Half = (usize, Side);

/// What a key event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press,
    Repeat,
    Release,
}

/// Highlight and pointer state for the pad
#[derive(Debug)]
pub struct TriggerPad {
    set_index: usize,
    held: HashSet<Half>,
    pointer: Option<Half>,
    latch: bool,
}

impl TriggerPad {
    /// Create a pad showing the first set
    ///
    /// With `latch` set, a key press toggles its sound instead of holding it;
    /// used when the terminal cannot report key releases.
    pub fn new(latch: bool) -> Self {
        Self {
            set_index: 0,
            held: HashSet::new(),
            pointer: None,
            latch,
        }
    }

    pub fn set_index(&self) -> usize {
        self.set_index
    }

    pub fn current_set(&self) -> &'static ChordSet {
        &CHORD_SETS[self.set_index]
    }

    pub fn is_latching(&self) -> bool {
        self.latch
    }

    pub fn is_held(&self, slot: usize, side: Side) -> bool {
        self.held.contains(&(slot, side))
    }

    /// Start one half sounding
    pub fn press(&mut self, engine: &mut VoiceEngine, slot: usize, side: Side) {
        let Some(button) = self.current_set().get(slot) else {
            return;
        };
        if !self.held.insert((slot, side)) {
            return;
        }
        engine.unlock_audio();
        engine.start(button.sound_id(side), button.chord(side).notes);
    }

    /// Stop one half
    pub fn release(&mut self, engine: &mut VoiceEngine, slot: usize, side: Side) {
        let Some(button) = self.current_set().get(slot) else {
            return;
        };
        if !self.held.remove(&(slot, side)) {
            return;
        }
        engine.stop(button.sound_id(side));
    }

    /// Handle a number key; returns false if the key is not bound
    pub fn key(&mut self, engine: &mut VoiceEngine, key: char, action: KeyAction) -> bool {
        let Some((slot, side)) = slot_for_key(key) else {
            return false;
        };

        match action {
            KeyAction::Repeat => {}
            KeyAction::Press if self.latch && self.is_held(slot, side) => {
                self.release(engine, slot, side);
            }
            KeyAction::Press => self.press(engine, slot, side),
            KeyAction::Release if !self.latch => self.release(engine, slot, side),
            KeyAction::Release => {}
        }
        true
    }

    /// Pointer pressed over `target` (None if outside every half)
    pub fn pointer_down(&mut self, engine: &mut VoiceEngine, target: Option<Half>) {
        if let Some((slot, side)) = target {
            self.pointer = Some((slot, side));
            self.press(engine, slot, side);
        }
    }

    /// Pointer dragged to `target`; leaving the pressed half stops it
    pub fn pointer_moved(&mut self, engine: &mut VoiceEngine, target: Option<Half>) {
        if let Some(pressed) = self.pointer {
            if target != Some(pressed) {
                self.pointer = None;
                self.release(engine, pressed.0, pressed.1);
            }
        }
    }

    /// Pointer lifted
    pub fn pointer_up(&mut self, engine: &mut VoiceEngine) {
        if let Some((slot, side)) = self.pointer.take() {
            self.release(engine, slot, side);
        }
    }

    /// Stop everything this pad started
    pub fn release_all(&mut self, engine: &mut VoiceEngine) {
        let held: Vec<Half> = self.held.iter().copied().collect();
        for (slot, side) in held {
            self.release(engine, slot, side);
        }
        self.pointer = None;
    }

    /// Show the other chord set
    ///
    /// Held sounds are released first: their buttons disappear with the set,
    /// so nothing would be left to release them.
    pub fn toggle_set(&mut self, engine: &mut VoiceEngine) {
        self.release_all(engine);
        self.set_index = (self.set_index + 1) % CHORD_SETS.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChordpadConfig;
    use crate::engine::{EngineState, OfflineOutput};

    fn engine() -> VoiceEngine {
        VoiceEngine::new(&ChordpadConfig::default(), Box::new(OfflineOutput::new()))
    }

    #[test]
    fn test_key_press_and_release() {
        let mut engine = engine();
        let mut pad = TriggerPad::new(false);

        assert!(pad.key(&mut engine, '1', KeyAction::Press));
        assert!(pad.is_held(0, Side::Call));
        assert!(engine.is_active("1-call"));
        assert_eq!(engine.state(), EngineState::Running);

        pad.key(&mut engine, '1', KeyAction::Release);
        assert!(!pad.is_held(0, Side::Call));
        assert!(!engine.is_active("1-call"));
    }

    #[test]
    fn test_key_repeat_ignored() {
        let mut engine = engine();
        let mut pad = TriggerPad::new(false);

        pad.key(&mut engine, '2', KeyAction::Press);
        pad.key(&mut engine, '2', KeyAction::Repeat);
        pad.key(&mut engine, '2', KeyAction::Repeat);

        assert_eq!(engine.active_count(), 1);
        assert_eq!(engine.graph().unwrap().lock().unwrap().voice_count(), 3);
    }

    #[test]
    fn test_unbound_key() {
        let mut engine = engine();
        let mut pad = TriggerPad::new(false);
        assert!(!pad.key(&mut engine, 'z', KeyAction::Press));
        assert_eq!(engine.state(), EngineState::Uninitialized);
    }

    #[test]
    fn test_latching_keys_toggle() {
        let mut engine = engine();
        let mut pad = TriggerPad::new(true);

        pad.key(&mut engine, '3', KeyAction::Press);
        pad.key(&mut engine, '3', KeyAction::Release);
        assert!(engine.is_active("2-call"));

        pad.key(&mut engine, '3', KeyAction::Press);
        assert!(!engine.is_active("2-call"));
    }

    #[test]
    fn test_pointer_drag_out_stops() {
        let mut engine = engine();
        let mut pad = TriggerPad::new(false);

        pad.pointer_down(&mut engine, Some((1, Side::Response)));
        assert!(engine.is_active("2-response"));

        pad.pointer_moved(&mut engine, Some((1, Side::Response)));
        assert!(engine.is_active("2-response"));

        pad.pointer_moved(&mut engine, None);
        assert!(!engine.is_active("2-response"));

        // Lifting after leaving is harmless
        pad.pointer_up(&mut engine);
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn test_pointer_and_key_share_one_sound() {
        let mut engine = engine();
        let mut pad = TriggerPad::new(false);

        pad.key(&mut engine, '1', KeyAction::Press);
        pad.pointer_down(&mut engine, Some((0, Side::Call)));
        assert_eq!(engine.graph().unwrap().lock().unwrap().voice_count(), 3);

        pad.pointer_up(&mut engine);
        assert!(!engine.is_active("1-call"));
    }

    #[test]
    fn test_toggle_set_releases_held() {
        let mut engine = engine();
        let mut pad = TriggerPad::new(false);

        pad.key(&mut engine, '1', KeyAction::Press);
        pad.key(&mut engine, '8', KeyAction::Press);
        pad.toggle_set(&mut engine);

        assert_eq!(pad.set_index(), 1);
        assert_eq!(engine.active_count(), 0);

        pad.key(&mut engine, '1', KeyAction::Press);
        assert!(engine.is_active("5-call"));
    }
}
