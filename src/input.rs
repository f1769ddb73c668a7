//! Keyboard state
//!
//! Collects winit key events into the per-tick input snapshot. One-shot
//! keys latch on press and are cleared after the simulation has consumed
//! them; the slide key is tracked as held. Keys with no binding are
//! ignored.

use winit::keyboard::KeyCode;

use crate::sim::TickInput;

#[derive(Debug, Default)]
pub struct InputState {
    pub jump: bool,
    pub slide_held: bool,
    pub shoot: bool,
    pub restart: bool,
    pub pause: bool,
    pub toggle_sound: bool,
    pub cycle_background: bool,
    pub quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key_press(&mut self, keycode: KeyCode) {
        match keycode {
            KeyCode::Space | KeyCode::ArrowUp | KeyCode::KeyW => self.jump = true,
            KeyCode::ArrowDown | KeyCode::KeyS => self.slide_held = true,
            KeyCode::KeyF | KeyCode::KeyX => self.shoot = true,
            KeyCode::KeyR => self.restart = true,
            KeyCode::KeyP | KeyCode::Escape => self.pause = true,
            KeyCode::KeyM => self.toggle_sound = true,
            KeyCode::KeyB => self.cycle_background = true,
            KeyCode::KeyQ => self.quit = true,
            _ => {}
        }
    }

    pub fn handle_key_release(&mut self, keycode: KeyCode) {
        if matches!(keycode, KeyCode::ArrowDown | KeyCode::KeyS) {
            self.slide_held = false;
        }
    }

    /// Snapshot for the next simulation tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            jump: self.jump,
            slide: self.slide_held,
            shoot: self.shoot,
            restart: self.restart,
            pause: self.pause,
        }
    }

    /// Clear the one-shot flags once a tick has consumed them
    pub fn reset_one_shot_inputs(&mut self) {
        self.jump = false;
        self.shoot = false;
        self.restart = false;
        self.pause = false;
    }

    /// One-shot app-level toggles, taken at most once per frame
    pub fn take_toggle_sound(&mut self) -> bool {
        std::mem::take(&mut self.toggle_sound)
    }

    pub fn take_cycle_background(&mut self) -> bool {
        std::mem::take(&mut self.cycle_background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shots_latch_until_reset() {
        let mut input = InputState::new();
        input.handle_key_press(KeyCode::Space);
        input.handle_key_press(KeyCode::KeyF);
        let snapshot = input.tick_input();
        assert!(snapshot.jump);
        assert!(snapshot.shoot);

        input.reset_one_shot_inputs();
        let snapshot = input.tick_input();
        assert!(!snapshot.jump);
        assert!(!snapshot.shoot);
    }

    #[test]
    fn test_slide_follows_key_state() {
        let mut input = InputState::new();
        input.handle_key_press(KeyCode::ArrowDown);
        assert!(input.tick_input().slide);
        input.reset_one_shot_inputs();
        assert!(input.tick_input().slide, "held key survives tick resets");
        input.handle_key_release(KeyCode::ArrowDown);
        assert!(!input.tick_input().slide);
    }

    #[test]
    fn test_unbound_keys_ignored() {
        let mut input = InputState::new();
        input.handle_key_press(KeyCode::KeyZ);
        let snapshot = input.tick_input();
        assert!(!snapshot.jump && !snapshot.shoot && !snapshot.restart && !snapshot.pause);
    }

    #[test]
    fn test_toggles_are_taken_once() {
        let mut input = InputState::new();
        input.handle_key_press(KeyCode::KeyM);
        assert!(input.take_toggle_sound());
        assert!(!input.take_toggle_sound());
    }
}
