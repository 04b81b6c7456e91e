//! Keyboard handling for the viewer.
//!
//! Raw winit key events are tracked per frame (a key counts as pressed
//! once, auto-repeat is ignored) and resolved through [`Bindings`] into
//! [`Command`]s the viewer acts on:
//!
//! | Key     | Command                 |
//! |---------|-------------------------|
//! | `D`     | toggle light/dark theme |
//! | `Space` | collapse/expand pulse   |
//! | `→`     | next demo entry         |
//! | `Esc`   | quit                    |

use std::collections::{HashMap, HashSet};
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Keys the viewer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    D,
    P,
    Space,
    Right,
    Escape,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyD => KeyCode::D,
            WinitKeyCode::KeyP => KeyCode::P,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::ArrowRight => KeyCode::Right,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// Something the viewer can be asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    ToggleTheme,
    Pulse,
    NextEntry,
    Quit,
}

/// Key to command table.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings {
    map: HashMap<KeyCode, Command>,
}

impl Bindings {
    /// No bindings at all.
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn with_binding(mut self, key: KeyCode, command: Command) -> Self {
        self.map.insert(key, command);
        self
    }

    pub fn command(&self, key: KeyCode) -> Option<Command> {
        self.map.get(&key).copied()
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::empty()
            .with_binding(KeyCode::D, Command::ToggleTheme)
            .with_binding(KeyCode::Space, Command::Pulse)
            .with_binding(KeyCode::Right, Command::NextEntry)
            .with_binding(KeyCode::Escape, Command::Quit)
    }
}

/// Per-frame keyboard state.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    /// In press order, so commands run in the order they were typed.
    keys_pressed: Vec<KeyCode>,
    bindings: Bindings,
}

impl Input {
    pub fn new(bindings: Bindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    /// Check if a key was pressed this frame (just went down).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key is currently held down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Commands triggered by this frame's key presses.
    pub fn commands(&self) -> Vec<Command> {
        self.keys_pressed
            .iter()
            .filter_map(|&key| self.bindings.command(key))
            .collect()
    }

    /// Clear per-frame state. Call after acting on [`commands`](Self::commands).
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    pub fn press(&mut self, key: KeyCode) {
        // Auto-repeat arrives as repeated presses while held
        if self.keys_held.insert(key) {
            self.keys_pressed.push(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    /// Process a winit window event. Non-keyboard events are ignored.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if let PhysicalKey::Code(keycode) = event.physical_key {
                let key = KeyCode::from(keycode);
                match event.state {
                    ElementState::Pressed => self.press(key),
                    ElementState::Released => self.release(key),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state() {
        let mut input = Input::new(Bindings::default());

        assert!(!input.key_held(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));

        input.press(KeyCode::Space);
        assert!(input.key_held(KeyCode::Space));
        assert!(input.key_pressed(KeyCode::Space));

        // After begin_frame, pressed is cleared but held remains
        input.begin_frame();
        assert!(input.key_held(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_repeat_fires_once() {
        let mut input = Input::new(Bindings::default());
        input.press(KeyCode::D);
        input.press(KeyCode::D);
        assert_eq!(input.commands(), vec![Command::ToggleTheme]);

        input.begin_frame();
        input.press(KeyCode::D);
        assert!(input.commands().is_empty());

        input.release(KeyCode::D);
        input.press(KeyCode::D);
        assert_eq!(input.commands(), vec![Command::ToggleTheme]);
    }

    #[test]
    fn test_commands_follow_press_order() {
        let mut input = Input::new(Bindings::default());
        input.press(KeyCode::Right);
        input.press(KeyCode::Other);
        input.press(KeyCode::Space);
        input.press(KeyCode::Escape);
        assert_eq!(
            input.commands(),
            vec![Command::NextEntry, Command::Pulse, Command::Quit]
        );
    }

    #[test]
    fn test_custom_bindings() {
        let bindings = Bindings::empty().with_binding(KeyCode::P, Command::Pulse);
        let mut input = Input::new(bindings);
        input.press(KeyCode::Space);
        input.press(KeyCode::P);
        assert_eq!(input.commands(), vec![Command::Pulse]);
        assert_eq!(KeyCode::from(WinitKeyCode::ArrowRight), KeyCode::Right);
        assert_eq!(KeyCode::from(WinitKeyCode::KeyQ), KeyCode::Other);
    }
}
