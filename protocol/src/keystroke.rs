//! The internal keystroke representation shared by the scrambler and
//! unscrambler, and the modifier state machine that produces it.

/// A single key transition reported by a capture device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
    Hold,
}

/// One raw event from a keyboard-capture or HID-input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub evdev_keycode: u16,
    pub state: KeyState,
}

/// Tracks `{shift_down, ctrl_down, caps_on}` from a stream of raw key events.
/// Shift and ctrl are edge-tracked (true only while physically held); caps
/// toggles once per caps-lock key-down. This state lives only on the
/// scrambler side (A); the endpoint has no caps tracking of its own, since A
/// always resolves caps into character case before transmission.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierState {
    shift_down: bool,
    ctrl_down: bool,
    caps_on: bool,
}

impl ModifierState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shift(&self) -> bool {
        self.shift_down
    }

    pub fn ctrl(&self) -> bool {
        self.ctrl_down
    }

    pub fn caps(&self) -> bool {
        self.caps_on
    }

    /// Feed a raw event into the modifier tracker. Returns `true` if the
    /// event was a modifier key (and therefore fully consumed here, never
    /// forwarded to the scrambler).
    pub fn observe(&mut self, evdev_keycode: u16, state: KeyState) -> bool {
        use crate::keycodes::{KEY_CAPSLOCK, KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_RIGHTCTRL, KEY_RIGHTSHIFT};

        match evdev_keycode {
            KEY_LEFTSHIFT | KEY_RIGHTSHIFT => {
                self.shift_down = matches!(state, KeyState::Down | KeyState::Hold);
                true
            }
            KEY_LEFTCTRL | KEY_RIGHTCTRL => {
                self.ctrl_down = matches!(state, KeyState::Down | KeyState::Hold);
                true
            }
            KEY_CAPSLOCK => {
                if state == KeyState::Down {
                    self.caps_on = !self.caps_on;
                }
                true
            }
            _ => false,
        }
    }
}
