//! Traits for the four external collaborators named in the interface
//! contracts: keyboard capture, the HID gadget writer, the HID input
//! reader, and the virtual keyboard writer. Production implementations
//! (backed by `evdev` and a Linux HID gadget / uinput device) live in the
//! `sender` and `endpoint` binaries; this crate only depends on the traits,
//! so the scrambler and unscrambler are fully testable without real
//! hardware.

use crate::errors::Result;
use crate::keystroke::RawKeyEvent;

/// Produces raw key events from the user's physical keyboard (on A).
pub trait KeyCapture {
    /// Block until the next raw key event is available.
    fn next_event(&mut self) -> Result<RawKeyEvent>;
}

/// Modifier byte layout shared by both wire directions: bit 0 = left ctrl,
/// bit 1 = left shift, bit 2 = left alt (unused by the core).
pub const MOD_CTRL: u8 = 0x01;
pub const MOD_SHIFT: u8 = 0x02;
pub const MOD_ALT: u8 = 0x04;

/// Accepts a `(modifier_byte, hid_usage_code)` pair and emits a full HID
/// report pair (press then release) on A's output side.
pub trait HidGadgetWriter {
    fn write_report(&mut self, modifier: u8, hid_usage: u8) -> Result<()>;
}

/// Presents as a standard keyboard device on B's input side. B must grab
/// this device so scrambled keystrokes never leak to the host OS directly.
pub trait HidInputReader {
    fn next_event(&mut self) -> Result<RawKeyEvent>;
}

/// Accepts `(evdev_keycode, modifier_byte)` and synthesizes the press and
/// release pair on B's virtual keyboard.
pub trait VirtualKeyboardWriter {
    fn write_event(&mut self, evdev_keycode: u16, modifier: u8) -> Result<()>;
}

/// In-memory stand-ins for the four device traits, shared by this crate's
/// own unit tests and by integration tests and the other workspace crates
/// that exercise the scrambler/unscrambler without real hardware.
pub mod mock {
    use super::*;
    use crate::keystroke::KeyState;
    use std::collections::VecDeque;

    /// A scripted [`KeyCapture`] / [`HidInputReader`] source for tests: feed
    /// it a sequence of events up front, then drive the scrambler or
    /// unscrambler against it.
    #[derive(Default)]
    pub struct ScriptedEvents {
        pub queue: VecDeque<RawKeyEvent>,
    }

    impl ScriptedEvents {
        pub fn new(events: Vec<RawKeyEvent>) -> Self {
            Self {
                queue: events.into(),
            }
        }

        pub fn push_down(&mut self, evdev_keycode: u16) {
            self.queue.push_back(RawKeyEvent {
                evdev_keycode,
                state: KeyState::Down,
            });
        }
    }

    impl KeyCapture for ScriptedEvents {
        fn next_event(&mut self) -> Result<RawKeyEvent> {
            self.queue
                .pop_front()
                .ok_or_else(|| crate::errors::Error::device("no more scripted events"))
        }
    }

    impl HidInputReader for ScriptedEvents {
        fn next_event(&mut self) -> Result<RawKeyEvent> {
            KeyCapture::next_event(self)
        }
    }

    /// Records every `(modifier, hid_usage)` report it's asked to emit.
    #[derive(Default)]
    pub struct RecordingHidWriter {
        pub reports: Vec<(u8, u8)>,
    }

    impl HidGadgetWriter for RecordingHidWriter {
        fn write_report(&mut self, modifier: u8, hid_usage: u8) -> Result<()> {
            self.reports.push((modifier, hid_usage));
            Ok(())
        }
    }

    /// Records every `(evdev_keycode, modifier)` event it's asked to emit.
    #[derive(Default)]
    pub struct RecordingVirtualKeyboard {
        pub events: Vec<(u16, u8)>,
    }

    impl VirtualKeyboardWriter for RecordingVirtualKeyboard {
        fn write_event(&mut self, evdev_keycode: u16, modifier: u8) -> Result<()> {
            self.events.push((evdev_keycode, modifier));
            Ok(())
        }
    }
}
