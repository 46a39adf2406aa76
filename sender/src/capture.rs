//! Reads raw key events from the user's physical keyboard via `evdev`.

use evdev::{Device, EventType, InputEventKind, Key};

use keyveil_protocol::device::KeyCapture;
use keyveil_protocol::keystroke::{KeyState, RawKeyEvent};
use keyveil_protocol::{Error, Result};

/// Blocks on the next event from a `/dev/input/eventN` node, translating
/// evdev key values (0 = up, 1 = down, 2 = repeat) into [`KeyState`].
pub struct EvdevCapture {
    device: Device,
}

impl EvdevCapture {
    /// Opens and exclusively grabs the keyboard device at `path`. Grabbing
    /// keeps raw keystrokes from also reaching the host this process runs
    /// on directly; only the scrambled HID report leaves via the gadget.
    pub fn open(path: &str) -> Result<Self> {
        let mut device =
            Device::open(path).map_err(|e| Error::device(format!("open {path}: {e}")))?;
        device
            .grab()
            .map_err(|e| Error::device(format!("grab {path}: {e}")))?;
        Ok(Self { device })
    }
}

impl KeyCapture for EvdevCapture {
    fn next_event(&mut self) -> Result<RawKeyEvent> {
        loop {
            let events = self
                .device
                .fetch_events()
                .map_err(|e| Error::device(format!("read keyboard device: {e}")))?;
            for event in events {
                if event.event_type() != EventType::KEY {
                    continue;
                }
                let InputEventKind::Key(Key(code)) = event.kind() else {
                    continue;
                };
                let state = match event.value() {
                    0 => KeyState::Up,
                    1 => KeyState::Down,
                    _ => KeyState::Hold,
                };
                return Ok(RawKeyEvent {
                    evdev_keycode: code,
                    state,
                });
            }
        }
    }
}
