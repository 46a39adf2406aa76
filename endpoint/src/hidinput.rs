//! Reads the scrambled keystroke stream from the device node the HID
//! gadget's host-side driver exposes, exclusively grabbed so nothing leaks
//! to the protected host before it has been unscrambled.

use evdev::{Device, EventType, InputEventKind, Key};

use keyveil_protocol::device::HidInputReader;
use keyveil_protocol::keystroke::{KeyState, RawKeyEvent};
use keyveil_protocol::{Error, Result};

pub struct HidInput {
    device: Device,
}

impl HidInput {
    pub fn open(path: &str) -> Result<Self> {
        let mut device =
            Device::open(path).map_err(|e| Error::device(format!("open {path}: {e}")))?;
        device
            .grab()
            .map_err(|e| Error::device(format!("grab {path}: {e}")))?;
        Ok(Self { device })
    }
}

impl HidInputReader for HidInput {
    fn next_event(&mut self) -> Result<RawKeyEvent> {
        loop {
            let events = self
                .device
                .fetch_events()
                .map_err(|e| Error::device(format!("read hid input device: {e}")))?;
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
