//! Synthesizes the recovered keystroke onto a `uinput` virtual keyboard, so
//! the protected host sees ordinary keyboard input with no trace of the
//! scrambled wire.

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};

use keyveil_protocol::device::{VirtualKeyboardWriter, MOD_CTRL, MOD_SHIFT};
use keyveil_protocol::keycodes::{KEY_LEFTCTRL, KEY_LEFTSHIFT};
use keyveil_protocol::{Error, Result};

pub struct Vkbd {
    device: VirtualDevice,
}

impl Vkbd {
    /// Registers every standard keyboard keycode up front: the exact set of
    /// keys this virtual device will ever be asked to press is data-driven
    /// (the pool tables plus pass-through keys), but `uinput` wants the full
    /// capability set declared at creation time.
    pub fn create() -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for code in 1u16..248 {
            keys.insert(Key::new(code));
        }
        let device = VirtualDeviceBuilder::new()
            .map_err(|e| Error::device(format!("open uinput: {e}")))?
            .name("keyveil virtual keyboard")
            .with_keys(&keys)
            .map_err(|e| Error::device(format!("declare uinput key set: {e}")))?
            .build()
            .map_err(|e| Error::device(format!("build uinput device: {e}")))?;
        Ok(Self { device })
    }

    fn press_release(&mut self, code: u16) -> Result<()> {
        let down = InputEvent::new(EventType::KEY, code, 1);
        let up = InputEvent::new(EventType::KEY, code, 0);
        self.device
            .emit(&[down])
            .map_err(|e| Error::device(format!("emit key down: {e}")))?;
        self.device
            .emit(&[up])
            .map_err(|e| Error::device(format!("emit key up: {e}")))
    }
}

impl VirtualKeyboardWriter for Vkbd {
    fn write_event(&mut self, evdev_keycode: u16, modifier: u8) -> Result<()> {
        if modifier & MOD_SHIFT != 0 {
            self.device
                .emit(&[InputEvent::new(EventType::KEY, KEY_LEFTSHIFT, 1)])
                .map_err(|e| Error::device(format!("emit shift down: {e}")))?;
        }
        if modifier & MOD_CTRL != 0 {
            self.device
                .emit(&[InputEvent::new(EventType::KEY, KEY_LEFTCTRL, 1)])
                .map_err(|e| Error::device(format!("emit ctrl down: {e}")))?;
        }

        self.press_release(evdev_keycode)?;

        if modifier & MOD_CTRL != 0 {
            self.device
                .emit(&[InputEvent::new(EventType::KEY, KEY_LEFTCTRL, 0)])
                .map_err(|e| Error::device(format!("emit ctrl up: {e}")))?;
        }
        if modifier & MOD_SHIFT != 0 {
            self.device
                .emit(&[InputEvent::new(EventType::KEY, KEY_LEFTSHIFT, 0)])
                .map_err(|e| Error::device(format!("emit shift up: {e}")))?;
        }
        Ok(())
    }
}
