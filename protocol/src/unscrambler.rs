//! The endpoint-side (B) per-keystroke pipeline: the mirror image of the
//! scrambler, reading from the grabbed HID input device and writing to the
//! virtual keyboard.

use keyveil_crypto::alphabet::{letter_index, symbol_index};
use keyveil_crypto::kdf::derive_seed;
use keyveil_crypto::keymap::PermutationCache;

use crate::clock::RotationClock;
use crate::device::{VirtualKeyboardWriter, MOD_CTRL, MOD_SHIFT};
use crate::errors::{Error, Result};
use crate::keycodes::{encode_char, passthrough_hid, pool_key_by_evdev, resolve_logical, Logical};
use crate::keystroke::{KeyState, ModifierState, RawKeyEvent};

pub struct Unscrambler<W: VirtualKeyboardWriter> {
    root_key: [u8; 32],
    clock: RotationClock,
    cache: PermutationCache,
    modifiers: ModifierState,
    writer: W,
}

impl<W: VirtualKeyboardWriter> Unscrambler<W> {
    pub fn new(root_key: [u8; 32], clock: RotationClock, writer: W) -> Self {
        Self {
            root_key,
            clock,
            cache: PermutationCache::new(),
            modifiers: ModifierState::new(),
            writer,
        }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Process one event received from the grabbed HID input device.
    ///
    /// There is no caps-lock tracking on this side: A always resolves caps
    /// into character case before transmission, so `resolve_logical` is
    /// always called with `caps = false` here.
    pub fn handle_event(&mut self, raw: RawKeyEvent) -> Result<()> {
        if self.modifiers.observe(raw.evdev_keycode, raw.state) {
            return Ok(());
        }
        if raw.state == KeyState::Up {
            return Ok(());
        }

        let Some(key) = pool_key_by_evdev(raw.evdev_keycode) else {
            return self.emit_passthrough(raw.evdev_keycode);
        };
        let is_letter = letter_index(key.base).is_some();

        let logical = resolve_logical(key, is_letter, self.modifiers.shift(), false);
        let Some(logical) = logical else {
            return self.emit_passthrough(raw.evdev_keycode);
        };

        let counter = self.clock.endpoint_counter_now();
        let seed = derive_seed(&self.root_key, counter);
        let perm = self.cache.get_or_derive(counter, &seed);

        let (x, is_letter_out) = match logical {
            Logical::Letter { lower, upper } => {
                let idx = letter_index(lower)
                    .ok_or_else(|| Error::invariant("received letter outside letter pool"))?;
                let unscrambled = perm.unscramble_letter(idx);
                let x = if upper {
                    unscrambled.to_ascii_uppercase()
                } else {
                    unscrambled
                };
                (x, true)
            }
            Logical::Symbol { value } => {
                let idx = symbol_index(value)
                    .ok_or_else(|| Error::invariant("received symbol outside symbol pool"))?;
                (perm.unscramble_symbol(idx), false)
            }
        };

        let (out_key, shift_bit) = encode_char(x, is_letter_out)
            .ok_or_else(|| Error::invariant("unscrambled character has no encoding key"))?;

        let mut modifier = 0u8;
        if shift_bit {
            modifier |= MOD_SHIFT;
        }
        if self.modifiers.ctrl() {
            modifier |= MOD_CTRL;
        }
        self.writer.write_event(out_key.evdev, modifier)
    }

    fn emit_passthrough(&mut self, evdev_keycode: u16) -> Result<()> {
        if passthrough_hid(evdev_keycode).is_none() {
            return Ok(());
        }
        let mut modifier = 0u8;
        if self.modifiers.shift() {
            modifier |= MOD_SHIFT;
        }
        if self.modifiers.ctrl() {
            modifier |= MOD_CTRL;
        }
        self.writer.write_event(evdev_keycode, modifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::RecordingVirtualKeyboard;
    use crate::keycodes::LETTER_KEYS;
    use crate::keystroke::KeyState;

    fn clock_mid_interval() -> RotationClock {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        RotationClock::new(now - 5, 3600, 0.0, 0.01)
    }

    #[test]
    fn pool_key_is_unscrambled_and_forwarded() {
        let writer = RecordingVirtualKeyboard::default();
        let mut unscrambler = Unscrambler::new([1u8; 32], clock_mid_interval(), writer);
        let key_a = LETTER_KEYS[0];
        unscrambler
            .handle_event(RawKeyEvent {
                evdev_keycode: key_a.evdev,
                state: KeyState::Down,
            })
            .unwrap();
        assert_eq!(unscrambler.writer.events.len(), 1);
    }
}
