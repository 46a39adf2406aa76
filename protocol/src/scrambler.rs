//! The sender-side (A) per-keystroke pipeline: resolve the captured key into
//! a logical character, apply the rotation guard, scramble it under the
//! current permutation, and re-encode it as an outgoing HID report.

use keyveil_crypto::alphabet::{letter_index, symbol_index};
use keyveil_crypto::kdf::derive_seed;
use keyveil_crypto::keymap::PermutationCache;

use crate::clock::RotationClock;
use crate::device::{HidGadgetWriter, MOD_CTRL, MOD_SHIFT};
use crate::errors::{Error, Result};
use crate::keycodes::{encode_char, passthrough_hid, pool_key_by_evdev, resolve_logical, Logical};
use crate::keystroke::{KeyState, ModifierState, RawKeyEvent};

pub struct Scrambler<W: HidGadgetWriter> {
    root_key: [u8; 32],
    clock: RotationClock,
    cache: PermutationCache,
    modifiers: ModifierState,
    writer: W,
}

impl<W: HidGadgetWriter> Scrambler<W> {
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

    /// Process one raw capture event end-to-end. Modifier keys update
    /// tracked state and are never emitted; key-up events are dropped; pool
    /// keys are scrambled; everything else passes through unchanged.
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

        let logical = resolve_logical(key, is_letter, self.modifiers.shift(), self.modifiers.caps());
        let Some(logical) = logical else {
            return self.emit_passthrough(raw.evdev_keycode);
        };

        if let Some(sleep) = self.clock.guard_sleep_now() {
            std::thread::sleep(sleep);
        }

        let counter = self.clock.sender_counter_now();
        let seed = derive_seed(&self.root_key, counter);
        let perm = self.cache.get_or_derive(counter, &seed);

        let (y, is_letter_out) = match logical {
            Logical::Letter { lower, upper } => {
                let idx = letter_index(lower)
                    .ok_or_else(|| Error::invariant("resolved letter outside letter pool"))?;
                let scrambled = perm.scramble_letter(idx);
                let y = if upper {
                    scrambled.to_ascii_uppercase()
                } else {
                    scrambled
                };
                (y, true)
            }
            Logical::Symbol { value } => {
                let idx = symbol_index(value)
                    .ok_or_else(|| Error::invariant("resolved symbol outside symbol pool"))?;
                (perm.scramble_symbol(idx), false)
            }
        };

        let (out_key, shift_bit) = encode_char(y, is_letter_out)
            .ok_or_else(|| Error::invariant("scrambled character has no encoding key"))?;

        let mut modifier = 0u8;
        if shift_bit {
            modifier |= MOD_SHIFT;
        }
        if self.modifiers.ctrl() {
            modifier |= MOD_CTRL;
        }
        self.writer.write_report(modifier, out_key.hid)
    }

    fn emit_passthrough(&mut self, evdev_keycode: u16) -> Result<()> {
        let Some(hid) = passthrough_hid(evdev_keycode) else {
            return Ok(());
        };
        let mut modifier = 0u8;
        if self.modifiers.shift() {
            modifier |= MOD_SHIFT;
        }
        if self.modifiers.ctrl() {
            modifier |= MOD_CTRL;
        }
        self.writer.write_report(modifier, hid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::RecordingHidWriter;
    use crate::keycodes::{KEY_LEFTSHIFT, LETTER_KEYS};
    use crate::keystroke::KeyState;

    fn clock_mid_interval() -> RotationClock {
        // Base time far in the past, generous interval, tiny guard window,
        // so ordinary test runs never fall inside the guard.
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        RotationClock::new(now - 5, 3600, -0.4, 0.01)
    }

    #[test]
    fn lowercase_letter_is_scrambled_and_reported() {
        let writer = RecordingHidWriter::default();
        let mut scrambler = Scrambler::new([1u8; 32], clock_mid_interval(), writer);
        let key_a = LETTER_KEYS[0];
        scrambler
            .handle_event(RawKeyEvent {
                evdev_keycode: key_a.evdev,
                state: KeyState::Down,
            })
            .unwrap();
        assert_eq!(scrambler.writer.reports.len(), 1);
    }

    #[test]
    fn shift_sets_shift_bit_for_uppercase_letter() {
        let writer = RecordingHidWriter::default();
        let mut scrambler = Scrambler::new([1u8; 32], clock_mid_interval(), writer);
        scrambler
            .handle_event(RawKeyEvent {
                evdev_keycode: KEY_LEFTSHIFT,
                state: KeyState::Down,
            })
            .unwrap();
        let key_a = LETTER_KEYS[0];
        scrambler
            .handle_event(RawKeyEvent {
                evdev_keycode: key_a.evdev,
                state: KeyState::Down,
            })
            .unwrap();
        let (modifier, _hid) = scrambler.writer.reports[0];
        assert_ne!(modifier & MOD_SHIFT, 0);
    }

    #[test]
    fn key_up_events_are_dropped() {
        let writer = RecordingHidWriter::default();
        let mut scrambler = Scrambler::new([1u8; 32], clock_mid_interval(), writer);
        let key_a = LETTER_KEYS[0];
        scrambler
            .handle_event(RawKeyEvent {
                evdev_keycode: key_a.evdev,
                state: KeyState::Up,
            })
            .unwrap();
        assert!(scrambler.writer.reports.is_empty());
    }
}
