//! End-to-end round trip: drive the scrambler with a phrase, replay its HID
//! reports as the endpoint's received keyboard events, and confirm the
//! unscrambler recovers the original text byte-for-byte.

use keyveil_protocol::clock::RotationClock;
use keyveil_protocol::device::mock::{RecordingHidWriter, RecordingVirtualKeyboard, ScriptedEvents};
use keyveil_protocol::device::{KeyCapture, MOD_SHIFT};
use keyveil_protocol::keycodes::{
    pool_key_by_char, pool_key_by_evdev, pool_key_by_hid, resolve_logical, Logical, KEY_LEFTSHIFT,
};
use keyveil_protocol::keystroke::{KeyState, RawKeyEvent};
use keyveil_protocol::{Scrambler, Unscrambler};

/// Build the capture-event sequence for `text`: every character that needs
/// shift gets a shift-down/shift-up pair wrapped around its key event.
fn events_for(text: &str) -> Vec<RawKeyEvent> {
    let mut events = Vec::new();
    for c in text.chars() {
        let (key, is_shifted_symbol) = pool_key_by_char(c.to_ascii_lowercase())
            .expect("every character in this test phrase is a pool member");
        let needs_shift = is_shifted_symbol || c.is_ascii_uppercase();
        if needs_shift {
            events.push(RawKeyEvent {
                evdev_keycode: KEY_LEFTSHIFT,
                state: KeyState::Down,
            });
        }
        events.push(RawKeyEvent {
            evdev_keycode: key.evdev,
            state: KeyState::Down,
        });
        if needs_shift {
            events.push(RawKeyEvent {
                evdev_keycode: KEY_LEFTSHIFT,
                state: KeyState::Up,
            });
        }
    }
    events
}

/// Reconstruct the evdev event sequence B's HID input reader would see from
/// the HID reports A emitted.
fn reports_to_events(reports: &[(u8, u8)]) -> Vec<RawKeyEvent> {
    let mut events = Vec::new();
    for &(modifier, hid) in reports {
        let key = pool_key_by_hid(hid).expect("test phrase only uses pool keys");
        let shifted = modifier & MOD_SHIFT != 0;
        if shifted {
            events.push(RawKeyEvent {
                evdev_keycode: KEY_LEFTSHIFT,
                state: KeyState::Down,
            });
        }
        events.push(RawKeyEvent {
            evdev_keycode: key.evdev,
            state: KeyState::Down,
        });
        if shifted {
            events.push(RawKeyEvent {
                evdev_keycode: KEY_LEFTSHIFT,
                state: KeyState::Up,
            });
        }
    }
    events
}

/// Reconstruct the plaintext characters from the virtual keyboard's
/// `(evdev_keycode, modifier)` events.
fn decode_virtual_keyboard_events(events: &[(u16, u8)]) -> String {
    let mut out = String::new();
    for &(evdev, modifier) in events {
        let key = pool_key_by_evdev(evdev).expect("test phrase only uses pool keys");
        let is_letter = key.shifted.is_none() && key.base.is_ascii_alphabetic();
        let shift = modifier & MOD_SHIFT != 0;
        match resolve_logical(key, is_letter, shift, false).expect("reconstructed event resolves") {
            Logical::Letter { lower, upper } => {
                out.push(if upper { lower.to_ascii_uppercase() } else { lower });
            }
            Logical::Symbol { value } => out.push(value),
        }
    }
    out
}

#[test]
fn hello_world_round_trips_through_the_full_pipeline() {
    let phrase = "hello world";
    let root_key = [0x42u8; 32];

    let base_time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
        - 5;
    // Generous interval and tiny guard window: this test only cares about
    // the scramble/unscramble pipeline, not rotation timing.
    let clock = RotationClock::new(base_time, 3600, 0.0, 0.001);

    let hid_writer = RecordingHidWriter::default();
    let mut scrambler = Scrambler::new(root_key, clock, hid_writer);

    let mut capture = ScriptedEvents::new(events_for(phrase));
    while let Ok(event) = capture.next_event() {
        scrambler.handle_event(event).unwrap();
    }

    let reports = scrambler.into_writer().reports;

    let vkbd_writer = RecordingVirtualKeyboard::default();
    let mut unscrambler = Unscrambler::new(root_key, clock, vkbd_writer);

    let mut wire_events = ScriptedEvents::new(reports_to_events(&reports));
    while let Ok(event) = wire_events.next_event() {
        unscrambler.handle_event(event).unwrap();
    }

    let recovered = decode_virtual_keyboard_events(&unscrambler.into_writer().events);
    assert_eq!(recovered, phrase);
}

#[test]
fn different_phrases_scramble_to_different_wire_bytes() {
    let root_key = [7u8; 32];
    let base_time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
        - 5;
    let clock = RotationClock::new(base_time, 3600, 0.0, 0.001);

    let mut scrambler_a = Scrambler::new(root_key, clock, RecordingHidWriter::default());
    let mut capture_a = ScriptedEvents::new(events_for("hello"));
    while let Ok(event) = capture_a.next_event() {
        scrambler_a.handle_event(event).unwrap();
    }

    let mut scrambler_b = Scrambler::new(root_key, clock, RecordingHidWriter::default());
    let mut capture_b = ScriptedEvents::new(events_for("world"));
    while let Ok(event) = capture_b.next_event() {
        scrambler_b.handle_event(event).unwrap();
    }

    assert_ne!(
        scrambler_a.into_writer().reports,
        scrambler_b.into_writer().reports
    );
}
