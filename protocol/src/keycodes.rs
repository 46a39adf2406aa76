//! Compile-time lookup tables mapping Linux evdev keycodes to characters and
//! to USB HID usage codes, replacing the dynamic keycode-name dictionaries
//! the design notes call out as needing re-architecture. Every value below
//! is a standard Linux `input-event-codes.h` keycode or USB HID Usage Tables
//! (Keyboard/Keypad page) usage ID.

/// One pool key: a physical key that produces a letter or symbol-pool
/// character, identified by its evdev keycode and its USB HID usage code.
#[derive(Debug, Clone, Copy)]
pub struct PoolKey {
    pub evdev: u16,
    pub hid: u8,
    pub base: char,
    /// The character produced when this key is held with shift, if that
    /// character is itself a member of the symbol pool. `KEY_6`'s shifted
    /// form is `^`, which is not in the pool, so it carries `None` here.
    pub shifted: Option<char>,
}

pub const KEY_ESC: u16 = 1;
pub const KEY_BACKSPACE: u16 = 14;
pub const KEY_TAB: u16 = 15;
pub const KEY_ENTER: u16 = 28;
pub const KEY_LEFTCTRL: u16 = 29;
pub const KEY_LEFTSHIFT: u16 = 42;
pub const KEY_RIGHTSHIFT: u16 = 54;
pub const KEY_LEFTALT: u16 = 56;
pub const KEY_CAPSLOCK: u16 = 58;
pub const KEY_RIGHTCTRL: u16 = 97;
pub const KEY_RIGHTALT: u16 = 100;
pub const KEY_HOME: u16 = 102;
pub const KEY_UP: u16 = 103;
pub const KEY_PAGEUP: u16 = 104;
pub const KEY_LEFT: u16 = 105;
pub const KEY_RIGHT: u16 = 106;
pub const KEY_END: u16 = 107;
pub const KEY_DOWN: u16 = 108;
pub const KEY_PAGEDOWN: u16 = 109;
pub const KEY_INSERT: u16 = 110;
pub const KEY_DELETE: u16 = 111;

const F_KEYS: [(u16, u8); 12] = [
    (59, 0x3A),
    (60, 0x3B),
    (61, 0x3C),
    (62, 0x3D),
    (63, 0x3E),
    (64, 0x3F),
    (65, 0x40),
    (66, 0x41),
    (67, 0x42),
    (68, 0x43),
    (87, 0x44),
    (88, 0x45),
];

/// Non-pool keys that are always forwarded unchanged: their evdev keycode
/// maps directly to a fixed HID usage code with no character resolution.
pub const PASSTHROUGH_KEYS: &[(u16, u8)] = &[
    (KEY_ESC, 0x29),
    (KEY_BACKSPACE, 0x2A),
    (KEY_TAB, 0x2B),
    (KEY_ENTER, 0x28),
    (KEY_HOME, 0x4A),
    (KEY_UP, 0x52),
    (KEY_PAGEUP, 0x4B),
    (KEY_LEFT, 0x50),
    (KEY_RIGHT, 0x4F),
    (KEY_END, 0x4D),
    (KEY_DOWN, 0x51),
    (KEY_PAGEDOWN, 0x4E),
    (KEY_INSERT, 0x49),
    (KEY_DELETE, 0x4C),
    (F_KEYS[0].0, F_KEYS[0].1),
    (F_KEYS[1].0, F_KEYS[1].1),
    (F_KEYS[2].0, F_KEYS[2].1),
    (F_KEYS[3].0, F_KEYS[3].1),
    (F_KEYS[4].0, F_KEYS[4].1),
    (F_KEYS[5].0, F_KEYS[5].1),
    (F_KEYS[6].0, F_KEYS[6].1),
    (F_KEYS[7].0, F_KEYS[7].1),
    (F_KEYS[8].0, F_KEYS[8].1),
    (F_KEYS[9].0, F_KEYS[9].1),
    (F_KEYS[10].0, F_KEYS[10].1),
    (F_KEYS[11].0, F_KEYS[11].1),
];

/// The 26 letter keys, `a`..`z`, by evdev row (QWERTY layout).
pub const LETTER_KEYS: [PoolKey; 26] = [
    PoolKey { evdev: 30, hid: 0x04, base: 'a', shifted: None },
    PoolKey { evdev: 48, hid: 0x05, base: 'b', shifted: None },
    PoolKey { evdev: 46, hid: 0x06, base: 'c', shifted: None },
    PoolKey { evdev: 32, hid: 0x07, base: 'd', shifted: None },
    PoolKey { evdev: 18, hid: 0x08, base: 'e', shifted: None },
    PoolKey { evdev: 33, hid: 0x09, base: 'f', shifted: None },
    PoolKey { evdev: 34, hid: 0x0A, base: 'g', shifted: None },
    PoolKey { evdev: 35, hid: 0x0B, base: 'h', shifted: None },
    PoolKey { evdev: 23, hid: 0x0C, base: 'i', shifted: None },
    PoolKey { evdev: 36, hid: 0x0D, base: 'j', shifted: None },
    PoolKey { evdev: 37, hid: 0x0E, base: 'k', shifted: None },
    PoolKey { evdev: 38, hid: 0x0F, base: 'l', shifted: None },
    PoolKey { evdev: 50, hid: 0x10, base: 'm', shifted: None },
    PoolKey { evdev: 49, hid: 0x11, base: 'n', shifted: None },
    PoolKey { evdev: 24, hid: 0x12, base: 'o', shifted: None },
    PoolKey { evdev: 25, hid: 0x13, base: 'p', shifted: None },
    PoolKey { evdev: 16, hid: 0x14, base: 'q', shifted: None },
    PoolKey { evdev: 19, hid: 0x15, base: 'r', shifted: None },
    PoolKey { evdev: 31, hid: 0x16, base: 's', shifted: None },
    PoolKey { evdev: 20, hid: 0x17, base: 't', shifted: None },
    PoolKey { evdev: 22, hid: 0x18, base: 'u', shifted: None },
    PoolKey { evdev: 47, hid: 0x19, base: 'v', shifted: None },
    PoolKey { evdev: 17, hid: 0x1A, base: 'w', shifted: None },
    PoolKey { evdev: 45, hid: 0x1B, base: 'x', shifted: None },
    PoolKey { evdev: 21, hid: 0x1C, base: 'y', shifted: None },
    PoolKey { evdev: 44, hid: 0x1D, base: 'z', shifted: None },
];

/// Digit, punctuation, and space keys, each with their shifted form when
/// that form is itself a symbol-pool member.
pub const SYMBOL_KEYS: [PoolKey; 22] = [
    PoolKey { evdev: 2, hid: 0x1E, base: '1', shifted: Some('!') },
    PoolKey { evdev: 3, hid: 0x1F, base: '2', shifted: Some('@') },
    PoolKey { evdev: 4, hid: 0x20, base: '3', shifted: Some('#') },
    PoolKey { evdev: 5, hid: 0x21, base: '4', shifted: Some('$') },
    PoolKey { evdev: 6, hid: 0x22, base: '5', shifted: Some('%') },
    PoolKey { evdev: 7, hid: 0x23, base: '6', shifted: None },
    PoolKey { evdev: 8, hid: 0x24, base: '7', shifted: Some('&') },
    PoolKey { evdev: 9, hid: 0x25, base: '8', shifted: Some('*') },
    PoolKey { evdev: 10, hid: 0x26, base: '9', shifted: Some('(') },
    PoolKey { evdev: 11, hid: 0x27, base: '0', shifted: Some(')') },
    PoolKey { evdev: 12, hid: 0x2D, base: '-', shifted: Some('_') },
    PoolKey { evdev: 13, hid: 0x2E, base: '=', shifted: Some('+') },
    PoolKey { evdev: 26, hid: 0x2F, base: '[', shifted: Some('{') },
    PoolKey { evdev: 27, hid: 0x30, base: ']', shifted: Some('}') },
    PoolKey { evdev: 43, hid: 0x31, base: '\\', shifted: Some('|') },
    PoolKey { evdev: 39, hid: 0x33, base: ';', shifted: Some(':') },
    PoolKey { evdev: 40, hid: 0x34, base: '\'', shifted: Some('"') },
    PoolKey { evdev: 41, hid: 0x35, base: '`', shifted: Some('~') },
    PoolKey { evdev: 51, hid: 0x36, base: ',', shifted: Some('<') },
    PoolKey { evdev: 52, hid: 0x37, base: '.', shifted: Some('>') },
    PoolKey { evdev: 53, hid: 0x38, base: '/', shifted: Some('?') },
    PoolKey { evdev: 57, hid: 0x2C, base: ' ', shifted: None },
];

/// Find the pool key (letter or symbol) whose base form is the evdev
/// keycode `code`.
pub fn pool_key_by_evdev(code: u16) -> Option<&'static PoolKey> {
    LETTER_KEYS
        .iter()
        .chain(SYMBOL_KEYS.iter())
        .find(|k| k.evdev == code)
}

/// Find the pool key whose HID usage code is `hid`. Used to translate a
/// received HID report back into the evdev keycode a grabbed input device
/// would have reported for the same physical key.
pub fn pool_key_by_hid(hid: u8) -> Option<&'static PoolKey> {
    LETTER_KEYS
        .iter()
        .chain(SYMBOL_KEYS.iter())
        .find(|k| k.hid == hid)
}

/// Find the pool key that produces `c`, either as its base form
/// (`is_shifted = false`) or its shifted form (`is_shifted = true`).
pub fn pool_key_by_char(c: char) -> Option<(&'static PoolKey, bool)> {
    LETTER_KEYS
        .iter()
        .chain(SYMBOL_KEYS.iter())
        .find_map(|k| {
            if k.base == c {
                Some((k, false))
            } else if k.shifted == Some(c) {
                Some((k, true))
            } else {
                None
            }
        })
}

/// HID usage code for a known pass-through (non-pool) evdev keycode.
pub fn passthrough_hid(code: u16) -> Option<u8> {
    PASSTHROUGH_KEYS
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, hid)| *hid)
}

/// The logical character a captured or received key resolves to, before it
/// passes through the permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logical {
    /// `lower` is always the pool's lowercase base letter; `upper` records
    /// whether the resolved case was uppercase (`shift XOR caps`).
    Letter { lower: char, upper: bool },
    /// The literal symbol-pool member this key (with or without shift)
    /// produces.
    Symbol { value: char },
}

/// Resolve the logical character for `key`, given the tracked modifier
/// state. Returns `None` when shift is held but this key has no shifted
/// form in the pool (e.g. `KEY_6` -> `^`); the caller treats that the same
/// as an unmapped key and passes it through unchanged.
pub fn resolve_logical(key: &PoolKey, is_letter: bool, shift: bool, caps: bool) -> Option<Logical> {
    if is_letter {
        Some(Logical::Letter {
            lower: key.base,
            upper: shift ^ caps,
        })
    } else if shift {
        key.shifted.map(|value| Logical::Symbol { value })
    } else {
        Some(Logical::Symbol { value: key.base })
    }
}

/// Re-encode a scrambled character back into a physical key plus whether
/// the shift bit must be set to produce it.
pub fn encode_char(c: char, is_letter: bool) -> Option<(&'static PoolKey, bool)> {
    if is_letter {
        let lower = c.to_ascii_lowercase();
        let upper = c.is_ascii_uppercase();
        pool_key_by_char(lower).map(|(key, _)| (key, upper))
    } else {
        pool_key_by_char(c)
    }
}
