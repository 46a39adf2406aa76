//! Runtime configuration for both peers.
//!
//! Loaded from an optional `keyveil.toml` next to the binary, with environment
//! variable overrides (`KEYVEIL_*`), falling back to the protocol's documented
//! defaults when nothing else is supplied.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::Result;

fn default_interval_secs() -> u64 {
    10
}

fn default_sender_offset_secs() -> f64 {
    -0.4
}

fn default_guard_window_secs() -> f64 {
    0.4
}

fn default_serial_device() -> String {
    "/dev/ttyACM0".to_string()
}

fn default_hid_gadget_path() -> String {
    "/dev/hidg0".to_string()
}

fn default_keyboard_device_path() -> String {
    "/dev/input/event0".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Tunables for the rotation schedule, device paths, and logging, shared by
/// both the sender and the endpoint binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Path to the length-framed serial link used for the handshake.
    #[serde(default = "default_serial_device")]
    pub serial_device: String,

    /// Rotation interval `I`, in seconds.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Sender clock offset `δ_A`, in seconds (small negative value).
    #[serde(default = "default_sender_offset_secs")]
    pub sender_offset_secs: f64,

    /// Guard window `W`, in seconds.
    #[serde(default = "default_guard_window_secs")]
    pub guard_window_secs: f64,

    /// HID gadget character device A writes scrambled reports to.
    #[serde(default = "default_hid_gadget_path")]
    pub hid_gadget_path: String,

    /// Keyboard / HID-input device path (capture device on A, grabbed device on B).
    #[serde(default = "default_keyboard_device_path")]
    pub keyboard_device_path: String,

    /// `tracing_subscriber::EnvFilter` directive string.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            serial_device: default_serial_device(),
            interval_secs: default_interval_secs(),
            sender_offset_secs: default_sender_offset_secs(),
            guard_window_secs: default_guard_window_secs(),
            hid_gadget_path: default_hid_gadget_path(),
            keyboard_device_path: default_keyboard_device_path(),
            log_filter: default_log_filter(),
        }
    }
}

impl RuntimeConfig {
    /// Load from an optional TOML file, then apply `KEYVEIL_*` environment overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut cfg = match fs::read_to_string(&path) {
            Ok(data) => toml::from_str::<Self>(&data)?,
            Err(_) => Self::default(),
        };
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    /// Load using only defaults and environment overrides (no config file).
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("KEYVEIL_SERIAL_DEVICE") {
            self.serial_device = v;
        }
        if let Some(v) = env_parsed::<u64>("KEYVEIL_INTERVAL_SECS") {
            self.interval_secs = v;
        }
        if let Some(v) = env_parsed::<f64>("KEYVEIL_SENDER_OFFSET_SECS") {
            self.sender_offset_secs = v;
        }
        if let Some(v) = env_parsed::<f64>("KEYVEIL_GUARD_WINDOW_SECS") {
            self.guard_window_secs = v;
        }
        if let Ok(v) = std::env::var("KEYVEIL_HID_GADGET_PATH") {
            self.hid_gadget_path = v;
        }
        if let Ok(v) = std::env::var("KEYVEIL_KEYBOARD_DEVICE_PATH") {
            self.keyboard_device_path = v;
        }
        if let Ok(v) = std::env::var("KEYVEIL_LOG_FILTER") {
            self.log_filter = v;
        }
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.interval_secs, 10);
        assert!((cfg.sender_offset_secs - (-0.4)).abs() < f64::EPSILON);
        assert!((cfg.guard_window_secs - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = RuntimeConfig::load("/nonexistent/path/keyveil.toml").unwrap();
        assert_eq!(cfg.interval_secs, default_interval_secs());
    }

    #[test]
    fn partial_toml_fills_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("keyveil.toml");
        fs::write(&path, "interval_secs = 20\n").unwrap();
        let cfg = RuntimeConfig::load(&path).unwrap();
        assert_eq!(cfg.interval_secs, 20);
        assert_eq!(cfg.hid_gadget_path, default_hid_gadget_path());
    }
}
