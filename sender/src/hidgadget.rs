//! Writes boot-protocol keyboard HID reports to a USB HID gadget character
//! device (`/dev/hidg0` by default).

use std::fs::{File, OpenOptions};
use std::io::Write;

use keyveil_protocol::device::HidGadgetWriter;
use keyveil_protocol::{Error, Result};

/// An 8-byte boot keyboard report: modifier byte, reserved byte, six keycode
/// slots. This implementation only ever fills the first keycode slot.
const REPORT_LEN: usize = 8;

pub struct HidGadget {
    file: File,
}

impl HidGadget {
    pub fn open(path: &str) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|e| Error::device(format!("open {path}: {e}")))?;
        Ok(Self { file })
    }

    fn write_raw(&mut self, report: &[u8; REPORT_LEN]) -> Result<()> {
        self.file
            .write_all(report)
            .map_err(|e| Error::device(format!("write hid gadget report: {e}")))
    }
}

impl HidGadgetWriter for HidGadget {
    fn write_report(&mut self, modifier: u8, hid_usage: u8) -> Result<()> {
        let mut press = [0u8; REPORT_LEN];
        press[0] = modifier;
        press[2] = hid_usage;
        self.write_raw(&press)?;

        let release = [0u8; REPORT_LEN];
        self.write_raw(&release)
    }
}
