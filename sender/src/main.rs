//! The A-side long-running process: handshakes with the endpoint over the
//! serial link, then grabs the physical keyboard and scrambles every
//! keystroke it captures out to the HID gadget.

mod capture;
mod hidgadget;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use keyveil_core::{config::RuntimeConfig, logging, Error, Result};
use keyveil_protocol::device::KeyCapture;
use keyveil_protocol::handshake::perform_initiator;
use keyveil_protocol::RotationClock;
use keyveil_protocol::Scrambler;

use capture::EvdevCapture;
use hidgadget::HidGadget;

fn main() {
    let config = RuntimeConfig::load("keyveil.toml").unwrap_or_else(|e| {
        eprintln!("failed to load keyveil.toml, using defaults: {e}");
        RuntimeConfig::default()
    });
    logging::init(&config.log_filter);

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "keyveil-sender exiting");
        std::process::exit(1);
    }
}

fn run(config: &RuntimeConfig) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || shutdown.store(true, Ordering::SeqCst))
            .map_err(|e| Error::device(format!("install signal handler: {e}")))?;
    }

    tracing::info!(device = %config.serial_device, "opening serial link");
    let mut serial = serialport::new(&config.serial_device, 115_200)
        .timeout(Duration::from_secs(30))
        .open()
        .map_err(|e| Error::device(format!("open serial link {}: {e}", config.serial_device)))?;

    tracing::info!("starting handshake as initiator");
    let session = perform_initiator(&mut serial)?;
    tracing::info!(base_time = session.base_time, "handshake complete");

    let clock = RotationClock::new(
        session.base_time,
        config.interval_secs,
        config.sender_offset_secs,
        config.guard_window_secs,
    );

    tracing::info!(path = %config.keyboard_device_path, "grabbing keyboard device");
    let capture = EvdevCapture::open(&config.keyboard_device_path)?;

    tracing::info!(path = %config.hid_gadget_path, "opening hid gadget");
    let writer = HidGadget::open(&config.hid_gadget_path)?;

    let root_key = *session.key.as_bytes();
    let scrambler = Scrambler::new(root_key, clock, writer);

    event_loop(scrambler, capture, shutdown)
}

fn event_loop(
    mut scrambler: Scrambler<HidGadget>,
    mut capture: EvdevCapture,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    tracing::info!("entering capture loop");
    while !shutdown.load(Ordering::SeqCst) {
        let event = capture.next_event()?;
        if let Err(e) = scrambler.handle_event(event) {
            tracing::warn!(error = %e, "dropping keystroke");
        }
    }
    tracing::info!("shutdown signal received, releasing devices");
    Ok(())
}
