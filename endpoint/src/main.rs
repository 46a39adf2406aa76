//! The B-side long-running process: handshakes with the sender over the
//! serial link, grabs the wire-facing HID input device, and replays the
//! unscrambled keystroke stream onto a virtual keyboard for the protected
//! host.

mod hidinput;
mod vkbd;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use keyveil_core::{config::RuntimeConfig, logging, Error, Result};
use keyveil_protocol::device::HidInputReader;
use keyveil_protocol::handshake::perform_responder;
use keyveil_protocol::RotationClock;
use keyveil_protocol::Unscrambler;

use hidinput::HidInput;
use vkbd::Vkbd;

fn main() {
    let config = RuntimeConfig::load("keyveil.toml").unwrap_or_else(|e| {
        eprintln!("failed to load keyveil.toml, using defaults: {e}");
        RuntimeConfig::default()
    });
    logging::init(&config.log_filter);

    if let Err(e) = run(&config) {
        tracing::error!(error = %e, "keyveil-endpoint exiting");
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

    tracing::info!("starting handshake as responder");
    let session = perform_responder(&mut serial)?;
    tracing::info!(base_time = session.base_time, "handshake complete");

    set_system_clock_best_effort(session.base_time);

    let clock = RotationClock::new(
        session.base_time,
        config.interval_secs,
        config.sender_offset_secs,
        config.guard_window_secs,
    );

    tracing::info!(path = %config.keyboard_device_path, "grabbing hid input device");
    let input = HidInput::open(&config.keyboard_device_path)?;

    tracing::info!("creating virtual keyboard");
    let writer = Vkbd::create()?;

    let root_key = *session.key.as_bytes();
    let unscrambler = Unscrambler::new(root_key, clock, writer);

    event_loop(unscrambler, input, shutdown)
}

/// Best-effort clock adjustment: logs a warning and keeps running on
/// failure. Requires `CAP_SYS_TIME` in production; routinely unavailable in
/// test or containerized environments.
fn set_system_clock_best_effort(base_time: i64) {
    let ts = nix::sys::time::TimeSpec::new(base_time, 0);
    match nix::time::clock_settime(nix::time::ClockId::CLOCK_REALTIME, ts) {
        Ok(()) => tracing::info!(base_time, "system clock set from handshake base time"),
        Err(e) => tracing::warn!(error = %e, "could not set system clock, proceeding anyway"),
    }
}

fn event_loop(mut unscrambler: Unscrambler<Vkbd>, mut input: HidInput, shutdown: Arc<AtomicBool>) -> Result<()> {
    tracing::info!("entering input loop");
    while !shutdown.load(Ordering::SeqCst) {
        let event = input.next_event()?;
        if let Err(e) = unscrambler.handle_event(event) {
            tracing::warn!(error = %e, "dropping keystroke");
        }
    }
    tracing::info!("shutdown signal received, releasing devices");
    Ok(())
}
