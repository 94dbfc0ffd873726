//! Kiosk bridge entry point.
//!
//! Reads one JSON request per stdin line and writes one JSON response per
//! stdout line. Logs go to stderr.

use std::io::{self, BufRead, Write};

use anyhow::Context;

use kiosk_desktop::{KioskConfig, KioskSession, handle_line};
use kiosk_events::Event;

fn main() -> anyhow::Result<()> {
    kiosk_observability::init();

    let config = KioskConfig::from_env().context("invalid kiosk configuration")?;
    let mut session = KioskSession::from_config(&config)?;
    let events = session.subscribe();

    tracing::info!(
        items = session.catalog().len(),
        tax_rate = %session.tax_rate(),
        "kiosk bridge ready"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("failed to read request from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(&mut session, &line);
        serde_json::to_writer(&mut stdout, &response).context("failed to encode response")?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;

        for event in events.drain() {
            tracing::debug!(
                event_type = event.event_type(),
                occurred_at = %event.occurred_at(),
                "kiosk event"
            );
        }
    }

    tracing::info!("stdin closed; shutting down");
    Ok(())
}
