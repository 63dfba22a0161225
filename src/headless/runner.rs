//! Headless mode runner - the scan loop without a terminal UI
//!
//! Engine events go to stdout through a printer task; stdin lines are turned
//! into messages on a blocking thread.

use std::io::BufRead;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use baseconnect_app::{Engine, EngineEvent, EquipmentLookup, Message};
use baseconnect_core::prelude::*;

use super::HeadlessEvent;

/// How long the printer may take to flush the final events
const PRINTER_DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessOptions {
    /// Quit once the session settles on a result or a camera error
    pub exit_after_result: bool,
}

/// Run the scanner without a TUI, writing NDJSON events to stdout
pub async fn run_headless<L>(engine: &mut Engine<L>, options: HeadlessOptions) -> Result<()>
where
    L: EquipmentLookup + Sync + 'static,
{
    info!("BaseConnect scanner starting in HEADLESS mode");

    let printer = tokio::spawn(print_events(engine.subscribe()));

    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        read_commands(std::io::stdin().lock(), stdin_tx);
    });

    engine.start();
    let result = headless_event_loop(engine, options).await;

    engine.shutdown().await;
    if tokio::time::timeout(PRINTER_DRAIN_TIMEOUT, printer)
        .await
        .is_err()
    {
        warn!("Headless printer did not finish in time");
    }

    info!("BaseConnect headless mode exiting");
    result
}

async fn headless_event_loop<L>(engine: &mut Engine<L>, options: HeadlessOptions) -> Result<()>
where
    L: EquipmentLookup + Sync + 'static,
{
    while !engine.should_quit() {
        match engine.msg_rx.recv().await {
            Some(msg) => engine.process_message(msg),
            None => {
                info!("Message channel closed");
                break;
            }
        }

        if options.exit_after_result && engine.state.session.camera_state.is_terminal() {
            info!(
                "Session settled on {}, quitting",
                engine.state.session.camera_state
            );
            engine.process_message(Message::Quit);
        }
    }
    Ok(())
}

/// Print events until the engine announces shutdown
async fn print_events(mut events: broadcast::Receiver<EngineEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                HeadlessEvent::from(&event).emit();
                if event == EngineEvent::Shutdown {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} events dropped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Map one stdin line to a message
pub fn parse_command(line: &str) -> Option<Message> {
    match line.trim() {
        "r" | "retry" => Some(Message::Retry),
        "s" | "scan" | "rescan" => Some(Message::Rescan),
        "f" | "flip" => Some(Message::ToggleFacing),
        "v" | "view" => Some(Message::ViewRecord),
        "q" | "quit" => Some(Message::Quit),
        _ => None,
    }
}

fn read_commands(reader: impl BufRead, msg_tx: mpsc::Sender<Message>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(msg) = parse_command(trimmed) else {
            warn!("Unknown stdin command: {}", trimmed);
            continue;
        };

        let quit = msg == Message::Quit;
        info!("Stdin: {:?}", msg);
        if msg_tx.blocking_send(msg).is_err() || quit {
            break;
        }
    }

    info!("Stdin reader exiting");
}
