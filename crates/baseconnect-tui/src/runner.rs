//! Main TUI runner - terminal setup, the event loop, and teardown

use baseconnect_app::{Engine, EquipmentLookup};
use baseconnect_core::Result;
use tracing::{error, info};

use crate::{event, render, terminal};

/// Run the scanner screen until the user quits or a signal arrives.
///
/// The engine's own shutdown runs after the terminal is restored; camera
/// release is awaited there.
pub async fn run<L>(engine: &mut Engine<L>) -> Result<()>
where
    L: EquipmentLookup + Sync + 'static,
{
    terminal::install_panic_hook();
    let mut term = ratatui::init();

    info!("Scanner screen mounted");
    engine.start();
    let result = run_loop(&mut term, engine);

    ratatui::restore();
    engine.shutdown().await;

    result
}

fn run_loop<L>(term: &mut ratatui::DefaultTerminal, engine: &mut Engine<L>) -> Result<()>
where
    L: EquipmentLookup + Sync + 'static,
{
    while !engine.should_quit() {
        engine.drain_pending_messages();
        if engine.should_quit() {
            break;
        }

        term.draw(|frame| render::view(frame, &engine.state))?;

        match event::poll() {
            Ok(Some(message)) => engine.process_message(message),
            Ok(None) => {}
            Err(e) => {
                error!("Terminal event error: {}", e);
                return Err(e);
            }
        }
    }
    Ok(())
}
