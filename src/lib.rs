//! BaseConnect scanner
//!
//! Wires the configured camera backend, decoder and equipment store into an
//! [`Engine`] and runs it under the TUI or in headless mode.

pub mod cli;
pub mod headless;

use std::sync::Arc;

use baseconnect_app::config::CameraBackend;
use baseconnect_app::{Engine, EquipmentLookup, EquipmentStore, Settings};
use baseconnect_camera::{CameraProvider, FrameDirectoryProvider, RxingDecoder, SymbolDecoder};
use baseconnect_core::prelude::*;

pub use cli::CliOverrides;
pub use headless::HeadlessOptions;

/// Front end to drive the engine with
#[derive(Debug, Clone, Copy)]
pub enum RunMode {
    Tui,
    Headless(HeadlessOptions),
}

/// Run the scanner with the backends named in `settings`.
///
/// Returns the detail route requested through "Voir fiche", if any.
pub async fn run(settings: Settings, mode: RunMode) -> Result<Option<String>> {
    let decoder: Arc<dyn SymbolDecoder> =
        Arc::new(RxingDecoder::new(&settings.scanner.decode_hints()));
    let lookup = EquipmentStore::from_settings(&settings.lookup)
        .context("Equipment lookup is not configured")?;
    info!(
        "Camera backend: {}, lookup backend: {}",
        settings.camera.backend,
        lookup.backend()
    );

    match settings.camera.backend {
        CameraBackend::Frames => {
            let dir = settings.camera.frames_dir.clone().ok_or_else(|| {
                Error::config("camera.frames_dir is required by the frames backend")
            })?;
            run_with(settings, FrameDirectoryProvider::new(dir), decoder, lookup, mode).await
        }
        CameraBackend::Native => run_native(settings, decoder, lookup, mode).await,
    }
}

#[cfg(feature = "native-camera")]
async fn run_native(
    settings: Settings,
    decoder: Arc<dyn SymbolDecoder>,
    lookup: EquipmentStore,
    mode: RunMode,
) -> Result<Option<String>> {
    let provider = baseconnect_camera::NativeCameraProvider::new(
        settings.camera.environment_index,
        settings.camera.user_index,
    );
    run_with(settings, provider, decoder, lookup, mode).await
}

#[cfg(not(feature = "native-camera"))]
async fn run_native(
    _settings: Settings,
    _decoder: Arc<dyn SymbolDecoder>,
    _lookup: EquipmentStore,
    _mode: RunMode,
) -> Result<Option<String>> {
    Err(Error::config(
        "built without the native-camera feature; pass --frames <dir> to replay images",
    ))
}

/// Run an engine over an explicit provider and lookup backend
pub async fn run_with<P, L>(
    settings: Settings,
    provider: P,
    decoder: Arc<dyn SymbolDecoder>,
    lookup: L,
    mode: RunMode,
) -> Result<Option<String>>
where
    P: CameraProvider + Sync + 'static,
    L: EquipmentLookup + Sync + 'static,
{
    let mut engine = Engine::new(settings, provider, decoder, lookup);

    match mode {
        RunMode::Tui => baseconnect_tui::run(&mut engine).await?,
        RunMode::Headless(options) => headless::run_headless(&mut engine, options).await?,
    }

    Ok(engine.handoff().map(str::to_string))
}
