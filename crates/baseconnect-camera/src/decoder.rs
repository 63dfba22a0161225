//! Continuous decode loop
//!
//! [`DecoderEngine`] drives one decode attempt per poll interval against a
//! bound [`CameraStream`] and publishes every outcome as a
//! [`CameraEvent::Decode`]. Attempts run on the blocking pool and are strictly
//! sequential: the stream is moved into the attempt and handed back when it
//! finishes.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rxing::{BarcodeFormat, DecodeHintType, DecodeHintValue, DecodingHintDictionary};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use baseconnect_core::prelude::*;
use baseconnect_core::{CameraEvent, DecodeEvent, DecodeHints, SymbolFormat};

use crate::frame::Frame;
use crate::provider::CameraStream;

/// Symbol reader applied to a single frame.
///
/// Returns the raw text of the first symbol found. Every internal failure of
/// the reader (no finder pattern, checksum, format) is a miss.
pub trait SymbolDecoder: Send + Sync + 'static {
    fn decode(&self, frame: &Frame) -> Option<String>;
}

// ─────────────────────────────────────────────────────────
// rxing binding
// ─────────────────────────────────────────────────────────

/// [`SymbolDecoder`] backed by `rxing` (ZXing port)
#[derive(Debug, Clone)]
pub struct RxingDecoder {
    formats: HashSet<BarcodeFormat>,
}

impl RxingDecoder {
    pub fn new(hints: &DecodeHints) -> Self {
        Self {
            formats: hints.formats().iter().copied().map(barcode_format).collect(),
        }
    }

    fn hint_dictionary(&self) -> DecodingHintDictionary {
        let mut hints = DecodingHintDictionary::new();
        hints.insert(
            DecodeHintType::POSSIBLE_FORMATS,
            DecodeHintValue::PossibleFormats(self.formats.clone()),
        );
        hints
    }
}

impl SymbolDecoder for RxingDecoder {
    fn decode(&self, frame: &Frame) -> Option<String> {
        let mut hints = self.hint_dictionary();
        match rxing::helpers::detect_in_luma_with_hints(
            frame.luma().to_vec(),
            frame.width(),
            frame.height(),
            None,
            &mut hints,
        ) {
            Ok(result) => Some(result.getText().to_string()),
            Err(e) => {
                trace!("rxing miss: {}", e);
                None
            }
        }
    }
}

fn barcode_format(format: SymbolFormat) -> BarcodeFormat {
    match format {
        SymbolFormat::QrCode => BarcodeFormat::QR_CODE,
        SymbolFormat::DataMatrix => BarcodeFormat::DATA_MATRIX,
        SymbolFormat::Code128 => BarcodeFormat::CODE_128,
        SymbolFormat::Ean13 => BarcodeFormat::EAN_13,
        SymbolFormat::Ean8 => BarcodeFormat::EAN_8,
        SymbolFormat::Code39 => BarcodeFormat::CODE_39,
        SymbolFormat::Code93 => BarcodeFormat::CODE_93,
        SymbolFormat::UpcA => BarcodeFormat::UPC_A,
        SymbolFormat::UpcE => BarcodeFormat::UPC_E,
        SymbolFormat::Itf => BarcodeFormat::ITF,
        SymbolFormat::Codabar => BarcodeFormat::CODABAR,
    }
}

// ─────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────

struct DecodeLoop {
    generation: u64,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Owns the decode loop task for at most one stream at a time
pub struct DecoderEngine {
    hints: DecodeHints,
    decoder: Arc<dyn SymbolDecoder>,
    running: Option<DecodeLoop>,
}

impl DecoderEngine {
    /// Build an engine. Nothing runs until [`DecoderEngine::start`].
    pub fn configure(hints: DecodeHints, decoder: Arc<dyn SymbolDecoder>) -> Self {
        Self {
            hints,
            decoder,
            running: None,
        }
    }

    /// Engine using the rxing reader restricted to the hinted formats
    pub fn with_rxing(hints: DecodeHints) -> Self {
        let decoder = Arc::new(RxingDecoder::new(&hints));
        Self::configure(hints, decoder)
    }

    pub fn hints(&self) -> &DecodeHints {
        &self.hints
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    /// Generation of the stream currently bound, if any
    pub fn generation(&self) -> Option<u64> {
        self.running.as_ref().map(|running| running.generation)
    }

    /// Bind `stream` and start sampling it.
    ///
    /// A loop still running from an earlier stream is stopped first, so two
    /// streams are never sampled at once.
    pub async fn start(
        &mut self,
        stream: CameraStream,
        generation: u64,
        events: mpsc::Sender<CameraEvent>,
    ) {
        self.stop().await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(decode_loop(
            stream,
            self.decoder.clone(),
            self.hints.poll_interval(),
            generation,
            events,
            shutdown_rx,
        ));

        self.running = Some(DecodeLoop {
            generation,
            shutdown_tx,
            task,
        });
    }

    /// Stop the loop and wait for it to release its stream.
    ///
    /// Idempotent; a no-op when the engine was never started.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let _ = running.shutdown_tx.send(true);
        if let Err(e) = running.task.await {
            if e.is_panic() {
                error!("Decode loop (generation {}) panicked", running.generation);
            }
        }
        debug!("Decode loop (generation {}) stopped", running.generation);
    }
}

impl Drop for DecoderEngine {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            // The aborted future drops its CameraStream guard, which releases.
            let _ = running.shutdown_tx.send(true);
            running.task.abort();
        }
    }
}

/// Run one grab + decode on the blocking pool.
///
/// Returns `None` if the attempt panicked; the stream was dropped (and so
/// released) while unwinding.
async fn attempt_decode(
    mut stream: CameraStream,
    decoder: Arc<dyn SymbolDecoder>,
) -> Option<(CameraStream, DecodeEvent)> {
    let joined = tokio::task::spawn_blocking(move || {
        let event = match stream.grab() {
            Ok(Some(frame)) => match decoder.decode(&frame) {
                Some(text) => DecodeEvent::from_text(&text),
                None => DecodeEvent::NotFound,
            },
            Ok(None) => DecodeEvent::NotFound,
            Err(e) => DecodeEvent::Fatal(e.to_string()),
        };
        (stream, event)
    })
    .await;

    joined.ok()
}

async fn decode_loop(
    mut stream: CameraStream,
    decoder: Arc<dyn SymbolDecoder>,
    poll_interval: Duration,
    generation: u64,
    events: mpsc::Sender<CameraEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    info!(
        "Decode loop started on '{}' (generation {}, every {:?})",
        stream.label(),
        generation,
        poll_interval
    );

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    debug!("Decode loop (generation {}) received shutdown", generation);
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let Some((returned, event)) = attempt_decode(stream, decoder.clone()).await else {
            error!("Decode attempt panicked (generation {})", generation);
            let _ = events
                .send(CameraEvent::Decode {
                    generation,
                    event: DecodeEvent::Fatal("decoder panicked".to_string()),
                })
                .await;
            let _ = events.try_send(CameraEvent::Released { generation });
            return;
        };
        stream = returned;

        match event {
            DecodeEvent::NotFound => {
                trace!("No symbol in frame (generation {})", generation);
                // Misses are advisory; dropping them under pressure is fine.
                if let Err(mpsc::error::TrySendError::Closed(_)) =
                    events.try_send(CameraEvent::Decode { generation, event })
                {
                    break;
                }
            }
            DecodeEvent::Decoded(ref text) => {
                debug!("Decoded '{}' (generation {})", text, generation);
                let send = events.send(CameraEvent::Decode { generation, event });
                tokio::select! {
                    sent = send => {
                        if sent.is_err() {
                            break;
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            DecodeEvent::Fatal(ref reason) => {
                warn!(
                    "Camera stream '{}' failed (generation {}): {}",
                    stream.label(),
                    generation,
                    reason
                );
                let _ = events.send(CameraEvent::Decode { generation, event }).await;
                break;
            }
        }
    }

    stream.release();
    let _ = events.try_send(CameraEvent::Released { generation });
    info!("Decode loop ended (generation {})", generation);
}
