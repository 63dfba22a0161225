//! Test utilities for camera sessions
//!
//! [`ScriptedProvider`] hands out sources that replay a fixed list of
//! [`FrameStep`]s per facing mode and counts every acquisition and release.
//! [`ScriptedDecoder`] reads symbols back out of frames built with
//! [`symbol_frame`], so tests never depend on a real barcode reader.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use baseconnect_core::prelude::*;
use baseconnect_core::{FacingMode, StreamConstraints};

use crate::decoder::SymbolDecoder;
use crate::frame::Frame;
use crate::provider::{CameraProvider, FrameSource};

/// One scripted grab
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStep {
    /// No frame ready yet
    Empty,
    /// A frame with nothing to read
    Blank,
    /// A frame carrying this symbol text
    Symbol(String),
    /// The stream dies with this reason
    Fail(String),
}

/// Frame whose pixels spell `text`, readable by [`ScriptedDecoder`]
pub fn symbol_frame(text: &str) -> Frame {
    if text.is_empty() {
        return Frame::blank(8, 8);
    }
    Frame::new(text.len() as u32, 1, text.as_bytes().to_vec()).unwrap_or_else(|_| Frame::blank(8, 8))
}

/// Decoder that reads frames produced by [`symbol_frame`].
///
/// Blank frames are `0xff` bytes, which are never valid UTF-8, so they miss.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedDecoder;

impl SymbolDecoder for ScriptedDecoder {
    fn decode(&self, frame: &Frame) -> Option<String> {
        std::str::from_utf8(frame.luma()).ok().map(str::to_string)
    }
}

#[derive(Default)]
struct Counters {
    acquisitions: AtomicUsize,
    releases: AtomicUsize,
    live: AtomicUsize,
    max_live: AtomicUsize,
}

#[derive(Default)]
struct ScriptedInner {
    scripts: Mutex<HashMap<FacingMode, Vec<FrameStep>>>,
    failures: Mutex<VecDeque<String>>,
    facings: Mutex<Vec<FacingMode>>,
    acquire_delay: Mutex<Duration>,
    counters: Counters,
}

/// Camera provider driven by per-facing scripts
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    inner: Arc<ScriptedInner>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames replayed by every stream acquired for `facing`
    pub fn with_script(self, facing: FacingMode, steps: Vec<FrameStep>) -> Self {
        self.set_script(facing, steps);
        self
    }

    /// Hold every acquisition for `delay` before it resolves
    pub fn with_acquire_delay(self, delay: Duration) -> Self {
        if let Ok(mut current) = self.inner.acquire_delay.lock() {
            *current = delay;
        }
        self
    }

    pub fn set_script(&self, facing: FacingMode, steps: Vec<FrameStep>) {
        if let Ok(mut scripts) = self.inner.scripts.lock() {
            scripts.insert(facing, steps);
        }
    }

    /// Make the next acquisition fail with `reason`
    pub fn fail_next_acquire(&self, reason: impl Into<String>) {
        if let Ok(mut failures) = self.inner.failures.lock() {
            failures.push_back(reason.into());
        }
    }

    /// Successful acquisitions so far
    pub fn acquisitions(&self) -> usize {
        self.inner.counters.acquisitions.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.inner.counters.releases.load(Ordering::SeqCst)
    }

    /// Streams acquired and not yet released
    pub fn live_streams(&self) -> usize {
        self.inner.counters.live.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously bound streams ever observed
    pub fn max_live_streams(&self) -> usize {
        self.inner.counters.max_live.load(Ordering::SeqCst)
    }

    /// Facing mode of every acquisition attempt, in order
    pub fn acquired_facings(&self) -> Vec<FacingMode> {
        self.inner
            .facings
            .lock()
            .map(|f| f.clone())
            .unwrap_or_default()
    }
}

impl CameraProvider for ScriptedProvider {
    async fn acquire(&self, constraints: &StreamConstraints) -> Result<Box<dyn FrameSource>> {
        if let Ok(mut facings) = self.inner.facings.lock() {
            facings.push(constraints.facing);
        }

        let delay = self
            .inner
            .acquire_delay
            .lock()
            .map(|d| *d)
            .unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let failure = self
            .inner
            .failures
            .lock()
            .ok()
            .and_then(|mut failures| failures.pop_front());
        if let Some(reason) = failure {
            return Err(Error::camera_acquisition(reason));
        }

        let steps = self
            .inner
            .scripts
            .lock()
            .ok()
            .and_then(|scripts| scripts.get(&constraints.facing).cloned())
            .unwrap_or_default();

        let counters = &self.inner.counters;
        counters.acquisitions.fetch_add(1, Ordering::SeqCst);
        let live = counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        counters.max_live.fetch_max(live, Ordering::SeqCst);

        Ok(Box::new(ScriptedSource {
            label: format!("scripted-{}", constraints.facing),
            steps: steps.into(),
            inner: self.inner.clone(),
            released: false,
        }))
    }
}

struct ScriptedSource {
    label: String,
    steps: VecDeque<FrameStep>,
    inner: Arc<ScriptedInner>,
    released: bool,
}

impl FrameSource for ScriptedSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn grab(&mut self) -> Result<Option<Frame>> {
        match self.steps.pop_front() {
            None | Some(FrameStep::Empty) => Ok(None),
            Some(FrameStep::Blank) => Ok(Some(Frame::blank(8, 8))),
            Some(FrameStep::Symbol(text)) => Ok(Some(symbol_frame(&text))),
            Some(FrameStep::Fail(reason)) => Err(Error::camera_stream(reason)),
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.inner.counters.live.fetch_sub(1, Ordering::SeqCst);
        self.inner.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for ScriptedSource {
    fn drop(&mut self) {
        // Leaked sources stay counted as live.
        if !self.released {
            warn!("ScriptedSource '{}' dropped without release", self.label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_frame_round_trips_through_decoder() {
        let frame = symbol_frame("UNKNOWN-CODE");
        assert_eq!(ScriptedDecoder.decode(&frame).as_deref(), Some("UNKNOWN-CODE"));
        assert_eq!(ScriptedDecoder.decode(&Frame::blank(4, 4)), None);
    }

    #[tokio::test]
    async fn test_scripted_failure_is_consumed_once() {
        let provider = ScriptedProvider::new();
        provider.fail_next_acquire("permission denied");
        let constraints = StreamConstraints::default();

        let err = provider.acquire(&constraints).await.err().unwrap();
        assert!(matches!(err, Error::CameraAcquisition { .. }));

        let mut source = provider.acquire(&constraints).await.unwrap();
        assert_eq!(provider.live_streams(), 1);
        source.release();
        source.release();
        assert_eq!(provider.live_streams(), 0);
        assert_eq!(provider.releases(), 1);
        assert_eq!(
            provider.acquired_facings(),
            vec![FacingMode::Environment, FacingMode::Environment]
        );
    }
}
