//! Still-image camera
//!
//! Replays PNG/JPEG files from a directory as if they came off a camera, in
//! file-name order, looping. A directory may hold one sub-directory per facing
//! mode (`environment/`, `user/`); otherwise the directory itself serves every
//! facing mode.

use std::path::{Path, PathBuf};

use baseconnect_core::prelude::*;
use baseconnect_core::{FacingMode, StreamConstraints};

use crate::frame::Frame;
use crate::provider::{CameraProvider, FrameSource};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// [`CameraProvider`] backed by a directory of still images
#[derive(Debug, Clone)]
pub struct FrameDirectoryProvider {
    root: PathBuf,
}

impl FrameDirectoryProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory serving `facing`
    ///
    /// Fails when the root is missing, or when it is split per facing mode and
    /// has nothing for this one.
    pub fn directory_for(&self, facing: FacingMode) -> Result<PathBuf> {
        if !self.root.is_dir() {
            return Err(Error::camera_acquisition(format!(
                "no camera device at {}",
                self.root.display()
            )));
        }

        let own = self.root.join(facing.as_str());
        if own.is_dir() {
            return Ok(own);
        }
        if self.root.join(facing.toggled().as_str()).is_dir() {
            return Err(Error::camera_acquisition(format!(
                "no {}-facing camera under {}",
                facing,
                self.root.display()
            )));
        }
        Ok(self.root.clone())
    }
}

/// Image files in `dir`, sorted by name
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    frames.sort();
    Ok(frames)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Load one image file as a luminance frame
pub fn load_frame(path: &Path) -> Result<Frame> {
    let image = image::open(path)
        .map_err(|e| Error::camera_stream(format!("{}: {}", path.display(), e)))?
        .to_luma8();
    let (width, height) = (image.width(), image.height());
    Frame::new(width, height, image.into_raw())
}

impl CameraProvider for FrameDirectoryProvider {
    async fn acquire(&self, constraints: &StreamConstraints) -> Result<Box<dyn FrameSource>> {
        let dir = self.directory_for(constraints.facing)?;
        let listing = dir.clone();
        let frames = tokio::task::spawn_blocking(move || list_frames(&listing))
            .await
            .map_err(|e| Error::camera_acquisition(e.to_string()))?
            .map_err(|e| Error::camera_acquisition(e.to_string()))?;

        if frames.is_empty() {
            return Err(Error::camera_acquisition(format!(
                "no frames in {}",
                dir.display()
            )));
        }

        info!(
            "Replaying {} frame(s) from {} as the {} camera",
            frames.len(),
            dir.display(),
            constraints.facing
        );

        Ok(Box::new(FrameDirectorySource {
            label: dir.display().to_string(),
            frames,
            next: 0,
            released: false,
        }))
    }
}

struct FrameDirectorySource {
    label: String,
    frames: Vec<PathBuf>,
    next: usize,
    released: bool,
}

impl FrameSource for FrameDirectorySource {
    fn label(&self) -> &str {
        &self.label
    }

    fn grab(&mut self) -> Result<Option<Frame>> {
        if self.released {
            return Err(Error::camera_stream("frame directory released"));
        }
        let Some(path) = self.frames.get(self.next % self.frames.len()) else {
            return Ok(None);
        };
        self.next = (self.next + 1) % self.frames.len();

        match load_frame(path) {
            Ok(frame) => Ok(Some(frame)),
            Err(e) => {
                // A single unreadable file is a dropped frame, not a dead camera.
                debug!("Skipping frame: {}", e);
                Ok(None)
            }
        }
    }

    fn release(&mut self) {
        self.released = true;
    }
}
