//! Grayscale frame buffer handed from a stream to the decoder

use baseconnect_core::prelude::*;

/// One 8-bit luminance frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    luma: Vec<u8>,
}

impl Frame {
    /// Wrap a row-major luminance buffer. The buffer must hold exactly
    /// `width * height` bytes.
    pub fn new(width: u32, height: u32, luma: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if width == 0 || height == 0 || luma.len() != expected {
            return Err(Error::camera_stream(format!(
                "frame buffer of {} bytes does not match {}x{}",
                luma.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            luma,
        })
    }

    /// Uniform frame, useful as a "nothing in view" placeholder
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            luma: vec![0xff; width.max(1) as usize * height.max(1) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn luma(&self) -> &[u8] {
        &self.luma
    }

    pub fn into_luma(self) -> Vec<u8> {
        self.luma
    }
}
