//! Device-pixel-ratio sizing for the canvas backing buffer.
//!
//! Ops are written in logical CSS pixels. The backing buffer is kept at
//! `logical × dpr` device pixels with the element's CSS size pinned to the
//! logical size, and every full redraw starts from the `dpr` scale transform.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

/// Logical canvas size and the device pixel ratio it is rendered at.
///
/// `width` / `height` are CSS pixels and never change after mount. The backing
/// buffer is `logical × dpr` device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

/// New backing-buffer and CSS dimensions for the canvas element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
    pub css_width: String,
    pub css_height: String,
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, dpr: 1.0 }
    }

    /// Backing-buffer size in device pixels at the current ratio.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).round().max(0.0) as u32,
            (self.height * self.dpr).round().max(0.0) as u32,
        )
    }

    /// Adopt `dpr` and report the resize needed, if the buffer currently
    /// measuring `current` does not match.
    ///
    /// Ratios that are not finite and positive are treated as 1.
    pub fn sync(&mut self, dpr: f64, current: (u32, u32)) -> Option<Resize> {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        let (width, height) = self.backing_size();
        if (width, height) == current {
            return None;
        }
        Some(Resize {
            width,
            height,
            css_width: format!("{}px", self.width),
            css_height: format!("{}px", self.height),
        })
    }

    /// Transform that maps logical coordinates onto the backing buffer.
    #[must_use]
    pub fn transform(&self) -> [f64; 6] {
        [self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0]
    }
}
