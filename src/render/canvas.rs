use crate::foundation::core::{CanvasSize, Rgb8};
use crate::history::model::Event;

/// Persistent source raster that events paint into.
///
/// Row-major RGB8 buffer. Never resized after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: CanvasSize,
    data: Vec<u8>,
}

impl Canvas {
    /// Allocate a canvas filled with `bg`.
    pub fn new(size: CanvasSize, bg: Rgb8) -> Self {
        let data = bg.to_array().repeat(size.pixel_count());
        Self { size, data }
    }

    /// Canvas dimensions.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Tightly packed RGB8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Color at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        let i = self.offset(i64::from(x), i64::from(y))?;
        Some(Rgb8::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Paint one event. Returns `false` (and leaves the canvas untouched) when the event lies
    /// outside the canvas.
    pub fn apply(&mut self, event: &Event) -> bool {
        let Some(i) = self.offset(event.x, event.y) else {
            return false;
        };
        self.data[i..i + 3].copy_from_slice(&event.color.to_array());
        true
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if !self.size.contains(x, y) {
            return None;
        }
        Some((y as usize * self.size.width as usize + x as usize) * 3)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
