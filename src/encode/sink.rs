use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SketchlapseError, SketchlapseResult};
use crate::render::composite::FrameRGB;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: u32,
}

/// Consumer of composited frames in video order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order, and `end`
/// is called exactly once after a successful `begin`, whether or not every frame was pushed.
pub trait FrameSink {
    /// Acquire the output. Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> SketchlapseResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> SketchlapseResult<()>;
    /// Flush and release the output.
    fn end(&mut self) -> SketchlapseResult<()>;
}

/// Rejects frames that break the ordering or size contract of `cfg`.
pub(crate) fn check_frame(
    cfg: &SinkConfig,
    last_idx: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &FrameRGB,
) -> SketchlapseResult<()> {
    if let Some(last) = last_idx
        && idx <= last
    {
        return Err(SketchlapseError::sink_write(format!(
            "out-of-order frame index {} after {}",
            idx.0, last.0
        )));
    }
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(SketchlapseError::sink_write(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != cfg.width as usize * cfg.height as usize * 3 {
        return Err(SketchlapseError::sink_write(
            "frame.data size mismatch with width*height*3",
        ));
    }
    Ok(())
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGB)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in video order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGB)] {
        &self.frames
    }

    /// Whether `end` has been called since the last `begin`.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> SketchlapseResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> SketchlapseResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SketchlapseError::sink_write("in-memory sink not started"))?;
        check_frame(cfg, self.frames.last().map(|(i, _)| *i), idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> SketchlapseResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
