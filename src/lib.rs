//! Sketchlapse turns a timestamped log of single-pixel paint events into a fixed-length
//! timelapse video.
//!
//! - Load a [`HistoryLog`] (structured `{range, history}` JSON or a legacy bare array)
//! - Describe the video with [`RenderOpts`]
//! - Stream frames into a [`FrameSink`] with [`render_timelapse`], e.g. an [`FfmpegSink`]
//!
//! [`generate`] synthesizes random histories for fixtures and demos.
#![forbid(unsafe_code)]

mod foundation;

/// Encoding sinks.
pub mod encode;
pub mod history;
/// Rendering: canvas, compositing and the virtual-clock merge.
pub mod render;

pub use crate::foundation::core::{CanvasSize, FrameIndex, Rgb8};
pub use crate::foundation::error::{SketchlapseError, SketchlapseResult};
pub use crate::foundation::fs::ensure_parent_dir;

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::history::generate::{GenerateOpts, generate, generate_to_writer, generate_with_rng};
pub use crate::history::model::{Event, HistoryLog, LEGACY_CANVAS_SIZE};
pub use crate::render::canvas::Canvas;
pub use crate::render::composite::{Compositor, FitMode, FrameRGB, Placement, composite};
pub use crate::render::timelapse::{
    Advance, EventCursor, RenderOpts, RenderStats, Timeline, render_frame_at, render_timelapse,
};
