//! Encoding sinks.
//!
//! Sinks consume composited frames in video order and are driven by
//! [`render_timelapse`](crate::render_timelapse).

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
