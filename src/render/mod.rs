//! Canvas state, compositing and the history-to-video render loop.

/// The persistent paint canvas.
pub mod canvas;
/// Canvas-to-frame scaling.
pub mod composite;
/// Virtual-clock merge and the render entry points.
pub mod timelapse;
