use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, Rgb8};
use crate::foundation::error::{SketchlapseError, SketchlapseResult};
use crate::history::model::{Event, HistoryLog};
use crate::render::canvas::Canvas;
use crate::render::composite::{Compositor, FitMode, FrameRGB};

/// Options for [`render_timelapse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOpts {
    /// Video length in seconds.
    pub duration_secs: u32,
    /// Output frames-per-second.
    pub fps: u32,
    /// Output frame width in pixels.
    pub out_width: u32,
    /// Output frame height in pixels.
    pub out_height: u32,
    /// Canvas-to-frame mapping.
    pub mode: FitMode,
    /// Color the source canvas starts out as.
    pub canvas_bg: Rgb8,
    /// Color of the letterbox margins in [`FitMode::Fit`].
    pub margin_bg: Rgb8,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            duration_secs: 10,
            fps: 30,
            out_width: 1920,
            out_height: 1080,
            mode: FitMode::Fit,
            canvas_bg: Rgb8::WHITE,
            margin_bg: Rgb8::BLACK,
        }
    }
}

impl RenderOpts {
    /// Reject options that cannot produce a non-empty video.
    pub fn validate(&self) -> SketchlapseResult<()> {
        if self.fps == 0 {
            return Err(SketchlapseError::validation("fps must be non-zero"));
        }
        if self.frame_count() == 0 {
            return Err(SketchlapseError::validation(
                "duration_secs * fps must be at least one frame",
            ));
        }
        if self.out_width == 0 || self.out_height == 0 {
            return Err(SketchlapseError::validation(format!(
                "output size must be non-zero, got {}x{}",
                self.out_width, self.out_height
            )));
        }
        Ok(())
    }

    /// Total number of frames in the video.
    pub fn frame_count(&self) -> u64 {
        u64::from(self.duration_secs) * u64::from(self.fps)
    }
}

/// Maps output frames onto the history's time span.
///
/// Frame `i` sits at `virtual_ts(i) = t_min + i * (t_max - t_min) / frame_count`. Due-ness is
/// decided with exact integer arithmetic, so it never drifts with the frame index. The last frame
/// sits one step short of `t_max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeline {
    t_min: i64,
    t_max: i64,
    frame_count: u64,
}

impl Timeline {
    pub fn new(log: &HistoryLog, frame_count: u64) -> SketchlapseResult<Self> {
        let (t_min, t_max) = log.time_bounds().ok_or(SketchlapseError::EmptyHistory)?;
        if t_max <= t_min {
            return Err(SketchlapseError::DegenerateTimeSpan { t_min, t_max });
        }
        if frame_count == 0 {
            return Err(SketchlapseError::validation("frame count must be non-zero"));
        }
        Ok(Self {
            t_min,
            t_max,
            frame_count,
        })
    }

    pub fn t_min(&self) -> i64 {
        self.t_min
    }

    pub fn t_max(&self) -> i64 {
        self.t_max
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Real-valued virtual clock step between consecutive frames.
    pub fn time_per_frame(&self) -> f64 {
        self.span() as f64 / self.frame_count as f64
    }

    /// Virtual timestamp of `idx`, for reporting.
    pub fn virtual_ts(&self, idx: FrameIndex) -> f64 {
        self.t_min as f64 + idx.0 as f64 * self.time_per_frame()
    }

    /// Whether an event at `ts` is due by frame `idx`, i.e. `ts <= virtual_ts(idx)`.
    pub fn is_due(&self, ts: i64, idx: FrameIndex) -> bool {
        if ts <= self.t_min {
            return true;
        }
        let offset = (i128::from(ts) - i128::from(self.t_min)) as u128;
        offset * u128::from(self.frame_count) <= u128::from(idx.0) * self.span()
    }

    fn span(&self) -> u128 {
        (i128::from(self.t_max) - i128::from(self.t_min)) as u128
    }
}

/// Outcome of one [`EventCursor::advance`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    /// Events that painted a pixel.
    pub applied: usize,
    /// Events consumed without effect because they fell off the canvas.
    pub out_of_bounds: usize,
}

/// Forward-only read position in a time-sorted event slice.
#[derive(Clone, Debug)]
pub struct EventCursor<'a> {
    events: &'a [Event],
    pos: usize,
}

impl<'a> EventCursor<'a> {
    pub fn new(events: &'a [Event]) -> Self {
        Self { events, pos: 0 }
    }

    /// Index of the next unapplied event.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of events not yet consumed.
    pub fn remaining(&self) -> usize {
        self.events.len() - self.pos
    }

    /// Apply, in log order, every pending event that is due by frame `idx`.
    pub fn advance(&mut self, timeline: &Timeline, idx: FrameIndex, canvas: &mut Canvas) -> Advance {
        let mut out = Advance::default();
        while let Some(event) = self.events.get(self.pos)
            && timeline.is_due(event.ts, idx)
        {
            if canvas.apply(event) {
                out.applied += 1;
            } else {
                out.out_of_bounds += 1;
            }
            self.pos += 1;
        }
        out
    }
}

/// Summary of a completed render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub frames_written: u64,
    pub events_applied: u64,
    pub events_out_of_bounds: u64,
    /// Events never reached because they were due after the last frame's virtual time.
    pub events_pending: u64,
}

/// Render `log` into `sink` as `opts.frame_count()` frames.
///
/// All validation happens before the sink is opened. Once `begin` succeeds, `end` is called on
/// every exit path; if the render already failed, the error from `end` is logged and the original
/// error returned.
#[tracing::instrument(skip(log, opts, sink), fields(events = log.len(), frames = opts.frame_count()))]
pub fn render_timelapse(
    log: &HistoryLog,
    opts: &RenderOpts,
    sink: &mut dyn FrameSink,
) -> SketchlapseResult<RenderStats> {
    opts.validate()?;
    let timeline = Timeline::new(log, opts.frame_count())?;
    let compositor = Compositor::new(
        log.size(),
        opts.out_width,
        opts.out_height,
        opts.mode,
        opts.margin_bg,
    )?;
    tracing::debug!(
        t_min = timeline.t_min(),
        t_max = timeline.t_max(),
        time_per_frame = timeline.time_per_frame(),
        placement = ?compositor.placement(),
        "starting render"
    );

    sink.begin(SinkConfig {
        width: opts.out_width,
        height: opts.out_height,
        fps: opts.fps,
    })?;

    match write_frames(log, opts, &timeline, &compositor, sink) {
        Ok(stats) => {
            sink.end()?;
            if stats.events_pending > 0 {
                tracing::info!(
                    pending = stats.events_pending,
                    "events after the last frame's virtual time were not drawn"
                );
            }
            tracing::info!(
                frames = stats.frames_written,
                applied = stats.events_applied,
                out_of_bounds = stats.events_out_of_bounds,
                "render finished"
            );
            Ok(stats)
        }
        Err(err) => {
            if let Err(end_err) = sink.end() {
                tracing::warn!(error = %end_err, "failed to finalize sink after render error");
            }
            Err(err)
        }
    }
}

fn write_frames(
    log: &HistoryLog,
    opts: &RenderOpts,
    timeline: &Timeline,
    compositor: &Compositor,
    sink: &mut dyn FrameSink,
) -> SketchlapseResult<RenderStats> {
    let mut canvas = Canvas::new(log.size(), opts.canvas_bg);
    let mut cursor = EventCursor::new(log.events());
    let mut frame = compositor.new_frame();
    let mut stats = RenderStats::default();

    for i in 0..timeline.frame_count() {
        let idx = FrameIndex(i);
        let step = cursor.advance(timeline, idx, &mut canvas);
        stats.events_applied += step.applied as u64;
        stats.events_out_of_bounds += step.out_of_bounds as u64;

        compositor.compose(&canvas, &mut frame)?;
        sink.push_frame(idx, &frame)?;
        stats.frames_written += 1;

        tracing::trace!(
            frame = i,
            virtual_ts = timeline.virtual_ts(idx),
            applied = step.applied,
            cursor = cursor.position(),
            "frame written"
        );
    }

    stats.events_pending = cursor.remaining() as u64;
    Ok(stats)
}

/// Render the single composited frame `idx` of the timelapse `opts` describes.
///
/// Produces the same pixels as frame `idx` of [`render_timelapse`].
pub fn render_frame_at(
    log: &HistoryLog,
    opts: &RenderOpts,
    idx: FrameIndex,
) -> SketchlapseResult<FrameRGB> {
    opts.validate()?;
    let timeline = Timeline::new(log, opts.frame_count())?;
    if idx.0 >= timeline.frame_count() {
        return Err(SketchlapseError::validation(format!(
            "frame {} is out of range for a {}-frame video",
            idx.0,
            timeline.frame_count()
        )));
    }
    let compositor = Compositor::new(
        log.size(),
        opts.out_width,
        opts.out_height,
        opts.mode,
        opts.margin_bg,
    )?;

    let mut canvas = Canvas::new(log.size(), opts.canvas_bg);
    EventCursor::new(log.events()).advance(&timeline, idx, &mut canvas);

    let mut frame = compositor.new_frame();
    compositor.compose(&canvas, &mut frame)?;
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/render/timelapse.rs"]
mod tests;
