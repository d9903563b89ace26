use super::*;
use crate::encode::sink::InMemorySink;
use crate::foundation::core::CanvasSize;

fn ev(ts: i64, x: i64, y: i64) -> Event {
    Event {
        ts,
        x,
        y,
        color: Rgb8::new(ts as u8, 0, 0),
    }
}

fn log(width: u32, height: u32, events: Vec<Event>) -> HistoryLog {
    HistoryLog::new(CanvasSize::new(width, height).unwrap(), events)
}

fn small_opts(duration_secs: u32, fps: u32) -> RenderOpts {
    RenderOpts {
        duration_secs,
        fps,
        out_width: 4,
        out_height: 4,
        ..RenderOpts::default()
    }
}

#[test]
fn defaults_match_the_cli() {
    let opts = RenderOpts::default();
    assert_eq!(opts.frame_count(), 300);
    assert_eq!((opts.out_width, opts.out_height), (1920, 1080));
    assert_eq!(opts.mode, FitMode::Fit);
    opts.validate().unwrap();
}

#[test]
fn opts_validation_rejects_degenerate_output() {
    assert!(small_opts(1, 0).validate().is_err());
    assert!(small_opts(0, 30).validate().is_err());
    assert!(
        RenderOpts {
            out_width: 0,
            ..small_opts(1, 1)
        }
        .validate()
        .is_err()
    );
}

#[test]
fn timeline_rejects_empty_and_degenerate_logs() {
    assert!(matches!(
        Timeline::new(&log(2, 2, vec![]), 10),
        Err(SketchlapseError::EmptyHistory)
    ));
    assert!(matches!(
        Timeline::new(&log(2, 2, vec![ev(5, 0, 0)]), 10),
        Err(SketchlapseError::DegenerateTimeSpan { t_min: 5, t_max: 5 })
    ));
    assert!(matches!(
        Timeline::new(&log(2, 2, vec![ev(5, 0, 0), ev(5, 1, 1)]), 10),
        Err(SketchlapseError::DegenerateTimeSpan { .. })
    ));
}

#[test]
fn timeline_step_is_real_valued() {
    let t = Timeline::new(&log(2, 2, vec![ev(0, 0, 0), ev(10, 0, 0)]), 4).unwrap();
    assert_eq!(t.time_per_frame(), 2.5);
    assert_eq!(t.virtual_ts(FrameIndex(0)), 0.0);
    assert_eq!(t.virtual_ts(FrameIndex(3)), 7.5);

    assert!(t.is_due(0, FrameIndex(0)));
    assert!(!t.is_due(1, FrameIndex(0)));
    assert!(t.is_due(5, FrameIndex(2)));
    assert!(!t.is_due(8, FrameIndex(3)));
    assert!(t.is_due(7, FrameIndex(3)));
    assert!(!t.is_due(10, FrameIndex(3)));
}

#[test]
fn timeline_handles_extreme_timestamps() {
    let t = Timeline::new(&log(2, 2, vec![ev(i64::MIN, 0, 0), ev(i64::MAX, 0, 0)]), 2).unwrap();
    assert!(t.is_due(i64::MIN, FrameIndex(0)));
    // virtual ts of frame 1 is -0.5
    assert!(t.is_due(-1, FrameIndex(1)));
    assert!(!t.is_due(0, FrameIndex(1)));
}

#[test]
fn cursor_only_moves_forward() {
    let l = log(2, 2, vec![ev(0, 0, 0), ev(4, 1, 0), ev(6, 0, 1), ev(10, 1, 1)]);
    let t = Timeline::new(&l, 2).unwrap();
    let mut canvas = Canvas::new(l.size(), Rgb8::WHITE);
    let mut cursor = EventCursor::new(l.events());

    assert_eq!(cursor.advance(&t, FrameIndex(0), &mut canvas).applied, 1);
    assert_eq!(cursor.position(), 1);
    assert_eq!(cursor.advance(&t, FrameIndex(1), &mut canvas).applied, 1);
    assert_eq!(cursor.position(), 2);
    // Re-asking for an earlier frame is a no-op.
    assert_eq!(cursor.advance(&t, FrameIndex(0), &mut canvas), Advance::default());
    assert_eq!(cursor.remaining(), 2);
}

#[test]
fn cursor_counts_out_of_bounds_events() {
    let l = log(2, 2, vec![ev(0, 5, 5), ev(0, -1, 0), ev(0, 1, 1), ev(9, 0, 0)]);
    let t = Timeline::new(&l, 1).unwrap();
    let mut canvas = Canvas::new(l.size(), Rgb8::WHITE);
    let step = EventCursor::new(l.events()).advance(&t, FrameIndex(0), &mut canvas);
    assert_eq!(
        step,
        Advance {
            applied: 1,
            out_of_bounds: 2
        }
    );
}

#[test]
fn equal_timestamps_land_in_the_same_frame() {
    // span 0..9 over 3 frames: virtual ts 0, 3, 6
    let l = log(
        3,
        1,
        vec![ev(0, 0, 0), ev(3, 0, 0), ev(3, 1, 0), ev(3, 2, 0), ev(9, 0, 0)],
    );
    let t = Timeline::new(&l, 3).unwrap();
    let mut canvas = Canvas::new(l.size(), Rgb8::WHITE);
    let mut cursor = EventCursor::new(l.events());
    cursor.advance(&t, FrameIndex(0), &mut canvas);
    assert_eq!(cursor.position(), 1);
    assert_eq!(cursor.advance(&t, FrameIndex(1), &mut canvas).applied, 3);
}

#[test]
fn render_emits_exactly_duration_times_fps_frames() {
    let l = log(2, 2, vec![ev(0, 0, 0), ev(7, 1, 1), ev(100, 0, 1)]);
    let mut sink = InMemorySink::new();
    let stats = render_timelapse(&l, &small_opts(3, 5), &mut sink).unwrap();

    assert_eq!(stats.frames_written, 15);
    assert_eq!(sink.frames().len(), 15);
    for (i, (idx, frame)) in sink.frames().iter().enumerate() {
        assert_eq!(idx.0, i as u64);
        assert_eq!((frame.width, frame.height), (4, 4));
    }
    assert!(sink.is_ended());
    assert_eq!(
        sink.config(),
        Some(&SinkConfig {
            width: 4,
            height: 4,
            fps: 5
        })
    );
}

#[test]
fn final_event_stays_pending() {
    let l = log(2, 2, vec![ev(0, 0, 0), ev(5, 1, 0), ev(10, 1, 1)]);
    let mut sink = InMemorySink::new();
    let stats = render_timelapse(&l, &small_opts(1, 2), &mut sink).unwrap();
    assert_eq!(stats.events_applied, 2);
    assert_eq!(stats.events_pending, 1);

    let last = &sink.frames()[1].1;
    // Canvas 2x2 into 4x4: pixel (1,1) covers output (2..4, 2..4).
    assert_eq!(last.pixel(3, 3), Some(Rgb8::WHITE));
    assert_eq!(last.pixel(3, 0), Some(Rgb8::new(5, 0, 0)));
}

#[test]
fn stats_account_for_every_event() {
    let events: Vec<Event> = (0..50).map(|i| ev(i * 3, i % 7 - 1, i % 3)).collect();
    let l = log(5, 2, events);
    let mut sink = InMemorySink::new();
    let stats = render_timelapse(&l, &small_opts(2, 7), &mut sink).unwrap();
    assert_eq!(
        stats.events_applied + stats.events_out_of_bounds + stats.events_pending,
        50
    );
}

#[test]
fn render_frame_at_matches_streamed_frames() {
    let l = log(
        3,
        2,
        vec![ev(0, 0, 0), ev(2, 1, 0), ev(3, 2, 1), ev(8, 0, 1), ev(12, 2, 0)],
    );
    let opts = RenderOpts {
        out_width: 9,
        out_height: 5,
        ..small_opts(2, 3)
    };
    let mut sink = InMemorySink::new();
    render_timelapse(&l, &opts, &mut sink).unwrap();

    for (idx, frame) in sink.frames() {
        assert_eq!(&render_frame_at(&l, &opts, *idx).unwrap(), frame);
    }
    assert!(render_frame_at(&l, &opts, FrameIndex(6)).is_err());
}

#[test]
fn validation_failures_never_open_the_sink() {
    let mut sink = InMemorySink::new();
    assert!(render_timelapse(&log(2, 2, vec![]), &small_opts(1, 1), &mut sink).is_err());
    assert!(sink.config().is_none());
}

#[test]
fn midpoint_event_is_due_exactly_at_its_frame() {
    // 98 frames over a span of 2: frame 49 sits exactly on ts 1. A float clock lands a hair
    // short of it.
    let log = log(2, 1, vec![ev(0, 0, 0), ev(1, 1, 0), ev(2, 1, 0)]);
    let opts = RenderOpts {
        mode: FitMode::Stretch,
        ..small_opts(49, 2)
    };
    let t = Timeline::new(&log, opts.frame_count()).unwrap();
    assert_eq!(t.frame_count(), 98);
    assert!(t.is_due(1, FrameIndex(49)));
    assert!(!t.is_due(1, FrameIndex(48)));

    // Output column 3 samples canvas column 1.
    let before = render_frame_at(&log, &opts, FrameIndex(48)).unwrap();
    assert_eq!(before.pixel(3, 0), Some(Rgb8::WHITE));
    let at = render_frame_at(&log, &opts, FrameIndex(49)).unwrap();
    assert_eq!(at.pixel(3, 0), Some(Rgb8::new(1, 0, 0)));
}
