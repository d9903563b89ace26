use super::*;
use crate::foundation::core::Rgb8;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 2,
        fps: 30,
    }
}

#[test]
fn in_memory_sink_captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = FrameRGB::filled(4, 2, Rgb8::BLACK);
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(1), &frame).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.config(), Some(&cfg()));
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, FrameIndex(1));
    assert!(sink.is_ended());
}

#[test]
fn push_before_begin_fails() {
    let mut sink = InMemorySink::new();
    let frame = FrameRGB::filled(4, 2, Rgb8::BLACK);
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame),
        Err(SketchlapseError::SinkWrite(_))
    ));
}

#[test]
fn out_of_order_and_duplicate_indices_are_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = FrameRGB::filled(4, 2, Rgb8::BLACK);
    sink.push_frame(FrameIndex(3), &frame).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame).is_err());
    assert!(sink.push_frame(FrameIndex(2), &frame).is_err());
    assert_eq!(sink.frames().len(), 1);
}

#[test]
fn wrong_frame_size_is_rejected() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = FrameRGB::filled(2, 4, Rgb8::BLACK);
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());

    let mut truncated = FrameRGB::filled(4, 2, Rgb8::BLACK);
    truncated.data.pop();
    assert!(sink.push_frame(FrameIndex(0), &truncated).is_err());
}

#[test]
fn begin_resets_previous_capture() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &FrameRGB::filled(4, 2, Rgb8::BLACK))
        .unwrap();
    sink.end().unwrap();
    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_ended());
}
