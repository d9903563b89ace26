use crate::foundation::core::{CanvasSize, Rgb8};
use crate::foundation::error::{SketchlapseError, SketchlapseResult};
use serde::Deserialize as _;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Canvas size assumed for bare-array history files, which carry no `range`.
pub const LEGACY_CANVAS_SIZE: CanvasSize = CanvasSize {
    width: 200,
    height: 200,
};

/// One atomic single-pixel paint action.
///
/// Coordinates are kept signed and unchecked: events outside the canvas survive parsing and are
/// dropped when applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    /// Timestamp in seconds (or any monotonic unit).
    pub ts: i64,
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
    /// Paint color.
    #[serde(flatten)]
    pub color: Rgb8,
}

/// A time-sorted sketch history plus the size of the canvas it paints on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryLog {
    size: CanvasSize,
    events: Vec<Event>,
}

#[derive(serde::Deserialize)]
struct HistoryDoc {
    range: CanvasSize,
    history: Vec<Event>,
}

#[derive(serde::Serialize)]
struct HistoryDocRef<'a> {
    range: CanvasSize,
    history: &'a [Event],
}

impl HistoryLog {
    /// Build a log from events in any order.
    ///
    /// Events are stably sorted by timestamp, so events sharing a timestamp keep their input order.
    pub fn new(size: CanvasSize, mut events: Vec<Event>) -> Self {
        events.sort_by_key(|e| e.ts);
        Self { size, events }
    }

    /// Parse either `{"range": {...}, "history": [...]}` or a bare array of events.
    pub fn from_reader<R: std::io::Read>(r: R) -> SketchlapseResult<Self> {
        let value: serde_json::Value = serde_json::from_reader(r).map_err(|e| {
            if e.is_io() {
                SketchlapseError::Io(e.into())
            } else {
                SketchlapseError::malformed(format!("parse history JSON: {e}"))
            }
        })?;
        Self::from_value(value)
    }

    /// Parse a history from an in-memory JSON string.
    pub fn from_json_str(s: &str) -> SketchlapseResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a history JSON file from disk.
    pub fn from_path(path: impl AsRef<Path>) -> SketchlapseResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SketchlapseError::Io(std::io::Error::new(
                e.kind(),
                format!("open history JSON '{}': {e}", path.display()),
            ))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    fn from_value(value: serde_json::Value) -> SketchlapseResult<Self> {
        let (size, events) = match value {
            serde_json::Value::Array(_) => {
                let events = Vec::<Event>::deserialize(value).map_err(|e| {
                    SketchlapseError::malformed(format!("legacy history array: {e}"))
                })?;
                (LEGACY_CANVAS_SIZE, events)
            }
            serde_json::Value::Object(_) => {
                let doc = HistoryDoc::deserialize(value)
                    .map_err(|e| SketchlapseError::malformed(format!("history object: {e}")))?;
                let size = CanvasSize::new(doc.range.width, doc.range.height)
                    .map_err(|e| SketchlapseError::malformed(format!("history range: {e}")))?;
                (size, doc.history)
            }
            other => {
                return Err(SketchlapseError::malformed(format!(
                    "history JSON must be an object or an array, got {}",
                    json_kind(&other)
                )));
            }
        };
        tracing::debug!(
            events = events.len(),
            width = size.width,
            height = size.height,
            "parsed history"
        );
        Ok(Self::new(size, events))
    }

    /// Serialize in the structured `{range, history}` form.
    pub fn to_writer<W: Write>(&self, w: W) -> SketchlapseResult<()> {
        let doc = HistoryDocRef {
            range: self.size,
            history: &self.events,
        };
        serde_json::to_writer_pretty(w, &doc).map_err(|e| {
            if e.is_io() {
                SketchlapseError::Io(e.into())
            } else {
                SketchlapseError::Other(anyhow::Error::new(e))
            }
        })
    }

    /// Write the structured form to `path`, creating parent directories as needed.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> SketchlapseResult<()> {
        let path = path.as_ref();
        crate::foundation::fs::ensure_parent_dir(path)?;
        let mut w = BufWriter::new(File::create(path)?);
        self.to_writer(&mut w)?;
        w.flush()?;
        Ok(())
    }

    /// Canvas dimensions.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Events in timestamp order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` when the log has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// First and last timestamps, or `None` for an empty log.
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        Some((self.events.first()?.ts, self.events.last()?.ts))
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/model.rs"]
mod tests;
