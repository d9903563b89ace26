use crate::foundation::core::{CanvasSize, Rgb8};
use crate::foundation::error::{SketchlapseError, SketchlapseResult};
use crate::history::model::{Event, HistoryLog};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::io::Write;

/// Options for synthesizing a random history.
#[derive(Clone, Debug)]
pub struct GenerateOpts {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of events to emit.
    pub num_events: usize,
    /// Timestamp the first gap is added to. `None` means the current unix time.
    pub start_time: Option<i64>,
    /// Upper bound (inclusive) of the gap between consecutive events.
    pub max_interval: u32,
    /// Seed for reproducible output. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for GenerateOpts {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
            num_events: 500,
            start_time: None,
            max_interval: 10,
            seed: None,
        }
    }
}

impl GenerateOpts {
    /// Reject options that cannot produce a valid history.
    pub fn validate(&self) -> SketchlapseResult<()> {
        CanvasSize::new(self.width, self.height)?;
        if self.max_interval == 0 {
            return Err(SketchlapseError::validation(
                "max_interval must be >= 1 so timestamps strictly increase",
            ));
        }
        Ok(())
    }
}

/// Generate a random history with strictly increasing timestamps.
#[tracing::instrument(skip(opts), fields(num_events = opts.num_events))]
pub fn generate(opts: &GenerateOpts) -> SketchlapseResult<HistoryLog> {
    let start_time = match opts.start_time {
        Some(t) => t,
        None => unix_now()?,
    };
    match opts.seed {
        Some(seed) => generate_with_rng(opts, start_time, &mut ChaCha8Rng::seed_from_u64(seed)),
        None => generate_with_rng(opts, start_time, &mut rand::thread_rng()),
    }
}

/// Generate with an explicit start time and RNG.
pub fn generate_with_rng<R: Rng>(
    opts: &GenerateOpts,
    start_time: i64,
    rng: &mut R,
) -> SketchlapseResult<HistoryLog> {
    opts.validate()?;
    let size = CanvasSize::new(opts.width, opts.height)?;

    let mut events = Vec::with_capacity(opts.num_events);
    let mut ts = start_time;
    for _ in 0..opts.num_events {
        let gap = i64::from(rng.gen_range(1..=opts.max_interval));
        ts = ts.checked_add(gap).ok_or_else(|| {
            SketchlapseError::validation("generated timestamp overflowed i64; lower start_time")
        })?;
        events.push(Event {
            ts,
            x: rng.gen_range(0..i64::from(size.width)),
            y: rng.gen_range(0..i64::from(size.height)),
            color: Rgb8::new(rng.r#gen(), rng.r#gen(), rng.r#gen()),
        });
    }

    tracing::debug!(
        events = events.len(),
        first_ts = events.first().map(|e| e.ts),
        last_ts = events.last().map(|e| e.ts),
        "generated history"
    );
    Ok(HistoryLog::new(size, events))
}

/// Generate a history and serialize it to `w` in the structured form.
pub fn generate_to_writer<W: Write>(opts: &GenerateOpts, w: W) -> SketchlapseResult<HistoryLog> {
    let log = generate(opts)?;
    log.to_writer(w)?;
    Ok(log)
}

fn unix_now() -> SketchlapseResult<i64> {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|e| SketchlapseError::Other(anyhow::Error::new(e)))?
        .as_secs();
    i64::try_from(secs).map_err(|e| SketchlapseError::Other(anyhow::Error::new(e)))
}

#[cfg(test)]
#[path = "../../tests/unit/history/generate.rs"]
mod tests;
