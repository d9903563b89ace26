/// Crate-wide result alias.
pub type SketchlapseResult<T> = Result<T, SketchlapseError>;

#[derive(thiserror::Error, Debug)]
pub enum SketchlapseError {
    #[error("empty history: the log contains no events")]
    EmptyHistory,

    #[error("degenerate time span: t_max ({t_max}) must be greater than t_min ({t_min})")]
    DegenerateTimeSpan { t_min: i64, t_max: i64 },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("sink init failure: {0}")]
    SinkInit(String),

    #[error("sink write failure: {0}")]
    SinkWrite(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SketchlapseError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn sink_init(msg: impl Into<String>) -> Self {
        Self::SinkInit(msg.into())
    }

    pub fn sink_write(msg: impl Into<String>) -> Self {
        Self::SinkWrite(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
