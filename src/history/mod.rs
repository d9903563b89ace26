//! Sketch histories: the event model, its JSON form and a random generator for fixtures.

/// Random history synthesis.
pub mod generate;
/// Events, logs and the JSON adapter.
pub mod model;
