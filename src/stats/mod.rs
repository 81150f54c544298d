//! Player statistics driven by match events

pub mod updater;

pub use updater::{parse_assist_id, StatChange, StatKind, StatUpdater};
