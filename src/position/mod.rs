//! Reading-position tracking and its debounced persistence.

pub mod debounce;
pub mod tracker;

pub use debounce::{DebouncedWriter, DEFAULT_WINDOW};
pub use tracker::{spawn_position_writer, PositionTracker, PositionUpdate, PositionWriter};
