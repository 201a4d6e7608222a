//! Level assignment and the shared layout tables.
//!
//! ```text
//!   TraceData ──▶ TrackAppender ──▶ level assigner ──▶ EventAppendBuffer
//!                       │                                 (level, start, total)
//!                       └──────────▶ TrackRegistry
//!                                    (level → track, group → track)
//! ```

pub mod buffer;
pub mod interval;
pub mod level;
pub mod registry;
pub mod tree;

pub use buffer::{AppendedEntry, EventAppendBuffer};
pub use interval::Interval;
pub use level::{AsyncLevelAssigner, LevelAssigner, SyncLevelAssigner};
pub use registry::{TrackBand, TrackRegistry};
pub use tree::can_build_trees;
