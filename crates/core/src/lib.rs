pub mod config;
pub mod coordinator;
pub mod error;
pub mod layout;
pub mod model;
pub mod parsers;
pub mod tracks;

pub use config::LayoutConfig;
pub use coordinator::{SessionState, TracksCoordinator};
pub use error::LayoutError;
pub use model::TraceData;
pub use tracks::{HighlightedEntryInfo, TrackAppender, TrackAppenderName};
