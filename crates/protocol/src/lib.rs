pub mod group;
pub mod shared_str;
pub mod theme;
pub mod trace_event;

pub use group::{GroupId, GroupStyle, VisualGroup};
pub use shared_str::SharedStr;
pub use theme::ThemeToken;
pub use trace_event::{EventDetail, PageLoadMark, Phase, TraceEvent};
