use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// Opaque handle to a track header registered in the layout buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub usize);

/// A track header as the renderer sees it: a titled, optionally
/// collapsible strip that starts at `start_level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualGroup {
    pub name: SharedStr,
    /// First level of the track's band.
    pub start_level: usize,
    pub expanded: bool,
    /// Whether selecting the header feeds its events to the tree views.
    pub selectable: bool,
    pub style: GroupStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupStyle {
    /// Draw the first row of events on the header line itself.
    pub share_header_line: bool,
    pub collapsible: bool,
    /// Indentation depth for nested track headers.
    pub nesting_level: u32,
}
