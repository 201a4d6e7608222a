use serde::{Deserialize, Serialize};
use trackline_protocol::TraceEvent;

/// The fully parsed trace, split into the slices each track consumes.
///
/// Every slice is ordered by start time (stable on ties); `parsers::chrome`
/// guarantees this and `TraceData::sort` restores it for hand-built data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraceData {
    pub timings: TimingsData,
    pub interactions: Vec<TraceEvent>,
    pub gpu_tasks: Vec<TraceEvent>,
    pub layout_shifts: Vec<TraceEvent>,
}

/// Inputs of the timings track.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimingsData {
    /// Navigation milestones (FCP, LCP, DCL, ...).
    pub page_load_marks: Vec<TraceEvent>,
    /// `performance.mark()` instants.
    pub marks: Vec<TraceEvent>,
    /// `performance.measure()` spans.
    pub measures: Vec<TraceEvent>,
    /// `console.timeStamp()` instants.
    pub console_timestamps: Vec<TraceEvent>,
    /// Start of the navigation, in µs. Page-load marks are reported
    /// relative to it.
    pub navigation_start: Option<f64>,
}

impl TimingsData {
    pub fn is_empty(&self) -> bool {
        self.page_load_marks.is_empty()
            && self.marks.is_empty()
            && self.measures.is_empty()
            && self.console_timestamps.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.page_load_marks.len()
            + self.marks.len()
            + self.measures.len()
            + self.console_timestamps.len()
    }
}

impl TraceData {
    /// Stable-sort every slice by start time.
    pub fn sort(&mut self) {
        for events in [
            &mut self.timings.page_load_marks,
            &mut self.timings.marks,
            &mut self.timings.measures,
            &mut self.timings.console_timestamps,
            &mut self.interactions,
            &mut self.gpu_tasks,
            &mut self.layout_shifts,
        ] {
            sort_by_start(events);
        }
    }

    pub fn event_count(&self) -> usize {
        self.timings.event_count()
            + self.interactions.len()
            + self.gpu_tasks.len()
            + self.layout_shifts.len()
    }
}

pub(crate) fn sort_by_start(events: &mut [TraceEvent]) {
    events.sort_by(|a, b| a.ts.total_cmp(&b.ts));
}
