use trackline_protocol::{GroupId, TraceEvent, VisualGroup};

use crate::config::INSTANT_EVENT_VISIBLE_DURATION_MS;

/// One appended event, viewed through the buffer's parallel arrays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppendedEntry<'a> {
    pub event: &'a TraceEvent,
    pub level: usize,
    pub start_time_ms: f64,
    pub total_time_ms: f64,
}

/// Append-only table shared by every track for one layout session.
///
/// The renderer reads `entry_levels`, `entry_start_times` and
/// `entry_total_times` as parallel arrays indexed by append order, plus the
/// registered track headers. Indices are handed out from zero and never
/// reused or removed.
#[derive(Debug)]
pub struct EventAppendBuffer {
    events: Vec<TraceEvent>,
    entry_levels: Vec<usize>,
    entry_start_times: Vec<f64>,
    entry_total_times: Vec<f64>,
    groups: Vec<VisualGroup>,
    instant_visible_duration_ms: f64,
}

impl Default for EventAppendBuffer {
    fn default() -> Self {
        Self::new(INSTANT_EVENT_VISIBLE_DURATION_MS)
    }
}

impl EventAppendBuffer {
    /// Instants are drawn `instant_visible_duration_ms` wide. A width that is
    /// not a positive finite number falls back to
    /// [`INSTANT_EVENT_VISIBLE_DURATION_MS`].
    pub fn new(instant_visible_duration_ms: f64) -> Self {
        let instant_visible_duration_ms =
            if instant_visible_duration_ms.is_finite() && instant_visible_duration_ms > 0.0 {
                instant_visible_duration_ms
            } else {
                log::warn!(
                    "instant width {instant_visible_duration_ms}ms is not positive; \
                     using {INSTANT_EVENT_VISIBLE_DURATION_MS}ms"
                );
                INSTANT_EVENT_VISIBLE_DURATION_MS
            };
        Self {
            events: Vec::new(),
            entry_levels: Vec::new(),
            entry_start_times: Vec::new(),
            entry_total_times: Vec::new(),
            groups: Vec::new(),
            instant_visible_duration_ms,
        }
    }

    /// Append `event` at `level` and return its index.
    ///
    /// Times are stored in milliseconds. Events without a (non-zero)
    /// duration get the instant visible width instead of zero.
    pub fn append(&mut self, event: TraceEvent, level: usize) -> usize {
        let index = self.events.len();
        let total_time_ms = match event.dur {
            Some(dur) if dur != 0.0 => dur / 1000.0,
            _ => self.instant_visible_duration_ms,
        };
        self.entry_levels.push(level);
        self.entry_start_times.push(event.ts / 1000.0);
        self.entry_total_times.push(total_time_ms);
        self.events.push(event);
        index
    }

    /// Id the next pushed group will get.
    pub fn next_group_id(&self) -> GroupId {
        GroupId(self.groups.len())
    }

    pub fn push_group(&mut self, group: VisualGroup) -> GroupId {
        self.groups.push(group);
        GroupId(self.groups.len() - 1)
    }

    pub fn entry(&self, index: usize) -> Option<AppendedEntry<'_>> {
        Some(AppendedEntry {
            event: self.events.get(index)?,
            level: self.entry_levels[index],
            start_time_ms: self.entry_start_times[index],
            total_time_ms: self.entry_total_times[index],
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = AppendedEntry<'_>> {
        (0..self.len()).filter_map(|i| self.entry(i))
    }

    pub fn entry_levels(&self) -> &[usize] {
        &self.entry_levels
    }

    pub fn entry_start_times(&self) -> &[f64] {
        &self.entry_start_times
    }

    pub fn entry_total_times(&self) -> &[f64] {
        &self.entry_total_times
    }

    pub fn groups(&self) -> &[VisualGroup] {
        &self.groups
    }

    pub fn group(&self, id: GroupId) -> Option<&VisualGroup> {
        self.groups.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
