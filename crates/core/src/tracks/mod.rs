//! Per-category track builders.
//!
//! Each track consumes its slice of [`TraceData`], levels the events, and
//! appends them through a [`TrackSink`]. Afterwards the coordinator routes
//! per-event queries (color, title, hover info) back to the owning track.

pub mod gpu;
pub mod interactions;
pub mod layout_shifts;
pub mod timings;

use std::fmt;

use serde::{Deserialize, Serialize};
use trackline_protocol::{GroupId, GroupStyle, ThemeToken, TraceEvent, VisualGroup};

use crate::error::LayoutError;
use crate::layout::{EventAppendBuffer, LevelAssigner, TrackBand, TrackRegistry};
use crate::model::TraceData;

pub use gpu::GpuTrackAppender;
pub use interactions::InteractionsTrackAppender;
pub use layout_shifts::LayoutShiftsTrackAppender;
pub use timings::TimingsTrackAppender;

/// The closed set of tracks, in the order they are appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrackAppenderName {
    Timings,
    Interactions,
    #[serde(rename = "GPU")]
    Gpu,
    LayoutShifts,
}

impl TrackAppenderName {
    pub const ALL: [Self; 4] = [Self::Timings, Self::Interactions, Self::Gpu, Self::LayoutShifts];
}

impl fmt::Display for TrackAppenderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Timings => "Timings",
            Self::Interactions => "Interactions",
            Self::Gpu => "GPU",
            Self::LayoutShifts => "LayoutShifts",
        })
    }
}

/// What the renderer shows when an event is hovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightedEntryInfo {
    pub title: String,
    pub formatted_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Capability interface every track implements.
pub trait TrackAppender {
    fn name(&self) -> TrackAppenderName;

    /// Append the track's header and events, starting at `level`.
    ///
    /// Returns the first free level after the track. A track with nothing
    /// to show appends nothing and returns `level` unchanged.
    fn append_track_at_level(
        &self,
        level: usize,
        expanded: bool,
        sink: &mut TrackSink<'_>,
    ) -> Result<usize, LayoutError>;

    fn color_for_event(&self, event: &TraceEvent) -> Result<ThemeToken, LayoutError>;

    fn title_for_event(&self, event: &TraceEvent) -> String;

    fn highlighted_entry_info(
        &self,
        event: &TraceEvent,
    ) -> Result<HighlightedEntryInfo, LayoutError> {
        Ok(HighlightedEntryInfo {
            title: self.title_for_event(event),
            formatted_time: formatted_time(event.dur),
            warning: None,
        })
    }
}

/// Write handle a track gets while it appends.
///
/// Every append and registration is made on behalf of `owner`, so a track
/// can only ever claim levels and groups for itself.
pub struct TrackSink<'a> {
    owner: TrackAppenderName,
    buffer: &'a mut EventAppendBuffer,
    registry: &'a mut TrackRegistry,
}

impl<'a> TrackSink<'a> {
    pub fn new(
        owner: TrackAppenderName,
        buffer: &'a mut EventAppendBuffer,
        registry: &'a mut TrackRegistry,
    ) -> Self {
        Self {
            owner,
            buffer,
            registry,
        }
    }

    /// Append `event` at `level`; returns its index in the shared buffer.
    pub fn append_event_at_level(
        &mut self,
        event: &TraceEvent,
        level: usize,
    ) -> Result<usize, LayoutError> {
        self.registry.claim_level(level, self.owner)?;
        Ok(self.buffer.append(event.clone(), level))
    }

    pub fn register_group(&mut self, group: VisualGroup) -> Result<GroupId, LayoutError> {
        let id = self.buffer.next_group_id();
        self.registry.register_group(id, self.owner)?;
        Ok(self.buffer.push_group(group))
    }

    pub fn register_band(&mut self, band: TrackBand) -> Result<(), LayoutError> {
        self.registry.register_band(band, self.owner)
    }
}

/// One instance of every track, dispatching the capability interface.
pub enum Track<'t> {
    Timings(TimingsTrackAppender<'t>),
    Interactions(InteractionsTrackAppender<'t>),
    Gpu(GpuTrackAppender<'t>),
    LayoutShifts(LayoutShiftsTrackAppender<'t>),
}

impl<'t> Track<'t> {
    pub fn new(name: TrackAppenderName, trace: &'t TraceData) -> Self {
        match name {
            TrackAppenderName::Timings => {
                Self::Timings(TimingsTrackAppender::new(&trace.timings))
            }
            TrackAppenderName::Interactions => {
                Self::Interactions(InteractionsTrackAppender::new(&trace.interactions))
            }
            TrackAppenderName::Gpu => Self::Gpu(GpuTrackAppender::new(&trace.gpu_tasks)),
            TrackAppenderName::LayoutShifts => {
                Self::LayoutShifts(LayoutShiftsTrackAppender::new(&trace.layout_shifts))
            }
        }
    }

    fn appender(&self) -> &dyn TrackAppender {
        match self {
            Self::Timings(t) => t,
            Self::Interactions(t) => t,
            Self::Gpu(t) => t,
            Self::LayoutShifts(t) => t,
        }
    }
}

impl TrackAppender for Track<'_> {
    fn name(&self) -> TrackAppenderName {
        self.appender().name()
    }

    fn append_track_at_level(
        &self,
        level: usize,
        expanded: bool,
        sink: &mut TrackSink<'_>,
    ) -> Result<usize, LayoutError> {
        self.appender().append_track_at_level(level, expanded, sink)
    }

    fn color_for_event(&self, event: &TraceEvent) -> Result<ThemeToken, LayoutError> {
        self.appender().color_for_event(event)
    }

    fn title_for_event(&self, event: &TraceEvent) -> String {
        self.appender().title_for_event(event)
    }

    fn highlighted_entry_info(
        &self,
        event: &TraceEvent,
    ) -> Result<HighlightedEntryInfo, LayoutError> {
        self.appender().highlighted_entry_info(event)
    }
}

pub(crate) fn track_header(
    name: &str,
    start_level: usize,
    expanded: bool,
    style: GroupStyle,
) -> VisualGroup {
    VisualGroup {
        name: name.into(),
        start_level,
        expanded,
        selectable: true,
        style,
    }
}

/// Level `events` with `assigner` into a band starting at `start_level`.
/// Returns the first level after the band.
pub(crate) fn append_leveled(
    mut assigner: impl LevelAssigner,
    events: &[TraceEvent],
    start_level: usize,
    sink: &mut TrackSink<'_>,
) -> Result<usize, LayoutError> {
    for event in events {
        let level = start_level + assigner.assign(event);
        sink.append_event_at_level(event, level)?;
    }
    let height = assigner.max_depth();
    if let Some(band) = TrackBand::with_height(start_level, height) {
        sink.register_band(band)?;
    }
    Ok(start_level + height)
}

/// Put every event on `level`. Used for instants drawn as markers, which
/// may visually overlap.
pub(crate) fn append_on_single_level(
    events: &[TraceEvent],
    level: usize,
    sink: &mut TrackSink<'_>,
) -> Result<usize, LayoutError> {
    if events.is_empty() {
        return Ok(level);
    }
    for event in events {
        sink.append_event_at_level(event, level)?;
    }
    Ok(level + 1)
}

/// Human-readable duration of a µs value.
pub fn format_duration_us(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.2}s", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.1}ms", value / 1_000.0)
    } else {
        format!("{value:.0}µs")
    }
}

/// Hover time for an event duration; empty for instants.
pub fn formatted_time(dur: Option<f64>) -> String {
    match dur {
        Some(d) if d != 0.0 => format_duration_us(d),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration_us(500.0), "500µs");
        assert_eq!(format_duration_us(1_500.0), "1.5ms");
        assert_eq!(format_duration_us(2_500_000.0), "2.50s");
        assert_eq!(formatted_time(None), "");
        assert_eq!(formatted_time(Some(0.0)), "");
        assert_eq!(formatted_time(Some(250_000.0)), "250.0ms");
    }

    #[test]
    fn names_serialize_like_the_panel() {
        let json = serde_json::to_string(&TrackAppenderName::ALL).unwrap();
        assert_eq!(json, r#"["Timings","Interactions","GPU","LayoutShifts"]"#);
        assert_eq!(TrackAppenderName::Gpu.to_string(), "GPU");
    }

    #[test]
    fn declared_order_is_ordering() {
        let mut names = vec![TrackAppenderName::LayoutShifts, TrackAppenderName::Timings];
        names.sort();
        assert_eq!(
            names,
            vec![TrackAppenderName::Timings, TrackAppenderName::LayoutShifts]
        );
    }

    #[test]
    fn sink_claims_levels_for_its_owner() {
        let mut buffer = EventAppendBuffer::default();
        let mut registry = TrackRegistry::new();
        let mut sink = TrackSink::new(TrackAppenderName::Gpu, &mut buffer, &mut registry);
        let index = sink
            .append_event_at_level(&TraceEvent::complete("GPUTask", 0.0, 5.0), 7)
            .unwrap();
        let group = sink
            .register_group(track_header("GPU", 7, false, GroupStyle::default()))
            .unwrap();
        assert_eq!(index, 0);
        assert_eq!(registry.owner_of_level(7), Ok(TrackAppenderName::Gpu));
        assert_eq!(registry.owner_of_group(group), Ok(TrackAppenderName::Gpu));
        assert_eq!(buffer.groups().len(), 1);
    }

    #[test]
    fn rejected_group_leaves_no_header() {
        let mut buffer = EventAppendBuffer::default();
        let mut registry = TrackRegistry::new();
        registry
            .register_group(GroupId(0), TrackAppenderName::Timings)
            .unwrap();
        let mut sink = TrackSink::new(TrackAppenderName::Gpu, &mut buffer, &mut registry);
        let err = sink
            .register_group(track_header("GPU", 0, false, GroupStyle::default()))
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::GroupConflict {
                group: GroupId(0),
                owner: TrackAppenderName::Timings,
                claimant: TrackAppenderName::Gpu,
            }
        );
        assert!(buffer.groups().is_empty());
    }

    #[test]
    fn single_level_skips_empty_input() {
        let mut buffer = EventAppendBuffer::default();
        let mut registry = TrackRegistry::new();
        let mut sink =
            TrackSink::new(TrackAppenderName::LayoutShifts, &mut buffer, &mut registry);
        assert_eq!(append_on_single_level(&[], 3, &mut sink).unwrap(), 3);
        assert!(buffer.is_empty());
    }
}
