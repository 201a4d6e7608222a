use trackline_protocol::{EventDetail, GroupStyle, ThemeToken, TraceEvent};

use super::{
    HighlightedEntryInfo, TrackAppender, TrackAppenderName, TrackSink, append_on_single_level,
    formatted_time, track_header,
};
use crate::error::LayoutError;
use crate::layout::TrackBand;

/// Layout shifts, drawn as markers on a single row.
pub struct LayoutShiftsTrackAppender<'t> {
    shifts: &'t [TraceEvent],
}

impl<'t> LayoutShiftsTrackAppender<'t> {
    pub fn new(shifts: &'t [TraceEvent]) -> Self {
        Self { shifts }
    }
}

impl TrackAppender for LayoutShiftsTrackAppender<'_> {
    fn name(&self) -> TrackAppenderName {
        TrackAppenderName::LayoutShifts
    }

    fn append_track_at_level(
        &self,
        level: usize,
        expanded: bool,
        sink: &mut TrackSink<'_>,
    ) -> Result<usize, LayoutError> {
        if self.shifts.is_empty() {
            return Ok(level);
        }
        let style = GroupStyle {
            share_header_line: false,
            collapsible: false,
            nesting_level: 0,
        };
        sink.register_group(track_header("Layout Shifts", level, expanded, style))?;
        let next = append_on_single_level(self.shifts, level, sink)?;
        sink.register_band(TrackBand::new(level, level))?;
        Ok(next)
    }

    fn color_for_event(&self, _event: &TraceEvent) -> Result<ThemeToken, LayoutError> {
        Ok(ThemeToken::LayoutShift)
    }

    fn title_for_event(&self, _event: &TraceEvent) -> String {
        "Layout shift".to_string()
    }

    fn highlighted_entry_info(
        &self,
        event: &TraceEvent,
    ) -> Result<HighlightedEntryInfo, LayoutError> {
        let title = match event.detail {
            EventDetail::LayoutShift { score } => {
                format!("{} (score {score:.4})", self.title_for_event(event))
            }
            _ => self.title_for_event(event),
        };
        Ok(HighlightedEntryInfo {
            title,
            formatted_time: formatted_time(event.dur),
            warning: None,
        })
    }
}
