use trackline_protocol::{EventDetail, GroupStyle, ThemeToken, TraceEvent};

use super::{
    HighlightedEntryInfo, TrackAppender, TrackAppenderName, TrackSink, append_leveled,
    formatted_time, track_header,
};
use crate::error::LayoutError;
use crate::layout::AsyncLevelAssigner;

/// Interactions slower than this (µs) get a responsiveness warning.
pub const LONG_INTERACTION_THRESHOLD_US: f64 = 200_000.0;

const POINTER_EVENT_TYPES: &[&str] = &[
    "pointerdown",
    "pointerup",
    "pointercancel",
    "pointerover",
    "pointerout",
    "pointerenter",
    "pointerleave",
    "gotpointercapture",
    "lostpointercapture",
    "mousedown",
    "mouseup",
    "click",
    "dblclick",
    "auxclick",
    "contextmenu",
];

const KEYBOARD_EVENT_TYPES: &[&str] = &["keydown", "keyup", "keypress"];

/// User interactions (clicks, key presses). They overlap freely, so rows are
/// first-fit packed.
pub struct InteractionsTrackAppender<'t> {
    interactions: &'t [TraceEvent],
}

impl<'t> InteractionsTrackAppender<'t> {
    pub fn new(interactions: &'t [TraceEvent]) -> Self {
        Self { interactions }
    }
}

impl TrackAppender for InteractionsTrackAppender<'_> {
    fn name(&self) -> TrackAppenderName {
        TrackAppenderName::Interactions
    }

    fn append_track_at_level(
        &self,
        level: usize,
        expanded: bool,
        sink: &mut TrackSink<'_>,
    ) -> Result<usize, LayoutError> {
        if self.interactions.is_empty() {
            return Ok(level);
        }
        let style = GroupStyle {
            share_header_line: false,
            collapsible: true,
            nesting_level: 0,
        };
        sink.register_group(track_header("Interactions", level, expanded, style))?;
        append_leveled(AsyncLevelAssigner::new(), self.interactions, level, sink)
    }

    fn color_for_event(&self, event: &TraceEvent) -> Result<ThemeToken, LayoutError> {
        match &event.detail {
            EventDetail::Interaction { interaction_id, .. } => {
                Ok(ThemeToken::interaction(*interaction_id))
            }
            _ => Err(LayoutError::UnexpectedEvent {
                track: self.name(),
                name: event.name.to_string(),
            }),
        }
    }

    fn title_for_event(&self, event: &TraceEvent) -> String {
        let EventDetail::Interaction {
            interaction_type, ..
        } = &event.detail
        else {
            return event.name.to_string();
        };
        let kind = interaction_type.as_str();
        if POINTER_EVENT_TYPES.contains(&kind) {
            "Pointer".to_string()
        } else if KEYBOARD_EVENT_TYPES.contains(&kind) {
            "Keyboard".to_string()
        } else {
            "Other".to_string()
        }
    }

    fn highlighted_entry_info(
        &self,
        event: &TraceEvent,
    ) -> Result<HighlightedEntryInfo, LayoutError> {
        let warning = event
            .dur
            .is_some_and(|d| d > LONG_INTERACTION_THRESHOLD_US)
            .then(|| "Long interaction is indicating poor page responsiveness.".to_string());
        Ok(HighlightedEntryInfo {
            title: self.title_for_event(event),
            formatted_time: formatted_time(event.dur),
            warning,
        })
    }
}
