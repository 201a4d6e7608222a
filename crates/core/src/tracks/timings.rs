use trackline_protocol::{EventDetail, GroupStyle, PageLoadMark, ThemeToken, TraceEvent};

use super::{
    HighlightedEntryInfo, TrackAppender, TrackAppenderName, TrackSink, append_leveled,
    append_on_single_level, format_duration_us, formatted_time, track_header,
};
use crate::error::LayoutError;
use crate::layout::{AsyncLevelAssigner, TrackBand};
use crate::model::TimingsData;

/// Page-load milestones, user timings and console timestamps.
///
/// Layout, top to bottom: one row of page-load markers, then marks,
/// measures and console timestamps, each packed into its own stack of rows.
pub struct TimingsTrackAppender<'t> {
    data: &'t TimingsData,
}

impl<'t> TimingsTrackAppender<'t> {
    pub fn new(data: &'t TimingsData) -> Self {
        Self { data }
    }

    fn append_page_load_marks(
        &self,
        level: usize,
        sink: &mut TrackSink<'_>,
    ) -> Result<usize, LayoutError> {
        let next = append_on_single_level(&self.data.page_load_marks, level, sink)?;
        if next > level {
            sink.register_band(TrackBand::new(level, level))?;
        }
        Ok(next)
    }
}

impl TrackAppender for TimingsTrackAppender<'_> {
    fn name(&self) -> TrackAppenderName {
        TrackAppenderName::Timings
    }

    fn append_track_at_level(
        &self,
        level: usize,
        expanded: bool,
        sink: &mut TrackSink<'_>,
    ) -> Result<usize, LayoutError> {
        if self.data.is_empty() {
            return Ok(level);
        }
        let style = GroupStyle {
            share_header_line: true,
            collapsible: true,
            nesting_level: 0,
        };
        sink.register_group(track_header("Timings", level, expanded, style))?;

        let mut next = self.append_page_load_marks(level, sink)?;
        for events in [
            &self.data.marks,
            &self.data.measures,
            &self.data.console_timestamps,
        ] {
            next = append_leveled(AsyncLevelAssigner::new(), events, next, sink)?;
        }
        Ok(next)
    }

    fn color_for_event(&self, event: &TraceEvent) -> Result<ThemeToken, LayoutError> {
        Ok(match &event.detail {
            EventDetail::PageLoad { mark } => match mark {
                PageLoadMark::NavigationStart => ThemeToken::NavigationStart,
                PageLoadMark::FirstPaint => ThemeToken::FirstPaint,
                PageLoadMark::FirstContentfulPaint => ThemeToken::FirstContentfulPaint,
                PageLoadMark::LargestContentfulPaint => ThemeToken::LargestContentfulPaint,
                PageLoadMark::DomContentLoaded => ThemeToken::DomContentLoaded,
                PageLoadMark::Load => ThemeToken::LoadEvent,
            },
            EventDetail::ConsoleTimestamp { .. } => ThemeToken::ConsoleTimestamp,
            _ if event.is_instant() => ThemeToken::UserTimingMark,
            _ => ThemeToken::UserTimingMeasure,
        })
    }

    fn title_for_event(&self, event: &TraceEvent) -> String {
        match &event.detail {
            EventDetail::PageLoad { mark } => mark.label().to_string(),
            EventDetail::ConsoleTimestamp { message } => format!("TimeStamp: {message}"),
            _ => event.name.to_string(),
        }
    }

    fn highlighted_entry_info(
        &self,
        event: &TraceEvent,
    ) -> Result<HighlightedEntryInfo, LayoutError> {
        let formatted_time = match (&event.detail, self.data.navigation_start) {
            // Milestones are reported as time since navigation start.
            (EventDetail::PageLoad { .. }, Some(nav_start)) => {
                format_duration_us(event.ts - nav_start)
            }
            _ => formatted_time(event.dur),
        };
        Ok(HighlightedEntryInfo {
            title: self.title_for_event(event),
            formatted_time,
            warning: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{EventAppendBuffer, TrackRegistry};
    use trackline_protocol::Phase;

    fn page_load(mark: PageLoadMark, ts: f64) -> TraceEvent {
        TraceEvent::instant(format!("{mark:?}"), ts).with_detail(EventDetail::PageLoad { mark })
    }

    fn measure(name: &str, ts: f64, dur: f64) -> TraceEvent {
        TraceEvent::new(name, Phase::AsyncNestableStart, ts, Some(dur))
            .with_detail(EventDetail::UserTiming)
    }

    fn sample() -> TimingsData {
        TimingsData {
            page_load_marks: vec![
                page_load(PageLoadMark::NavigationStart, 1_000.0),
                page_load(PageLoadMark::FirstContentfulPaint, 251_000.0),
            ],
            marks: vec![
                TraceEvent::instant("app:boot", 5_000.0).with_detail(EventDetail::UserTiming),
            ],
            measures: vec![
                measure("fetch", 10_000.0, 50_000.0),
                measure("render", 20_000.0, 10_000.0),
                measure("idle", 70_000.0, 1_000.0),
            ],
            console_timestamps: vec![],
            navigation_start: Some(1_000.0),
        }
    }

    #[test]
    fn rows_stack_in_section_order() {
        let data = sample();
        let appender = TimingsTrackAppender::new(&data);
        let mut buffer = EventAppendBuffer::default();
        let mut registry = TrackRegistry::new();
        let mut sink = TrackSink::new(TrackAppenderName::Timings, &mut buffer, &mut registry);

        let next = appender.append_track_at_level(2, true, &mut sink).unwrap();
        // 1 page-load row + 1 mark row + 2 measure rows.
        assert_eq!(next, 6);
        assert_eq!(buffer.entry_levels(), &[2, 2, 3, 4, 5, 4]);
        assert_eq!(buffer.groups()[0].start_level, 2);
        assert!(buffer.groups()[0].expanded);
        assert_eq!(
            registry.band_of(TrackAppenderName::Timings),
            Some(TrackBand::new(2, 5))
        );
    }

    #[test]
    fn empty_timings_append_nothing() {
        let data = TimingsData::default();
        let appender = TimingsTrackAppender::new(&data);
        let mut buffer = EventAppendBuffer::default();
        let mut registry = TrackRegistry::new();
        let mut sink = TrackSink::new(TrackAppenderName::Timings, &mut buffer, &mut registry);
        assert_eq!(appender.append_track_at_level(4, false, &mut sink).unwrap(), 4);
        assert!(buffer.groups().is_empty());
    }

    #[test]
    fn page_load_queries() {
        let data = sample();
        let appender = TimingsTrackAppender::new(&data);
        let fcp = &data.page_load_marks[1];
        assert_eq!(appender.title_for_event(fcp), "FCP");
        assert_eq!(
            appender.color_for_event(fcp),
            Ok(ThemeToken::FirstContentfulPaint)
        );
        let info = appender.highlighted_entry_info(fcp).unwrap();
        assert_eq!(info.formatted_time, "250.0ms");
    }

    #[test]
    fn user_timing_queries() {
        let data = sample();
        let appender = TimingsTrackAppender::new(&data);
        assert_eq!(
            appender.color_for_event(&data.marks[0]),
            Ok(ThemeToken::UserTimingMark)
        );
        assert_eq!(
            appender.color_for_event(&data.measures[0]),
            Ok(ThemeToken::UserTimingMeasure)
        );
        let info = appender.highlighted_entry_info(&data.measures[0]).unwrap();
        assert_eq!(info.title, "fetch");
        assert_eq!(info.formatted_time, "50.0ms");
        assert_eq!(info.warning, None);
    }

    #[test]
    fn console_timestamp_title() {
        let data = TimingsData::default();
        let appender = TimingsTrackAppender::new(&data);
        let ts = TraceEvent::instant("TimeStamp", 1.0).with_detail(EventDetail::ConsoleTimestamp {
            message: "checkpoint".into(),
        });
        assert_eq!(appender.title_for_event(&ts), "TimeStamp: checkpoint");
        assert_eq!(
            appender.color_for_event(&ts),
            Ok(ThemeToken::ConsoleTimestamp)
        );
    }
}
