use trackline_protocol::{EventDetail, GroupStyle, ThemeToken, TraceEvent};

use super::{TrackAppender, TrackAppenderName, TrackSink, append_leveled, track_header};
use crate::error::LayoutError;
use crate::layout::SyncLevelAssigner;

/// Tasks on the GPU process main thread. They nest strictly, so levels come
/// from the open-task stack.
pub struct GpuTrackAppender<'t> {
    tasks: &'t [TraceEvent],
}

impl<'t> GpuTrackAppender<'t> {
    pub fn new(tasks: &'t [TraceEvent]) -> Self {
        Self { tasks }
    }
}

impl TrackAppender for GpuTrackAppender<'_> {
    fn name(&self) -> TrackAppenderName {
        TrackAppenderName::Gpu
    }

    fn append_track_at_level(
        &self,
        level: usize,
        expanded: bool,
        sink: &mut TrackSink<'_>,
    ) -> Result<usize, LayoutError> {
        if self.tasks.is_empty() {
            return Ok(level);
        }
        let style = GroupStyle {
            share_header_line: false,
            ..GroupStyle::default()
        };
        sink.register_group(track_header("GPU", level, expanded, style))?;
        append_leveled(SyncLevelAssigner::new(), self.tasks, level, sink)
    }

    fn color_for_event(&self, event: &TraceEvent) -> Result<ThemeToken, LayoutError> {
        match event.detail {
            EventDetail::GpuTask => Ok(ThemeToken::GpuTask),
            _ => Err(LayoutError::UnexpectedEvent {
                track: self.name(),
                name: event.name.to_string(),
            }),
        }
    }

    fn title_for_event(&self, event: &TraceEvent) -> String {
        match event.detail {
            EventDetail::GpuTask => "GPU".to_string(),
            _ => event.name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{EventAppendBuffer, TrackBand, TrackRegistry};

    fn task(ts: f64, dur: f64) -> TraceEvent {
        TraceEvent::complete("GPUTask", ts, dur).with_detail(EventDetail::GpuTask)
    }

    #[test]
    fn nested_tasks_stack() {
        let tasks = vec![task(0.0, 100.0), task(10.0, 20.0), task(150.0, 10.0)];
        let appender = GpuTrackAppender::new(&tasks);
        let mut buffer = EventAppendBuffer::default();
        let mut registry = TrackRegistry::new();
        let mut sink = TrackSink::new(TrackAppenderName::Gpu, &mut buffer, &mut registry);

        assert_eq!(appender.append_track_at_level(5, false, &mut sink).unwrap(), 7);
        assert_eq!(buffer.entry_levels(), &[5, 6, 5]);
        assert_eq!(buffer.groups()[0].name, "GPU");
        assert_eq!(
            registry.band_of(TrackAppenderName::Gpu),
            Some(TrackBand::new(5, 6))
        );
    }

    #[test]
    fn no_tasks_no_track() {
        let appender = GpuTrackAppender::new(&[]);
        let mut buffer = EventAppendBuffer::default();
        let mut registry = TrackRegistry::new();
        let mut sink = TrackSink::new(TrackAppenderName::Gpu, &mut buffer, &mut registry);
        assert_eq!(appender.append_track_at_level(5, false, &mut sink).unwrap(), 5);
        assert!(buffer.groups().is_empty());
        assert_eq!(registry.band_of(TrackAppenderName::Gpu), None);
    }

    #[test]
    fn queries() {
        let appender = GpuTrackAppender::new(&[]);
        let t = task(0.0, 1_200.0);
        assert_eq!(appender.title_for_event(&t), "GPU");
        assert_eq!(appender.color_for_event(&t), Ok(ThemeToken::GpuTask));
        let info = appender.highlighted_entry_info(&t).unwrap();
        assert_eq!(info.title, "GPU");
        assert_eq!(info.formatted_time, "1.2ms");

        let stray = TraceEvent::complete("Layout", 0.0, 1.0);
        assert_eq!(
            appender.color_for_event(&stray),
            Err(LayoutError::UnexpectedEvent {
                track: TrackAppenderName::Gpu,
                name: "Layout".to_string(),
            })
        );
        assert_eq!(appender.title_for_event(&stray), "Layout");
    }
}
