use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;
use trackline_protocol::{EventDetail, PageLoadMark, Phase, SharedStr, TraceEvent};

use crate::model::TraceData;

#[derive(Debug, Error)]
pub enum ChromeParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Thread name Chrome gives the GPU process main thread.
const GPU_MAIN_THREAD: &str = "CrGpuMain";

/// Raw Chrome trace event as found in DevTools JSON exports.
#[derive(Debug, Clone, Deserialize)]
struct RawEvent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    cat: String,
    ph: String,
    #[serde(default)]
    ts: f64,
    #[serde(default)]
    dur: Option<f64>,
    #[serde(default)]
    pid: u64,
    #[serde(default)]
    tid: u64,
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    id2: Option<serde_json::Value>,
    #[serde(default)]
    args: Option<serde_json::Value>,
}

impl RawEvent {
    fn data_field(&self, key: &str) -> Option<&serde_json::Value> {
        self.args.as_ref()?.get("data")?.get(key)
    }

    /// Async pairing id: `id`, or `id2.local` / `id2.global`.
    fn async_id(&self) -> Option<String> {
        let id = self.id.as_ref().or_else(|| {
            let id2 = self.id2.as_ref()?;
            id2.get("local").or_else(|| id2.get("global"))
        })?;
        match id {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    fn into_event(self, phase: Phase, dur: Option<f64>, detail: EventDetail) -> TraceEvent {
        TraceEvent {
            name: SharedStr::from(self.name),
            category: SharedStr::from(self.cat),
            phase,
            ts: self.ts,
            dur,
            pid: self.pid,
            tid: self.tid,
            detail,
        }
    }
}

/// Top-level Chrome trace JSON: object format or bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TraceFile {
    Object {
        #[serde(rename = "traceEvents")]
        trace_events: Vec<RawEvent>,
    },
    Array(Vec<RawEvent>),
}

/// Begin halves of async pairs waiting for their end, keyed by (id, name).
#[derive(Default)]
struct PendingPairs {
    begins: HashMap<(String, String), RawEvent>,
}

impl PendingPairs {
    fn begin(&mut self, event: RawEvent) {
        if let Some(id) = event.async_id() {
            self.begins.insert((id, event.name.clone()), event);
        }
    }

    /// Matching begin for `end`, with the pair's duration.
    fn end(&mut self, end: &RawEvent) -> Option<(RawEvent, f64)> {
        let id = end.async_id()?;
        let begin = self.begins.remove(&(id, end.name.clone()))?;
        let dur = end.ts - begin.ts;
        Some((begin, dur))
    }
}

/// Parse a Chrome DevTools trace JSON into per-track slices.
pub fn parse_chrome_trace(data: &[u8]) -> Result<TraceData, ChromeParseError> {
    let trace_file: TraceFile = serde_json::from_slice(data)?;
    Ok(extract(trace_file))
}

/// Same as [`parse_chrome_trace`] for an already decoded JSON value.
pub fn parse_chrome_value(value: serde_json::Value) -> Result<TraceData, ChromeParseError> {
    let trace_file: TraceFile = serde_json::from_value(value)?;
    Ok(extract(trace_file))
}

fn extract(trace_file: TraceFile) -> TraceData {
    let events = match trace_file {
        TraceFile::Object { trace_events } => trace_events,
        TraceFile::Array(events) => events,
    };

    let gpu_threads: HashSet<(u64, u64)> = events
        .iter()
        .filter(|e| e.ph == "M" && e.name == "thread_name")
        .filter(|e| {
            e.args
                .as_ref()
                .and_then(|a| a.get("name"))
                .and_then(serde_json::Value::as_str)
                == Some(GPU_MAIN_THREAD)
        })
        .map(|e| (e.pid, e.tid))
        .collect();

    let mut trace = TraceData::default();
    let mut measures = PendingPairs::default();
    let mut interactions = PendingPairs::default();

    for event in events {
        let phase = Phase::from_code(&event.ph);

        if event.name == "GPUTask" && phase == Phase::Complete {
            // Without thread metadata every GPUTask is taken.
            if gpu_threads.is_empty() || gpu_threads.contains(&(event.pid, event.tid)) {
                let dur = event.dur;
                trace
                    .gpu_tasks
                    .push(event.into_event(phase, dur, EventDetail::GpuTask));
            }
            continue;
        }

        if event.name == "LayoutShift" {
            let score = event
                .data_field("score")
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(0.0);
            trace.layout_shifts.push(event.into_event(
                Phase::Instant,
                None,
                EventDetail::LayoutShift { score },
            ));
            continue;
        }

        if let Some(mark) = PageLoadMark::from_event_name(&event.name) {
            if mark == PageLoadMark::NavigationStart && trace.timings.navigation_start.is_none() {
                trace.timings.navigation_start = Some(event.ts);
            }
            trace
                .timings
                .page_load_marks
                .push(event.into_event(phase, None, EventDetail::PageLoad { mark }));
            continue;
        }

        if event.name == "TimeStamp" {
            let message = event
                .data_field("message")
                .and_then(serde_json::Value::as_str)
                .map(SharedStr::from)
                .unwrap_or_default();
            trace.timings.console_timestamps.push(event.into_event(
                phase,
                None,
                EventDetail::ConsoleTimestamp { message },
            ));
            continue;
        }

        if event.name == "EventTiming" {
            match phase {
                Phase::AsyncNestableStart => interactions.begin(event),
                Phase::AsyncNestableEnd => {
                    if let Some(interaction) = paired_interaction(&mut interactions, &event) {
                        trace.interactions.push(interaction);
                    }
                }
                _ => {}
            }
            continue;
        }

        if event.cat.contains("blink.user_timing") {
            match phase {
                Phase::Instant | Phase::Mark | Phase::AsyncNestableInstant => {
                    trace
                        .timings
                        .marks
                        .push(event.into_event(phase, None, EventDetail::UserTiming));
                }
                Phase::Complete => {
                    let dur = event.dur;
                    trace
                        .timings
                        .measures
                        .push(event.into_event(phase, dur, EventDetail::UserTiming));
                }
                Phase::AsyncNestableStart => measures.begin(event),
                Phase::AsyncNestableEnd => {
                    if let Some((begin, dur)) = measures.end(&event) {
                        trace.timings.measures.push(begin.into_event(
                            Phase::AsyncNestableStart,
                            Some(dur),
                            EventDetail::UserTiming,
                        ));
                    }
                }
                _ => {}
            }
        }
    }

    trace.sort();
    trace
}

/// Close an `EventTiming` pair. Only events that belong to a user
/// interaction (non-zero `interactionId`) become interactions.
fn paired_interaction(pending: &mut PendingPairs, end: &RawEvent) -> Option<TraceEvent> {
    let (begin, dur) = pending.end(end)?;
    let interaction_id = begin
        .data_field("interactionId")
        .and_then(serde_json::Value::as_u64)
        .filter(|&id| id > 0)?;
    let interaction_type = begin
        .data_field("type")
        .and_then(serde_json::Value::as_str)
        .map(SharedStr::from)
        .unwrap_or_default();
    Some(begin.into_event(
        Phase::AsyncNestableStart,
        Some(dur),
        EventDetail::Interaction {
            interaction_id,
            interaction_type,
        },
    ))
}
