use serde::{Deserialize, Serialize};

use crate::shared_str::SharedStr;

/// A trace event after upstream parsing and classification.
///
/// Times are in microseconds on the trace clock. `dur` is `None` for
/// instantaneous events (marks, layout shifts, console timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub name: SharedStr,
    #[serde(default)]
    pub category: SharedStr,
    pub phase: Phase,
    /// Start time in µs.
    pub ts: f64,
    /// Duration in µs, if the event has one.
    #[serde(default)]
    pub dur: Option<f64>,
    #[serde(default)]
    pub pid: u64,
    #[serde(default)]
    pub tid: u64,
    #[serde(default)]
    pub detail: EventDetail,
}

impl TraceEvent {
    /// A complete (`X`) event with a known duration.
    pub fn complete(name: impl Into<SharedStr>, ts: f64, dur: f64) -> Self {
        Self::new(name, Phase::Complete, ts, Some(dur))
    }

    /// An instant (`I`) event.
    pub fn instant(name: impl Into<SharedStr>, ts: f64) -> Self {
        Self::new(name, Phase::Instant, ts, None)
    }

    pub fn new(name: impl Into<SharedStr>, phase: Phase, ts: f64, dur: Option<f64>) -> Self {
        Self {
            name: name.into(),
            category: SharedStr::default(),
            phase,
            ts,
            dur,
            pid: 0,
            tid: 0,
            detail: EventDetail::None,
        }
    }

    pub fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = detail;
        self
    }

    /// No duration, or a zero one.
    pub fn is_instant(&self) -> bool {
        self.dur.is_none_or(|d| d == 0.0)
    }
}

/// Chrome trace event phase (the `ph` field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "X")]
    Complete,
    #[serde(rename = "B")]
    Begin,
    #[serde(rename = "E")]
    End,
    #[serde(rename = "I", alias = "i")]
    Instant,
    #[serde(rename = "R")]
    Mark,
    #[serde(rename = "b")]
    AsyncNestableStart,
    #[serde(rename = "e")]
    AsyncNestableEnd,
    #[serde(rename = "n")]
    AsyncNestableInstant,
    #[serde(rename = "S")]
    AsyncStart,
    #[serde(rename = "T")]
    AsyncStepInto,
    #[serde(rename = "p")]
    AsyncStepPast,
    #[serde(rename = "F")]
    AsyncEnd,
    #[serde(rename = "M")]
    Metadata,
    #[serde(other)]
    Other,
}

impl Phase {
    /// Parse the raw `ph` string of a trace event.
    pub fn from_code(code: &str) -> Self {
        match code {
            "X" => Self::Complete,
            "B" => Self::Begin,
            "E" => Self::End,
            "I" | "i" => Self::Instant,
            "R" => Self::Mark,
            "b" => Self::AsyncNestableStart,
            "e" => Self::AsyncNestableEnd,
            "n" => Self::AsyncNestableInstant,
            "S" => Self::AsyncStart,
            "T" => Self::AsyncStepInto,
            "p" => Self::AsyncStepPast,
            "F" => Self::AsyncEnd,
            "M" => Self::Metadata,
            _ => Self::Other,
        }
    }

    /// Async phases may partially overlap their neighbours, so they cannot
    /// be assumed to nest.
    pub fn is_async(self) -> bool {
        matches!(
            self,
            Self::AsyncNestableStart
                | Self::AsyncNestableEnd
                | Self::AsyncNestableInstant
                | Self::AsyncStart
                | Self::AsyncStepInto
                | Self::AsyncStepPast
                | Self::AsyncEnd
        )
    }
}

/// Kind-specific payload attached during classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EventDetail {
    #[default]
    None,
    PageLoad {
        mark: PageLoadMark,
    },
    UserTiming,
    ConsoleTimestamp {
        message: SharedStr,
    },
    #[serde(rename_all = "camelCase")]
    Interaction {
        interaction_id: u64,
        interaction_type: SharedStr,
    },
    GpuTask,
    LayoutShift {
        score: f64,
    },
}

/// Navigation milestones shown on the timings track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageLoadMark {
    NavigationStart,
    FirstPaint,
    FirstContentfulPaint,
    LargestContentfulPaint,
    DomContentLoaded,
    Load,
}

impl PageLoadMark {
    /// Classify a trace event name.
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "navigationStart" => Some(Self::NavigationStart),
            "firstPaint" => Some(Self::FirstPaint),
            "firstContentfulPaint" => Some(Self::FirstContentfulPaint),
            "largestContentfulPaint::Candidate" => Some(Self::LargestContentfulPaint),
            "MarkDOMContent" => Some(Self::DomContentLoaded),
            "MarkLoad" => Some(Self::Load),
            _ => None,
        }
    }

    /// Short label drawn on the marker.
    pub fn label(self) -> &'static str {
        match self {
            Self::NavigationStart => "Nav",
            Self::FirstPaint => "FP",
            Self::FirstContentfulPaint => "FCP",
            Self::LargestContentfulPaint => "LCP",
            Self::DomContentLoaded => "DCL",
            Self::Load => "L",
        }
    }
}
