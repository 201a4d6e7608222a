use super::interval::Interval;

/// Strategy for turning a start-ordered stream of intervals into levels
/// relative to a track's first level.
pub trait LevelAssigner {
    fn assign(&mut self, interval: &impl Interval) -> usize;

    /// Number of levels used so far, i.e. the band height to reserve.
    fn max_depth(&self) -> usize;
}

/// Levels for strictly nested (synchronous) events.
///
/// Keeps a frontier of open intervals, most recently opened on top. An
/// interval closes once something starts at or after its end. The level of
/// a new interval is the number of intervals still open when it starts, so a
/// child always sits exactly one level below its innermost open ancestor.
///
/// Intervals must be fed in non-decreasing start order.
#[derive(Debug, Default)]
pub struct SyncLevelAssigner {
    open_ends: Vec<f64>,
    max_depth: usize,
}

impl SyncLevelAssigner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LevelAssigner for SyncLevelAssigner {
    fn assign(&mut self, interval: &impl Interval) -> usize {
        let start = interval.start();
        while self.open_ends.last().is_some_and(|&end| end <= start) {
            self.open_ends.pop();
        }
        let level = self.open_ends.len();
        self.open_ends.push(interval.end());
        self.max_depth = self.max_depth.max(level + 1);
        level
    }

    fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// Levels for events that may partially overlap (async spans, marks).
///
/// First-fit swimlane packing: each level remembers the end of the last
/// interval placed on it, and a new interval takes the lowest level that is
/// already free at its start.
#[derive(Debug, Default)]
pub struct AsyncLevelAssigner {
    last_end_by_level: Vec<f64>,
}

impl AsyncLevelAssigner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LevelAssigner for AsyncLevelAssigner {
    fn assign(&mut self, interval: &impl Interval) -> usize {
        let start = interval.start();
        let level = self
            .last_end_by_level
            .iter()
            .position(|&end| start >= end)
            .unwrap_or(self.last_end_by_level.len());
        let end = interval.end();
        match self.last_end_by_level.get_mut(level) {
            Some(slot) => *slot = end,
            None => self.last_end_by_level.push(end),
        }
        level
    }

    fn max_depth(&self) -> usize {
        self.last_end_by_level.len()
    }
}
