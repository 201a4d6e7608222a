use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use serde::Serialize;
use trackline_protocol::{GroupId, ThemeToken, TraceEvent};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::layout::{EventAppendBuffer, TrackBand, TrackRegistry, can_build_trees};
use crate::model::TraceData;
use crate::tracks::{HighlightedEntryInfo, Track, TrackAppender, TrackAppenderName, TrackSink};

/// Lifecycle of one layout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Tracks are still being appended; bands are not final.
    Building,
    /// Every track has been appended. The session is read-only from here on.
    Queryable,
}

type EventCache = HashMap<TrackAppenderName, OnceLock<Vec<TraceEvent>>>;

/// Runs every track appender over one shared buffer and answers the
/// renderer's per-event and per-track queries afterwards.
///
/// A coordinator covers exactly one session: build once with
/// [`append_all`](Self::append_all), then query. Per-track event lists are
/// computed on first request and kept for the rest of the session.
pub struct TracksCoordinator<'t> {
    tracks: Vec<Track<'t>>,
    buffer: EventAppendBuffer,
    registry: TrackRegistry,
    events_for_track: EventCache,
    events_for_tree_view: EventCache,
    visible_tracks: BTreeSet<TrackAppenderName>,
    state: SessionState,
}

impl<'t> TracksCoordinator<'t> {
    pub fn new(trace: &'t TraceData, config: &LayoutConfig) -> Self {
        let empty_cache = || -> EventCache {
            TrackAppenderName::ALL
                .into_iter()
                .map(|name| (name, OnceLock::new()))
                .collect()
        };
        let mut coordinator = Self {
            tracks: TrackAppenderName::ALL
                .into_iter()
                .map(|name| Track::new(name, trace))
                .collect(),
            buffer: EventAppendBuffer::new(config.instant_event_visible_duration_ms),
            registry: TrackRegistry::new(),
            events_for_track: empty_cache(),
            events_for_tree_view: empty_cache(),
            visible_tracks: TrackAppenderName::ALL.into_iter().collect(),
            state: SessionState::Building,
        };
        coordinator.set_visible_tracks(
            config
                .visible_tracks
                .as_ref()
                .map(|names| names.iter().copied().collect()),
        );
        coordinator
    }

    /// Append every track in declared order, each directly above the last.
    ///
    /// Returns the first free level after the final track.
    pub fn append_all(
        &mut self,
        starting_level: usize,
        expanded_by_default: bool,
    ) -> Result<usize, LayoutError> {
        if self.state != SessionState::Building {
            return Err(LayoutError::SessionAlreadyBuilt);
        }
        let mut level = starting_level;
        for track in &self.tracks {
            let name = track.name();
            let first_entry = self.buffer.len();
            let mut sink = TrackSink::new(name, &mut self.buffer, &mut self.registry);
            let next = track.append_track_at_level(level, expanded_by_default, &mut sink)?;
            debug_assert!(next >= level, "{name} moved the level backwards");
            if next > level {
                log::debug!(
                    "appended {name} track: levels {level}..={}, {} events",
                    next - 1,
                    self.buffer.len() - first_entry
                );
            } else {
                log::debug!("{name} track has no events");
            }
            level = next;
        }
        self.state = SessionState::Queryable;
        Ok(level)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn buffer(&self) -> &EventAppendBuffer {
        &self.buffer
    }

    pub fn registry(&self) -> &TrackRegistry {
        &self.registry
    }

    pub fn appender(&self, name: TrackAppenderName) -> Option<&Track<'t>> {
        self.tracks.iter().find(|t| t.name() == name)
    }

    /// Band of levels occupied by a track.
    pub fn track_band(&self, name: TrackAppenderName) -> Result<TrackBand, LayoutError> {
        self.ensure_queryable()?;
        self.registry
            .band_of(name)
            .ok_or(LayoutError::TrackNotFound(name))
    }

    /// Every event the track appended, ordered by start time.
    ///
    /// Repeated calls return the same slice without rescanning the buffer.
    pub fn events_in_track(&self, name: TrackAppenderName) -> Result<&[TraceEvent], LayoutError> {
        self.ensure_queryable()?;
        let cell = Self::cache_slot(&self.events_for_track, name)?;
        if let Some(events) = cell.get() {
            return Ok(events);
        }
        let band = self.track_band(name)?;
        let events = cell.get_or_init(|| {
            let mut events: Vec<TraceEvent> = self
                .buffer
                .entries()
                .filter(|entry| band.contains(entry.level))
                .map(|entry| entry.event.clone())
                .collect();
            events.sort_by(|a, b| a.ts.total_cmp(&b.ts));
            log::trace!("cached {} events for {name}", events.len());
            events
        });
        Ok(events)
    }

    /// Events to feed the tree views (call tree, bottom-up) for a track.
    ///
    /// All of the track's events if they form trees; otherwise only the
    /// synchronous ones, since async events are the ones that cross.
    pub fn events_for_tree_view(
        &self,
        name: TrackAppenderName,
    ) -> Result<&[TraceEvent], LayoutError> {
        let cell = Self::cache_slot(&self.events_for_tree_view, name)?;
        if let Some(events) = cell.get() {
            return Ok(events);
        }
        let track_events = self.events_in_track(name)?;
        let events = cell.get_or_init(|| {
            if can_build_trees(track_events) {
                return track_events.to_vec();
            }
            let sync_events: Vec<TraceEvent> = track_events
                .iter()
                .filter(|e| !e.phase.is_async())
                .cloned()
                .collect();
            if !can_build_trees(&sync_events) {
                log::warn!(
                    "{name}: synchronous events still cross after dropping async ones; \
                     tree views may be inaccurate"
                );
            }
            sync_events
        });
        Ok(events)
    }

    /// Tree-view events for the track behind a header, or `None` if the
    /// group was never registered.
    pub fn group_events_for_tree_view(
        &self,
        group: GroupId,
    ) -> Result<Option<&[TraceEvent]>, LayoutError> {
        match self.registry.owner_of_group(group) {
            Ok(name) => self.events_for_tree_view(name).map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Restrict which tracks are reported as visible. `None` shows all.
    ///
    /// Appended data is never removed; visibility only filters enumeration.
    pub fn set_visible_tracks(&mut self, visible: Option<BTreeSet<TrackAppenderName>>) {
        self.visible_tracks =
            visible.unwrap_or_else(|| TrackAppenderName::ALL.into_iter().collect());
    }

    pub fn is_track_visible(&self, name: TrackAppenderName) -> bool {
        self.visible_tracks.contains(&name)
    }

    pub fn all_visible_track_appenders(&self) -> impl Iterator<Item = &Track<'t>> {
        self.tracks
            .iter()
            .filter(|t| self.visible_tracks.contains(&t.name()))
    }

    pub fn color_for_event(
        &self,
        event: &TraceEvent,
        level: usize,
    ) -> Result<ThemeToken, LayoutError> {
        self.owner_of_level(level)?.color_for_event(event)
    }

    pub fn title_for_event(&self, event: &TraceEvent, level: usize) -> Result<String, LayoutError> {
        Ok(self.owner_of_level(level)?.title_for_event(event))
    }

    pub fn highlighted_entry_info(
        &self,
        event: &TraceEvent,
        level: usize,
    ) -> Result<HighlightedEntryInfo, LayoutError> {
        self.owner_of_level(level)?.highlighted_entry_info(event)
    }

    fn owner_of_level(&self, level: usize) -> Result<&Track<'t>, LayoutError> {
        self.ensure_queryable()?;
        let name = self.registry.owner_of_level(level)?;
        self.appender(name).ok_or(LayoutError::NoTrackForLevel(level))
    }

    fn ensure_queryable(&self) -> Result<(), LayoutError> {
        match self.state {
            SessionState::Queryable => Ok(()),
            SessionState::Building => Err(LayoutError::SessionNotQueryable),
        }
    }

    fn cache_slot(
        cache: &EventCache,
        name: TrackAppenderName,
    ) -> Result<&OnceLock<Vec<TraceEvent>>, LayoutError> {
        cache.get(&name).ok_or(LayoutError::TrackNotFound(name))
    }
}
