use thiserror::Error;
use trackline_protocol::GroupId;

use crate::tracks::TrackAppenderName;

/// Faults raised by the layout session.
///
/// None of these describe bad trace data: timestamps are taken as they come.
/// Every variant points at a build/query ordering bug or a broken appender.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("could not find events for track: {0}")]
    TrackNotFound(TrackAppenderName),
    #[error("no track registered for level {0}")]
    NoTrackForLevel(usize),
    #[error("no track registered for group {0:?}")]
    NoTrackForGroup(GroupId),
    #[error("level {level} is owned by {owner}, {claimant} cannot claim it")]
    LevelConflict {
        level: usize,
        owner: TrackAppenderName,
        claimant: TrackAppenderName,
    },
    #[error("group {group:?} is owned by {owner}, {claimant} cannot claim it")]
    GroupConflict {
        group: GroupId,
        owner: TrackAppenderName,
        claimant: TrackAppenderName,
    },
    #[error("unexpected event for the {track} track: {name}")]
    UnexpectedEvent {
        track: TrackAppenderName,
        name: String,
    },
    #[error("layout session is still building; queries need a completed append pass")]
    SessionNotQueryable,
    #[error("layout session was already built; start a new coordinator")]
    SessionAlreadyBuilt,
}
