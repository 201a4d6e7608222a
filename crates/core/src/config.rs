use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracks::TrackAppenderName;

/// Width, in milliseconds, given to events without a duration so they stay
/// visible and clickable.
pub const INSTANT_EVENT_VISIBLE_DURATION_MS: f64 = 0.001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("instantEventVisibleDurationMs must be a positive finite number, got {0}")]
    InvalidInstantDuration(f64),
}

/// Knobs for one layout session. Every field is optional in JSON.
///
/// ```json
/// { "startingLevel": 3, "expandedByDefault": true, "visibleTracks": ["GPU"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub instant_event_visible_duration_ms: f64,
    /// Level at which the first track's band begins.
    pub starting_level: usize,
    pub expanded_by_default: bool,
    /// Tracks reported as visible; `None` means all of them.
    pub visible_tracks: Option<Vec<TrackAppenderName>>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            instant_event_visible_duration_ms: INSTANT_EVENT_VISIBLE_DURATION_MS,
            starting_level: 0,
            expanded_by_default: false,
            visible_tracks: None,
        }
    }
}

impl LayoutConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ms = self.instant_event_visible_duration_ms;
        if !ms.is_finite() || ms <= 0.0 {
            return Err(ConfigError::InvalidInstantDuration(ms));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = LayoutConfig::from_json(b"{}").unwrap();
        assert_eq!(config, LayoutConfig::default());
        assert_eq!(
            config.instant_event_visible_duration_ms,
            INSTANT_EVENT_VISIBLE_DURATION_MS
        );
    }

    #[test]
    fn camel_case_keys() {
        let json = br#"{"startingLevel":4,"expandedByDefault":true,"visibleTracks":["GPU","LayoutShifts"]}"#;
        let config = LayoutConfig::from_json(json).unwrap();
        assert_eq!(config.starting_level, 4);
        assert!(config.expanded_by_default);
        assert_eq!(
            config.visible_tracks,
            Some(vec![TrackAppenderName::Gpu, TrackAppenderName::LayoutShifts])
        );
    }

    #[test]
    fn rejects_non_positive_instant_width() {
        let err = LayoutConfig::from_json(br#"{"instantEventVisibleDurationMs":0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInstantDuration(_)));
    }

    #[test]
    fn rejects_unknown_track_name() {
        let err = LayoutConfig::from_json(br#"{"visibleTracks":["Frames"]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
