use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use trackline_protocol::GroupId;

use crate::error::LayoutError;
use crate::tracks::TrackAppenderName;

/// Inclusive range of levels owned by one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackBand {
    pub start_level: usize,
    pub end_level: usize,
}

impl TrackBand {
    pub fn new(start_level: usize, end_level: usize) -> Self {
        Self {
            start_level,
            end_level,
        }
    }

    /// Band of `height` levels starting at `start_level`, or `None` when
    /// the height is zero.
    pub fn with_height(start_level: usize, height: usize) -> Option<Self> {
        (height > 0).then(|| Self::new(start_level, start_level + height - 1))
    }

    pub fn contains(&self, level: usize) -> bool {
        self.start_level <= level && level <= self.end_level
    }

    pub fn height(&self) -> usize {
        self.end_level + 1 - self.start_level
    }

    pub fn levels(&self) -> std::ops::RangeInclusive<usize> {
        self.start_level..=self.end_level
    }

    pub fn intersects(&self, other: &TrackBand) -> bool {
        self.start_level <= other.end_level && other.start_level <= self.end_level
    }
}

/// Routes per-event queries back to the track that appended the event.
///
/// A track takes ownership of a level when it appends to it, and of a group
/// when it registers its header. Ownership never changes hands within a
/// session.
#[derive(Debug, Default)]
pub struct TrackRegistry {
    track_for_level: BTreeMap<usize, TrackAppenderName>,
    track_for_group: HashMap<GroupId, TrackAppenderName>,
}

impl TrackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim_level(
        &mut self,
        level: usize,
        owner: TrackAppenderName,
    ) -> Result<(), LayoutError> {
        match self.track_for_level.get(&level) {
            Some(&existing) if existing != owner => Err(LayoutError::LevelConflict {
                level,
                owner: existing,
                claimant: owner,
            }),
            Some(_) => Ok(()),
            None => {
                self.track_for_level.insert(level, owner);
                Ok(())
            }
        }
    }

    /// Claim every level of `band`. Stops at the first conflicting level.
    pub fn register_band(
        &mut self,
        band: TrackBand,
        owner: TrackAppenderName,
    ) -> Result<(), LayoutError> {
        band.levels()
            .try_for_each(|level| self.claim_level(level, owner))
    }

    pub fn register_group(
        &mut self,
        group: GroupId,
        owner: TrackAppenderName,
    ) -> Result<(), LayoutError> {
        match self.track_for_group.get(&group) {
            Some(&existing) if existing != owner => Err(LayoutError::GroupConflict {
                group,
                owner: existing,
                claimant: owner,
            }),
            _ => {
                self.track_for_group.insert(group, owner);
                Ok(())
            }
        }
    }

    pub fn owner_of_level(&self, level: usize) -> Result<TrackAppenderName, LayoutError> {
        self.track_for_level
            .get(&level)
            .copied()
            .ok_or(LayoutError::NoTrackForLevel(level))
    }

    pub fn owner_of_group(&self, group: GroupId) -> Result<TrackAppenderName, LayoutError> {
        self.track_for_group
            .get(&group)
            .copied()
            .ok_or(LayoutError::NoTrackForGroup(group))
    }

    /// Lowest and highest level owned by `name`, from one scan of the
    /// level table.
    pub fn band_of(&self, name: TrackAppenderName) -> Option<TrackBand> {
        let mut owned = self
            .track_for_level
            .iter()
            .filter(|&(_, &owner)| owner == name)
            .map(|(&level, _)| level);
        let start = owned.next()?;
        let end = owned.next_back().unwrap_or(start);
        Some(TrackBand::new(start, end))
    }

    /// Every track's band, ordered by start level.
    pub fn bands(&self) -> Vec<(TrackAppenderName, TrackBand)> {
        let mut bands: Vec<(TrackAppenderName, TrackBand)> = Vec::new();
        for (&level, &owner) in &self.track_for_level {
            match bands.iter_mut().find(|(name, _)| *name == owner) {
                Some((_, band)) => band.end_level = level,
                None => bands.push((owner, TrackBand::new(level, level))),
            }
        }
        bands
    }

    pub fn owned_level_count(&self) -> usize {
        self.track_for_level.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_helpers() {
        let band = TrackBand::new(2, 4);
        assert_eq!(band.height(), 3);
        assert!(band.contains(2) && band.contains(4));
        assert!(!band.contains(5));
        assert!(band.intersects(&TrackBand::new(4, 9)));
        assert!(!band.intersects(&TrackBand::new(5, 9)));
        assert_eq!(TrackBand::with_height(3, 0), None);
        assert_eq!(TrackBand::with_height(3, 2), Some(TrackBand::new(3, 4)));
    }

    #[test]
    fn owner_lookup_by_level() {
        let mut registry = TrackRegistry::new();
        registry
            .register_band(TrackBand::new(0, 1), TrackAppenderName::Timings)
            .unwrap();
        registry
            .register_band(TrackBand::new(2, 2), TrackAppenderName::Gpu)
            .unwrap();
        assert_eq!(registry.owner_of_level(1), Ok(TrackAppenderName::Timings));
        assert_eq!(registry.owner_of_level(2), Ok(TrackAppenderName::Gpu));
        assert_eq!(
            registry.owner_of_level(3),
            Err(LayoutError::NoTrackForLevel(3))
        );
    }

    #[test]
    fn reclaiming_own_level_is_fine() {
        let mut registry = TrackRegistry::new();
        registry.claim_level(5, TrackAppenderName::Gpu).unwrap();
        assert!(registry.claim_level(5, TrackAppenderName::Gpu).is_ok());
        assert_eq!(registry.owned_level_count(), 1);
    }

    #[test]
    fn conflicting_level_claim_faults() {
        let mut registry = TrackRegistry::new();
        registry.claim_level(5, TrackAppenderName::Gpu).unwrap();
        let err = registry
            .register_band(TrackBand::new(4, 6), TrackAppenderName::LayoutShifts)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::LevelConflict {
                level: 5,
                owner: TrackAppenderName::Gpu,
                claimant: TrackAppenderName::LayoutShifts,
            }
        );
        assert_eq!(registry.owner_of_level(5), Ok(TrackAppenderName::Gpu));
    }

    #[test]
    fn groups_bind_one_to_one() {
        let mut registry = TrackRegistry::new();
        registry
            .register_group(GroupId(0), TrackAppenderName::Interactions)
            .unwrap();
        assert_eq!(
            registry.owner_of_group(GroupId(0)),
            Ok(TrackAppenderName::Interactions)
        );
        assert!(
            registry
                .register_group(GroupId(0), TrackAppenderName::Gpu)
                .is_err()
        );
        assert_eq!(
            registry.owner_of_group(GroupId(7)),
            Err(LayoutError::NoTrackForGroup(GroupId(7)))
        );
    }

    #[test]
    fn bands_from_level_table() {
        let mut registry = TrackRegistry::new();
        for level in [3, 4, 5] {
            registry.claim_level(level, TrackAppenderName::Timings).unwrap();
        }
        registry.claim_level(6, TrackAppenderName::Gpu).unwrap();
        assert_eq!(
            registry.band_of(TrackAppenderName::Timings),
            Some(TrackBand::new(3, 5))
        );
        assert_eq!(
            registry.band_of(TrackAppenderName::Gpu),
            Some(TrackBand::new(6, 6))
        );
        assert_eq!(registry.band_of(TrackAppenderName::LayoutShifts), None);
        assert_eq!(
            registry.bands(),
            vec![
                (TrackAppenderName::Timings, TrackBand::new(3, 5)),
                (TrackAppenderName::Gpu, TrackBand::new(6, 6)),
            ]
        );
    }
}
