use serde::{Deserialize, Serialize};

/// Number of entries in the interaction palette.
pub const INTERACTION_PALETTE_SIZE: u8 = 8;

/// Semantic color tokens for track events, resolved by the renderer's
/// active theme. The layout core never deals in concrete colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    // Timings
    NavigationStart,
    FirstPaint,
    FirstContentfulPaint,
    LargestContentfulPaint,
    DomContentLoaded,
    LoadEvent,
    UserTimingMark,
    UserTimingMeasure,
    ConsoleTimestamp,

    /// Interactions cycle through a fixed palette keyed by interaction id.
    Interaction(u8),

    GpuTask,
    LayoutShift,
}

impl ThemeToken {
    /// Palette slot for an interaction id.
    pub fn interaction(interaction_id: u64) -> Self {
        Self::Interaction((interaction_id % u64::from(INTERACTION_PALETTE_SIZE)) as u8)
    }
}
