//! Click action IDs for Dirty Water.

/// Choice rows: `CHOICE_BASE + index` into the current screen's choices.
pub const CHOICE_BASE: u16 = 10;

pub fn choice_action(index: usize) -> u16 {
    CHOICE_BASE.saturating_add(u16::try_from(index).unwrap_or(u16::MAX))
}

/// Inverse of [`choice_action`].
pub fn choice_index(action_id: u16) -> Option<usize> {
    action_id.checked_sub(CHOICE_BASE).map(usize::from)
}
