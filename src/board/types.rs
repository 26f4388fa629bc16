use crate::booking::model::ResidentId;
use crate::catalog::TimeSlot;

/// Where the board is in its fetch cycle.
///
/// `Loading` covers exactly the window between issuing a fetch and its
/// result landing (or being discarded as stale); `Error` means the last
/// fetch failed and the grid is showing last-good or empty data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BoardPhase {
    #[default]
    Idle,
    Loading,
    Error,
}

/// Occupancy of one grid cell. Every slot is exactly one of these.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Booked {
        resident: ResidentId,
        /// Resolved through the roster; absent when the roster fetch
        /// failed or the occupant is not on it.
        name: Option<String>,
    },
}

impl SlotStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, SlotStatus::Available)
    }
}

/// One renderable cell of the booking grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub slot: TimeSlot,
    pub status: SlotStatus,
}
