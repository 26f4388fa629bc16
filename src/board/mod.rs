//! Booking-grid view model.
//!
//! Data flow per selection:
//! gateway fetch (bookings + roster) -> BookingIndex -> grid cells.
//!
//! The board owns the current (day, machine) selection and re-derives
//! occupancy from the latest fetched list on every date change. Slot
//! availability is advisory only; the backend stays the authority on
//! conflicts, so a failed submit is always followed by a refresh.

pub mod types;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::api::errors::ApiError;
use crate::api::gateway::BookingGateway;
use crate::booking::index::BookingIndex;
use crate::booking::model::{Booking, BookingIntent, MachineId, Resident, ResidentId};
use crate::catalog::TimeSlotCatalog;
use crate::logger::warn_if_slow;
use crate::principal::Principal;

pub use types::{BoardPhase, GridCell, SlotStatus};

struct BoardState {
    day: NaiveDate,
    machine: MachineId,
    phase: BoardPhase,

    /// Last successfully fetched index. Kept through fetch failures so the
    /// grid can keep rendering last-good data, flagged stale.
    index: Option<BookingIndex>,
    roster: HashMap<ResidentId, Resident>,
    stale: bool,

    /// Monotonic fetch token. A fetch result is applied only if no newer
    /// selection was made while it was in flight.
    fetch_seq: u64,
}

pub struct SlotBoard {
    gateway: Arc<dyn BookingGateway>,
    catalog: TimeSlotCatalog,
    principal: Principal,
    state: Mutex<BoardState>,
}

impl SlotBoard {
    pub fn new(
        gateway: Arc<dyn BookingGateway>,
        catalog: TimeSlotCatalog,
        principal: Principal,
        day: NaiveDate,
    ) -> Self {
        Self {
            gateway,
            catalog,
            principal,
            state: Mutex::new(BoardState {
                day,
                machine: 1,
                phase: BoardPhase::Idle,
                index: None,
                roster: HashMap::new(),
                stale: false,
                fetch_seq: 0,
            }),
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.state.lock().day
    }

    pub fn machine(&self) -> MachineId {
        self.state.lock().machine
    }

    pub fn phase(&self) -> BoardPhase {
        self.state.lock().phase
    }

    /// True when the grid is rendering data from before a failed fetch.
    pub fn is_stale(&self) -> bool {
        self.state.lock().stale
    }

    pub fn catalog(&self) -> &TimeSlotCatalog {
        &self.catalog
    }

    /// Selects a day and loads its bookings together with the roster.
    ///
    /// The two loads are one suspension point. The state lock is never
    /// held across it; a result arriving after a newer selection is
    /// discarded rather than overwriting it.
    #[instrument(skip(self), target = "board", fields(day = %day))]
    pub async fn select_date(&self, day: NaiveDate) -> Result<(), ApiError> {
        let token = {
            let mut st = self.state.lock();
            st.day = day;
            st.phase = BoardPhase::Loading;
            st.fetch_seq += 1;
            st.fetch_seq
        };

        debug!("fetching bookings and roster");

        let (bookings, roster) = warn_if_slow("fetch_day", Duration::from_millis(800), async {
            tokio::join!(self.gateway.bookings_for_date(day), self.gateway.subjects())
        })
        .await;

        let mut st = self.state.lock();
        if st.fetch_seq != token {
            info!(superseded_by = st.fetch_seq, "discarding stale fetch result");
            return Ok(());
        }

        let records = match bookings {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "bookings fetch failed");
                st.phase = BoardPhase::Error;
                st.stale = st.index.is_some();
                return Err(e);
            }
        };

        match roster {
            Ok(subjects) => {
                st.roster = subjects
                    .iter()
                    .map(Resident::from_record)
                    .map(|r| (r.id, r))
                    .collect();
            }
            // Degrades occupant names only; the grid itself stays correct.
            Err(e) => warn!(error = %e, "roster fetch failed; occupant names unavailable"),
        }

        let indexed = records.iter().map(Booking::from_record).collect();
        st.index = Some(BookingIndex::build(day, indexed));
        st.phase = BoardPhase::Idle;
        st.stale = false;

        debug!(bookings = st.index.as_ref().map_or(0, BookingIndex::len), "day loaded");
        Ok(())
    }

    /// Shifts the selected day by whole calendar days and re-selects.
    pub async fn navigate_date(&self, delta_days: i64) -> Result<(), ApiError> {
        let day = self.state.lock().day + chrono::Duration::days(delta_days);
        self.select_date(day).await
    }

    /// Re-fetches the currently selected day. Used after every submit,
    /// successful or not, to reconcile with backend truth.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let day = self.state.lock().day;
        self.select_date(day).await
    }

    /// Switches the displayed machine. All machines for the day are
    /// already loaded, so no refetch.
    pub fn select_machine(&self, machine: MachineId) {
        self.state.lock().machine = machine;
    }

    /// One cell per catalog slot for the current (day, machine).
    pub fn grid(&self) -> Vec<GridCell> {
        let st = self.state.lock();

        self.catalog
            .iter()
            .map(|slot| {
                let occupant = st
                    .index
                    .as_ref()
                    .and_then(|ix| ix.occupant(st.machine, slot.label()));

                let status = match occupant {
                    Some(resident) => SlotStatus::Booked {
                        resident,
                        name: st
                            .roster
                            .get(&resident)
                            .map(|r| r.short_name().to_string()),
                    },
                    None => SlotStatus::Available,
                };

                GridCell {
                    slot: slot.clone(),
                    status,
                }
            })
            .collect()
    }

    /// Roster entries for the staff picker, ordered by name.
    pub fn roster(&self) -> Vec<Resident> {
        let st = self.state.lock();
        let mut residents: Vec<Resident> = st.roster.values().cloned().collect();
        residents.sort_by(|a, b| a.name.cmp(&b.name));
        residents
    }

    /// Turns a click on a slot into a booking intent.
    ///
    /// Returns `None` while a fetch is in flight, for read-only
    /// principals, and for slots that are off the grid or already booked.
    /// Residents get their own id filled in; staff intents leave the
    /// resident to be picked from the roster.
    pub fn slot_click(&self, label: &str) -> Option<BookingIntent> {
        let st = self.state.lock();

        if st.phase == BoardPhase::Loading || !self.principal.may_book() {
            return None;
        }

        if !self.catalog.contains(label) {
            return None;
        }

        if st
            .index
            .as_ref()
            .is_some_and(|ix| ix.is_booked(st.machine, label))
        {
            return None;
        }

        let intent = BookingIntent {
            machine: st.machine,
            slot: label.to_string(),
            day: st.day,
            resident: None,
        };

        match self.principal.self_resident() {
            Some(id) => Some(intent.for_resident(id)),
            None => Some(intent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use proptest::prelude::*;

    use crate::api::types::{BookingRecord, NewBookingRequest, SubjectRecord};

    struct MockGateway {
        bookings: Vec<BookingRecord>,
        subjects: Vec<SubjectRecord>,
        fail_bookings: Mutex<bool>,
        fail_subjects: Mutex<bool>,
    }

    impl MockGateway {
        fn with_bookings(bookings: Vec<BookingRecord>) -> Self {
            Self {
                bookings,
                subjects: vec![SubjectRecord {
                    id: 7,
                    name: "Arjun Mehta".to_string(),
                    resource_room: Some("B-204".to_string()),
                }],
                fail_bookings: Mutex::new(false),
                fail_subjects: Mutex::new(false),
            }
        }
    }

    #[async_trait]
    impl BookingGateway for MockGateway {
        async fn bookings_for_date(&self, _: NaiveDate) -> Result<Vec<BookingRecord>, ApiError> {
            if *self.fail_bookings.lock() {
                return Err(ApiError::Backend {
                    status: 500,
                    message: "service unavailable".to_string(),
                });
            }
            Ok(self.bookings.clone())
        }

        async fn subjects(&self) -> Result<Vec<SubjectRecord>, ApiError> {
            if *self.fail_subjects.lock() {
                return Err(ApiError::Backend {
                    status: 500,
                    message: "roster unavailable".to_string(),
                });
            }
            Ok(self.subjects.clone())
        }

        async fn create_booking(&self, _: &NewBookingRequest) -> Result<BookingRecord, ApiError> {
            unimplemented!("board tests never create bookings")
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(machine: MachineId, slot: &str, resident: ResidentId, date: &str) -> BookingRecord {
        BookingRecord {
            id: 0,
            resource_id: machine,
            slot: slot.to_string(),
            subject_id: resident,
            date: date.to_string(),
        }
    }

    fn board_with(gateway: MockGateway, principal: Principal) -> SlotBoard {
        SlotBoard::new(
            Arc::new(gateway),
            TimeSlotCatalog::standard().clone(),
            principal,
            day("2024-05-01"),
        )
    }

    #[tokio::test]
    async fn loaded_grid_marks_booked_and_available_cells() {
        let board = board_with(
            MockGateway::with_bookings(vec![record(1, "08:00", 7, "2024-05-01")]),
            Principal::Resident(42),
        );

        board.select_date(day("2024-05-01")).await.unwrap();
        assert_eq!(board.phase(), BoardPhase::Idle);

        let grid = board.grid();
        assert_eq!(grid.len(), board.catalog().len());

        assert_eq!(
            grid[0].status,
            SlotStatus::Booked {
                resident: 7,
                name: Some("Arjun".to_string()),
            }
        );
        assert!(grid[1..].iter().all(|c| c.status.is_available()));
    }

    #[tokio::test]
    async fn grid_length_follows_the_catalog() {
        let board = SlotBoard::new(
            Arc::new(MockGateway::with_bookings(vec![record(
                1,
                "08:00",
                7,
                "2024-05-01",
            )])),
            TimeSlotCatalog::hourly(8, 9),
            Principal::Resident(42),
            day("2024-05-01"),
        );
        board.select_date(day("2024-05-01")).await.unwrap();

        let grid = board.grid();
        assert_eq!(grid.len(), 2);
        assert!(matches!(grid[0].status, SlotStatus::Booked { resident: 7, .. }));
        assert!(grid[1].status.is_available());
    }

    #[tokio::test]
    async fn clicking_a_booked_slot_is_a_noop() {
        let board = board_with(
            MockGateway::with_bookings(vec![record(1, "08:00", 7, "2024-05-01")]),
            Principal::Resident(42),
        );
        board.select_date(day("2024-05-01")).await.unwrap();

        assert_eq!(board.slot_click("08:00"), None);
    }

    #[tokio::test]
    async fn resident_click_autofills_their_own_id() {
        let board = board_with(MockGateway::with_bookings(vec![]), Principal::Resident(42));
        board.select_date(day("2024-05-01")).await.unwrap();

        let intent = board.slot_click("09:00").unwrap();
        assert_eq!(intent.machine, 1);
        assert_eq!(intent.slot, "09:00");
        assert_eq!(intent.day, day("2024-05-01"));
        assert_eq!(intent.resident, Some(42));
    }

    #[tokio::test]
    async fn staff_click_leaves_the_resident_open() {
        let board = board_with(MockGateway::with_bookings(vec![]), Principal::Staff);
        board.select_date(day("2024-05-01")).await.unwrap();

        let intent = board.slot_click("09:00").unwrap();
        assert_eq!(intent.resident, None);
    }

    #[tokio::test]
    async fn warden_clicks_never_open_a_booking() {
        let board = board_with(MockGateway::with_bookings(vec![]), Principal::Warden);
        board.select_date(day("2024-05-01")).await.unwrap();

        assert_eq!(board.slot_click("09:00"), None);
    }

    #[tokio::test]
    async fn off_grid_labels_are_rejected() {
        let board = board_with(MockGateway::with_bookings(vec![]), Principal::Resident(42));
        board.select_date(day("2024-05-01")).await.unwrap();

        assert_eq!(board.slot_click("07:00"), None);
        assert_eq!(board.slot_click("8:00"), None);
    }

    #[tokio::test]
    async fn machine_switch_needs_no_refetch() {
        let board = board_with(
            MockGateway::with_bookings(vec![
                record(1, "08:00", 7, "2024-05-01"),
                record(2, "09:00", 9, "2024-05-01"),
            ]),
            Principal::Resident(42),
        );
        board.select_date(day("2024-05-01")).await.unwrap();

        assert!(!board.grid()[0].status.is_available());

        board.select_machine(2);
        let grid = board.grid();
        assert!(grid[0].status.is_available());
        assert!(!grid[1].status.is_available());
    }

    #[tokio::test]
    async fn fetch_failure_enters_error_and_keeps_last_good_data() {
        let gateway = Arc::new(MockGateway::with_bookings(vec![record(
            1,
            "08:00",
            7,
            "2024-05-01",
        )]));

        let board = SlotBoard::new(
            gateway.clone(),
            TimeSlotCatalog::standard().clone(),
            Principal::Resident(42),
            day("2024-05-01"),
        );

        board.select_date(day("2024-05-01")).await.unwrap();
        assert!(!board.is_stale());

        *gateway.fail_bookings.lock() = true;
        let err = board.select_date(day("2024-05-01")).await;
        assert!(err.is_err());
        assert_eq!(board.phase(), BoardPhase::Error);

        // Last-good data survives the failure, flagged stale.
        assert!(board.is_stale());
        assert!(!board.grid()[0].status.is_available());

        // Retry is just another select_date.
        *gateway.fail_bookings.lock() = false;
        board.select_date(day("2024-05-01")).await.unwrap();
        assert_eq!(board.phase(), BoardPhase::Idle);
        assert!(!board.is_stale());
    }

    #[tokio::test]
    async fn roster_failure_only_drops_occupant_names() {
        let gateway = MockGateway::with_bookings(vec![record(1, "08:00", 7, "2024-05-01")]);
        *gateway.fail_subjects.lock() = true;

        let board = board_with(gateway, Principal::Resident(42));
        board.select_date(day("2024-05-01")).await.unwrap();

        assert_eq!(board.phase(), BoardPhase::Idle);
        assert_eq!(
            board.grid()[0].status,
            SlotStatus::Booked {
                resident: 7,
                name: None,
            }
        );
    }

    #[tokio::test]
    async fn navigate_date_shifts_by_calendar_days() {
        let board = board_with(MockGateway::with_bookings(vec![]), Principal::Resident(42));
        board.select_date(day("2024-05-01")).await.unwrap();

        board.navigate_date(-1).await.unwrap();
        assert_eq!(board.day(), day("2024-04-30"));

        board.navigate_date(2).await.unwrap();
        assert_eq!(board.day(), day("2024-05-02"));
    }

    proptest! {
        /// The grid always has exactly one cell per catalog slot, each
        /// either Available or Booked, whatever the fetched list held.
        #[test]
        fn grid_shape_is_invariant(
            entries in proptest::collection::vec((1u32..=3, 0u32..24, 1i64..50), 0..30)
        ) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();

            rt.block_on(async {
                let bookings = entries
                    .iter()
                    .map(|(machine, hour, resident)| {
                        record(*machine, &format!("{hour:02}:00"), *resident, "2024-05-01")
                    })
                    .collect();

                let board = board_with(
                    MockGateway::with_bookings(bookings),
                    Principal::Resident(42),
                );
                board.select_date(day("2024-05-01")).await.unwrap();

                for machine in 1..=3 {
                    board.select_machine(machine);
                    let grid = board.grid();
                    assert_eq!(grid.len(), board.catalog().len());
                }
            });
        }
    }
}
