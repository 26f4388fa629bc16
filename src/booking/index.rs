use std::collections::HashMap;

use chrono::NaiveDate;

use crate::booking::model::{Booking, MachineId, ResidentId};

/// How a grid slot label is matched against stored bookings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotMatch {
    /// Exact match on the canonical "HH:MM" slot field.
    #[default]
    Exact,

    /// Exact match, falling back to a substring probe of the raw backend
    /// date field. Needed only for legacy rows whose slot column holds
    /// free-form values ("Morning") with the real time buried in the
    /// denormalized instant. Reports a false positive whenever one label
    /// happens to occur inside an unrelated instant, so it must stay
    /// opt-in.
    #[deprecated(note = "legacy rows only; exact matching is authoritative")]
    LegacyTimestamp,
}

/// Date-scoped lookup from (machine, slot) to the booking occupying it.
///
/// Built from the latest fetched list and rebuilt on every date change.
/// Never mutated in place: occupancy is always re-derived from backend
/// truth, so optimistic local state cannot drift.
pub struct BookingIndex {
    day: NaiveDate,
    by_machine: HashMap<MachineId, HashMap<String, Booking>>,
    bookings: Vec<Booking>,
    strategy: SlotMatch,
}

impl BookingIndex {
    pub fn build(day: NaiveDate, bookings: Vec<Booking>) -> Self {
        Self::build_with(day, bookings, SlotMatch::default())
    }

    pub fn build_with(day: NaiveDate, bookings: Vec<Booking>, strategy: SlotMatch) -> Self {
        let scoped: Vec<Booking> = bookings.into_iter().filter(|b| b.day == Some(day)).collect();

        let mut by_machine: HashMap<MachineId, HashMap<String, Booking>> = HashMap::new();
        for b in &scoped {
            by_machine
                .entry(b.machine)
                .or_default()
                .insert(b.slot.clone(), b.clone());
        }

        Self {
            day,
            by_machine,
            bookings: scoped,
            strategy,
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Number of bookings indexed for the day.
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn is_booked(&self, machine: MachineId, slot: &str) -> bool {
        self.lookup(machine, slot).is_some()
    }

    pub fn occupant(&self, machine: MachineId, slot: &str) -> Option<ResidentId> {
        self.lookup(machine, slot).map(|b| b.resident)
    }

    fn lookup(&self, machine: MachineId, slot: &str) -> Option<&Booking> {
        let exact = self.by_machine.get(&machine).and_then(|m| m.get(slot));

        match self.strategy {
            SlotMatch::Exact => exact,
            #[allow(deprecated)]
            SlotMatch::LegacyTimestamp => exact.or_else(|| {
                self.bookings
                    .iter()
                    .find(|b| b.machine == machine && b.raw_date.contains(slot))
            }),
        }
    }
}
