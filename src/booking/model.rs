use chrono::NaiveDate;

use crate::api::types::{BookingRecord, SubjectRecord};

pub type BookingId = i64;
pub type MachineId = u32;
pub type ResidentId = i64;

/// One confirmed reservation, as understood by the client.
///
/// Bookings are created by the backend and only ever replaced wholesale on
/// the next fetch; the client never edits one in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub machine: MachineId,
    pub slot: String,
    pub resident: ResidentId,

    /// Calendar day the booking falls on. `None` when the backend row
    /// carries an unparseable date.
    pub day: Option<NaiveDate>,
    /// Raw backend date field, kept verbatim for legacy slot matching.
    pub raw_date: String,
}

impl Booking {
    /// Maps a wire record into the domain. Older rows carry a full
    /// instant in `date`; the calendar day is its `YYYY-MM-DD` prefix.
    pub fn from_record(rec: &BookingRecord) -> Self {
        let day = rec
            .date
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        Self {
            id: rec.id,
            machine: rec.resource_id,
            slot: rec.slot.clone(),
            resident: rec.subject_id,
            day,
            raw_date: rec.date.clone(),
        }
    }
}

/// A not-yet-submitted candidate reservation.
///
/// Exists only between a slot click and submit/cancel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingIntent {
    pub machine: MachineId,
    pub slot: String,
    pub day: NaiveDate,

    /// Unset until a resident is picked from the roster, unless the acting
    /// principal is a resident booking for themself.
    pub resident: Option<ResidentId>,
}

impl BookingIntent {
    pub fn for_resident(mut self, resident: ResidentId) -> Self {
        self.resident = Some(resident);
        self
    }
}

/// Roster entry used to resolve occupant names and drive the staff picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resident {
    pub id: ResidentId,
    pub name: String,
    pub room: Option<String>,
}

impl Resident {
    pub fn from_record(rec: &SubjectRecord) -> Self {
        Self {
            id: rec.id,
            name: rec.name.clone(),
            room: rec.resource_room.clone(),
        }
    }

    /// First given name, used for compact grid display.
    pub fn short_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}
