use serde::{Deserialize, Serialize};

/// Booking row as returned by `GET /bookings?date=YYYY-MM-DD`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRecord {
    pub id: i64,

    pub resource_id: u32,
    pub slot: String,
    pub subject_id: i64,

    /// Calendar day, or a full `YYYY-MM-DDTHH:MM:SS` instant on rows
    /// written by older clients.
    pub date: String,
}

/// Roster row as returned by `GET /subjects`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRecord {
    pub id: i64,
    pub name: String,
    pub resource_room: Option<String>,
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize)]
pub struct NewBookingRequest {
    pub subject_id: i64,
    pub resource_id: u32,
    pub slot: String,

    /// Combined `YYYY-MM-DDTHH:MM:00` instant for the booked slot.
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_record_decodes_backend_payload() {
        let raw = r#"[
            {"id": 3, "resource_id": 1, "slot": "08:00", "subject_id": 7, "date": "2024-05-01T08:00:00"},
            {"id": 4, "resource_id": 2, "slot": "09:00", "subject_id": 9, "date": "2024-05-01"}
        ]"#;

        let records: Vec<BookingRecord> = serde_json::from_str(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].resource_id, 1);
        assert_eq!(records[0].slot, "08:00");
        assert_eq!(records[1].date, "2024-05-01");
    }

    #[test]
    fn subject_record_tolerates_missing_room() {
        let raw = r#"{"id": 7, "name": "Arjun Mehta", "resource_room": null}"#;

        let subject: SubjectRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(subject.name, "Arjun Mehta");
        assert!(subject.resource_room.is_none());
    }

    #[test]
    fn create_request_serializes_contract_field_names() {
        let req = NewBookingRequest {
            subject_id: 42,
            resource_id: 1,
            slot: "09:00".to_string(),
            date: "2024-05-01T09:00:00".to_string(),
        };

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["subject_id"], 42);
        assert_eq!(body["resource_id"], 1);
        assert_eq!(body["slot"], "09:00");
        assert_eq!(body["date"], "2024-05-01T09:00:00");
    }
}
