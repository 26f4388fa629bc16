use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::errors::ApiError;
use crate::api::types::{BookingRecord, NewBookingRequest, SubjectRecord};

/// Seam to the remote booking service.
///
/// The board and submitter only ever talk to this trait, so every flow is
/// testable against an in-memory fake.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// All bookings across machines for one calendar day.
    async fn bookings_for_date(&self, date: NaiveDate) -> Result<Vec<BookingRecord>, ApiError>;

    /// The full resident roster.
    async fn subjects(&self) -> Result<Vec<SubjectRecord>, ApiError>;

    /// Creates a booking. The backend is the authority on slot conflicts;
    /// a concurrent claim on the same slot comes back as a rejection.
    async fn create_booking(&self, req: &NewBookingRequest) -> Result<BookingRecord, ApiError>;
}
