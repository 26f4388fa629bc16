use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::api::errors::ApiError;
use crate::api::gateway::BookingGateway;
use crate::api::types::NewBookingRequest;
use crate::booking::model::{Booking, BookingIntent, ResidentId};
use crate::catalog::TimeSlotCatalog;
use crate::logger::warn_if_slow;

#[derive(Error, Debug)]
pub enum BookingError {
    /// Intent failed local validation; no request was issued.
    #[error("invalid booking intent: {0}")]
    Validation(String),

    /// The booking service refused the create. Carries the backend's own
    /// message, which is shown to the user unedited.
    #[error("{0}")]
    Submission(String),
}

/// Validates a [`BookingIntent`] and turns it into a create call.
///
/// The submitter never touches the board's index: after a submit, whether
/// it succeeded or not, the caller refreshes the day so occupancy is
/// re-derived from backend truth instead of patched optimistically.
pub struct BookingSubmitter {
    gateway: Arc<dyn BookingGateway>,
}

impl BookingSubmitter {
    pub fn new(gateway: Arc<dyn BookingGateway>) -> Self {
        Self { gateway }
    }

    #[instrument(
        skip(self, catalog, intent),
        target = "submit",
        fields(machine = intent.machine, slot = %intent.slot, day = %intent.day)
    )]
    pub async fn submit(
        &self,
        catalog: &TimeSlotCatalog,
        intent: &BookingIntent,
    ) -> Result<Booking, BookingError> {
        let resident = self.validate(catalog, intent)?;

        // The backend keys the reservation on one combined instant.
        let req = NewBookingRequest {
            subject_id: resident,
            resource_id: intent.machine,
            slot: intent.slot.clone(),
            date: format!("{}T{}:00", intent.day.format("%Y-%m-%d"), intent.slot),
        };

        debug!(instant = %req.date, "submitting booking");

        let created = warn_if_slow("create_booking", Duration::from_millis(800), async {
            self.gateway.create_booking(&req).await
        })
        .await;

        match created {
            Ok(rec) => {
                debug!(booking_id = rec.id, "booking confirmed");
                Ok(Booking::from_record(&rec))
            }
            Err(ApiError::Backend { status, message }) => {
                // Likely a slot-taken race with another client; the caller
                // must refresh to reconcile the grid.
                warn!(status, %message, "booking rejected by backend");
                Err(BookingError::Submission(message))
            }
            Err(e) => {
                warn!(error = %e, "booking request failed in transit");
                Err(BookingError::Submission(e.to_string()))
            }
        }
    }

    fn validate(
        &self,
        catalog: &TimeSlotCatalog,
        intent: &BookingIntent,
    ) -> Result<ResidentId, BookingError> {
        if !catalog.contains(&intent.slot) {
            return Err(BookingError::Validation(format!(
                "slot {:?} is not on the grid",
                intent.slot
            )));
        }

        intent
            .resident
            .ok_or_else(|| BookingError::Validation("no resident selected".to_string()))
    }
}
