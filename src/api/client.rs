use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::api::errors::ApiError;
use crate::api::gateway::BookingGateway;
use crate::api::types::{BookingRecord, NewBookingRequest, SubjectRecord};

/// HTTP implementation of [`BookingGateway`] over the dashboard REST API.
#[derive(Clone)]
pub struct HttpGateway {
    http: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl BookingGateway for HttpGateway {
    #[instrument(
        skip(self),
        fields(date = %date),
        level = "debug"
    )]
    async fn bookings_for_date(&self, date: NaiveDate) -> Result<Vec<BookingRecord>, ApiError> {
        let url = format!("{}/bookings?date={}", self.base_url, date.format("%Y-%m-%d"));

        let resp = self.http.get(&url).send().await?.error_for_status()?;

        let records: Vec<BookingRecord> = resp.json().await?;

        debug!(count = records.len(), "bookings fetched");

        Ok(records)
    }

    #[instrument(skip(self), level = "debug")]
    async fn subjects(&self) -> Result<Vec<SubjectRecord>, ApiError> {
        let url = format!("{}/subjects", self.base_url);

        let resp = self.http.get(&url).send().await?.error_for_status()?;

        let subjects: Vec<SubjectRecord> = resp.json().await?;

        debug!(count = subjects.len(), "roster fetched");

        Ok(subjects)
    }

    #[instrument(
        skip(self, req),
        fields(machine = req.resource_id, slot = %req.slot),
        level = "debug"
    )]
    async fn create_booking(&self, req: &NewBookingRequest) -> Result<BookingRecord, ApiError> {
        let url = format!("{}/bookings", self.base_url);

        let resp = self.http.post(&url).json(req).send().await?;

        let status = resp.status();
        if !status.is_success() {
            // Keep the backend's own words: slot-taken races surface here
            // and the message goes to the user verbatim.
            let message = resp.text().await.unwrap_or_default();
            return Err(ApiError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let created: BookingRecord = resp.json().await?;

        debug!(booking_id = created.id, "booking created");

        Ok(created)
    }
}
