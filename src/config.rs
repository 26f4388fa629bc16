#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Base URL of the booking service.
    pub api_base_url: String,

    /// Transport-level timeout applied to every request (seconds).
    ///
    /// The board itself imposes no deadline; a hung request resolves
    /// through this timeout and surfaces as a fetch error.
    pub http_timeout_secs: u64,

    // =========================
    // Grid configuration
    // =========================
    /// Number of machines shown on the board.
    ///
    /// Machine ids are 1-based: a count of 3 exposes machines 1..=3.
    pub machine_count: u32,

    /// First bookable hour of the day (inclusive, 24-hour clock).
    pub day_start_hour: u32,

    /// Last bookable hour of the day (inclusive, 24-hour clock).
    pub day_end_hour: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("BOOKING_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        Self {
            api_base_url,

            http_timeout_secs: 5,

            // Grid defaults mirror the deployed laundry room:
            // three machines, hourly slots from 08:00 to 21:00.
            machine_count: 3,
            day_start_hour: 8,
            day_end_hour: 21,
        }
    }
}
