//! Fixed grid of bookable time slots.
//!
//! The catalog is built once and never regenerated per request: slot
//! labels are the canonical identity used everywhere (index keys, wire
//! payloads), display labels exist only for rendering.

use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("malformed slot label: {0:?}")]
    Malformed(String),
}

/// One bookable time-of-day bucket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    /// Canonical 24-hour "HH:MM" form.
    label: String,
    /// Derived 12-hour "H:MM AM/PM" form.
    display: String,
}

impl TimeSlot {
    fn from_parts(hour: u32, minute: u32) -> Self {
        debug_assert!(hour < 24 && minute < 60);
        Self {
            label: format!("{hour:02}:{minute:02}"),
            display: to_display(hour, minute),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

static STANDARD: Lazy<TimeSlotCatalog> = Lazy::new(|| TimeSlotCatalog::hourly(8, 21));

/// Ordered, fixed-length sequence of bookable slots for one day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeSlotCatalog {
    slots: Vec<TimeSlot>,
}

impl TimeSlotCatalog {
    /// The deployed grid: hourly slots from 08:00 through 21:00.
    pub fn standard() -> &'static TimeSlotCatalog {
        &STANDARD
    }

    /// Hourly slots from `start_hour` through `end_hour`, ascending.
    pub fn hourly(start_hour: u32, end_hour: u32) -> Self {
        debug_assert!(start_hour <= end_hour && end_hour < 24);
        let end = end_hour.min(23);
        let start = start_hour.min(end);

        Self {
            slots: (start..=end).map(|h| TimeSlot::from_parts(h, 0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.slots.iter().any(|s| s.label == label)
    }
}

/// Converts a canonical 24-hour "HH:MM" label into its 12-hour display
/// form. Total over valid labels; anything else is a programming error
/// upstream and comes back as [`FormatError`].
pub fn display_label(label: &str) -> Result<String, FormatError> {
    let (hour, minute) =
        parse_label(label).ok_or_else(|| FormatError::Malformed(label.to_string()))?;
    Ok(to_display(hour, minute))
}

fn parse_label(label: &str) -> Option<(u32, u32)> {
    let (h, m) = label.split_once(':')?;
    if h.len() != 2 || m.len() != 2 {
        return None;
    }

    let hour: u32 = h.parse().ok()?;
    let minute: u32 = m.parse().ok()?;
    if hour >= 24 || minute >= 60 {
        return None;
    }

    Some((hour, minute))
}

fn to_display(hour: u32, minute: u32) -> String {
    let ampm = if hour >= 12 { "PM" } else { "AM" };
    let h12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{h12}:{minute:02} {ampm}")
}
