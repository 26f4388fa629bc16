pub mod index;
pub mod model;
pub mod submit;

pub use index::{BookingIndex, SlotMatch};
pub use model::{Booking, BookingIntent, Resident};
pub use submit::{BookingError, BookingSubmitter};
