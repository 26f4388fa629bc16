pub mod client;
pub mod errors;
pub mod gateway;
pub mod types;

pub use client::HttpGateway;
pub use errors::ApiError;
pub use gateway::BookingGateway;
