pub mod booking;
pub mod calendar;
pub mod catalog;
pub mod clock;
pub mod conflict;
pub mod engine;
pub mod occupancy;
pub mod reservation;
pub mod store;
pub mod time_range;
pub mod utils;
pub mod writer;
