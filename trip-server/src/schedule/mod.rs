//! Timetable simulation for a line's stop pattern.
//!
//! Given a departure time and stops with fixed minute offsets, this module
//! computes when each stop is reached, and generates evenly spaced departures
//! for the departure-time picker.

mod config;
mod slots;

pub use config::ScheduleConfig;
pub use slots::{
    Arrival, ScheduleError, TimeSlot, TimeSlots, calculate_time_slot, generate_time_slots,
};
