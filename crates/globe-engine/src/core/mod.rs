pub mod geo;
pub mod spin;
pub mod time;
pub mod registry;
pub mod schedule;
