pub mod booking;
pub mod registry;
