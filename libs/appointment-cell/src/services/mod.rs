pub mod booking;
pub mod lifecycle;
pub mod listing;
pub mod slots;
