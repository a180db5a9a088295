//! Data models for the kennel server

pub mod analytics;
pub mod bill;
pub mod calendar;
pub mod customer;
pub mod enums;
pub mod feeding;
pub mod kennel;
pub mod reservation;
pub mod staff;

// Re-export commonly used types
pub use bill::{Bill, BillQuote};
pub use customer::Customer;
pub use enums::{FeedingSlot, KennelStatus, ReservationStatus, StaffRole};
pub use feeding::{FeedingEntry, FeedingRecord};
pub use kennel::{Kennel, KennelSet, KennelShort};
pub use reservation::{HistoricalReservation, PetInformation, Reservation, ReservationDetails};
pub use staff::{Staff, StaffClaims};
