pub mod facility;

pub use facility::{ParkingCategory, ParkingFacility};
