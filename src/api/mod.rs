pub mod overpass;
pub mod postcodes;

pub use overpass::{Element, OverpassResponse, ParkingFetchError, fetch_parking};
pub use postcodes::{GeocodeError, geocode_postcode};
