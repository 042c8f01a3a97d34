// Service exports
pub mod nominatim;
pub mod overpass;

pub use nominatim::{GeocodeError, GeocodedAddress, NominatimClient};
pub use overpass::{build_query, format_address, OverpassClient, OverpassError};
