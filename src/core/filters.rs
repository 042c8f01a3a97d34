use crate::core::distance::haversine_distance;
use crate::models::{Candidate, GeoPoint};

/// Address values the POI service uses when it has nothing real
const PLACEHOLDER_ADDRESSES: [&str; 5] = ["unknown", "n/a", "null", "undefined", "-"];

/// Shortest address that can still be a postal address
const MIN_ADDRESS_LEN: usize = 6;

/// Check whether an address is one of the known placeholder values
#[inline]
pub fn is_placeholder_address(address: &str) -> bool {
    let normalized = address.trim().to_lowercase();
    PLACEHOLDER_ADDRESSES.contains(&normalized.as_str())
}

/// Check whether an address looks like a real postal address
///
/// Placeholders, very short strings, and strings with neither a comma nor a
/// digit are rejected.
#[inline]
pub fn looks_like_address(address: &str) -> bool {
    if is_placeholder_address(address) {
        return false;
    }

    let normalized = address.trim().to_lowercase();

    if normalized.chars().count() < MIN_ADDRESS_LEN {
        return false;
    }

    normalized.contains(',') || normalized.chars().any(|c| c.is_ascii_digit())
}

/// Structural validity filter
///
/// A candidate needs a non-blank name and an address that looks real.
#[inline]
pub fn has_valid_address(candidate: &Candidate) -> bool {
    if candidate.name.trim().is_empty() {
        return false;
    }

    match &candidate.address {
        Some(address) => looks_like_address(address),
        None => false,
    }
}

/// Maximum individual distance filter
///
/// Rejects the candidate when any participant would travel more than `cap_m`.
#[inline]
pub fn within_individual_cap(candidate: &Candidate, participants: &[GeoPoint], cap_m: f64) -> bool {
    participants
        .iter()
        .all(|p| haversine_distance(p, &candidate.location) <= cap_m)
}
