//! Identifier newtypes.
//!
//! Identifiers are opaque strings. Listings and bookings are minted locally
//! with a short prefix and 24 random hex characters; spots, users and
//! checkout sessions are issued by external collaborators.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::constants::{BOOKING_ID_PREFIX, ID_RANDOM_BYTES, LISTING_ID_PREFIX};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Wrap an existing identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty or only whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of a parking listing.
    ListingId
}

string_id! {
    /// Identifier of the physical spot a listing belongs to.
    SpotId
}

string_id! {
    /// Identifier of a user (guest or host), issued by the auth provider.
    UserId
}

string_id! {
    /// Identifier of a checkout session, issued by the payment provider.
    ///
    /// Doubles as the payment id on a booking.
    SessionId
}

string_id! {
    /// Identifier of a confirmed booking.
    BookingId
}

fn random_suffix() -> String {
    let mut bytes = [0u8; ID_RANDOM_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl ListingId {
    /// Generate a fresh listing id (`lst_` + 24 hex characters).
    pub fn generate() -> Self {
        Self(format!("{}{}", LISTING_ID_PREFIX, random_suffix()))
    }
}

impl BookingId {
    /// Generate a fresh booking id (`bkg_` + 24 hex characters).
    pub fn generate() -> Self {
        Self(format!("{}{}", BOOKING_ID_PREFIX, random_suffix()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_listing_id_format() {
        let id = ListingId::generate();
        assert!(id.as_str().starts_with("lst_"));
        assert_eq!(id.as_str().len(), 4 + 24);
        assert!(id.as_str()[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = BookingId::generate();
        let b = BookingId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("bkg_"));
    }

    #[test]
    fn test_blank_detection() {
        assert!(SpotId::new("  ").is_blank());
        assert!(!SpotId::new("spot_9").is_blank());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = SessionId::new("cs_test_abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"cs_test_abc\"");
    }
}
