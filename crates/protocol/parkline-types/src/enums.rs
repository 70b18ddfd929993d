//! Status enumerations for listings, bookings and payments.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a listing.
///
/// Transitions: `Active -> Full` when the last space is booked, and
/// `Active | Full -> Inactive` when the host withdraws the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Open for checkout
    #[default]
    Active = 0x00,
    /// Every space is booked
    Full = 0x01,
    /// Withdrawn by the host
    Inactive = 0x02,
}

impl ListingStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::Full => "full",
            ListingStatus::Inactive => "inactive",
        }
    }

    /// Parse the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ListingStatus::Active),
            "full" => Some(ListingStatus::Full),
            "inactive" => Some(ListingStatus::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a booking.
///
/// Bookings are created `Paid`; cancellation happens outside this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Paid = 0x00,
    Cancelled = 0x01,
}

impl BookingStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Paid => "paid",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "paid" => Some(BookingStatus::Paid),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment status of a checkout session as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Session open or abandoned without payment
    #[default]
    Unpaid = 0x00,
    /// Funds captured
    Paid = 0x01,
    /// Session expired at the provider
    Expired = 0x02,
}

impl PaymentStatus {
    /// Returns true if the provider reports the payment as captured.
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => f.write_str("unpaid"),
            PaymentStatus::Paid => f.write_str("paid"),
            PaymentStatus::Expired => f.write_str("expired"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_status_roundtrip_str() {
        for status in [
            ListingStatus::Active,
            ListingStatus::Full,
            ListingStatus::Inactive,
        ] {
            assert_eq!(ListingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ListingStatus::parse("archived"), None);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ListingStatus::default(), ListingStatus::Active);
        assert_eq!(BookingStatus::default(), BookingStatus::Paid);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&ListingStatus::Inactive).unwrap();
        assert_eq!(json, "\"inactive\"");
        let parsed: PaymentStatus = serde_json::from_str("\"paid\"").unwrap();
        assert!(parsed.is_paid());
    }
}
