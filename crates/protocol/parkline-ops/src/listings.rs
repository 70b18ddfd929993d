//! Host-side listing management and the listing read model.

use parkline_store::{ListingFilter, ListingStore, StoreError};
use parkline_types::{
    current_timestamp, Amount, EventWindow, Listing, ListingId, SpotId, UserId, MAX_LISTING_PRICE,
    MAX_LISTING_SPACES, MAX_TITLE_LENGTH, MIN_LISTING_PRICE,
};
use serde::Serialize;
use tracing::info;

use crate::error::{OpsError, OpsResult};
use crate::marketplace::Marketplace;

/// Fields a host supplies when publishing a listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub spot_id: SpotId,
    pub host_id: UserId,
    pub title: String,
    pub event_name: String,
    pub price: Amount,
    pub spaces: u32,
    pub window: EventWindow,
}

impl NewListing {
    /// Check the publish rules: a positive price, at least one space, a
    /// spot, and an event window that starts before it ends.
    pub fn validate(&self) -> OpsResult<()> {
        if self.spot_id.is_blank() {
            return Err(OpsError::invalid_listing("spot is required"));
        }
        if self.host_id.is_blank() {
            return Err(OpsError::invalid_listing("host is required"));
        }
        if self.title.trim().is_empty() {
            return Err(OpsError::invalid_listing("title is required"));
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(OpsError::invalid_listing(format!(
                "title longer than {} characters",
                MAX_TITLE_LENGTH
            )));
        }
        validate_price(self.price)?;
        if self.spaces == 0 {
            return Err(OpsError::invalid_listing("at least one space is required"));
        }
        if self.spaces > MAX_LISTING_SPACES {
            return Err(OpsError::invalid_listing(format!(
                "at most {} spaces per listing",
                MAX_LISTING_SPACES
            )));
        }
        if !self.window.is_valid() {
            return Err(OpsError::invalid_listing("event start must be before end"));
        }
        Ok(())
    }
}

fn validate_price(price: Amount) -> OpsResult<()> {
    if !(MIN_LISTING_PRICE..=MAX_LISTING_PRICE).contains(&price) {
        return Err(OpsError::invalid_listing(format!(
            "price must be between {} and {} minor units",
            MIN_LISTING_PRICE, MAX_LISTING_PRICE
        )));
    }
    Ok(())
}

/// A listing together with its remaining capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub listing: Listing,
    /// Spaces still open, never negative.
    pub remaining: u32,
}

impl From<Listing> for ListingView {
    fn from(listing: Listing) -> Self {
        let remaining = listing.capacity().remaining();
        Self { listing, remaining }
    }
}

impl Marketplace {
    /// Publish a new listing.
    pub fn publish_listing(&self, new: NewListing) -> OpsResult<Listing> {
        new.validate()?;

        let listing = Listing::new(
            new.spot_id,
            new.host_id,
            new.title.trim(),
            new.price,
            new.spaces,
            new.window,
            current_timestamp(),
        )
        .with_event_name(new.event_name.trim());

        self.state.listings.insert(&listing)?;

        info!(
            listing_id = %listing.id,
            spot_id = %listing.spot_id,
            host_id = %listing.host_id,
            price = listing.price,
            spaces = listing.spaces_available,
            "Listing published"
        );
        Ok(listing)
    }

    /// Withdraw a listing. Existing bookings are unaffected.
    pub fn deactivate_listing(&self, host_id: &UserId, listing_id: &ListingId) -> OpsResult<Listing> {
        self.owned_listing(host_id, listing_id)?;
        self.state
            .listings
            .deactivate(listing_id, current_timestamp())
            .map_err(|e| not_found_or(e, listing_id))?;

        info!(listing_id = %listing_id, host_id = %host_id, "Listing deactivated");
        self.owned_listing(host_id, listing_id)
    }

    /// Change a listing's price. Sessions already opened keep their
    /// snapshotted price.
    pub fn reprice_listing(
        &self,
        host_id: &UserId,
        listing_id: &ListingId,
        price: Amount,
    ) -> OpsResult<Listing> {
        validate_price(price)?;
        let before = self.owned_listing(host_id, listing_id)?;

        self.state
            .listings
            .update_price(listing_id, price, current_timestamp())
            .map_err(|e| not_found_or(e, listing_id))?;

        info!(
            listing_id = %listing_id,
            old_price = before.price,
            new_price = price,
            "Listing repriced"
        );
        self.owned_listing(host_id, listing_id)
    }

    /// Load one listing with its remaining capacity.
    pub fn listing_view(&self, listing_id: &ListingId) -> OpsResult<ListingView> {
        self.state
            .listings
            .get(listing_id)?
            .map(ListingView::from)
            .ok_or_else(|| OpsError::ListingNotFound(listing_id.clone()))
    }

    /// List listings matching `filter`, each with its remaining capacity.
    pub fn list_listings(&self, filter: &ListingFilter) -> OpsResult<Vec<ListingView>> {
        Ok(self
            .state
            .listings
            .list(filter)?
            .into_iter()
            .map(ListingView::from)
            .collect())
    }

    pub(crate) fn owned_listing(&self, host_id: &UserId, listing_id: &ListingId) -> OpsResult<Listing> {
        let listing = self
            .state
            .listings
            .get(listing_id)?
            .ok_or_else(|| OpsError::ListingNotFound(listing_id.clone()))?;

        if !listing.is_owned_by(host_id) {
            return Err(OpsError::NotListingOwner(listing_id.clone()));
        }
        Ok(listing)
    }
}

fn not_found_or(err: StoreError, listing_id: &ListingId) -> OpsError {
    match err {
        StoreError::ListingNotFound(_) => OpsError::ListingNotFound(listing_id.clone()),
        other => OpsError::Store(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkline_pay::MockGateway;
    use parkline_store::MarketState;
    use parkline_types::ListingStatus;
    use std::sync::Arc;

    fn market() -> Marketplace {
        Marketplace::with_defaults(
            MarketState::open_in_memory().unwrap(),
            Arc::new(MockGateway::new()),
        )
    }

    fn new_listing() -> NewListing {
        NewListing {
            spot_id: SpotId::new("spot_1"),
            host_id: UserId::new("host_1"),
            title: "  River lot ".to_string(),
            event_name: "Derby day".to_string(),
            price: 2000,
            spaces: 4,
            window: EventWindow::new(1_000, 5_000),
        }
    }

    #[test]
    fn test_publish_trims_and_stores() {
        let market = market();
        let listing = market.publish_listing(new_listing()).unwrap();

        assert_eq!(listing.title, "River lot");
        assert_eq!(listing.status, ListingStatus::Active);

        let view = market.listing_view(&listing.id).unwrap();
        assert_eq!(view.remaining, 4);
        assert_eq!(view.listing, listing);
    }

    #[test]
    fn test_publish_validation() {
        let market = market();

        let mut zero_price = new_listing();
        zero_price.price = 0;
        let mut no_spaces = new_listing();
        no_spaces.spaces = 0;
        let mut backwards = new_listing();
        backwards.window = EventWindow::new(5_000, 1_000);
        let mut no_spot = new_listing();
        no_spot.spot_id = SpotId::new("");

        for bad in [zero_price, no_spaces, backwards, no_spot] {
            let err = market.publish_listing(bad).unwrap_err();
            assert!(matches!(err, OpsError::InvalidListing(_)));
        }
        assert!(market.list_listings(&ListingFilter::new()).unwrap().is_empty());
    }

    #[test]
    fn test_only_host_can_modify() {
        let market = market();
        let listing = market.publish_listing(new_listing()).unwrap();
        let stranger = UserId::new("host_2");

        assert!(matches!(
            market.reprice_listing(&stranger, &listing.id, 10),
            Err(OpsError::NotListingOwner(_))
        ));
        assert!(matches!(
            market.deactivate_listing(&stranger, &listing.id),
            Err(OpsError::NotListingOwner(_))
        ));
    }

    #[test]
    fn test_reprice_and_deactivate() {
        let market = market();
        let listing = market.publish_listing(new_listing()).unwrap();
        let host = listing.host_id.clone();

        let repriced = market.reprice_listing(&host, &listing.id, 3500).unwrap();
        assert_eq!(repriced.price, 3500);

        let inactive = market.deactivate_listing(&host, &listing.id).unwrap();
        assert_eq!(inactive.status, ListingStatus::Inactive);

        let active = market
            .list_listings(&ListingFilter::new().active())
            .unwrap();
        assert!(active.is_empty());
    }

    #[test]
    fn test_missing_listing() {
        let market = market();
        let missing = ListingId::new("lst_none");
        assert!(matches!(
            market.listing_view(&missing),
            Err(OpsError::ListingNotFound(_))
        ));
        assert!(matches!(
            market.deactivate_listing(&UserId::new("host_1"), &missing),
            Err(OpsError::ListingNotFound(_))
        ));
    }
}
