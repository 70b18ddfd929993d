//! Helper functions for creating test fixtures.
//!
//! Provides convenience functions for building marketplaces backed by the
//! mock payment gateway, sample listings, and paid checkout sessions.

use parkline_ops::{Marketplace, NewListing, OpsConfig};
use parkline_pay::{MockGateway, PaymentGateway};
use parkline_store::{MarketState, MarketStateConfig};
use parkline_types::{
    Amount, CheckoutSession, EventWindow, Listing, PaymentStatus, SessionId, SessionMetadata,
    SpotId, UserId,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Default event window used by fixtures: a four hour evening event.
pub const TEST_WINDOW: EventWindow = EventWindow {
    start: 1_767_290_400_000,
    end: 1_767_304_800_000,
};

/// Host id used by fixtures.
pub const TEST_HOST: &str = "host_test";

/// Create a marketplace on an on-disk database with a mock gateway.
///
/// Returns the marketplace, the mock (for driving payments and for
/// assertions), and the temp directory (must be kept alive for the
/// duration of the test).
pub fn create_test_market() -> (Marketplace, Arc<MockGateway>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let state = MarketState::open(MarketStateConfig::new(temp_dir.path())).unwrap();
    let gateway = Arc::new(MockGateway::new());
    let market = Marketplace::new(
        state,
        Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
        OpsConfig::default(),
    );
    (market, gateway, temp_dir)
}

/// Create a marketplace on an in-memory database with a mock gateway.
pub fn create_memory_market() -> (Marketplace, Arc<MockGateway>) {
    let state = MarketState::open_in_memory().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let market =
        Marketplace::with_defaults(state, Arc::clone(&gateway) as Arc<dyn PaymentGateway>);
    (market, gateway)
}

/// Listing fields for a test host with the given price and space count.
pub fn sample_listing(price: Amount, spaces: u32) -> NewListing {
    NewListing {
        spot_id: SpotId::new("spot_test"),
        host_id: UserId::new(TEST_HOST),
        title: "Test lot".to_string(),
        event_name: "Test event".to_string(),
        price,
        spaces,
        window: TEST_WINDOW,
    }
}

/// Publish a sample listing and return it.
pub fn publish_sample(market: &Marketplace, price: Amount, spaces: u32) -> Listing {
    market
        .publish_listing(sample_listing(price, spaces))
        .unwrap()
}

/// Open a checkout session for `user` and mark it paid at the mock.
pub async fn paid_session(
    market: &Marketplace,
    gateway: &MockGateway,
    listing: &Listing,
    user: &UserId,
) -> SessionId {
    let handle = market.create_session(user, &listing.id).await.unwrap();
    gateway.mark_paid(&handle.session_id).unwrap();
    handle.session_id
}

/// Insert a session directly into the mock, bypassing the broker.
///
/// Useful for sessions whose metadata no longer matches the listing, such
/// as a snapshot taken before a price change.
pub fn inject_session(
    gateway: &MockGateway,
    listing: &Listing,
    user: &UserId,
    price_snapshot: Amount,
    status: PaymentStatus,
) -> SessionId {
    let id = SessionId::new(format!("cs_test_{}", next_suffix()));
    let metadata = SessionMetadata::new(
        listing.id.clone(),
        user.clone(),
        listing.spot_id.clone(),
        price_snapshot,
    );
    let session = CheckoutSession::new(id.clone(), "https://pay.test/c", metadata, status);
    gateway.insert_session(session).unwrap();
    id
}

/// A numbered guest id.
pub fn guest(n: usize) -> UserId {
    UserId::new(format!("guest_{}", n))
}

fn next_suffix() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!("{:08}", COUNTER.fetch_add(1, Ordering::SeqCst))
}
