//! Concurrent confirmation tests.
//!
//! Confirmations run as independent tokio tasks against one shared
//! `Marketplace`, the way a server would handle simultaneous returns from
//! the payment page.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use parkline_ops::OpsError;
use parkline_store::{BookingLedger, ListingStore};
use parkline_test_utils::*;
use parkline_types::ListingStatus;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_confirms_of_one_session() {
    let (market, gateway, _temp) = create_test_market();
    let market = Arc::new(market);
    let listing = publish_sample(&market, 1500, 3);
    let guest = guest(1);
    let session_id = paid_session(&market, &gateway, &listing, &guest).await;

    let tasks = (0..8).map(|_| {
        let market = Arc::clone(&market);
        let session_id = session_id.clone();
        let guest = guest.clone();
        tokio::spawn(async move { market.confirm(&session_id, &guest).await })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let ids: HashSet<_> = results.iter().map(|b| b.id.clone()).collect();
    assert_eq!(ids.len(), 1, "every caller sees the same booking");

    let capacity = market.state.listings.capacity(&listing.id).unwrap().unwrap();
    assert_eq!(capacity.booked_spaces, 1);
    assert_eq!(market.state.bookings.list_for_listing(&listing.id).unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_race_for_last_space() {
    let (market, gateway, _temp) = create_test_market();
    let market = Arc::new(market);
    let listing = publish_sample(&market, 1500, 1);

    let first = paid_session(&market, &gateway, &listing, &guest(1)).await;
    let second = paid_session(&market, &gateway, &listing, &guest(2)).await;

    let tasks = [(first, guest(1)), (second, guest(2))].map(|(session_id, user)| {
        let market = Arc::clone(&market);
        tokio::spawn(async move { market.confirm(&session_id, &user).await })
    });

    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let won = results.iter().filter(|r| r.is_ok()).count();
    let refused = results
        .iter()
        .filter(|r| matches!(r, Err(OpsError::CapacityExceeded { .. })))
        .count();
    assert_eq!(won, 1);
    assert_eq!(refused, 1);

    let capacity = market.state.listings.capacity(&listing.id).unwrap().unwrap();
    assert_eq!(capacity.booked_spaces, 1);
    assert_eq!(capacity.status, ListingStatus::Full);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_oversold_sessions_never_overbook() {
    let (market, gateway, _temp) = create_test_market();
    let market = Arc::new(market);
    let spaces = 5;
    let listing = publish_sample(&market, 900, spaces);

    // More paid sessions than spaces, all issued while the listing was open
    let mut sessions = Vec::new();
    for n in 0..12 {
        let user = guest(n);
        let session_id = paid_session(&market, &gateway, &listing, &user).await;
        sessions.push((session_id, user));
    }

    // Each session is confirmed twice to mix replays into the race
    let tasks = sessions
        .iter()
        .chain(sessions.iter())
        .cloned()
        .map(|(session_id, user)| {
            let market = Arc::clone(&market);
            tokio::spawn(async move { market.confirm(&session_id, &user).await })
        });

    let mut booked_sessions = HashSet::new();
    let mut refused = 0;
    for joined in join_all(tasks).await {
        match joined.unwrap() {
            Ok(booking) => {
                booked_sessions.insert(booking.session_id);
            }
            Err(OpsError::CapacityExceeded { .. }) => refused += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(booked_sessions.len(), spaces as usize);
    assert!(refused >= 12 - spaces as usize);

    let capacity = market.state.listings.capacity(&listing.id).unwrap().unwrap();
    assert_eq!(capacity.booked_spaces, spaces);
    assert!(capacity.booked_spaces <= capacity.spaces_available);
    assert_eq!(capacity.status, ListingStatus::Full);
    assert_eq!(
        market.state.bookings.list_for_listing(&listing.id).unwrap().len(),
        spaces as usize
    );
}
