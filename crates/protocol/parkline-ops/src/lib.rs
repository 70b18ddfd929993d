//! Marketplace operations for Parkline.
//!
//! This crate implements the checkout and confirmation flow on top of the
//! persistent state in `parkline-store` and a payment provider from
//! `parkline-pay`:
//!
//! - [`Marketplace::create_session`] opens a payment session for one space
//!   on a listing, snapshotting its price.
//! - [`Marketplace::confirm`] re-fetches the session from the provider and
//!   records exactly one booking per paid session, never taking more spaces
//!   than the listing has.
//!
//! Listing management and booking queries round out the host and guest
//! views.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use parkline_ops::{Marketplace, NewListing};
//! use parkline_pay::{MockGateway, PaymentGateway};
//! use parkline_store::MarketState;
//! use parkline_types::{EventWindow, SpotId, UserId};
//!
//! let gateway = Arc::new(MockGateway::new());
//! let market = Marketplace::with_defaults(
//!     MarketState::open_in_memory().unwrap(),
//!     Arc::clone(&gateway) as Arc<dyn PaymentGateway>,
//! );
//!
//! let listing = market
//!     .publish_listing(NewListing {
//!         spot_id: SpotId::new("spot_1"),
//!         host_id: UserId::new("host_1"),
//!         title: "Stadium lot".into(),
//!         event_name: "Home opener".into(),
//!         price: 2500,
//!         spaces: 10,
//!         window: EventWindow::new(1_700_000_000_000, 1_700_010_000_000),
//!     })
//!     .unwrap();
//!
//! let guest = UserId::new("guest_1");
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let booking = rt.block_on(async {
//!     let handle = market.create_session(&guest, &listing.id).await.unwrap();
//!     gateway.mark_paid(&handle.session_id).unwrap();
//!     market.confirm(&handle.session_id, &guest).await.unwrap()
//! });
//!
//! assert_eq!(booking.total_price, 2500);
//! ```

pub mod bookings;
pub mod broker;
pub mod config;
pub mod error;
pub mod listings;
pub mod marketplace;
pub mod reconciler;

pub use broker::CheckoutHandle;
pub use config::{CheckoutConfig, OpsConfig};
pub use error::{OpsError, OpsResult};
pub use listings::{ListingView, NewListing};
pub use marketplace::Marketplace;
pub use reconciler::SessionVerification;

pub use parkline_types::current_timestamp;
