use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parkline_store::{BookingLedger, ListingFilter, ListingStore, MarketState, MarketStateConfig};
use parkline_types::{
    Booking, BookingId, BookingStatus, EventWindow, Listing, SessionId, SpotId, UserId,
};
use tempfile::TempDir;

fn create_temp_state() -> (MarketState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = MarketStateConfig::new(temp_dir.path());
    let state = MarketState::open(config).unwrap();
    (state, temp_dir)
}

fn create_listing(id: u64, spaces: u32) -> Listing {
    Listing::new(
        SpotId::new(format!("spot_{}", id % 16)),
        UserId::new(format!("host_{}", id % 4)),
        format!("Bench lot {}", id),
        1500,
        spaces,
        EventWindow::new(1_767_290_400_000, 1_767_304_800_000),
        1_767_000_000_000 + id,
    )
}

fn create_booking(listing: &Listing, n: u64) -> Booking {
    Booking {
        id: BookingId::generate(),
        user_id: UserId::new(format!("guest_{}", n)),
        listing_id: listing.id.clone(),
        spot_id: listing.spot_id.clone(),
        total_price: listing.price,
        session_id: SessionId::new(format!("cs_bench_{}", n)),
        status: BookingStatus::Paid,
        window: listing.window,
        created_at: 1_767_100_000_000 + n,
    }
}

fn bench_reserve(c: &mut Criterion) {
    let (state, _temp_dir) = create_temp_state();
    let listing = create_listing(1, u32::MAX / 2);
    state.listings.insert(&listing).unwrap();

    c.bench_function("try_reserve_one", |b| {
        b.iter(|| {
            let outcome = state.listings.try_reserve_one(black_box(&listing.id)).unwrap();
            black_box(outcome);
        });
    });

    let full = create_listing(2, 1);
    state.listings.insert(&full).unwrap();
    state.listings.try_reserve_one(&full.id).unwrap();

    c.bench_function("try_reserve_one_at_capacity", |b| {
        b.iter(|| {
            let outcome = state.listings.try_reserve_one(black_box(&full.id)).unwrap();
            black_box(outcome);
        });
    });
}

fn bench_commit_booking(c: &mut Criterion) {
    let (state, _temp_dir) = create_temp_state();
    let listing = create_listing(1, u32::MAX / 2);
    state.listings.insert(&listing).unwrap();

    let mut n = 0u64;
    c.bench_function("commit_booking", |b| {
        b.iter(|| {
            n += 1;
            let booking = create_booking(&listing, n);
            let outcome = state.commit_booking(black_box(&booking)).unwrap();
            black_box(outcome);
        });
    });

    let replay = create_booking(&listing, 0);
    state.commit_booking(&replay).unwrap();

    c.bench_function("commit_booking_replay", |b| {
        b.iter(|| {
            let outcome = state.commit_booking(black_box(&replay)).unwrap();
            black_box(outcome);
        });
    });
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing_queries");

    for count in [10u64, 100, 1000].iter() {
        let (state, _temp_dir) = create_temp_state();
        for id in 0..*count {
            let listing = create_listing(id, 10);
            state.listings.insert(&listing).unwrap();
            state.bookings.create_if_absent(&create_booking(&listing, id)).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("list_active", count), count, |b, _| {
            b.iter(|| {
                let listings = state.listings.list(&ListingFilter::new().active()).unwrap();
                black_box(listings);
            });
        });

        group.bench_with_input(BenchmarkId::new("bookings_for_host", count), count, |b, _| {
            let host = UserId::new("host_0");
            b.iter(|| {
                let bookings = state.bookings.list_for_host(black_box(&host)).unwrap();
                black_box(bookings);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reserve, bench_commit_booking, bench_queries);
criterion_main!(benches);
