use criterion::{criterion_group, criterion_main, Criterion};
use order_book_engine::orderbook::OrderBook;
use order_book_engine::orders::{Order, OrderType, Side};

/// Fills `depth` resting ask levels, `orders_per_level` orders each, leaving
/// the bid side empty so construction itself never matches anything.
fn setup_order_book(depth: i32, orders_per_level: u32) -> OrderBook {
    let mut ob = OrderBook::new();
    let mut id = 0u64;
    for price in 1..=depth {
        for _ in 0..orders_per_level {
            id += 1;
            ob.add(Order::new_limit(OrderType::GoodTillCancel, id, Side::Sell, price, 1));
        }
    }
    ob
}

fn bench_match_order(c: &mut Criterion) {
    let depth = 100;
    let orders_per_level = 10u32;

    c.bench_function("market order sweeps half the book", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                ob.add(Order::new_market(
                    0,
                    Side::Buy,
                    (depth as u32) * orders_per_level / 2,
                ));
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("limit order crosses every level", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| {
                ob.add(Order::new_limit(
                    OrderType::GoodTillCancel,
                    0,
                    Side::Buy,
                    depth,
                    (depth as u32) * orders_per_level,
                ));
            },
            criterion::BatchSize::SmallInput,
        )
    });

    c.bench_function("cancel a mid-queue resting order", |b| {
        b.iter_batched(
            || setup_order_book(depth, orders_per_level),
            |mut ob| ob.cancel(depth as u64 * orders_per_level as u64 / 2),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_match_order);
criterion_main!(benches);
