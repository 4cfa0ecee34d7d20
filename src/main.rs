use order_book_engine::{EngineConfig, Order, OrderBookEngine, OrderType, Side};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Runs a handful of orders through a fresh engine and prints the resulting
/// trades and book snapshot. Not a server: the matching core has no
/// remaining I/O surface to host one.
fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let engine = OrderBookEngine::new(EngineConfig::default());

    engine.add(Order::new_limit(OrderType::GoodTillCancel, 1, Side::Sell, 101, 10));
    engine.add(Order::new_limit(OrderType::GoodTillCancel, 2, Side::Sell, 102, 5));
    let trades = engine.add(Order::new_limit(OrderType::GoodTillCancel, 3, Side::Buy, 101, 12));

    info!(trade_count = trades.len(), "demo run complete");
    for trade in &trades {
        info!(
            bid_id = trade.bid.order_id,
            ask_id = trade.ask.order_id,
            price = trade.bid.price,
            quantity = trade.bid.quantity,
            "trade"
        );
    }

    let snapshot = engine.snapshot();
    info!(bids = ?snapshot.bids, asks = ?snapshot.asks, "book snapshot");

    Ok(())
}
